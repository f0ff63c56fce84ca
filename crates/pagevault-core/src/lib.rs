//! PageVault core - domain model and error facility
//!
//! Provides:
//! - The `Snapshot` entity: a versioned, time-windowed copy of a page
//! - `SnapshotCriteria` for repository lookups
//! - The `Template` registry value type
//! - Canonical structured errors (`PvError` / `PvErrorKind`)

pub mod errors;
pub mod model;

// Re-export key types
pub use errors::{PvError, PvErrorKind, Result};
pub use model::{Snapshot, SnapshotCriteria, Template};
