//! Snapshot persistence layer.
//!
//! This module implements the snapshot lifecycle against the SQLite
//! `snapshots` table.
//!
//! ## Responsibilities
//!
//! - Persist snapshot rows (insert/upsert with id assignment)
//! - Criteria lookups, including resolving the currently enabled snapshot
//! - Publication: atomically promote a batch to live while demoting every
//!   previously live snapshot on the touched pages
//! - Retention: bound per-page history to a keep-count
//!
//! ## Non-Responsibilities
//!
//! - Page content semantics (the payload is opaque here)
//! - Rendering, routing and site configuration

pub mod manager;
pub mod persist;
pub mod publish;
pub mod query;
pub mod retention;

// Re-export primary types
pub use manager::SnapshotManager;
pub use persist::save_snapshot;
pub use publish::enable_snapshots;
pub use query::{find_by, find_enabled_snapshot_at, find_one_by};
pub use retention::cleanup;
