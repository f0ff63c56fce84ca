//! PageVault Store - SQLite persistence for page snapshots
//!
//! Provides:
//! - SQLite schema with migrations framework
//! - Snapshot repository (criteria lookups, enabled-snapshot resolution)
//! - Publication controller (atomic promote/demote of live snapshots)
//! - Retention pruner (per-page keep-N cleanup)
//! - SQL dialect abstraction for the bulk statements

pub mod db;
pub mod dialect;
pub mod errors;
pub mod migrations;
pub mod snapshot;

// Re-export key types
pub use errors::Result;
pub use snapshot::SnapshotManager;
