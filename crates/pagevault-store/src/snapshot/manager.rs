//! Snapshot manager facade.
//!
//! Owns the connection, the SQL dialect and the injected template registry,
//! and exposes the public snapshot operations in one place. Construction
//! configures the connection and applies migrations, so a fresh manager is
//! immediately usable.

#![allow(clippy::result_large_err)]

use crate::db;
use crate::dialect::{LimitDialect, SqlDialect};
use crate::errors::{template_missing, Result};
use crate::migrations::apply_migrations;
use crate::snapshot::{persist, publish, query, retention};
use chrono::Utc;
use pagevault_core::model::{Snapshot, SnapshotCriteria, Template};
use rusqlite::Connection;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::Path;

/// Manages snapshot persistence against a SQLite database
pub struct SnapshotManager {
    conn: Connection,
    dialect: Box<dyn SqlDialect>,
    templates: BTreeMap<String, Template>,
}

impl SnapshotManager {
    /// Wrap an existing connection; configures it and applies migrations
    pub fn new(conn: Connection, templates: BTreeMap<String, Template>) -> Result<Self> {
        Self::with_dialect(conn, Box::new(LimitDialect), templates)
    }

    /// Like [`SnapshotManager::new`] with an explicit SQL dialect
    pub fn with_dialect(
        mut conn: Connection,
        dialect: Box<dyn SqlDialect>,
        templates: BTreeMap<String, Template>,
    ) -> Result<Self> {
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn,
            dialect,
            templates,
        })
    }

    /// Open (or create) a database file and build a manager on it
    pub fn open<P: AsRef<Path>>(path: P, templates: BTreeMap<String, Template>) -> Result<Self> {
        Self::new(db::open(path)?, templates)
    }

    /// Build a manager on an in-memory database (for testing)
    pub fn open_in_memory(templates: BTreeMap<String, Template>) -> Result<Self> {
        Self::new(db::open_in_memory()?, templates)
    }

    /// Create an unpublished snapshot entity (not yet persisted)
    pub fn create(&self, page_id: i64, content: JsonValue) -> Snapshot {
        Snapshot::new(page_id, content)
    }

    /// Persist a snapshot; assigns an id on first save
    pub fn save(&self, snapshot: &mut Snapshot) -> Result<()> {
        persist::save_snapshot(&self.conn, snapshot)
    }

    /// Find all snapshots matching the criteria
    pub fn find_by(&self, criteria: &SnapshotCriteria) -> Result<Vec<Snapshot>> {
        query::find_by(&self.conn, criteria)
    }

    /// Find a single snapshot matching the criteria, or `None`
    pub fn find_one_by(&self, criteria: &SnapshotCriteria) -> Result<Option<Snapshot>> {
        query::find_one_by(&self.conn, criteria)
    }

    /// Resolve the currently enabled snapshot for the criteria.
    ///
    /// Requires an identifying key (`page_id`, `url`, `route_name`,
    /// `page_alias` or `name`); `Ok(None)` means nothing is published.
    pub fn find_enabled_snapshot(&self, criteria: &SnapshotCriteria) -> Result<Option<Snapshot>> {
        query::find_enabled_snapshot_at(&self.conn, criteria, Utc::now())
    }

    /// Promote a batch of snapshots to live, demoting whatever was live on
    /// the same pages, atomically
    pub fn enable_snapshots(&mut self, snapshots: &mut [Snapshot]) -> Result<()> {
        publish::enable_snapshots(&mut self.conn, self.dialect.as_ref(), snapshots)
    }

    /// Delete all but the `keep` most recent snapshots of a page; returns
    /// the number of rows deleted
    pub fn cleanup(&self, page_id: i64, keep: i64) -> Result<usize> {
        retention::cleanup(&self.conn, self.dialect.as_ref(), page_id, keep)
    }

    /// The injected template registry
    pub fn templates(&self) -> &BTreeMap<String, Template> {
        &self.templates
    }

    /// Look up a template by code; a miss is an error, unlike snapshot lookups
    pub fn template(&self, code: &str) -> Result<&Template> {
        self.templates.get(code).ok_or_else(|| template_missing(code))
    }

    /// Access the underlying connection (e.g. for ad-hoc reads in tests)
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
