//! Publication controller.
//!
//! Promotes a batch of snapshots to live and demotes whatever was live on
//! the same pages, in one transaction. A snapshot is live while its
//! publication window contains "now"; the batch shares a single timestamp so
//! a page's old and new snapshot windows meet exactly.

#![allow(clippy::result_large_err)]

use crate::dialect::SqlDialect;
use crate::errors::{from_rusqlite, Result};
use crate::snapshot::persist::{clamp_to_ms, save_snapshot};
use chrono::{DateTime, Utc};
use pagevault_core::errors::{PvError, PvErrorKind};
use pagevault_core::model::Snapshot;
use rusqlite::Connection;

/// Enable a batch of snapshots as of now.
///
/// See [`enable_snapshots_at`] for the semantics.
pub fn enable_snapshots(
    conn: &mut Connection,
    dialect: &dyn SqlDialect,
    snapshots: &mut [Snapshot],
) -> Result<()> {
    enable_snapshots_at(conn, dialect, snapshots, Utc::now())
}

/// Enable a batch of snapshots with an explicit batch timestamp.
///
/// Every batch member gets `publication_date_start = now` and an open-ended
/// window, and is persisted (ids are assigned to fresh snapshots). Then a
/// single bulk statement closes every other open-ended snapshot on the
/// touched pages at the same instant. Both phases run inside one
/// transaction: a failure in either rolls the whole batch back, so readers
/// never observe the half-applied state.
///
/// An empty batch is a no-op.
pub fn enable_snapshots_at(
    conn: &mut Connection,
    dialect: &dyn SqlDialect,
    snapshots: &mut [Snapshot],
    now: DateTime<Utc>,
) -> Result<()> {
    if snapshots.is_empty() {
        return Ok(());
    }

    let now = clamp_to_ms(now);
    let tx = conn.transaction().map_err(from_rusqlite)?;

    let mut page_ids: Vec<i64> = Vec::new();
    let mut enabled_ids: Vec<i64> = Vec::with_capacity(snapshots.len());

    for snapshot in snapshots.iter_mut() {
        snapshot.publication_date_start = Some(now);
        snapshot.publication_date_end = None;
        save_snapshot(&tx, snapshot)?;

        let id = snapshot.id.ok_or_else(|| {
            PvError::new(PvErrorKind::Internal)
                .with_op("enable_snapshots")
                .with_page_id(snapshot.page_id)
                .with_message("snapshot id missing after persist")
        })?;
        enabled_ids.push(id);
        if !page_ids.contains(&snapshot.page_id) {
            page_ids.push(snapshot.page_id);
        }
    }

    let demoted =
        dialect.bulk_close_open_snapshots(&tx, &page_ids, &enabled_ids, now.timestamp_millis())?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(
        enabled = enabled_ids.len(),
        pages = page_ids.len(),
        demoted,
        "Enabled snapshot batch"
    );

    Ok(())
}
