//! Retention pruner.
//!
//! Bounds the number of historical snapshots kept per page. Recency is the
//! close date of the publication window; the open-ended (live) snapshot
//! counts as the most recent, so it survives any `keep >= 1`.

#![allow(clippy::result_large_err)]

use crate::dialect::SqlDialect;
use crate::errors::{invalid_keep, Result};
use rusqlite::Connection;

/// Delete every snapshot of `page_id` except the `keep` most recent ones.
///
/// `keep` must be non-negative; `keep = 0` empties the page's history,
/// including its live snapshot. Returns the number of rows deleted; callers
/// only use the count for logging.
pub fn cleanup(
    conn: &Connection,
    dialect: &dyn SqlDialect,
    page_id: i64,
    keep: i64,
) -> Result<usize> {
    if keep < 0 {
        return Err(invalid_keep(page_id, keep));
    }

    let deleted = dialect.delete_except_top_n_by_recency(conn, page_id, keep)?;

    tracing::debug!(
        page_id,
        keep,
        deleted,
        dialect = dialect.name(),
        "Pruned snapshot history"
    );

    Ok(deleted)
}
