//! SQL dialect abstraction for the bulk snapshot statements
//!
//! The two set-based statements of the publication/retention cycle differ
//! across SQL dialects only in how "top N rows" is expressed: some dialects
//! take a trailing row-count clause, others a row-number predicate. The core
//! algorithms talk to this capability trait and never assemble SQL from
//! caller-supplied values; everything is bound as parameters.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::types::Value;
use rusqlite::{Connection, Transaction};

/// Capability interface for the bulk demote and retention statements
pub trait SqlDialect {
    /// Dialect name for logging
    fn name(&self) -> &'static str;

    /// Close every open-ended snapshot on the given pages, except the ids
    /// that were just enabled, by setting `publication_date_end = now_ms`.
    ///
    /// Returns the number of rows demoted. The statement is portable, so a
    /// default implementation is provided.
    fn bulk_close_open_snapshots(
        &self,
        tx: &Transaction<'_>,
        page_ids: &[i64],
        exclude_ids: &[i64],
        now_ms: i64,
    ) -> Result<usize> {
        if page_ids.is_empty() {
            return Ok(0);
        }

        let mut sql = format!(
            "UPDATE snapshots SET publication_date_end = ? \
             WHERE publication_date_end IS NULL AND page_id IN ({})",
            placeholders(page_ids.len())
        );
        if !exclude_ids.is_empty() {
            sql.push_str(&format!(" AND id NOT IN ({})", placeholders(exclude_ids.len())));
        }

        let mut params: Vec<Value> = Vec::with_capacity(1 + page_ids.len() + exclude_ids.len());
        params.push(Value::from(now_ms));
        params.extend(page_ids.iter().copied().map(Value::from));
        params.extend(exclude_ids.iter().copied().map(Value::from));

        tx.execute(&sql, rusqlite::params_from_iter(params))
            .map_err(from_rusqlite)
    }

    /// Delete every snapshot of `page_id` outside the `keep` most recently
    /// closed ones. Open-ended snapshots (NULL end date) sort first, so the
    /// live snapshot survives whenever `keep >= 1`.
    ///
    /// Returns the number of rows deleted.
    fn delete_except_top_n_by_recency(
        &self,
        conn: &Connection,
        page_id: i64,
        keep: i64,
    ) -> Result<usize>;
}

/// Dialect using a trailing `LIMIT n` clause for the top-N selection
pub struct LimitDialect;

impl SqlDialect for LimitDialect {
    fn name(&self) -> &'static str {
        "limit"
    }

    fn delete_except_top_n_by_recency(
        &self,
        conn: &Connection,
        page_id: i64,
        keep: i64,
    ) -> Result<usize> {
        conn.execute(
            "DELETE FROM snapshots
             WHERE page_id = ?1
               AND id NOT IN (
                   SELECT id FROM snapshots
                   WHERE page_id = ?1
                   ORDER BY publication_date_end IS NULL DESC,
                            publication_date_end DESC
                   LIMIT ?2
               )",
            rusqlite::params![page_id, keep],
        )
        .map_err(from_rusqlite)
    }
}

/// Dialect using a `ROW_NUMBER()` window predicate for the top-N selection
pub struct RowNumberDialect;

impl SqlDialect for RowNumberDialect {
    fn name(&self) -> &'static str {
        "row_number"
    }

    fn delete_except_top_n_by_recency(
        &self,
        conn: &Connection,
        page_id: i64,
        keep: i64,
    ) -> Result<usize> {
        conn.execute(
            "DELETE FROM snapshots
             WHERE page_id = ?1
               AND id NOT IN (
                   SELECT id FROM (
                       SELECT id, ROW_NUMBER() OVER (
                           ORDER BY publication_date_end IS NULL DESC,
                                    publication_date_end DESC
                       ) AS recency_rank
                       FROM snapshots
                       WHERE page_id = ?1
                   )
                   WHERE recency_rank <= ?2
               )",
            rusqlite::params![page_id, keep],
        )
        .map_err(from_rusqlite)
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}
