//! Snapshot repository queries.
//!
//! Generic equality lookups plus the hot read path: resolving the snapshot
//! that is currently enabled for a page, identified by one of the alternate
//! lookup keys.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, invalid_criteria, Result};
use chrono::{DateTime, Utc};
use pagevault_core::model::{IdentifyingKey, Snapshot, SnapshotCriteria};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension};

const SNAPSHOT_COLUMNS: &str = "id, page_id, site_id, route_name, url, page_alias, name, \
     publication_date_start, publication_date_end, content";

/// Find all snapshots matching every populated criteria field, ordered by id
pub fn find_by(conn: &Connection, criteria: &SnapshotCriteria) -> Result<Vec<Snapshot>> {
    let (clause, params) = equality_filter(criteria);
    let sql = format!(
        "SELECT {} FROM snapshots{} ORDER BY id",
        SNAPSHOT_COLUMNS, clause
    );

    let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
    let rows: std::result::Result<Vec<_>, _> = stmt
        .query_map(rusqlite::params_from_iter(params), row_to_snapshot)
        .map_err(from_rusqlite)?
        .collect();
    rows.map_err(from_rusqlite)
}

/// Find a single snapshot matching the criteria, or `None`
pub fn find_one_by(conn: &Connection, criteria: &SnapshotCriteria) -> Result<Option<Snapshot>> {
    let (clause, params) = equality_filter(criteria);
    let sql = format!(
        "SELECT {} FROM snapshots{} ORDER BY id LIMIT 1",
        SNAPSHOT_COLUMNS, clause
    );

    conn.query_row(&sql, rusqlite::params_from_iter(params), row_to_snapshot)
        .optional()
        .map_err(from_rusqlite)
}

/// Resolve the snapshot enabled at instant `at` for the given criteria.
///
/// The criteria must carry an identifying key (`page_id`, `url`,
/// `route_name`, `page_alias` or `name`, consulted in that priority order);
/// otherwise this is a caller contract violation. An optional `site_id`
/// narrows the match. Returns `Ok(None)` when nothing is currently enabled,
/// which is the normal "page not published" outcome, not a failure.
pub fn find_enabled_snapshot_at(
    conn: &Connection,
    criteria: &SnapshotCriteria,
    at: DateTime<Utc>,
) -> Result<Option<Snapshot>> {
    let key = criteria.identifying_key().ok_or_else(invalid_criteria)?;

    let mut sql = format!(
        "SELECT {} FROM snapshots \
         WHERE publication_date_start <= ?1 \
           AND (publication_date_end IS NULL OR publication_date_end >= ?1)",
        SNAPSHOT_COLUMNS
    );
    let mut params: Vec<Value> = vec![Value::from(at.timestamp_millis())];

    if let Some(site_id) = criteria.site_id {
        sql.push_str(" AND site_id = ?");
        params.push(Value::from(site_id));
    }

    let (column, value) = match key {
        IdentifyingKey::PageId(page_id) => ("page_id", Value::from(page_id)),
        IdentifyingKey::Url(url) => ("url", Value::from(url.to_string())),
        IdentifyingKey::RouteName(route_name) => ("route_name", Value::from(route_name.to_string())),
        IdentifyingKey::PageAlias(page_alias) => ("page_alias", Value::from(page_alias.to_string())),
        IdentifyingKey::Name(name) => ("name", Value::from(name.to_string())),
    };
    sql.push_str(&format!(" AND {} = ?", column));
    params.push(value);

    // Deterministic pick if the at-most-one-live invariant is transiently off
    sql.push_str(" ORDER BY publication_date_start DESC, id DESC LIMIT 1");

    conn.query_row(&sql, rusqlite::params_from_iter(params), row_to_snapshot)
        .optional()
        .map_err(from_rusqlite)
}

/// Build the WHERE clause and parameters for generic equality filtering
fn equality_filter(criteria: &SnapshotCriteria) -> (String, Vec<Value>) {
    let mut conditions: Vec<&'static str> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(site_id) = criteria.site_id {
        conditions.push("site_id = ?");
        params.push(Value::from(site_id));
    }
    if let Some(page_id) = criteria.page_id {
        conditions.push("page_id = ?");
        params.push(Value::from(page_id));
    }
    if let Some(url) = &criteria.url {
        conditions.push("url = ?");
        params.push(Value::from(url.clone()));
    }
    if let Some(route_name) = &criteria.route_name {
        conditions.push("route_name = ?");
        params.push(Value::from(route_name.clone()));
    }
    if let Some(page_alias) = &criteria.page_alias {
        conditions.push("page_alias = ?");
        params.push(Value::from(page_alias.clone()));
    }
    if let Some(name) = &criteria.name {
        conditions.push("name = ?");
        params.push(Value::from(name.clone()));
    }

    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), params)
    }
}

fn row_to_snapshot(row: &rusqlite::Row<'_>) -> rusqlite::Result<Snapshot> {
    let start_ms: Option<i64> = row.get(7)?;
    let end_ms: Option<i64> = row.get(8)?;
    Ok(Snapshot {
        id: Some(row.get(0)?),
        page_id: row.get(1)?,
        site_id: row.get(2)?,
        route_name: row.get(3)?,
        url: row.get(4)?,
        page_alias: row.get(5)?,
        name: row.get(6)?,
        publication_date_start: start_ms.and_then(DateTime::from_timestamp_millis),
        publication_date_end: end_ms.and_then(DateTime::from_timestamp_millis),
        content: row.get(9)?,
    })
}
