//! Snapshot row persistence.
//!
//! Upserts snapshot entities into the `snapshots` table. A `Transaction`
//! derefs to `Connection`, so the same function serves both the standalone
//! save path and the batched publication path.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use chrono::{DateTime, Utc};
use pagevault_core::model::Snapshot;
use rusqlite::Connection;

/// Persist a snapshot to the database.
///
/// A snapshot without an id is inserted and receives its row id; a snapshot
/// with an id is upserted in place. The content payload is stored as JSON
/// text, publication dates as Unix milliseconds.
pub fn save_snapshot(conn: &Connection, snapshot: &mut Snapshot) -> Result<()> {
    let start_ms = snapshot.publication_date_start.map(|d| d.timestamp_millis());
    let end_ms = snapshot.publication_date_end.map(|d| d.timestamp_millis());

    match snapshot.id {
        Some(id) => {
            conn.execute(
                "INSERT INTO snapshots
                 (id, page_id, site_id, route_name, url, page_alias, name,
                  publication_date_start, publication_date_end, content)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(id) DO UPDATE SET
                    page_id = excluded.page_id,
                    site_id = excluded.site_id,
                    route_name = excluded.route_name,
                    url = excluded.url,
                    page_alias = excluded.page_alias,
                    name = excluded.name,
                    publication_date_start = excluded.publication_date_start,
                    publication_date_end = excluded.publication_date_end,
                    content = excluded.content",
                rusqlite::params![
                    id,
                    snapshot.page_id,
                    snapshot.site_id,
                    snapshot.route_name,
                    snapshot.url,
                    snapshot.page_alias,
                    snapshot.name,
                    start_ms,
                    end_ms,
                    snapshot.content,
                ],
            )
            .map_err(from_rusqlite)?;
        }
        None => {
            conn.execute(
                "INSERT INTO snapshots
                 (page_id, site_id, route_name, url, page_alias, name,
                  publication_date_start, publication_date_end, content)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    snapshot.page_id,
                    snapshot.site_id,
                    snapshot.route_name,
                    snapshot.url,
                    snapshot.page_alias,
                    snapshot.name,
                    start_ms,
                    end_ms,
                    snapshot.content,
                ],
            )
            .map_err(from_rusqlite)?;
            snapshot.id = Some(conn.last_insert_rowid());
        }
    }

    tracing::debug!(
        snapshot_id = ?snapshot.id,
        page_id = snapshot.page_id,
        "Persisted snapshot"
    );

    Ok(())
}

/// Truncate a timestamp to the millisecond precision the table stores,
/// so in-memory entities stay equal to their round-tripped rows.
pub(crate) fn clamp_to_ms(dt: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        crate::migrations::apply_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_assigns_id() {
        let conn = setup();
        let mut snapshot = Snapshot::new(1, serde_json::json!({"body": "v1"}));
        save_snapshot(&conn, &mut snapshot).unwrap();
        assert!(snapshot.id.is_some());
    }

    #[test]
    fn test_upsert_updates_in_place() {
        let conn = setup();
        let mut snapshot = Snapshot::new(1, serde_json::json!({}));
        snapshot.url = Some("/home".into());
        save_snapshot(&conn, &mut snapshot).unwrap();
        let id = snapshot.id.unwrap();

        snapshot.publication_date_start = Some(clamp_to_ms(Utc::now()));
        save_snapshot(&conn, &mut snapshot).unwrap();
        assert_eq!(snapshot.id, Some(id));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);

        let start: Option<i64> = conn
            .query_row(
                "SELECT publication_date_start FROM snapshots WHERE id = ?",
                [id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(
            start,
            snapshot.publication_date_start.map(|d| d.timestamp_millis())
        );
    }
}
