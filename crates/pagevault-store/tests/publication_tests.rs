// Test suite for snapshot publication
// Tests batch promotion, demotion of previously live snapshots, and the
// at-most-one-live-per-page invariant

use chrono::{DateTime, TimeZone, Utc};
use pagevault_core::model::{Snapshot, SnapshotCriteria};
use pagevault_store::dialect::LimitDialect;
use pagevault_store::snapshot::publish::enable_snapshots_at;
use pagevault_store::snapshot::query::find_enabled_snapshot_at;
use pagevault_store::snapshot::save_snapshot;
use pagevault_store::SnapshotManager;
use rusqlite::Connection;
use std::collections::BTreeMap;
use tempfile::TempDir;

fn setup_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    pagevault_store::migrations::apply_migrations(&mut conn).unwrap();
    conn
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn open_count(conn: &Connection, page_id: i64) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM snapshots WHERE page_id = ? AND publication_date_end IS NULL",
        [page_id],
        |row| row.get(0),
    )
    .unwrap()
}

// Scenario from the publication contract: page P has A(start=t0, end=t5) and
// B(start=t5, open-ended). Enabling C at t10 leaves A unchanged, closes B at
// t10, and makes C the enabled snapshot afterwards.
#[test]
fn test_promote_supersedes_live_snapshot() {
    let mut conn = setup_conn();

    let mut a = Snapshot::new(1, serde_json::json!({"v": "a"}));
    a.publication_date_start = Some(at(0));
    a.publication_date_end = Some(at(5));
    save_snapshot(&conn, &mut a).unwrap();

    let mut b = Snapshot::new(1, serde_json::json!({"v": "b"}));
    b.publication_date_start = Some(at(5));
    save_snapshot(&conn, &mut b).unwrap();

    let mut batch = vec![Snapshot::new(1, serde_json::json!({"v": "c"}))];
    enable_snapshots_at(&mut conn, &LimitDialect, &mut batch, at(10)).unwrap();
    let c = &batch[0];

    let reload = |id: i64| -> (Option<i64>, Option<i64>) {
        conn.query_row(
            "SELECT publication_date_start, publication_date_end FROM snapshots WHERE id = ?",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap()
    };

    assert_eq!(
        reload(a.id.unwrap()),
        (Some(at(0).timestamp_millis()), Some(at(5).timestamp_millis()))
    );
    assert_eq!(
        reload(b.id.unwrap()),
        (Some(at(5).timestamp_millis()), Some(at(10).timestamp_millis()))
    );
    assert_eq!(
        reload(c.id.unwrap()),
        (Some(at(10).timestamp_millis()), None)
    );

    let live = find_enabled_snapshot_at(&conn, &SnapshotCriteria::for_page(1), at(11))
        .unwrap()
        .unwrap();
    assert_eq!(live.id, c.id);
    assert_eq!(live.content, serde_json::json!({"v": "c"}));
}

#[test]
fn test_at_most_one_open_snapshot_per_page_after_repeated_enables() {
    let mut conn = setup_conn();

    for round in 0..5 {
        let mut batch = vec![Snapshot::new(1, serde_json::json!({"round": round}))];
        enable_snapshots_at(&mut conn, &LimitDialect, &mut batch, at(10 * (round + 1))).unwrap();
        assert_eq!(open_count(&conn, 1), 1, "round {}", round);
    }

    let total: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM snapshots WHERE page_id = 1",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(total, 5);
}

#[test]
fn test_multi_page_batch_touches_only_its_pages() {
    let mut conn = setup_conn();

    let mut bystander = Snapshot::new(3, serde_json::json!({}));
    bystander.publication_date_start = Some(at(0));
    save_snapshot(&conn, &mut bystander).unwrap();

    let mut batch = vec![
        Snapshot::new(1, serde_json::json!({"p": 1})),
        Snapshot::new(2, serde_json::json!({"p": 2})),
    ];
    enable_snapshots_at(&mut conn, &LimitDialect, &mut batch, at(100)).unwrap();

    assert_eq!(open_count(&conn, 1), 1);
    assert_eq!(open_count(&conn, 2), 1);

    // The page outside the batch keeps its open window
    let end: Option<i64> = conn
        .query_row(
            "SELECT publication_date_end FROM snapshots WHERE id = ?",
            [bystander.id.unwrap()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(end, None);
}

#[test]
fn test_manager_enable_and_resolve_live() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("pages.db");
    let mut manager = SnapshotManager::open(&db_path, BTreeMap::new()).unwrap();

    let mut snapshot = manager.create(1, serde_json::json!({"title": "Home"}));
    snapshot.url = Some("/".into());
    let mut batch = vec![snapshot];
    manager.enable_snapshots(&mut batch).unwrap();

    let live = manager
        .find_enabled_snapshot(&SnapshotCriteria::for_url("/"))
        .unwrap()
        .unwrap();
    assert_eq!(live.id, batch[0].id);

    // Superseding publication wins the lookup afterwards
    let mut next = vec![manager.create(1, serde_json::json!({"title": "Home v2"}))];
    next[0].url = Some("/".into());
    manager.enable_snapshots(&mut next).unwrap();

    let live = manager
        .find_enabled_snapshot(&SnapshotCriteria::for_page(1))
        .unwrap()
        .unwrap();
    assert_eq!(live.id, next[0].id);
    assert_eq!(live.content, serde_json::json!({"title": "Home v2"}));
}
