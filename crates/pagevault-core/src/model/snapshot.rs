//! Snapshot domain model
//!
//! A snapshot is a versioned, time-windowed copy of a page's content. Many
//! snapshots per page coexist; the one whose publication window contains
//! "now" is the live one, and there is at most one of those per page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One immutable-content version of a page at a point in time
///
/// Content never changes after creation; only the publication window
/// (`publication_date_start` / `publication_date_end`) moves over the
/// snapshot's lifecycle, until retention pruning hard-deletes the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Row ID, assigned on first persist
    pub id: Option<i64>,

    /// Owning page
    pub page_id: i64,

    /// Optional site scope
    pub site_id: Option<i64>,

    /// Alternate lookup key: route name
    pub route_name: Option<String>,

    /// Alternate lookup key: URL
    pub url: Option<String>,

    /// Alternate lookup key: page alias
    pub page_alias: Option<String>,

    /// Alternate lookup key: page name
    pub name: Option<String>,

    /// Start of the publication window; `None` = never activated
    pub publication_date_start: Option<DateTime<Utc>>,

    /// End of the publication window; `None` = open-ended (still live)
    pub publication_date_end: Option<DateTime<Utc>>,

    /// Opaque serialized page content
    pub content: JsonValue,
}

impl Snapshot {
    /// Create an unpublished snapshot for a page (both window dates unset)
    pub fn new(page_id: i64, content: JsonValue) -> Self {
        Self {
            id: None,
            page_id,
            site_id: None,
            route_name: None,
            url: None,
            page_alias: None,
            name: None,
            publication_date_start: None,
            publication_date_end: None,
            content,
        }
    }

    /// Whether the publication window contains `at`
    pub fn is_enabled_at(&self, at: DateTime<Utc>) -> bool {
        match self.publication_date_start {
            Some(start) if start <= at => match self.publication_date_end {
                None => true,
                Some(end) => end >= at,
            },
            _ => false,
        }
    }

    /// Whether the snapshot is open-ended (no end date yet)
    pub fn is_open_ended(&self) -> bool {
        self.publication_date_start.is_some() && self.publication_date_end.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_new_snapshot_is_unpublished() {
        let snapshot = Snapshot::new(1, serde_json::json!({"title": "home"}));
        assert!(snapshot.id.is_none());
        assert!(snapshot.publication_date_start.is_none());
        assert!(snapshot.publication_date_end.is_none());
        assert!(!snapshot.is_enabled_at(at(100)));
    }

    #[test]
    fn test_open_ended_window_is_enabled() {
        let mut snapshot = Snapshot::new(1, serde_json::json!({}));
        snapshot.publication_date_start = Some(at(50));
        assert!(snapshot.is_open_ended());
        assert!(snapshot.is_enabled_at(at(100)));
        assert!(!snapshot.is_enabled_at(at(10)));
    }

    #[test]
    fn test_closed_window_bounds() {
        let mut snapshot = Snapshot::new(1, serde_json::json!({}));
        snapshot.publication_date_start = Some(at(50));
        snapshot.publication_date_end = Some(at(100));
        assert!(snapshot.is_enabled_at(at(50)));
        assert!(snapshot.is_enabled_at(at(100)));
        assert!(!snapshot.is_enabled_at(at(101)));
        assert!(!snapshot.is_open_ended());
    }
}
