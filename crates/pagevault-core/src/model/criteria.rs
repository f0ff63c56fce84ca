//! Repository lookup criteria
//!
//! A criteria value carries equality filters for the snapshot table. For the
//! enabled-snapshot lookup exactly one identifying key is consulted, chosen
//! in a fixed priority order inherited from the page-resolution contract:
//! `page_id > url > route_name > page_alias > name`.

use serde::{Deserialize, Serialize};

/// Equality filters for snapshot lookups; unset fields are ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotCriteria {
    /// Optional site scope, narrows any lookup
    pub site_id: Option<i64>,
    pub page_id: Option<i64>,
    pub url: Option<String>,
    pub route_name: Option<String>,
    pub page_alias: Option<String>,
    pub name: Option<String>,
}

/// The single identifying key selected for an enabled-snapshot lookup
#[derive(Debug, Clone, PartialEq)]
pub enum IdentifyingKey<'a> {
    PageId(i64),
    Url(&'a str),
    RouteName(&'a str),
    PageAlias(&'a str),
    Name(&'a str),
}

impl SnapshotCriteria {
    /// Criteria filtering by owning page
    pub fn for_page(page_id: i64) -> Self {
        Self {
            page_id: Some(page_id),
            ..Self::default()
        }
    }

    /// Criteria filtering by URL
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Narrow the criteria to a site
    pub fn with_site(mut self, site_id: i64) -> Self {
        self.site_id = Some(site_id);
        self
    }

    /// Select the identifying key in priority order; `None` when no key is set
    ///
    /// First match wins when several keys are populated at once. The order is
    /// part of the public contract and must not be reshuffled.
    pub fn identifying_key(&self) -> Option<IdentifyingKey<'_>> {
        if let Some(page_id) = self.page_id {
            Some(IdentifyingKey::PageId(page_id))
        } else if let Some(url) = self.url.as_deref() {
            Some(IdentifyingKey::Url(url))
        } else if let Some(route_name) = self.route_name.as_deref() {
            Some(IdentifyingKey::RouteName(route_name))
        } else if let Some(page_alias) = self.page_alias.as_deref() {
            Some(IdentifyingKey::PageAlias(page_alias))
        } else {
            self.name.as_deref().map(IdentifyingKey::Name)
        }
    }

    /// Whether no filter field at all is populated
    pub fn is_empty(&self) -> bool {
        self.site_id.is_none() && self.identifying_key().is_none()
    }
}
