//! Template registry value type
//!
//! The registry itself is a plain `BTreeMap<String, Template>` injected into
//! the snapshot manager at construction, never ambient mutable state.

use serde::{Deserialize, Serialize};

/// A renderable page template referenced by snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Human-readable template name
    pub name: String,

    /// Path understood by the (out of scope) rendering layer
    pub path: String,
}

impl Template {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}
