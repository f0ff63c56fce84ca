//! Domain model for page snapshots

mod criteria;
mod snapshot;
mod template;

pub use criteria::{IdentifyingKey, SnapshotCriteria};
pub use snapshot::Snapshot;
pub use template::Template;
