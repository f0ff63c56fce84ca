//! Error handling for pagevault-store
//!
//! Wraps pagevault-core PvError with store-specific helpers

use pagevault_core::errors::{PvError, PvErrorKind};

/// Result type alias using PvError
pub type Result<T> = std::result::Result<T, PvError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> PvError {
    PvError::new(PvErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> PvError {
    PvError::new(PvErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> PvError {
    PvError::new(PvErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create an invalid-criteria error (enabled lookup without identifying key)
pub fn invalid_criteria() -> PvError {
    PvError::new(PvErrorKind::InvalidCriteria)
        .with_op("find_enabled_snapshot")
        .with_message(
            "please provide a `page_id`, `url`, `route_name`, `page_alias` or `name` as criteria",
        )
}

/// Create an invalid-keep error (negative retention count)
pub fn invalid_keep(page_id: i64, keep: i64) -> PvError {
    PvError::new(PvErrorKind::InvalidArgument)
        .with_op("cleanup")
        .with_page_id(page_id)
        .with_message(format!("keep must be a non-negative integer, {} given", keep))
}

/// Create a template registry miss error
pub fn template_missing(code: &str) -> PvError {
    PvError::new(PvErrorKind::NotFound)
        .with_op("template")
        .with_message(format!("No template referenced with the code: {}", code))
}
