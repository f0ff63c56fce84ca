//! Canonical error facility for PageVault
//!
//! Every error in the system is classified by a stable `PvErrorKind` with a
//! stable `ERR_*` code, and carried as a structured `PvError` with operation
//! and entity context attached via builder methods.

/// Result type alias using PvError
pub type Result<T> = std::result::Result<T, PvError>;

/// Canonical error kind taxonomy
///
/// Lookups that match nothing are NOT errors: repository reads return
/// `Ok(None)` / empty vectors. `NotFound` is reserved for registry misses
/// where the caller named a key that must exist (e.g. a template code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PvErrorKind {
    /// Enabled-snapshot lookup was given no identifying key
    InvalidCriteria,
    /// A caller-supplied argument is out of range (e.g. negative keep count)
    InvalidArgument,
    /// A named registry entry does not exist
    NotFound,
    /// Backend read/write/transaction failure, surfaced verbatim
    Persistence,
    /// JSON encoding/decoding of snapshot content failed
    Serialization,
    /// Invariant breach that should not occur
    Internal,
}

impl PvErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            PvErrorKind::InvalidCriteria => "ERR_INVALID_CRITERIA",
            PvErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            PvErrorKind::NotFound => "ERR_NOT_FOUND",
            PvErrorKind::Persistence => "ERR_PERSISTENCE",
            PvErrorKind::Serialization => "ERR_SERIALIZATION",
            PvErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
#[derive(Debug, Clone)]
pub struct PvError {
    kind: PvErrorKind,
    op: Option<String>,
    page_id: Option<i64>,
    snapshot_id: Option<i64>,
    message: String,
}

impl PvError {
    /// Create a new error with the specified kind
    pub fn new(kind: PvErrorKind) -> Self {
        Self {
            kind,
            op: None,
            page_id: None,
            snapshot_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add page ID context
    pub fn with_page_id(mut self, page_id: i64) -> Self {
        self.page_id = Some(page_id);
        self
    }

    /// Add snapshot ID context
    pub fn with_snapshot_id(mut self, snapshot_id: i64) -> Self {
        self.snapshot_id = Some(snapshot_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> PvErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the page ID context, if any
    pub fn page_id(&self) -> Option<i64> {
        self.page_id
    }

    /// Get the snapshot ID context, if any
    pub fn snapshot_id(&self) -> Option<i64> {
        self.snapshot_id
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for PvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(page_id) = self.page_id {
            write!(f, " (page_id: {})", page_id)?;
        }
        if let Some(snapshot_id) = self.snapshot_id {
            write!(f, " (snapshot_id: {})", snapshot_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for PvError {}

impl From<serde_json::Error> for PvError {
    fn from(err: serde_json::Error) -> Self {
        PvError::new(PvErrorKind::Serialization).with_message(err.to_string())
    }
}
