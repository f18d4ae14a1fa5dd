//! Error taxonomy for the storyboard data core
//!
//! Every fallible operation in the crate returns [`DataError`]. The variants
//! map one-to-one onto the failure classes callers need to distinguish:
//! malformed payloads, missing required top-level fields, read failures,
//! missing stage sub-structure, and missing merge arguments.

/// Errors produced by the storyboard data core.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// The textual payload is not well-formed JSON.
    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The decoded document lacks a required top-level field, or no
    /// document is loaded where one is required.
    #[error("invalid document: {0}")]
    Validation(String),

    /// The underlying file read failed.
    #[error("file read failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stage-specific required sub-structure is missing or malformed.
    #[error("stage data error: {0}")]
    StageData(String),

    /// A required argument was absent from a merge call.
    #[error("missing data: {0}")]
    MissingData(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, DataError>;
