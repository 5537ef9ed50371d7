//! Script encoding error types

use thiserror::Error;

/// Result type for script encoding
pub type ScriptResult<T> = Result<T, ScriptError>;

/// Errors produced while encoding a mutation script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// A row operation was emitted before any row-option state was
    /// established
    #[error("row operation emitted outside a row run; emit row options first")]
    RowOutsideRun,

    /// The output sink failed
    #[error("i/o error writing mutation script: {0}")]
    Io(#[from] std::io::Error),

    /// Element serialization failed
    #[error("failed to serialize script element: {0}")]
    Json(#[from] serde_json::Error),
}
