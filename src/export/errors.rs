//! Export error types

use thiserror::Error;

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors produced while rendering an export stream.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A row's arity does not match the schema
    #[error("row has {actual} values but the schema has {expected} columns")]
    ColumnCountMismatch { expected: usize, actual: usize },

    /// The output sink failed
    #[error("i/o error writing export: {0}")]
    Io(#[from] std::io::Error),

    /// Element serialization failed
    #[error("failed to serialize export element: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend row source failed mid-stream
    #[error("row source failed: {0}")]
    Source(String),
}
