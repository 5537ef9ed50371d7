//! Row translation error types

use serde_json::Value;
use thiserror::Error;

use crate::schema::SemanticType;

/// Result type for translation operations
pub type TranslateResult<T> = Result<T, TranslateError>;

/// Errors produced while translating raw JSON values into row operations.
///
/// Each variant carries the offending field or value; dataset and request
/// identifiers are stamped on at the gateway seam, where they are known.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// A field value does not decode as its column's type
    #[error("value {value} does not match type {expected} for field '{field}'")]
    TypeMismatch {
        field: String,
        expected: SemanticType,
        value: Value,
    },

    /// A field names no column in the schema
    #[error("no column '{field}' in dataset schema")]
    ColumnNotFound { field: String },

    /// Delete requested against a dataset with no designated primary key
    #[error("dataset has no designated primary key; delete by key is not possible")]
    NoPrimaryKey,

    /// A row marked for deletion did not carry its primary-key field
    #[error("row marked for deletion is missing primary key field '{field}'")]
    MissingPrimaryKey { field: String },

    /// A raw value is neither an object nor a single-element scalar array
    #[error("row is neither an object nor a single-element array: {value}")]
    MalformedRow { value: Value },

    /// The request body is not well-formed JSON
    #[error("malformed JSON in request body: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// One serialized datum exceeds the configured size cap
    #[error("datum exceeds maximum serialized size of {limit} bytes")]
    OversizedDatum { limit: usize },

    /// The underlying body reader failed
    #[error("i/o error reading request body: {0}")]
    Io(#[from] std::io::Error),
}
