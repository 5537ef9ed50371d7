//! Schema error types

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Structural schema errors
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// Two columns share a field name
    #[error("duplicate field name '{field}' in schema")]
    DuplicateFieldName { field: String },

    /// The designated primary key names no column
    #[error("primary key field '{field}' is not a column of the schema")]
    UnknownPrimaryKey { field: String },
}

impl SchemaError {
    pub(crate) fn duplicate_field(field: impl Into<String>) -> Self {
        SchemaError::DuplicateFieldName {
            field: field.into(),
        }
    }

    pub(crate) fn unknown_primary_key(field: impl Into<String>) -> Self {
        SchemaError::UnknownPrimaryKey {
            field: field.into(),
        }
    }
}
