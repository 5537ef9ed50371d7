//! Dataset schema model
//!
//! A schema is an ordered sequence of column specs plus an optional
//! designated primary-key column and a locale. Schemas are resolved by an
//! external collaborator and passed in by reference for the duration of one
//! request; this crate never persists them.
//!
//! # Design Principles
//!
//! - Field names are unique within a schema
//! - A designated primary key must name an existing column
//! - Column specs are immutable once constructed

mod errors;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use types::{ColumnSpec, ExportSchema, Schema, SemanticType};
