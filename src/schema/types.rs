//! Column and schema type definitions
//!
//! Semantic types are the closed set of logical column data types. Every
//! semantic type has a stable lowercase wire name used in mutation scripts
//! and export headers.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};

/// The closed set of semantic column types.
///
/// Fixed at build time; the codec module defines a total mapping from each
/// variant to its client, wire, and flat-text representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// UTF-8 text
    Text,
    /// Arbitrary-precision decimal number
    Number,
    /// 64-bit floating point, including non-finite values
    Double,
    /// Decimal currency amount
    Money,
    /// Boolean
    Boolean,
    /// Instant with time zone, stored in UTC
    FixedTimestamp,
    /// Wall-clock timestamp without zone
    FloatingTimestamp,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Geographic point (longitude, latitude)
    Point,
    /// Opaque JSON array
    Array,
    /// Opaque JSON object
    Object,
    /// Backend row identifier
    RowIdentifier,
}

impl SemanticType {
    /// Returns the stable wire name for this type.
    pub fn name(&self) -> &'static str {
        match self {
            SemanticType::Text => "text",
            SemanticType::Number => "number",
            SemanticType::Double => "double",
            SemanticType::Money => "money",
            SemanticType::Boolean => "boolean",
            SemanticType::FixedTimestamp => "fixed_timestamp",
            SemanticType::FloatingTimestamp => "floating_timestamp",
            SemanticType::Date => "date",
            SemanticType::Time => "time",
            SemanticType::Point => "point",
            SemanticType::Array => "array",
            SemanticType::Object => "object",
            SemanticType::RowIdentifier => "row_identifier",
        }
    }

    /// Parses a wire name back into a semantic type.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(SemanticType::Text),
            "number" => Some(SemanticType::Number),
            "double" => Some(SemanticType::Double),
            "money" => Some(SemanticType::Money),
            "boolean" => Some(SemanticType::Boolean),
            "fixed_timestamp" => Some(SemanticType::FixedTimestamp),
            "floating_timestamp" => Some(SemanticType::FloatingTimestamp),
            "date" => Some(SemanticType::Date),
            "time" => Some(SemanticType::Time),
            "point" => Some(SemanticType::Point),
            "array" => Some(SemanticType::Array),
            "object" => Some(SemanticType::Object),
            "row_identifier" => Some(SemanticType::RowIdentifier),
            _ => None,
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single column definition.
///
/// `field_name` is the wire-stable identifier; `human_name` is the display
/// identifier used by the CSV export header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Backend column identifier
    pub column_id: String,
    /// Wire-stable field name, unique within a schema
    pub field_name: String,
    /// Display name
    pub human_name: String,
    /// Semantic type of values in this column
    pub semantic_type: SemanticType,
}

impl ColumnSpec {
    /// Creates a new column spec.
    pub fn new(
        column_id: impl Into<String>,
        field_name: impl Into<String>,
        human_name: impl Into<String>,
        semantic_type: SemanticType,
    ) -> Self {
        Self {
            column_id: column_id.into(),
            field_name: field_name.into(),
            human_name: human_name.into(),
            semantic_type,
        }
    }
}

/// A resolved dataset schema: ordered columns, optional primary key, locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Column specs in dataset definition order
    pub columns: Vec<ColumnSpec>,
    /// Field name of the designated primary-key column, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    /// Dataset locale
    pub locale: String,
}

impl Schema {
    /// Creates a new schema without a designated primary key.
    pub fn new(columns: Vec<ColumnSpec>, locale: impl Into<String>) -> Self {
        Self {
            columns,
            primary_key: None,
            locale: locale.into(),
        }
    }

    /// Designates the primary-key column by field name.
    pub fn with_primary_key(mut self, field_name: impl Into<String>) -> Self {
        self.primary_key = Some(field_name.into());
        self
    }

    /// Looks up a column by field name.
    pub fn column(&self, field_name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.field_name == field_name)
    }

    /// Returns the designated primary-key column, if one exists.
    pub fn primary_key_column(&self) -> Option<&ColumnSpec> {
        self.primary_key.as_deref().and_then(|f| self.column(f))
    }

    /// Validates the schema structure itself.
    ///
    /// Field names must be unique and the designated primary key, if any,
    /// must name an existing column.
    pub fn validate_structure(&self) -> SchemaResult<()> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.field_name.as_str()) {
                return Err(SchemaError::duplicate_field(&column.field_name));
            }
        }
        if let Some(pk) = self.primary_key.as_deref() {
            if self.column(pk).is_none() {
                return Err(SchemaError::unknown_primary_key(pk));
            }
        }
        Ok(())
    }
}

/// Read-only schema view constructed per export request.
///
/// Carries the dataset metadata the columnar export header advertises.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSchema {
    /// Column specs in dataset definition order
    pub columns: Vec<ColumnSpec>,
    /// Dataset locale
    pub locale: String,
    /// Field name of the primary-key column, if any
    pub primary_key: Option<String>,
    /// Exact row count, when known
    pub row_count: Option<u64>,
    /// Approximate row count, when the exact count is too expensive
    pub approximate_row_count: Option<u64>,
    /// Backend data version of the copy being exported
    pub data_version: Option<u64>,
    /// Last modification instant of the copy being exported
    pub last_modified: Option<DateTime<Utc>>,
}

impl ExportSchema {
    /// Builds an export view from a resolved schema.
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            columns: schema.columns.clone(),
            locale: schema.locale.clone(),
            primary_key: schema.primary_key.clone(),
            row_count: None,
            approximate_row_count: None,
            data_version: None,
            last_modified: None,
        }
    }

    /// Attaches an exact row count.
    pub fn with_row_count(mut self, count: u64) -> Self {
        self.row_count = Some(count);
        self
    }

    /// Attaches an approximate row count.
    pub fn with_approximate_row_count(mut self, count: u64) -> Self {
        self.approximate_row_count = Some(count);
        self
    }

    /// Attaches the backend data version.
    pub fn with_data_version(mut self, version: u64) -> Self {
        self.data_version = Some(version);
        self
    }

    /// Attaches the last-modified instant.
    pub fn with_last_modified(mut self, at: DateTime<Utc>) -> Self {
        self.last_modified = Some(at);
        self
    }
}
