//! Typed column values

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Map, Value};

use crate::schema::SemanticType;

/// A well-typed column value.
///
/// One payload variant per semantic type plus a distinguished null. Values
/// are produced only by the codec, so anything holding a `TypedValue` can
/// rely on the payload matching its column's declared type.
///
/// Numbers and money amounts carry canonical decimal text rather than a
/// float, so digits survive round trips past 2^53.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Null for any column type
    Null,
    Text(String),
    /// Decimal text in JSON number syntax
    Number(String),
    Double(f64),
    /// Decimal currency amount in JSON number syntax
    Money(String),
    Boolean(bool),
    FixedTimestamp(DateTime<Utc>),
    FloatingTimestamp(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    Point { longitude: f64, latitude: f64 },
    Array(Vec<Value>),
    Object(Map<String, Value>),
    RowIdentifier(String),
}

impl TypedValue {
    /// Returns the semantic type of this value, or `None` for null, which
    /// belongs to every type.
    pub fn semantic_type(&self) -> Option<SemanticType> {
        match self {
            TypedValue::Null => None,
            TypedValue::Text(_) => Some(SemanticType::Text),
            TypedValue::Number(_) => Some(SemanticType::Number),
            TypedValue::Double(_) => Some(SemanticType::Double),
            TypedValue::Money(_) => Some(SemanticType::Money),
            TypedValue::Boolean(_) => Some(SemanticType::Boolean),
            TypedValue::FixedTimestamp(_) => Some(SemanticType::FixedTimestamp),
            TypedValue::FloatingTimestamp(_) => Some(SemanticType::FloatingTimestamp),
            TypedValue::Date(_) => Some(SemanticType::Date),
            TypedValue::Time(_) => Some(SemanticType::Time),
            TypedValue::Point { .. } => Some(SemanticType::Point),
            TypedValue::Array(_) => Some(SemanticType::Array),
            TypedValue::Object(_) => Some(SemanticType::Object),
            TypedValue::RowIdentifier(_) => Some(SemanticType::RowIdentifier),
        }
    }

    /// Returns true for the null variant.
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }
}
