//! The four codec directions
//!
//! `decode_client` is the only constructor of typed values. The three
//! writers are total over every typed value.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde_json::{json, Number, Value};

use super::value::TypedValue;
use crate::schema::SemanticType;

const FLOATING_TIMESTAMP_READ: &str = "%Y-%m-%dT%H:%M:%S%.f";
const FLOATING_TIMESTAMP_WRITE: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_READ: &str = "%H:%M:%S%.f";
const TIME_WRITE: &str = "%H:%M:%S%.3f";

/// Decodes a client JSON value as the given semantic type.
///
/// Returns `None` when the JSON shape does not match the type, so the
/// caller can report a validation error with its own context. JSON null
/// decodes to [`TypedValue::Null`] for every type. Numeric types accept a
/// JSON number or a string in JSON number syntax; doubles additionally
/// accept `"Infinity"`, `"-Infinity"`, and `"NaN"`.
pub fn decode_client(ty: SemanticType, value: &Value) -> Option<TypedValue> {
    if value.is_null() {
        return Some(TypedValue::Null);
    }
    match ty {
        SemanticType::Text => value.as_str().map(|s| TypedValue::Text(s.to_string())),
        SemanticType::Number => decimal_text(value).map(TypedValue::Number),
        SemanticType::Double => decode_double(value).map(TypedValue::Double),
        SemanticType::Money => decimal_text(value).map(TypedValue::Money),
        SemanticType::Boolean => value.as_bool().map(TypedValue::Boolean),
        SemanticType::FixedTimestamp => value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| TypedValue::FixedTimestamp(dt.with_timezone(&Utc))),
        SemanticType::FloatingTimestamp => value
            .as_str()
            .and_then(|s| NaiveDateTime::parse_from_str(s, FLOATING_TIMESTAMP_READ).ok())
            .map(TypedValue::FloatingTimestamp),
        SemanticType::Date => value
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
            .map(TypedValue::Date),
        SemanticType::Time => value
            .as_str()
            .and_then(|s| NaiveTime::parse_from_str(s, TIME_READ).ok())
            .map(TypedValue::Time),
        SemanticType::Point => decode_point(value),
        SemanticType::Array => value.as_array().map(|a| TypedValue::Array(a.clone())),
        SemanticType::Object => value.as_object().map(|o| TypedValue::Object(o.clone())),
        SemanticType::RowIdentifier => match value {
            Value::String(s) => Some(TypedValue::RowIdentifier(s.clone())),
            Value::Number(n) => Some(TypedValue::RowIdentifier(n.to_string())),
            _ => None,
        },
    }
}

/// Encodes a typed value in the client JSON convention. Total.
pub fn encode_client(value: &TypedValue) -> Value {
    match value {
        TypedValue::Null => Value::Null,
        TypedValue::Text(s) => Value::String(s.clone()),
        TypedValue::Number(s) | TypedValue::Money(s) => decimal_json(s),
        TypedValue::Double(d) => double_json(*d),
        TypedValue::Boolean(b) => Value::Bool(*b),
        TypedValue::FixedTimestamp(dt) => {
            Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        TypedValue::FloatingTimestamp(dt) => {
            Value::String(dt.format(FLOATING_TIMESTAMP_WRITE).to_string())
        }
        TypedValue::Date(d) => Value::String(d.format(DATE_FORMAT).to_string()),
        TypedValue::Time(t) => Value::String(t.format(TIME_WRITE).to_string()),
        TypedValue::Point {
            longitude,
            latitude,
        } => json!({ "type": "Point", "coordinates": [longitude, latitude] }),
        TypedValue::Array(a) => Value::Array(a.clone()),
        TypedValue::Object(o) => Value::Object(o.clone()),
        TypedValue::RowIdentifier(s) => Value::String(s.clone()),
    }
}

/// Encodes a typed value in the backend wire convention. Total.
///
/// The wire convention differs from the client convention by type: fixed
/// timestamps are written at second precision and points as WKT text.
/// Everything else shares the client shape.
pub fn encode_wire(value: &TypedValue) -> Value {
    match value {
        TypedValue::FixedTimestamp(dt) => {
            Value::String(dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        }
        TypedValue::Point {
            longitude,
            latitude,
        } => Value::String(wkt_point(*longitude, *latitude)),
        other => encode_client(other),
    }
}

/// Renders a typed value as flat text for CSV. Total.
///
/// Null renders as the empty string; arrays and objects render as compact
/// JSON; points render as WKT.
pub fn to_text(value: &TypedValue) -> String {
    match value {
        TypedValue::Null => String::new(),
        TypedValue::Text(s) => s.clone(),
        TypedValue::Number(s) | TypedValue::Money(s) => s.clone(),
        TypedValue::Double(d) => match double_json(*d) {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s,
            _ => String::new(),
        },
        TypedValue::Boolean(b) => b.to_string(),
        TypedValue::FixedTimestamp(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        TypedValue::FloatingTimestamp(dt) => dt.format(FLOATING_TIMESTAMP_WRITE).to_string(),
        TypedValue::Date(d) => d.format(DATE_FORMAT).to_string(),
        TypedValue::Time(t) => t.format(TIME_WRITE).to_string(),
        TypedValue::Point {
            longitude,
            latitude,
        } => wkt_point(*longitude, *latitude),
        TypedValue::Array(a) => Value::Array(a.clone()).to_string(),
        TypedValue::Object(o) => Value::Object(o.clone()).to_string(),
        TypedValue::RowIdentifier(s) => s.clone(),
    }
}

/// Extracts decimal text from a JSON number or a string in JSON number
/// syntax. Strings like `"NaN"` or `"1,000"` are rejected here.
fn decimal_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => {
            let trimmed = s.trim();
            serde_json::from_str::<Number>(trimmed)
                .ok()
                .map(|n| n.to_string())
        }
        _ => None,
    }
}

fn decode_double(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match s.trim() {
            "Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            "NaN" => Some(f64::NAN),
            trimmed => serde_json::from_str::<f64>(trimmed).ok(),
        },
        _ => None,
    }
}

fn decode_point(value: &Value) -> Option<TypedValue> {
    let obj = value.as_object()?;
    if obj.get("type")?.as_str()? != "Point" {
        return None;
    }
    let coords = obj.get("coordinates")?.as_array()?;
    if coords.len() != 2 {
        return None;
    }
    Some(TypedValue::Point {
        longitude: coords[0].as_f64()?,
        latitude: coords[1].as_f64()?,
    })
}

/// Re-parses stored decimal text as a JSON number. The text was validated
/// at decode time, so the fallback arm is unreachable in practice.
fn decimal_json(text: &str) -> Value {
    match serde_json::from_str::<Number>(text) {
        Ok(n) => Value::Number(n),
        Err(_) => Value::String(text.to_string()),
    }
}

/// JSON has no non-finite numbers; those encode as literal strings.
fn double_json(d: f64) -> Value {
    if d.is_nan() {
        return Value::String("NaN".to_string());
    }
    if d.is_infinite() {
        return Value::String(if d > 0.0 { "Infinity" } else { "-Infinity" }.to_string());
    }
    match Number::from_f64(d) {
        Some(n) => Value::Number(n),
        None => Value::String(d.to_string()),
    }
}

fn wkt_point(longitude: f64, latitude: f64) -> String {
    format!("POINT ({} {})", longitude, latitude)
}
