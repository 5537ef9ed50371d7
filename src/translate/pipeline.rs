//! Raw JSON values to typed row operations

use std::collections::BTreeMap;

use serde_json::Value;

use super::errors::{TranslateError, TranslateResult};
use crate::codec::{decode_client, TypedValue};
use crate::schema::Schema;

/// Legacy per-row deletion marker.
///
/// An object field `"deleted": true` marks the row as a delete by primary
/// key instead of an upsert. A schema column of the same name shadows the
/// marker.
pub const DELETE_MARKER: &str = "deleted";

/// One typed row operation, consumed exactly once by the script encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOperation {
    /// Insert-or-update keyed by primary key; field name to typed value
    Upsert(BTreeMap<String, TypedValue>),
    /// Delete by primary-key value
    Delete(TypedValue),
}

/// Pull-based translator from raw JSON values to row operations.
///
/// Fail-fast: the first error is yielded once and the iterator fuses, so
/// no raw value past the error is ever consumed.
pub struct RowTranslator<'s, I> {
    schema: &'s Schema,
    datums: I,
    ignore_extra_columns: bool,
    failed: bool,
}

impl<'s, I> RowTranslator<'s, I>
where
    I: Iterator<Item = TranslateResult<Value>>,
{
    /// Creates a translator over a lazy sequence of raw JSON values.
    pub fn new(schema: &'s Schema, datums: I, ignore_extra_columns: bool) -> Self {
        Self {
            schema,
            datums,
            ignore_extra_columns,
            failed: false,
        }
    }

    fn translate_one(&self, raw: Value) -> TranslateResult<RowOperation> {
        match raw {
            Value::Object(fields) => self.translate_object(fields),
            Value::Array(items) => self.translate_array(items),
            other => Err(TranslateError::MalformedRow { value: other }),
        }
    }

    /// A single-element array of a scalar is a delete by primary key.
    fn translate_array(&self, items: Vec<Value>) -> TranslateResult<RowOperation> {
        let scalar = match items.as_slice() {
            [single] if !single.is_object() && !single.is_array() => single,
            _ => {
                return Err(TranslateError::MalformedRow {
                    value: Value::Array(items),
                })
            }
        };
        let pk = self
            .schema
            .primary_key_column()
            .ok_or(TranslateError::NoPrimaryKey)?;
        let key = decode_client(pk.semantic_type, scalar).ok_or_else(|| {
            TranslateError::TypeMismatch {
                field: pk.field_name.clone(),
                expected: pk.semantic_type,
                value: scalar.clone(),
            }
        })?;
        Ok(RowOperation::Delete(key))
    }

    fn translate_object(
        &self,
        fields: serde_json::Map<String, Value>,
    ) -> TranslateResult<RowOperation> {
        let mut decoded = BTreeMap::new();
        let mut legacy_delete = false;

        for (name, raw) in fields {
            if let Some(column) = self.schema.column(&name) {
                let value = decode_client(column.semantic_type, &raw).ok_or_else(|| {
                    TranslateError::TypeMismatch {
                        field: name.clone(),
                        expected: column.semantic_type,
                        value: raw.clone(),
                    }
                })?;
                decoded.insert(name, value);
            } else if name == DELETE_MARKER && raw == Value::Bool(true) {
                // Deferred until the whole object is scanned.
                legacy_delete = true;
            } else if self.ignore_extra_columns {
                continue;
            } else {
                return Err(TranslateError::ColumnNotFound { field: name });
            }
        }

        if legacy_delete {
            let pk = self
                .schema
                .primary_key_column()
                .ok_or(TranslateError::NoPrimaryKey)?;
            // The key must have arrived as one of the decoded fields; the
            // rest of the row is discarded.
            let key = decoded.remove(&pk.field_name).ok_or_else(|| {
                TranslateError::MissingPrimaryKey {
                    field: pk.field_name.clone(),
                }
            })?;
            return Ok(RowOperation::Delete(key));
        }
        Ok(RowOperation::Upsert(decoded))
    }
}

impl<'s, I> Iterator for RowTranslator<'s, I>
where
    I: Iterator<Item = TranslateResult<Value>>,
{
    type Item = TranslateResult<RowOperation>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = match self.datums.next()? {
            Ok(raw) => self.translate_one(raw),
            Err(e) => Err(e),
        };
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnSpec, SemanticType};
    use serde_json::json;

    fn keyed_schema() -> Schema {
        Schema::new(
            vec![
                ColumnSpec::new("c-1", "id", "ID", SemanticType::Number),
                ColumnSpec::new("c-2", "name", "Name", SemanticType::Text),
                ColumnSpec::new("c-3", "score", "Score", SemanticType::Double),
            ],
            "en_US",
        )
        .with_primary_key("id")
    }

    fn translate(
        schema: &Schema,
        raw: Vec<Value>,
        ignore_extra: bool,
    ) -> Vec<TranslateResult<RowOperation>> {
        RowTranslator::new(schema, raw.into_iter().map(Ok), ignore_extra).collect()
    }

    #[test]
    fn test_object_translates_to_upsert() {
        let schema = keyed_schema();
        let out = translate(&schema, vec![json!({"id": 1, "name": "a"})], false);
        assert_eq!(out.len(), 1);
        match out[0].as_ref().unwrap() {
            RowOperation::Upsert(fields) => {
                assert_eq!(fields.get("id"), Some(&TypedValue::Number("1".into())));
                assert_eq!(fields.get("name"), Some(&TypedValue::Text("a".into())));
            }
            other => panic!("expected upsert, got {:?}", other),
        }
    }

    #[test]
    fn test_single_element_array_is_delete() {
        let schema = keyed_schema();
        let out = translate(&schema, vec![json!([42])], false);
        assert_eq!(
            *out[0].as_ref().unwrap(),
            RowOperation::Delete(TypedValue::Number("42".into()))
        );
    }

    #[test]
    fn test_delete_array_requires_primary_key() {
        let schema = Schema::new(
            vec![ColumnSpec::new("c-1", "name", "Name", SemanticType::Text)],
            "en_US",
        );
        let out = translate(&schema, vec![json!(["x"])], false);
        assert!(matches!(out[0], Err(TranslateError::NoPrimaryKey)));
    }

    #[test]
    fn test_legacy_delete_marker_with_key() {
        let schema = keyed_schema();
        let out = translate(
            &schema,
            vec![json!({"id": 7, "name": "gone", "deleted": true})],
            false,
        );
        assert_eq!(
            *out[0].as_ref().unwrap(),
            RowOperation::Delete(TypedValue::Number("7".into()))
        );
    }

    #[test]
    fn test_legacy_delete_marker_without_key_fails() {
        let schema = keyed_schema();
        let out = translate(&schema, vec![json!({"name": "gone", "deleted": true})], false);
        assert!(matches!(
            out[0],
            Err(TranslateError::MissingPrimaryKey { ref field }) if field == "id"
        ));
    }

    #[test]
    fn test_delete_marker_false_is_ordinary_unknown_field() {
        let schema = keyed_schema();
        let strict = translate(&schema, vec![json!({"id": 1, "deleted": false})], false);
        assert!(matches!(
            strict[0],
            Err(TranslateError::ColumnNotFound { ref field }) if field == "deleted"
        ));
        let lax = translate(&schema, vec![json!({"id": 1, "deleted": false})], true);
        assert!(matches!(lax[0], Ok(RowOperation::Upsert(_))));
    }

    #[test]
    fn test_extra_column_policy() {
        let schema = keyed_schema();
        let strict = translate(&schema, vec![json!({"id": 1, "bogus": "x"})], false);
        assert!(matches!(
            strict[0],
            Err(TranslateError::ColumnNotFound { ref field }) if field == "bogus"
        ));

        let lax = translate(&schema, vec![json!({"id": 1, "bogus": "x"})], true);
        match lax[0].as_ref().unwrap() {
            RowOperation::Upsert(fields) => assert!(!fields.contains_key("bogus")),
            other => panic!("expected upsert, got {:?}", other),
        }
    }

    #[test]
    fn test_type_mismatch_carries_context() {
        let schema = keyed_schema();
        let out = translate(&schema, vec![json!({"id": 1, "score": "high"})], false);
        match &out[0] {
            Err(TranslateError::TypeMismatch {
                field,
                expected,
                value,
            }) => {
                assert_eq!(field, "score");
                assert_eq!(*expected, SemanticType::Double);
                assert_eq!(*value, json!("high"));
            }
            other => panic!("expected type mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_shapes_rejected() {
        let schema = keyed_schema();
        for raw in [json!("row"), json!(3), json!([1, 2]), json!([{"id": 1}])] {
            let out = translate(&schema, vec![raw], false);
            assert!(matches!(out[0], Err(TranslateError::MalformedRow { .. })));
        }
    }

    #[test]
    fn test_fail_fast_stops_consuming() {
        let schema = keyed_schema();
        let raw = vec![
            json!({"id": 1}),
            json!("not a row"),
            json!({"id": 2}),
        ];
        let out = translate(&schema, raw, false);
        // One good row, one error, nothing after.
        assert_eq!(out.len(), 2);
        assert!(out[0].is_ok());
        assert!(out[1].is_err());
    }

    #[test]
    fn test_null_field_decodes_to_null_variant() {
        let schema = keyed_schema();
        let out = translate(&schema, vec![json!({"id": 1, "name": null})], false);
        match out[0].as_ref().unwrap() {
            RowOperation::Upsert(fields) => {
                assert_eq!(fields.get("name"), Some(&TypedValue::Null));
            }
            other => panic!("expected upsert, got {:?}", other),
        }
    }
}
