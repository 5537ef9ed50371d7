//! Columnar JSON ("CJSON") export

use std::io::Write;

use serde_json::{json, Map, Value};

use super::errors::ExportResult;
use super::{check_arity, Exporter, RowSource};
use crate::codec::encode_client;
use crate::schema::ExportSchema;

/// Renders a schema header followed by dense per-row value arrays.
///
/// The header's column list is sorted by field name, not schema order, and
/// every row array follows that same sorted order. Decoupling wire column
/// order from schema definition order keeps the stream stable across
/// column reorderings. Nulls are written explicitly (dense encoding).
pub struct CJsonExporter;

impl CJsonExporter {
    /// Column indices in field-name order.
    fn sorted_indices(schema: &ExportSchema) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..schema.columns.len()).collect();
        indices.sort_by(|&a, &b| {
            schema.columns[a]
                .field_name
                .cmp(&schema.columns[b].field_name)
        });
        indices
    }

    fn header(schema: &ExportSchema, sorted: &[usize]) -> Value {
        let columns: Vec<Value> = sorted
            .iter()
            .map(|&i| {
                let column = &schema.columns[i];
                json!({
                    "field": column.field_name,
                    "type": column.semantic_type.name(),
                })
            })
            .collect();

        let mut header = Map::new();
        header.insert("locale".into(), json!(schema.locale));
        if let Some(pk) = &schema.primary_key {
            header.insert("pk".into(), json!(pk));
        }
        if let Some(count) = schema.row_count {
            header.insert("row_count".into(), json!(count));
        }
        if let Some(count) = schema.approximate_row_count {
            header.insert("approximate_row_count".into(), json!(count));
        }
        if let Some(version) = schema.data_version {
            header.insert("data_version".into(), json!(version));
        }
        if let Some(at) = &schema.last_modified {
            header.insert("last_modified".into(), json!(at.to_rfc3339()));
        }
        header.insert("schema".into(), Value::Array(columns));
        Value::Object(header)
    }
}

impl Exporter for CJsonExporter {
    fn export(
        &self,
        schema: &ExportSchema,
        rows: RowSource<'_>,
        out: &mut dyn Write,
    ) -> ExportResult<()> {
        let sorted = Self::sorted_indices(schema);
        out.write_all(b"[")?;
        serde_json::to_writer(&mut *out, &Self::header(schema, &sorted))?;
        for row in rows {
            let row = row?;
            check_arity(schema, &row)?;
            let values: Vec<Value> = sorted.iter().map(|&i| encode_client(&row[i])).collect();
            out.write_all(b",\n")?;
            serde_json::to_writer(&mut *out, &Value::Array(values))?;
        }
        out.write_all(b"\n]\n")?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::TypedValue;
    use crate::schema::{ColumnSpec, Schema, SemanticType};

    fn schema() -> ExportSchema {
        // Deliberately not in field-name order.
        ExportSchema::from_schema(
            &Schema::new(
                vec![
                    ColumnSpec::new("c-1", "zebra", "Zebra", SemanticType::Text),
                    ColumnSpec::new("c-2", "apple", "Apple", SemanticType::Number),
                    ColumnSpec::new("c-3", "mango", "Mango", SemanticType::Boolean),
                ],
                "en_US",
            )
            .with_primary_key("apple"),
        )
    }

    #[test]
    fn test_header_columns_sorted_by_field_name() {
        let schema = schema();
        let mut rows = Vec::new().into_iter();
        let mut out = Vec::new();
        CJsonExporter.export(&schema, &mut rows, &mut out).unwrap();

        let parsed: Value = serde_json::from_slice(&out).unwrap();
        let header = &parsed[0];
        let fields: Vec<&str> = header["schema"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["apple", "mango", "zebra"]);
        assert_eq!(header["locale"], "en_US");
        assert_eq!(header["pk"], "apple");
    }

    #[test]
    fn test_rows_follow_sorted_order_with_explicit_nulls() {
        let schema = schema();
        let mut rows = vec![Ok(vec![
            TypedValue::Text("stripes".into()),
            TypedValue::Number("3".into()),
            TypedValue::Null,
        ])]
        .into_iter();
        let mut out = Vec::new();
        CJsonExporter.export(&schema, &mut rows, &mut out).unwrap();

        let parsed: Value = serde_json::from_slice(&out).unwrap();
        // apple, mango, zebra.
        assert_eq!(parsed[1], serde_json::json!([3, null, "stripes"]));
    }

    #[test]
    fn test_metadata_appears_when_present() {
        let schema = schema().with_row_count(12).with_data_version(4);
        let mut rows = Vec::new().into_iter();
        let mut out = Vec::new();
        CJsonExporter.export(&schema, &mut rows, &mut out).unwrap();

        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["row_count"], 12);
        assert_eq!(parsed[0]["data_version"], 4);
        assert!(parsed[0].get("approximate_row_count").is_none());
    }
}
