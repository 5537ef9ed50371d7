//! Row-oriented JSON export

use std::io::Write;

use serde_json::{Map, Value};

use super::errors::ExportResult;
use super::{check_arity, Exporter, RowSource};
use crate::codec::encode_client;
use crate::schema::ExportSchema;

/// Renders each row as an object keyed by field name in schema order.
///
/// Sparse encoding: null values are omitted from the object entirely.
pub struct RowJsonExporter;

impl Exporter for RowJsonExporter {
    fn export(
        &self,
        schema: &ExportSchema,
        rows: RowSource<'_>,
        out: &mut dyn Write,
    ) -> ExportResult<()> {
        out.write_all(b"[")?;
        let mut first = true;
        for row in rows {
            let row = row?;
            check_arity(schema, &row)?;
            let mut object = Map::new();
            for (column, value) in schema.columns.iter().zip(&row) {
                if value.is_null() {
                    continue;
                }
                object.insert(column.field_name.clone(), encode_client(value));
            }
            if !first {
                out.write_all(b",")?;
            }
            first = false;
            out.write_all(b"\n")?;
            serde_json::to_writer(&mut *out, &Value::Object(object))?;
        }
        out.write_all(b"\n]\n")?;
        out.flush()?;
        Ok(())
    }
}
