//! CSV export

use std::io::Write;

use super::errors::ExportResult;
use super::{check_arity, Exporter, RowSource};
use crate::codec::to_text;
use crate::schema::ExportSchema;

/// Renders a human-name header row followed by flat-text value rows.
///
/// Every cell is double-quoted unconditionally, with embedded quotes
/// doubled per RFC 4180; null values render as empty quoted cells. Lines
/// end with CRLF.
pub struct CsvExporter;

fn write_record<'a>(
    out: &mut dyn Write,
    cells: impl Iterator<Item = &'a str>,
) -> ExportResult<()> {
    for (i, cell) in cells.enumerate() {
        if i > 0 {
            out.write_all(b",")?;
        }
        out.write_all(b"\"")?;
        out.write_all(cell.replace('"', "\"\"").as_bytes())?;
        out.write_all(b"\"")?;
    }
    out.write_all(b"\r\n")?;
    Ok(())
}

impl Exporter for CsvExporter {
    fn export(
        &self,
        schema: &ExportSchema,
        rows: RowSource<'_>,
        out: &mut dyn Write,
    ) -> ExportResult<()> {
        write_record(out, schema.columns.iter().map(|c| c.human_name.as_str()))?;
        for row in rows {
            let row = row?;
            check_arity(schema, &row)?;
            let cells: Vec<String> = row.iter().map(to_text).collect();
            write_record(out, cells.iter().map(|c| c.as_str()))?;
        }
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
        ExportSchema::from_schema(&Schema::new(
            vec![
                ColumnSpec::new("c-1", "name", "Full Name", SemanticType::Text),
                ColumnSpec::new("c-2", "note", "Note", SemanticType::Text),
            ],
            "en_US",
        ))
    }

    fn render(rows: Vec<Vec<TypedValue>>) -> String {
        let schema = schema();
        let mut source = rows.into_iter().map(Ok);
        let mut out = Vec::new();
        CsvExporter.export(&schema, &mut source, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_header_uses_human_names() {
        let out = render(vec![]);
        assert_eq!(out, "\"Full Name\",\"Note\"\r\n");
    }

    #[test]
    fn test_null_renders_as_empty_quoted_cell() {
        let out = render(vec![vec![TypedValue::Text("a".into()), TypedValue::Null]]);
        assert!(out.ends_with("\"a\",\"\"\r\n"));
    }

    #[test]
    fn test_embedded_quotes_doubled() {
        let out = render(vec![vec![
            TypedValue::Text("say \"hi\"".into()),
            TypedValue::Null,
        ]]);
        assert!(out.contains("\"say \"\"hi\"\"\""));
    }

    #[test]
    fn test_every_cell_quoted() {
        let out = render(vec![vec![
            TypedValue::Text("plain".into()),
            TypedValue::Text("also plain".into()),
        ]]);
        assert!(out.ends_with("\"plain\",\"also plain\"\r\n"));
    }
}
