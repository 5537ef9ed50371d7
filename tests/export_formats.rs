//! Export Format Tests
//!
//! The three renderers share a contract but differ deliberately:
//! - Row JSON is sparse (nulls omitted), schema order
//! - CJSON is dense (nulls explicit), field-name order with schema header
//! - CSV quotes every cell, renders nulls as empty cells

use datagate::codec::TypedValue;
use datagate::config::GatewayConfig;
use datagate::export::{
    exporter_for, negotiate, CsvExporter, ExportError, ExportFormat, Exporter,
};
use datagate::gateway::{Gateway, GatewayError, RequestContext};
use datagate::schema::{ColumnSpec, ExportSchema, Schema, SemanticType};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

/// Columns deliberately out of field-name order.
fn export_schema() -> ExportSchema {
    ExportSchema::from_schema(
        &Schema::new(
            vec![
                ColumnSpec::new("c-1", "title", "Title", SemanticType::Text),
                ColumnSpec::new("c-2", "amount", "Amount", SemanticType::Money),
                ColumnSpec::new("c-3", "flag", "Flag?", SemanticType::Boolean),
            ],
            "en_US",
        )
        .with_primary_key("title"),
    )
}

fn rows() -> Vec<Vec<TypedValue>> {
    vec![
        vec![
            TypedValue::Text("one".into()),
            TypedValue::Money("19.99".into()),
            TypedValue::Boolean(true),
        ],
        vec![TypedValue::Text("two".into()), TypedValue::Null, TypedValue::Null],
    ]
}

fn render(format: ExportFormat) -> Vec<u8> {
    let schema = export_schema();
    let mut source = rows().into_iter().map(Ok);
    let mut out = Vec::new();
    exporter_for(format)
        .export(&schema, &mut source, &mut out)
        .unwrap();
    out
}

// =============================================================================
// Row JSON
// =============================================================================

#[test]
fn test_row_json_is_sparse_in_schema_order() {
    let parsed: Value = serde_json::from_slice(&render(ExportFormat::Json)).unwrap();
    assert_eq!(
        parsed,
        json!([
            { "title": "one", "amount": 19.99, "flag": true },
            { "title": "two" },
        ])
    );
}

// =============================================================================
// CJSON
// =============================================================================

#[test]
fn test_cjson_sorts_columns_by_field_name() {
    let parsed: Value = serde_json::from_slice(&render(ExportFormat::CJson)).unwrap();
    let header = &parsed[0];

    let fields: Vec<&str> = header["schema"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["field"].as_str().unwrap())
        .collect();
    // Independent of schema order.
    assert_eq!(fields, vec!["amount", "flag", "title"]);

    let types: Vec<&str> = header["schema"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["money", "boolean", "text"]);

    assert_eq!(header["locale"], "en_US");
    assert_eq!(header["pk"], "title");
}

#[test]
fn test_cjson_rows_are_dense() {
    let parsed: Value = serde_json::from_slice(&render(ExportFormat::CJson)).unwrap();
    assert_eq!(parsed[1], json!([19.99, true, "one"]));
    // Nulls written explicitly, unlike Row JSON.
    assert_eq!(parsed[2], json!([null, null, "two"]));
}

// =============================================================================
// CSV
// =============================================================================

#[test]
fn test_csv_quotes_everything_and_blanks_nulls() {
    let out = String::from_utf8(render(ExportFormat::Csv)).unwrap();
    let lines: Vec<&str> = out.split("\r\n").collect();
    assert_eq!(lines[0], "\"Title\",\"Amount\",\"Flag?\"");
    assert_eq!(lines[1], "\"one\",\"19.99\",\"true\"");
    assert_eq!(lines[2], "\"two\",\"\",\"\"");
}

#[test]
fn test_csv_doubles_embedded_quotes() {
    let schema = ExportSchema::from_schema(&Schema::new(
        vec![ColumnSpec::new("c-1", "q", "Quote", SemanticType::Text)],
        "en_US",
    ));
    let mut source = vec![Ok(vec![TypedValue::Text("a \"b\" c".into())])].into_iter();
    let mut out = Vec::new();
    CsvExporter.export(&schema, &mut source, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("\"a \"\"b\"\" c\""));
}

// =============================================================================
// Negotiation
// =============================================================================

#[test]
fn test_negotiation_selects_each_format() {
    assert_eq!(negotiate("application/json"), Some(ExportFormat::Json));
    assert_eq!(
        negotiate("application/json+x-socrata-cjson"),
        Some(ExportFormat::CJson)
    );
    assert_eq!(negotiate("text/csv"), Some(ExportFormat::Csv));
    assert_eq!(
        negotiate("text/html, application/json;q=0.9, */*;q=0.1"),
        Some(ExportFormat::Json)
    );
    assert_eq!(negotiate("application/xml"), None);
}

// =============================================================================
// Gateway Read Path
// =============================================================================

#[test]
fn test_gateway_export_counts_rows() {
    let gateway = Gateway::new(GatewayConfig::default()).unwrap();
    let ctx = RequestContext::new("robertm", "d-1");
    let schema = export_schema();
    let mut source = rows().into_iter().map(Ok);
    let mut out = Vec::new();

    let written = gateway
        .export(&ctx, ExportFormat::Csv, &schema, &mut source, &mut out)
        .unwrap();
    assert_eq!(written, 2);
}

/// A row-source failure mid-stream aborts the export with identifiers.
#[test]
fn test_gateway_export_propagates_source_errors() {
    let gateway = Gateway::new(GatewayConfig::default()).unwrap();
    let ctx = RequestContext::new("robertm", "d-2");
    let schema = export_schema();
    let mut source = vec![
        Ok(rows().remove(0)),
        Err(ExportError::Source("backend went away".into())),
    ]
    .into_iter();
    let mut out = Vec::new();

    let err = gateway
        .export(&ctx, ExportFormat::Json, &schema, &mut source, &mut out)
        .unwrap_err();
    match err {
        GatewayError::Export {
            dataset_id, source, ..
        } => {
            assert_eq!(dataset_id, "d-2");
            assert!(source.to_string().contains("backend went away"));
        }
        other => panic!("expected export error, got {:?}", other),
    }
}
