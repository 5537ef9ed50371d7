//! Streaming export renderers
//!
//! Three renderers over a common contract: schema plus a lazy sequence of
//! typed row value arrays in, bytes out. None of them materializes more
//! than one row's encoded form at a time, so arbitrarily large result sets
//! render under a bounded memory budget.

mod cjson;
mod csv;
mod errors;
mod format;
mod json;

use std::io::Write;

pub use cjson::CJsonExporter;
pub use csv::CsvExporter;
pub use errors::{ExportError, ExportResult};
pub use format::{negotiate, ExportFormat};
pub use json::RowJsonExporter;

use crate::codec::TypedValue;
use crate::schema::ExportSchema;

/// A lazy source of rows, each an array of typed values in schema order.
pub type RowSource<'a> = &'a mut dyn Iterator<Item = ExportResult<Vec<TypedValue>>>;

/// Common contract for the three renderers.
pub trait Exporter {
    /// Streams `rows` under `schema` into `out`.
    fn export(
        &self,
        schema: &ExportSchema,
        rows: RowSource<'_>,
        out: &mut dyn Write,
    ) -> ExportResult<()>;
}

/// Returns the renderer for a negotiated format.
pub fn exporter_for(format: ExportFormat) -> &'static dyn Exporter {
    match format {
        ExportFormat::Json => &RowJsonExporter,
        ExportFormat::CJson => &CJsonExporter,
        ExportFormat::Csv => &CsvExporter,
    }
}

/// Checks one row's arity against the schema before rendering it.
fn check_arity(schema: &ExportSchema, row: &[TypedValue]) -> ExportResult<()> {
    if row.len() != schema.columns.len() {
        return Err(ExportError::ColumnCountMismatch {
            expected: schema.columns.len(),
            actual: row.len(),
        });
    }
    Ok(())
}
