//! The gateway service

use std::cell::Cell;
use std::io::{Read, Write};

use super::context::RequestContext;
use super::errors::{GatewayError, GatewayResult};
use crate::config::{ConfigError, GatewayConfig};
use crate::export::{exporter_for, ExportFormat, RowSource};
use crate::observability::{Event, Logger, Severity};
use crate::schema::{ExportSchema, Schema};
use crate::script::{DatasetCommand, Mutation, ScriptEncoder, ScriptError};
use crate::translate::{DatumReader, RowTranslator, TranslateError};

/// Outcome of a completed upsert request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertSummary {
    /// Row operations written into the script
    pub rows: u64,
}

/// Per-deployment gateway service.
///
/// Owns the configuration; everything per-request lives in the
/// [`RequestContext`] and the streams, so concurrent requests share
/// nothing mutable.
pub struct Gateway {
    config: GatewayConfig,
}

impl Gateway {
    /// Validates the configuration and builds the service.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let max_datum = config.max_datum_bytes.to_string();
        Logger::log(
            Severity::Info,
            Event::ConfigLoaded,
            &[("max_datum_bytes", &max_datum)],
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Write path: translates a JSON array body of row edits into a
    /// mutation script, streaming the script into `out` as rows arrive.
    ///
    /// On error the partial script already written must be discarded by
    /// the caller; nothing more is written after the failure.
    pub fn upsert_script<R: Read, W: Write>(
        &self,
        ctx: &RequestContext,
        schema: &Schema,
        body: R,
        out: W,
    ) -> GatewayResult<UpsertSummary> {
        let request_id = ctx.request_id.to_string();
        Logger::log(
            Severity::Info,
            Event::UpsertStart,
            &[("dataset", &ctx.dataset_id), ("request_id", &request_id)],
        );

        let result = self.run_upsert(ctx, schema, body, out);
        match &result {
            Ok(summary) => {
                let rows = summary.rows.to_string();
                let ms = ctx.elapsed_ms().to_string();
                Logger::log(
                    Severity::Info,
                    Event::UpsertComplete,
                    &[
                        ("dataset", &ctx.dataset_id),
                        ("request_id", &request_id),
                        ("rows", &rows),
                        ("elapsed_ms", &ms),
                    ],
                );
            }
            Err(e) => {
                let error = e.to_string();
                Logger::log(
                    Severity::Error,
                    Event::UpsertFailed,
                    &[
                        ("dataset", &ctx.dataset_id),
                        ("request_id", &request_id),
                        ("error", &error),
                    ],
                );
            }
        }
        result
    }

    fn run_upsert<R: Read, W: Write>(
        &self,
        ctx: &RequestContext,
        schema: &Schema,
        body: R,
        out: W,
    ) -> GatewayResult<UpsertSummary> {
        let datums = DatumReader::new(body, self.config.max_datum_bytes);
        let translator = RowTranslator::new(schema, datums, self.config.ignore_extra_columns);

        let command = DatasetCommand::normal();
        let mut encoder = ScriptEncoder::new(out, &ctx.actor, &command)
            .map_err(|e| self.script_error(ctx, e))?;
        encoder
            .emit(&Mutation::RowOptions(self.config.default_row_options))
            .map_err(|e| self.script_error(ctx, e))?;

        let mut rows = 0u64;
        for operation in translator {
            let operation = operation.map_err(|e| self.translate_error(ctx, e))?;
            encoder
                .emit(&Mutation::Row(operation))
                .map_err(|e| self.script_error(ctx, e))?;
            rows += 1;
        }
        encoder.finish().map_err(|e| self.script_error(ctx, e))?;
        Ok(UpsertSummary { rows })
    }

    /// Write path for column and copy operations with no row data.
    pub fn ddl_script<W: Write>(
        &self,
        ctx: &RequestContext,
        command: &DatasetCommand,
        mutations: &[Mutation],
        out: W,
    ) -> GatewayResult<()> {
        let request_id = ctx.request_id.to_string();
        let result = self.run_ddl(ctx, command, mutations, out);
        match &result {
            Ok(()) => Logger::log(
                Severity::Info,
                Event::DdlComplete,
                &[("dataset", &ctx.dataset_id), ("request_id", &request_id)],
            ),
            Err(e) => {
                let error = e.to_string();
                Logger::log(
                    Severity::Error,
                    Event::DdlFailed,
                    &[
                        ("dataset", &ctx.dataset_id),
                        ("request_id", &request_id),
                        ("error", &error),
                    ],
                );
            }
        }
        result
    }

    fn run_ddl<W: Write>(
        &self,
        ctx: &RequestContext,
        command: &DatasetCommand,
        mutations: &[Mutation],
        out: W,
    ) -> GatewayResult<()> {
        let mut encoder = ScriptEncoder::new(out, &ctx.actor, command)
            .map_err(|e| self.script_error(ctx, e))?;
        for mutation in mutations {
            encoder.emit(mutation).map_err(|e| self.script_error(ctx, e))?;
        }
        encoder.finish().map_err(|e| self.script_error(ctx, e))?;
        Ok(())
    }

    /// Read path: renders backend rows in the negotiated format.
    ///
    /// Returns the number of rows written.
    pub fn export(
        &self,
        ctx: &RequestContext,
        format: ExportFormat,
        schema: &ExportSchema,
        rows: RowSource<'_>,
        out: &mut dyn Write,
    ) -> GatewayResult<u64> {
        let request_id = ctx.request_id.to_string();
        Logger::log(
            Severity::Info,
            Event::ExportStart,
            &[
                ("dataset", &ctx.dataset_id),
                ("format", format.extension()),
                ("request_id", &request_id),
            ],
        );

        let count = Cell::new(0u64);
        let mut counted = rows.inspect(|row| {
            if row.is_ok() {
                count.set(count.get() + 1);
            }
        });

        let result = exporter_for(format).export(schema, &mut counted, out);
        match result {
            Ok(()) => {
                let rows_written = count.get().to_string();
                Logger::log(
                    Severity::Info,
                    Event::ExportComplete,
                    &[
                        ("dataset", &ctx.dataset_id),
                        ("request_id", &request_id),
                        ("rows", &rows_written),
                    ],
                );
                Ok(count.get())
            }
            Err(e) => {
                let error = e.to_string();
                Logger::log(
                    Severity::Error,
                    Event::ExportFailed,
                    &[
                        ("dataset", &ctx.dataset_id),
                        ("request_id", &request_id),
                        ("error", &error),
                    ],
                );
                Err(GatewayError::Export {
                    dataset_id: ctx.dataset_id.clone(),
                    request_id: ctx.request_id,
                    source: e,
                })
            }
        }
    }

    fn translate_error(&self, ctx: &RequestContext, source: TranslateError) -> GatewayError {
        GatewayError::Translate {
            dataset_id: ctx.dataset_id.clone(),
            request_id: ctx.request_id,
            source,
        }
    }

    fn script_error(&self, ctx: &RequestContext, source: ScriptError) -> GatewayError {
        GatewayError::Script {
            dataset_id: ctx.dataset_id.clone(),
            request_id: ctx.request_id,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnSpec, SemanticType};
    use serde_json::{json, Value};

    fn keyed_schema() -> Schema {
        Schema::new(
            vec![
                ColumnSpec::new("c-1", "id", "ID", SemanticType::Number),
                ColumnSpec::new("c-2", "name", "Name", SemanticType::Text),
            ],
            "en_US",
        )
        .with_primary_key("id")
    }

    fn gateway() -> Gateway {
        Gateway::new(GatewayConfig::default()).unwrap()
    }

    #[test]
    fn test_upsert_script_end_to_end() {
        let schema = keyed_schema();
        let ctx = RequestContext::new("robertm", "d-1");
        let body = br#"[{"id": 1, "name": "a"}, [2]]"#;
        let mut out = Vec::new();

        let summary = gateway()
            .upsert_script(&ctx, &schema, &body[..], &mut out)
            .unwrap();
        assert_eq!(summary.rows, 2);

        let script: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(script[0], json!({ "c": "normal", "user": "robertm" }));
        assert_eq!(
            script[1],
            json!({ "c": "row data", "truncate": false, "update": "merge", "fatal_row_errors": true })
        );
        assert_eq!(script[2], json!({ "id": 1, "name": "a" }));
        assert_eq!(script[3], json!([2]));
        assert_eq!(script.len(), 4);
    }

    #[test]
    fn test_upsert_error_carries_identifiers() {
        let schema = keyed_schema();
        let ctx = RequestContext::new("robertm", "d-9");
        let body = br#"[{"id": 1, "bogus": true}]"#;
        let mut out = Vec::new();

        let err = gateway()
            .upsert_script(&ctx, &schema, &body[..], &mut out)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("d-9"));
        assert!(message.contains(&ctx.request_id.to_string()));
        assert!(message.contains("bogus"));
    }

    #[test]
    fn test_ddl_script_round_trip() {
        let ctx = RequestContext::new("robertm", "d-1");
        let mut out = Vec::new();
        gateway()
            .ddl_script(
                &ctx,
                &DatasetCommand::create("en_US"),
                &[
                    Mutation::AddColumn {
                        semantic_type: SemanticType::Text,
                        hint: "name".into(),
                        id: None,
                    },
                    Mutation::SetRowIdColumn { id: "c-1".into() },
                ],
                &mut out,
            )
            .unwrap();

        let script: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(script.len(), 3);
        assert_eq!(script[0]["c"], "create");
        assert_eq!(script[1]["c"], "add column");
        assert_eq!(script[2]["c"], "set row id");
    }
}
