//! Observable gateway events
//!
//! Events are explicit and typed; free-form event names do not survive
//! grepping across deployments.

/// Observable events in the gateway core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration accepted at startup
    ConfigLoaded,

    // Write path
    /// Row translation and script encoding started
    UpsertStart,
    /// Mutation script fully written
    UpsertComplete,
    /// Translation or encoding failed; the script was abandoned
    UpsertFailed,
    /// DDL-only script fully written
    DdlComplete,
    /// DDL-only script failed
    DdlFailed,

    // Read path
    /// Export started
    ExportStart,
    /// Export stream fully written
    ExportComplete,
    /// Export failed mid-stream
    ExportFailed,
}

impl Event {
    /// Returns the stable event name used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "config_loaded",
            Event::UpsertStart => "upsert_start",
            Event::UpsertComplete => "upsert_complete",
            Event::UpsertFailed => "upsert_failed",
            Event::DdlComplete => "ddl_complete",
            Event::DdlFailed => "ddl_failed",
            Event::ExportStart => "export_start",
            Event::ExportComplete => "export_complete",
            Event::ExportFailed => "export_failed",
        }
    }
}
