//! Gateway error union
//!
//! Pass-through errors from the pipeline stages, stamped with the dataset
//! and request identifiers known at this seam so a response and a log line
//! can be correlated.

use thiserror::Error;
use uuid::Uuid;

use crate::config::ConfigError;
use crate::export::ExportError;
use crate::script::ScriptError;
use crate::translate::TranslateError;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors surfaced by the gateway orchestration.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Invalid configuration at construction
    #[error("invalid gateway configuration: {0}")]
    Config(#[from] ConfigError),

    /// Row translation failed
    #[error("row translation failed for dataset {dataset_id} (request {request_id}): {source}")]
    Translate {
        dataset_id: String,
        request_id: Uuid,
        #[source]
        source: TranslateError,
    },

    /// Mutation script encoding failed
    #[error("script encoding failed for dataset {dataset_id} (request {request_id}): {source}")]
    Script {
        dataset_id: String,
        request_id: Uuid,
        #[source]
        source: ScriptError,
    },

    /// Export rendering failed
    #[error("export failed for dataset {dataset_id} (request {request_id}): {source}")]
    Export {
        dataset_id: String,
        request_id: Uuid,
        #[source]
        source: ExportError,
    },
}
