//! Gateway configuration
//!
//! Limits and policy knobs supplied by the deployment, deserialized from
//! the service's configuration file by the host process.

use serde::Deserialize;
use thiserror::Error;

use crate::script::RowOptions;

/// Default per-datum size cap: 10 MiB.
pub const DEFAULT_MAX_DATUM_BYTES: usize = 10 * 1024 * 1024;

/// Configuration error
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("max_datum_bytes must be positive")]
    ZeroDatumLimit,
}

/// Gateway limits and policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Maximum serialized size of one raw row value
    pub max_datum_bytes: usize,
    /// Whether upsert fields absent from the schema are dropped silently
    /// instead of failing the request
    pub ignore_extra_columns: bool,
    /// Row-option state established at the start of every upsert script
    pub default_row_options: RowOptions,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_datum_bytes: DEFAULT_MAX_DATUM_BYTES,
            ignore_extra_columns: false,
            default_row_options: RowOptions::default(),
        }
    }
}

impl GatewayConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_datum_bytes == 0 {
            return Err(ConfigError::ZeroDatumLimit);
        }
        Ok(())
    }
}
