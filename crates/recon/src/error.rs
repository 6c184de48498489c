use thiserror::Error;

use crate::model::Side;

/// Whole-input failures. Per-row anomalies never surface here; they are
/// absorbed by coercion or routed to the orphan set.
#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (empty column name, bad multiplier, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// Missing required column in an input table.
    #[error("{side} data: missing column '{column}'")]
    MissingColumn { side: Side, column: String },
}
