//! Error types for scenario generation.

use thiserror::Error;

/// Errors produced while sampling, building or writing a scenario.
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("raster error: {0}")]
    Raster(#[from] firegrid_core::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ignition cell {key} is not among the sampled cells")]
    IgnitionCellNotFound { key: String },

    #[error("invalid cell key {0:?}: expected X_Y with integer coordinates")]
    InvalidCellKey(String),
}

/// Result alias for scenario operations.
pub type Result<T> = std::result::Result<T, ScenarioError>;
