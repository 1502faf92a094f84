//! Crate error type. Everything here is fatal to a run; recoverable conditions
//! (bad filter JSON, width mismatch under truncate, corrupt stats) are logged instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{path}: missing required column `{column}`")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("invalid ip filter: {0}")]
    Filter(#[from] serde_json::Error),

    #[error("model error: {0}")]
    Model(#[from] ort::Error),

    #[error("model shape error: {0}")]
    ModelShape(String),

    #[error("feature width mismatch: model expects {expected}, got {got}")]
    WidthMismatch { expected: usize, got: usize },

    #[error("model returned {values} values for {rows} rows")]
    OutputShape { rows: usize, values: usize },
}

pub type Result<T> = std::result::Result<T, PredictError>;
