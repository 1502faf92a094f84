//! traffic-predict — attack/normal labelling of extracted network flow features.
//!
//! Modular structure:
//! - [`features`] — Flow table loading (identifiers, feature rows, IP filter)
//! - [`reconcile`] — Identifier/feature join and model width fitting
//! - [`model`] — Classifier capability and ONNX implementation
//! - [`results`] — Append-only result files and cumulative stats
//! - [`pipeline`] — One prediction run end to end
//! - [`logging`] — Structured logging

pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod reconcile;
pub mod results;

pub use config::PredictConfig;
pub use error::{PredictError, Result};
pub use features::{CsvFeatureLoader, FeatureSource, FlowTable, IpFilter};
pub use model::{FlowClassifier, OnnxClassifier};
pub use pipeline::{PredictionPipeline, RunSummary};
pub use results::{CumulativeStats, ResultWriter};
