//! Run configuration. Output column names are carried here and handed to the
//! result writer, never looked up globally.

use crate::error::{PredictError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identifier columns, in output order.
pub const IDENTIFIER_COLUMNS: [&str; 3] = ["ip.session_id", "meta.direction", "ip"];

/// Default output header: identifiers, the MMT anomaly-detection features, label.
pub const DEFAULT_OUTPUT_COLUMNS: &[&str] = &[
    "ip.session_id",
    "meta.direction",
    "ip",
    "ip.pkts_per_flow",
    "duration",
    "ip.header_len",
    "ip.payload_len",
    "ip.avg_bytes_tot_len",
    "time_between_pkts_sum",
    "time_between_pkts_avg",
    "time_between_pkts_max",
    "time_between_pkts_min",
    "time_between_pkts_std",
    "tcp_pkts_per_flow",
    "pkts_rate",
    "tcp_bytes_per_flow",
    "byte_rate",
    "tcp.tcp_session_payload_up_len",
    "tcp.tcp_session_payload_down_len",
    "tcp.fin",
    "tcp.syn",
    "tcp.rst",
    "tcp.psh",
    "tcp.ack",
    "tcp.urg",
    "sport_g",
    "sport_le",
    "dport_g",
    "dport_le",
    "mean_tcp_pkts",
    "std_tcp_pkts",
    "min_tcp_pkts",
    "max_tcp_pkts",
    "entropy_tcp_pkts",
    "mean_tcp_len",
    "std_tcp_len",
    "min_tcp_len",
    "max_tcp_len",
    "entropy_tcp_len",
    "ssl.tls_version",
    "malware",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    /// Ordered output column names (identifiers, features, label)
    pub output_columns: Vec<String>,
    /// Width reconciliation policy
    pub reconcile: ReconcileConfig,
    /// Model loading
    pub model: ModelConfig,
    /// Logging
    pub log: LogConfig,
}

/// What to do when the flow table has more feature columns than the model takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcessColumns {
    /// Keep the leading columns, drop the trailing ones
    #[default]
    Truncate,
    /// Abort the run
    FailFast,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub excess_columns: ExcessColumns,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Input width to assume when the model declares a dynamic feature dimension
    pub input_width: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            output_columns: DEFAULT_OUTPUT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            reconcile: ReconcileConfig::default(),
            model: ModelConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl PredictConfig {
    /// Load from JSON file if present; a missing file yields the default.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str::<PredictConfig>(&data).map_err(|e| PredictError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
