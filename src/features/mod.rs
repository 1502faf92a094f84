//! Flow tables produced by the feature extractor: per-flow identifiers and numeric features.

mod filter;
mod loader;

pub use filter::IpFilter;
pub use loader::CsvFeatureLoader;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Join key between identifiers and features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowKey {
    pub session_id: u64,
    pub direction: u8,
}

impl FlowKey {
    pub fn new(session_id: u64, direction: u8) -> Self {
        Self {
            session_id,
            direction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierRecord {
    pub key: FlowKey,
    pub ip: IpAddr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub key: FlowKey,
    pub values: Vec<f64>,
}

/// Everything one invocation knows about its flows, before reconciliation.
#[derive(Debug, Clone, Default)]
pub struct FlowTable {
    pub identifiers: Vec<IdentifierRecord>,
    /// Names of the feature columns, key columns excluded
    pub feature_columns: Vec<String>,
    pub features: Vec<FeatureRow>,
}

impl FlowTable {
    /// Feature count per row
    pub fn width(&self) -> usize {
        self.feature_columns.len()
    }
}

/// Anything that can hand the pipeline a flow table.
pub trait FeatureSource {
    fn load(&self, filter: Option<&IpFilter>) -> Result<FlowTable>;
}
