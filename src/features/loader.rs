//! Reads an extracted-features CSV: key columns, `ip`, then numeric features.

use super::{FeatureRow, FeatureSource, FlowKey, FlowTable, IdentifierRecord, IpFilter};
use crate::config::IDENTIFIER_COLUMNS;
use crate::error::{PredictError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub struct CsvFeatureLoader {
    path: PathBuf,
}

struct KeyColumns {
    session_id: usize,
    direction: usize,
    ip: usize,
}

impl CsvFeatureLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn locate(&self, headers: &StringRecord) -> Result<KeyColumns> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| PredictError::MissingColumn {
                    path: self.path.clone(),
                    column,
                })
        };
        let [session_id, direction, ip] = IDENTIFIER_COLUMNS;
        Ok(KeyColumns {
            session_id: find(session_id)?,
            direction: find(direction)?,
            ip: find(ip)?,
        })
    }
}

fn parse_key(record: &StringRecord, cols: &KeyColumns) -> Option<FlowKey> {
    let session_id = record.get(cols.session_id)?.trim().parse::<u64>().ok()?;
    let direction = record.get(cols.direction)?.trim().parse::<u8>().ok()?;
    Some(FlowKey::new(session_id, direction))
}

fn parse_features(record: &StringRecord, feature_idx: &[usize]) -> Option<Vec<f64>> {
    feature_idx
        .iter()
        .map(|&i| {
            let cell = record.get(i).unwrap_or("").trim();
            if cell.is_empty() {
                Some(0.0)
            } else {
                cell.parse::<f64>().ok()
            }
        })
        .collect()
}

impl FeatureSource for CsvFeatureLoader {
    fn load(&self, filter: Option<&IpFilter>) -> Result<FlowTable> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .flexible(true)
            .from_path(&self.path)?;
        let headers = rdr.headers()?.clone();
        let cols = self.locate(&headers)?;

        let feature_idx: Vec<usize> = (0..headers.len())
            .filter(|&i| i != cols.session_id && i != cols.direction && i != cols.ip)
            .collect();
        let feature_columns = feature_idx
            .iter()
            .map(|&i| headers[i].trim().to_string())
            .collect();

        let mut table = FlowTable {
            feature_columns,
            ..FlowTable::default()
        };
        let mut filtered_out = 0usize;

        for (line, record) in rdr.records().enumerate() {
            let record = record?;
            let Some(key) = parse_key(&record, &cols) else {
                warn!(line = line + 2, "skipping row with invalid flow key");
                continue;
            };

            let ip = record
                .get(cols.ip)
                .and_then(|cell| cell.trim().parse::<IpAddr>().ok());
            match ip {
                Some(ip) if filter.map_or(true, |f| f.allows(&ip)) => {
                    table.identifiers.push(IdentifierRecord { key, ip });
                }
                Some(_) => filtered_out += 1,
                None => debug!(session_id = key.session_id, "row has no ip"),
            }

            match parse_features(&record, &feature_idx) {
                Some(values) => table.features.push(FeatureRow { key, values }),
                None => warn!(line = line + 2, session_id = key.session_id, "skipping non-numeric feature row"),
            }
        }

        info!(
            path = %self.path.display(),
            identifiers = table.identifiers.len(),
            feature_rows = table.features.len(),
            width = table.width(),
            filtered_out,
            "flow table loaded"
        );
        Ok(table)
    }
}
