//! On-disk result artifacts under one result directory. Every file is append-only;
//! a header goes in only when the file is created.

mod stats;

pub use stats::{latest_stats, CumulativeStats, StatsLog};

use crate::config::IDENTIFIER_COLUMNS;
use crate::error::Result;
use crate::features::IdentifierRecord;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const PREDICTIONS_FILE: &str = "predictions.csv";
pub const ATTACKS_FILE: &str = "attacks.csv";
pub const NORMALS_FILE: &str = "normals.csv";
pub const STATS_FILE: &str = "stats.csv";

/// Ordered output column names, fixed for the lifetime of a writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumns(Vec<String>);

impl OutputColumns {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    /// First `n` names, or `None` when there are fewer than `n` configured.
    pub fn header_for(&self, n: usize) -> Option<&[String]> {
        self.0.get(..n)
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

/// One classified flow: identifier, width-fitted features at input precision, label last.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub identifier: IdentifierRecord,
    pub features: Vec<f64>,
    pub label: u8,
}

impl ResultRow {
    pub fn is_attack(&self) -> bool {
        self.label > 0
    }

    pub fn column_count(&self) -> usize {
        IDENTIFIER_COLUMNS.len() + self.features.len() + 1
    }

    fn to_record(&self) -> Vec<String> {
        let mut record = Vec::with_capacity(self.column_count());
        record.push(self.identifier.key.session_id.to_string());
        record.push(self.identifier.key.direction.to_string());
        record.push(self.identifier.ip.to_string());
        record.extend(self.features.iter().map(|v| v.to_string()));
        record.push(self.label.to_string());
        record
    }
}

/// Per-batch partition of the written rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchCounts {
    pub normal: u64,
    pub attack: u64,
    pub total: u64,
}

impl From<BatchCounts> for CumulativeStats {
    fn from(c: BatchCounts) -> Self {
        CumulativeStats::new(c.normal, c.attack, c.total)
    }
}

pub struct ResultWriter {
    dir: PathBuf,
    columns: OutputColumns,
}

impl ResultWriter {
    pub fn new(dir: impl Into<PathBuf>, columns: OutputColumns) -> Self {
        Self {
            dir: dir.into(),
            columns,
        }
    }

    /// Create the result directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    pub fn stats_log(&self) -> StatsLog {
        StatsLog::new(self.dir.join(STATS_FILE))
    }

    /// Append all rows to predictions.csv and the attack/normal subsets to their files.
    /// A subset file is left untouched when this batch has no rows for it.
    pub fn write_batch(&self, rows: &[ResultRow]) -> Result<BatchCounts> {
        let header = rows
            .first()
            .and_then(|r| self.columns.header_for(r.column_count()));
        if header.is_none() && !rows.is_empty() {
            debug!(
                columns = rows[0].column_count(),
                configured = self.columns.len(),
                "more columns than configured names; writing without header"
            );
        }

        let (attacks, normals): (Vec<&ResultRow>, Vec<&ResultRow>) = rows.iter().partition(|r| r.is_attack());

        append_rows(&self.dir.join(PREDICTIONS_FILE), header, rows.iter())?;
        if !attacks.is_empty() {
            append_rows(&self.dir.join(ATTACKS_FILE), header, attacks.iter().copied())?;
        }
        if !normals.is_empty() {
            append_rows(&self.dir.join(NORMALS_FILE), header, normals.iter().copied())?;
        }

        let counts = BatchCounts {
            normal: normals.len() as u64,
            attack: attacks.len() as u64,
            total: rows.len() as u64,
        };
        info!(total = counts.total, attacks = counts.attack, normals = counts.normal, "results written");
        Ok(counts)
    }

    /// Create predictions.csv with the identifier header when it does not exist yet.
    /// An existing file is left as is.
    pub fn ensure_predictions_header(&self) -> Result<()> {
        let fallback: Vec<String> = IDENTIFIER_COLUMNS.iter().map(|c| c.to_string()).collect();
        let header = self.columns.header_for(IDENTIFIER_COLUMNS.len()).unwrap_or(fallback.as_slice());
        append_rows(&self.dir.join(PREDICTIONS_FILE), Some(header), std::iter::empty())
    }
}

fn append_rows<'a>(
    path: &Path,
    header: Option<&[String]>,
    rows: impl Iterator<Item = &'a ResultRow>,
) -> Result<()> {
    let created = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut wtr = WriterBuilder::new().has_headers(false).flexible(true).from_writer(file);
    if created {
        if let Some(names) = header {
            wtr.write_record(names)?;
        }
    }
    for row in rows {
        wtr.write_record(row.to_record())?;
    }
    wtr.flush()?;
    Ok(())
}
