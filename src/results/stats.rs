//! stats.csv: headerless `normal,attack,total` rows, one per run, each holding the
//! running totals for the result directory. Only the last row is ever read back.

use crate::error::Result;
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativeStats {
    pub normal: u64,
    pub attack: u64,
    pub total: u64,
}

impl CumulativeStats {
    pub fn new(normal: u64, attack: u64, total: u64) -> Self {
        Self {
            normal,
            attack,
            total,
        }
    }

    pub fn add(self, other: CumulativeStats) -> Self {
        Self {
            normal: self.normal + other.normal,
            attack: self.attack + other.attack,
            total: self.total + other.total,
        }
    }
}

pub struct StatsLog {
    path: PathBuf,
}

impl StatsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last recorded totals. A missing or empty file counts as zero; so does an unreadable
    /// one, with a warning.
    pub fn read_last(&self) -> CumulativeStats {
        if !self.path.exists() {
            return CumulativeStats::default();
        }
        match self.try_read_last() {
            Ok(last) => last.unwrap_or_default(),
            Err(error) => {
                warn!(path = %self.path.display(), %error, "could not read existing stats; starting from zero");
                CumulativeStats::default()
            }
        }
    }

    fn try_read_last(&self) -> Result<Option<CumulativeStats>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;
        let mut last = None;
        for record in rdr.deserialize::<CumulativeStats>() {
            last = Some(record?);
        }
        Ok(last)
    }

    /// Append one totals row.
    pub fn append(&self, stats: CumulativeStats) -> Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
        wtr.serialize(stats)?;
        wtr.flush()?;
        Ok(())
    }

    /// Add a batch on top of the last recorded totals and append the result.
    pub fn accumulate(&self, batch: CumulativeStats) -> Result<CumulativeStats> {
        let cumulative = self.read_last().add(batch);
        self.append(cumulative)?;
        Ok(cumulative)
    }
}

/// Current totals for a result directory, if it has any.
pub fn latest_stats(result_dir: &Path) -> Option<CumulativeStats> {
    let log = StatsLog::new(result_dir.join(super::STATS_FILE));
    log.path().exists().then(|| log.read_last())
}
