//! One prediction run: flow table → join → width fit → classify → append results → totals.

use crate::config::{ExcessColumns, PredictConfig};
use crate::error::{PredictError, Result};
use crate::features::FlowTable;
use crate::model::{round_labels, FlowClassifier};
use crate::reconcile;
use crate::results::{BatchCounts, CumulativeStats, OutputColumns, ResultRow, ResultWriter};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// What a run added and where the totals stand afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub batch: CumulativeStats,
    pub cumulative: CumulativeStats,
    /// Input width of the model, when one was loaded
    pub model_width: Option<usize>,
    pub empty_input: bool,
}

pub struct PredictionPipeline {
    writer: ResultWriter,
    excess: ExcessColumns,
}

impl PredictionPipeline {
    pub fn new(result_dir: impl Into<PathBuf>, config: &PredictConfig) -> Self {
        Self {
            writer: ResultWriter::new(result_dir, OutputColumns::new(config.output_columns.clone())),
            excess: config.reconcile.excess_columns,
        }
    }

    /// Run one batch. `load_model` is called only when at least one flow has both an
    /// identifier and a feature row.
    pub fn run<M, F>(&self, table: FlowTable, load_model: F) -> Result<RunSummary>
    where
        M: FlowClassifier,
        F: FnOnce() -> Result<M>,
    {
        self.writer.ensure_dir()?;

        if table.identifiers.is_empty() {
            info!("no ip traffic to predict");
            return self.record_empty();
        }

        let width = table.width();
        let (identifiers, rows) = reconcile::join(table.identifiers, table.features);
        info!(flows = identifiers.len(), "identifiers joined to features");
        if identifiers.is_empty() {
            info!("no flow has both an identifier and features");
            return self.record_empty();
        }

        let mut model = load_model()?;
        let expected = model.input_width();
        let matrix = reconcile::to_matrix(&rows, width)?;
        let matrix = reconcile::align_width(matrix, expected, self.excess)?;

        let raw = model.predict(&matrix.mapv(|v| v as f32))?;
        if raw.len() != matrix.nrows() {
            return Err(PredictError::OutputShape {
                rows: matrix.nrows(),
                values: raw.len(),
            });
        }
        let labels = round_labels(&raw);

        let results: Vec<ResultRow> = identifiers
            .into_iter()
            .zip(matrix.rows())
            .zip(labels)
            .map(|((identifier, features), label)| ResultRow {
                identifier,
                features: features.to_vec(),
                label,
            })
            .collect();

        let counts = self.writer.write_batch(&results)?;
        let cumulative = self.writer.stats_log().accumulate(counts.into())?;
        info!(
            normal = cumulative.normal,
            attack = cumulative.attack,
            total = cumulative.total,
            "cumulative stats updated"
        );

        Ok(RunSummary {
            batch: counts.into(),
            cumulative,
            model_width: Some(expected),
            empty_input: false,
        })
    }

    /// Zero-flow batch: header-only predictions.csv on first use, totals carried forward.
    fn record_empty(&self) -> Result<RunSummary> {
        self.writer.ensure_predictions_header()?;
        let batch: CumulativeStats = BatchCounts::default().into();
        let cumulative = self.writer.stats_log().accumulate(batch)?;
        Ok(RunSummary {
            batch,
            cumulative,
            model_width: None,
            empty_input: true,
        })
    }
}
