//! Binary flow classifier: a capability with a fixed input width and a batch predict.

mod onnx;

pub use onnx::OnnxClassifier;

use crate::error::{PredictError, Result};
use ndarray::Array2;

pub trait FlowClassifier {
    /// Number of features per row the model takes
    fn input_width(&self) -> usize;

    /// Raw score per row, in row order
    fn predict(&mut self, features: &Array2<f32>) -> Result<Vec<f32>>;
}

/// Round raw scores to 0/1 labels. Ties go to even, so 0.5 is normal and 1.5 attack.
pub fn round_labels(raw: &[f32]) -> Vec<u8> {
    raw.iter()
        .map(|&score| if score.round_ties_even() >= 1.0 { 1 } else { 0 })
        .collect()
}

/// Flattened model output to one score per row. Accepts `[rows]` or `[rows, k]`;
/// the first value of each row is the score.
pub fn row_scores(rows: usize, data: &[f32]) -> Result<Vec<f32>> {
    if rows == 0 || data.len() % rows != 0 {
        return Err(PredictError::OutputShape {
            rows,
            values: data.len(),
        });
    }
    let stride = data.len() / rows;
    Ok(data.iter().step_by(stride).copied().collect())
}
