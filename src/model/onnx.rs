//! ONNX Runtime classifier. Input: [rows, width] f32, output: one score per row.

use super::{row_scores, FlowClassifier};
use crate::error::{PredictError, Result};
use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use tracing::info;

pub struct OnnxClassifier {
    session: Session,
    input_name: String,
    output_name: String,
    input_width: usize,
}

impl OnnxClassifier {
    /// Load model from path. `width_override` is used when the model leaves its feature
    /// dimension dynamic.
    pub fn load(path: &Path, width_override: Option<usize>) -> Result<Self> {
        let session = Session::builder()?.commit_from_file(path)?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| PredictError::ModelShape("model has no inputs".to_string()))?;
        let declared = input
            .input_type
            .tensor_shape()
            .and_then(|shape| shape.get(1).copied())
            .filter(|&dim| dim > 0)
            .map(|dim| dim as usize);
        let input_width = width_override.or(declared).ok_or_else(|| {
            PredictError::ModelShape(format!("input `{}` has no fixed feature dimension", input.name))
        })?;
        let input_name = input.name.clone();

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| PredictError::ModelShape("model has no outputs".to_string()))?;

        info!(path = %path.display(), input = %input_name, input_width, "model loaded");
        Ok(Self {
            session,
            input_name,
            output_name,
            input_width,
        })
    }
}

impl FlowClassifier for OnnxClassifier {
    fn input_width(&self) -> usize {
        self.input_width
    }

    fn predict(&mut self, features: &Array2<f32>) -> Result<Vec<f32>> {
        let rows = features.nrows();
        let input = Tensor::from_array(features.to_owned())?;
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input])?;
        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| PredictError::ModelShape(format!("missing output `{}`", self.output_name)))?;
        let (_, data) = output.try_extract_tensor::<f32>()?;
        row_scores(rows, data)
    }
}
