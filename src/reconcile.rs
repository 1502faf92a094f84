//! Joins identifiers to feature rows and fits the feature matrix to the model input width.

use crate::config::ExcessColumns;
use crate::error::{PredictError, Result};
use crate::features::{FeatureRow, IdentifierRecord};
use ndarray::{s, Array2};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Inner join on flow key. Identifier order is kept; a key is matched at most once,
/// so flows missing on either side (and repeated keys) are dropped.
pub fn join(
    identifiers: Vec<IdentifierRecord>,
    features: Vec<FeatureRow>,
) -> (Vec<IdentifierRecord>, Vec<Vec<f64>>) {
    let mut by_key: HashMap<_, Vec<f64>> = HashMap::with_capacity(features.len());
    for row in features {
        by_key.entry(row.key).or_insert(row.values);
    }

    let mut kept = Vec::with_capacity(identifiers.len().min(by_key.len()));
    let mut rows = Vec::with_capacity(kept.capacity());
    for id in identifiers {
        match by_key.remove(&id.key) {
            Some(values) => {
                kept.push(id);
                rows.push(values);
            }
            None => debug!(session_id = id.key.session_id, direction = id.key.direction, "no feature row for flow"),
        }
    }
    (kept, rows)
}

/// Stack equal-width rows into a matrix. Values keep input precision; narrowing to
/// the model's f32 happens at the predict call.
pub fn to_matrix(rows: &[Vec<f64>], width: usize) -> Result<Array2<f64>> {
    let mut flat = Vec::with_capacity(rows.len() * width);
    for row in rows {
        if row.len() != width {
            return Err(PredictError::WidthMismatch {
                expected: width,
                got: row.len(),
            });
        }
        flat.extend_from_slice(row);
    }
    Array2::from_shape_vec((rows.len(), width), flat).map_err(|e| PredictError::ModelShape(e.to_string()))
}

/// Truncate trailing columns or zero-pad on the right until the matrix is `expected` wide.
pub fn align_width(features: Array2<f64>, expected: usize, excess: ExcessColumns) -> Result<Array2<f64>> {
    let current = features.ncols();
    if current == expected {
        return Ok(features);
    }
    warn!(expected, current, "feature count does not match model input");

    if current > expected {
        if excess == ExcessColumns::FailFast {
            return Err(PredictError::WidthMismatch {
                expected,
                got: current,
            });
        }
        warn!(keep = expected, "keeping leading features");
        return Ok(features.slice(s![.., ..expected]).to_owned());
    }

    warn!(pad = expected - current, "padding with zero columns");
    let mut padded = Array2::<f64>::zeros((features.nrows(), expected));
    padded.slice_mut(s![.., ..current]).assign(&features);
    Ok(padded)
}
