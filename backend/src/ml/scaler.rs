//! Fitted feature scaler

use serde::{Deserialize, Serialize};

use super::InferenceError;

/// A scaler fitted during training, applied column-wise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`; a zero scale leaves the centred value unscaled
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `(x - min) / (max - min)`; a constant column maps to zero
    MinMax { data_min: Vec<f64>, data_max: Vec<f64> },
}

impl Scaler {
    /// Number of input columns the scaler was fitted on
    pub fn width(&self) -> usize {
        match self {
            Scaler::Standard { mean, .. } => mean.len(),
            Scaler::MinMax { data_min, .. } => data_min.len(),
        }
    }

    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let (a, b) = match self {
            Scaler::Standard { mean, scale } => (mean, scale),
            Scaler::MinMax { data_min, data_max } => (data_min, data_max),
        };
        if a.len() != row.len() || b.len() != row.len() {
            return Err(InferenceError::ScalerWidth {
                expected: a.len(),
                actual: row.len(),
            });
        }

        let scaled = match self {
            Scaler::Standard { mean, scale } => row
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| {
                    let s = if *s == 0.0 { 1.0 } else { *s };
                    (x - m) / s
                })
                .collect(),
            Scaler::MinMax { data_min, data_max } => row
                .iter()
                .zip(data_min.iter().zip(data_max))
                .map(|(x, (lo, hi))| {
                    let range = hi - lo;
                    if range == 0.0 {
                        0.0
                    } else {
                        (x - lo) / range
                    }
                })
                .collect(),
        };
        Ok(scaled)
    }
}
