//! Holdout split and goodness-of-fit.

use crate::error::{ModelError, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// How training rows are split for evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldoutConfig {
    /// Fraction of rows held out for evaluation
    pub test_fraction: f64,
    /// Shuffle seed
    pub seed: u64,
}

impl Default for HoldoutConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

/// Row indices of the fitting and evaluation parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldoutSplit {
    /// Rows used to fit
    pub train: Vec<usize>,
    /// Rows held out
    pub test: Vec<usize>,
}

impl HoldoutSplit {
    /// Shuffle `0..n_rows` with the configured seed and cut off the
    /// evaluation part, rounding its size up.
    ///
    /// # Errors
    /// [`ModelError::InsufficientData`] if either part would be empty, and
    /// [`ModelError::InvalidParameter`] if the fraction is outside (0, 1).
    pub fn new(n_rows: usize, config: &HoldoutConfig) -> Result<Self> {
        if !(config.test_fraction > 0.0 && config.test_fraction < 1.0) {
            return Err(ModelError::InvalidParameter(format!(
                "test_fraction must lie in (0, 1), got {}",
                config.test_fraction
            )));
        }
        let n_test = (n_rows as f64 * config.test_fraction).ceil() as usize;
        if n_rows < 2 || n_test >= n_rows {
            return Err(ModelError::InsufficientData {
                required: 2,
                actual: n_rows,
            });
        }

        let mut order: Vec<usize> = (0..n_rows).collect();
        order.shuffle(&mut StdRng::seed_from_u64(config.seed));
        let train = order.split_off(n_test);
        Ok(Self { train, test: order })
    }

    /// Split a feature matrix and label vector.
    pub fn apply(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> (Array2<f64>, Array1<f64>, Array2<f64>, Array1<f64>) {
        (
            x.select(Axis(0), &self.train),
            y.select(Axis(0), &self.train),
            x.select(Axis(0), &self.test),
            y.select(Axis(0), &self.test),
        )
    }
}

/// Coefficient of determination.
///
/// A constant `y_true` gives 1.0 for a perfect prediction and 0.0
/// otherwise.
pub fn r2_score(y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> Result<f64> {
    if y_true.len() != y_pred.len() {
        return Err(ModelError::DimensionMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }
    let mean = y_true.mean().ok_or(ModelError::InsufficientData {
        required: 1,
        actual: 0,
    })?;
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}
