//! The fit/predict contract shared by the trainer and the scorer.

use crate::error::Result;
use ndarray::{Array1, ArrayView1, ArrayView2};

/// A supervised regressor over a dense feature matrix.
///
/// `fit` consumes standardised features and `ln(1 + units)` labels;
/// `predict` returns values on the same log scale.
pub trait Regressor {
    /// Fit on `x` (rows × features) and targets `y`.
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<()>;

    /// Predict one value per row of `x`.
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>>;

    /// Width of the matrix the regressor was fitted on, if fitted.
    fn n_features(&self) -> Option<usize>;
}
