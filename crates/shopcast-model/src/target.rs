//! Training target transform.
//!
//! The regressor learns `ln(1 + units)`. Predictions are mapped back with
//! `exp(p) − 1` and clipped into the same `[0, 20]` range the cleaned
//! counts live in, so `inverse_target(log_target(0)) == 0`.

use ndarray::{Array1, ArrayView1};

/// Upper bound of a predicted unit count.
pub const MAX_PREDICTED_COUNT: f64 = 20.0;

/// `ln(1 + count)`.
pub fn log_target(count: f64) -> f64 {
    count.ln_1p()
}

/// `exp(p) − 1`, clipped to `[0, MAX_PREDICTED_COUNT]`.
pub fn inverse_target(prediction: f64) -> f64 {
    prediction.exp_m1().clamp(0.0, MAX_PREDICTED_COUNT)
}

/// [`inverse_target`] over a vector of model outputs.
pub fn inverse_targets(predictions: ArrayView1<'_, f64>) -> Array1<f64> {
    predictions.mapv(inverse_target)
}
