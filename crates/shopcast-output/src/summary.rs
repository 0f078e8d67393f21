//! Summary statistics of a prediction run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Distribution of predicted values, logged after inference.
///
/// `std` is the population standard deviation (divisor `n`). An empty
/// input summarises to all zeros with `count == 0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PredictionSummary {
    /// Number of predictions.
    pub count: usize,

    /// Mean prediction.
    pub mean: f64,

    /// Population standard deviation.
    pub std: f64,

    /// Smallest prediction.
    pub min: f64,

    /// Largest prediction.
    pub max: f64,
}

impl PredictionSummary {
    /// Summarise a slice of predictions.
    ///
    /// # Examples
    ///
    /// ```
    /// use shopcast_output::PredictionSummary;
    ///
    /// let summary = PredictionSummary::from_values(&[1.0, 2.0, 3.0]);
    /// assert_eq!(summary.count, 3);
    /// assert_eq!(summary.mean, 2.0);
    /// assert!((summary.std - (2.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    /// ```
    pub fn from_values(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self {
                count,
                mean: 0.0,
                std: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }
        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        let std = (ss / n).sqrt();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            count,
            mean,
            std,
            min,
            max,
        }
    }
}

impl fmt::Display for PredictionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} predictions: mean {:.4}, std {:.4}, min {:.4}, max {:.4}",
            self.count, self.mean, self.std, self.min, self.max
        )
    }
}
