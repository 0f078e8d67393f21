//! Feature construction parameters.

use serde::{Deserialize, Serialize};

/// Configuration shared by both construction paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// EMA span for sales momentum (default: 2)
    pub ema_span: usize,
    /// Trailing window for the price trend (default: 2)
    pub price_window: usize,
    /// Trailing window for sales volatility (default: 3)
    pub volatility_window: usize,
    /// Minimum observations for a partial window (default: 1)
    pub min_periods: usize,
    /// Floor applied to volatility before dividing by it (default: 0.001)
    pub ratio_floor: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            ema_span: 2,
            price_window: 2,
            volatility_window: 3,
            min_periods: 1,
            ratio_floor: 0.001,
        }
    }
}

impl FeatureConfig {
    /// Smoothing factor of the momentum EMA, `2 / (span + 1)`.
    pub fn ema_alpha(&self) -> f64 {
        2.0 / (self.ema_span as f64 + 1.0)
    }
}
