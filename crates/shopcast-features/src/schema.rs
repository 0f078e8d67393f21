//! Feature schema.
//!
//! The regressor and the fitted scaler both consume columns by position, so
//! the names and order below are a persisted contract. Reordering them
//! invalidates every stored scaler and model.

use serde::{Deserialize, Serialize};

/// Number of feature columns.
pub const FEATURE_COUNT: usize = 6;

/// One column of the feature matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureColumn {
    /// Short-horizon sales momentum.
    Momentum,
    /// Category aggregate × momentum × price trend.
    Interaction,
    /// Price trend.
    PriceTrend,
    /// Sales volatility.
    Volatility,
    /// Category-level aggregate.
    CategoryAggregate,
    /// Price trend over floored volatility.
    TrendVolatilityRatio,
}

impl FeatureColumn {
    /// All columns in matrix order.
    pub const ALL: [Self; FEATURE_COUNT] = [
        Self::Momentum,
        Self::Interaction,
        Self::PriceTrend,
        Self::Volatility,
        Self::CategoryAggregate,
        Self::TrendVolatilityRatio,
    ];

    /// Columns each construction path must supply itself.
    pub const BASE: [Self; 4] = [
        Self::Momentum,
        Self::PriceTrend,
        Self::Volatility,
        Self::CategoryAggregate,
    ];

    /// Column name as stored in tables and artifacts.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Momentum => "sales_ema_2m",
            Self::Interaction => "hierarchical_ma_interaction",
            Self::PriceTrend => "trend_2m",
            Self::Volatility => "sales_volatility",
            Self::CategoryAggregate => "category_avg",
            Self::TrendVolatilityRatio => "trend_volatility_ratio",
        }
    }

    /// Position in the matrix.
    pub const fn index(self) -> usize {
        match self {
            Self::Momentum => 0,
            Self::Interaction => 1,
            Self::PriceTrend => 2,
            Self::Volatility => 3,
            Self::CategoryAggregate => 4,
            Self::TrendVolatilityRatio => 5,
        }
    }

    /// Stored names in matrix order.
    pub fn names() -> [&'static str; FEATURE_COUNT] {
        Self::ALL.map(Self::name)
    }
}

impl std::fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
