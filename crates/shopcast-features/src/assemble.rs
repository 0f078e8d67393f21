//! Shared assembly of the feature matrix.
//!
//! Both construction paths hand over a frame holding the four base columns
//! and finish here, so the derived formulas, the missing-value policy and
//! the column order exist exactly once.

use crate::config::FeatureConfig;
use crate::error::Result;
use crate::matrix::FeatureMatrix;
use crate::schema::FeatureColumn;
use polars::prelude::*;

/// Missing-value policy: null, NaN and infinite values become 0.
///
/// Insufficient history, an unseen pair and an unknown category all surface
/// as missing base values; this is the only place they are resolved.
pub fn missing_to_zero(name: &str) -> Expr {
    let value = col(name).cast(DataType::Float64);
    when(value.clone().is_finite())
        .then(value)
        .otherwise(lit(0.0))
        .alias(name)
}

/// `price_trend / max(volatility, floor)`.
///
/// The floor bounds the ratio for near-constant sales; it is not a guard
/// against a zero divisor, which the floor already excludes.
pub fn trend_volatility_ratio(config: &FeatureConfig) -> Expr {
    let volatility = col(FeatureColumn::Volatility.name());
    let floored = when(volatility.clone().lt(lit(config.ratio_floor)))
        .then(lit(config.ratio_floor))
        .otherwise(volatility);
    (col(FeatureColumn::PriceTrend.name()) / floored)
        .alias(FeatureColumn::TrendVolatilityRatio.name())
}

/// `category_aggregate × momentum × price_trend`.
pub fn interaction() -> Expr {
    (col(FeatureColumn::CategoryAggregate.name())
        * col(FeatureColumn::Momentum.name())
        * col(FeatureColumn::PriceTrend.name()))
    .alias(FeatureColumn::Interaction.name())
}

/// Resolve missing base values, derive the ratio and interaction, and
/// select the six columns in schema order.
pub fn assemble(base: LazyFrame, config: &FeatureConfig) -> LazyFrame {
    base.with_columns(
        FeatureColumn::BASE
            .iter()
            .map(|c| missing_to_zero(c.name()))
            .collect::<Vec<_>>(),
    )
    .with_columns([trend_volatility_ratio(config), interaction()])
    .select(
        FeatureColumn::ALL
            .iter()
            .map(|c| col(c.name()))
            .collect::<Vec<_>>(),
    )
}

/// Run [`assemble`] and collect into a [`FeatureMatrix`].
pub fn assemble_matrix(base: LazyFrame, config: &FeatureConfig) -> Result<FeatureMatrix> {
    let df = assemble(base, config).collect()?;
    FeatureMatrix::from_frame(&df)
}
