//! Windowed per-pair statistics for the training path.
//!
//! Every expression is evaluated over the (shop, item) partition in the
//! current row order of the frame, so callers must sort first. Results map
//! back onto the original rows; nothing is collapsed.

use crate::config::FeatureConfig;
use crate::schema::FeatureColumn;
use polars::prelude::*;
use shopcast_data::schema::{ITEM_CNT_DAY, ITEM_ID, ITEM_PRICE, SHOP_ID};

/// Partition keys of every windowed statistic.
pub fn pair_keys() -> [Expr; 2] {
    [col(SHOP_ID), col(ITEM_ID)]
}

/// EMA of daily units per pair with `adjust = false`.
///
/// The recursion is `m_0 = x_0`, `m_t = α·x_t + (1 − α)·m_{t−1}`, so a
/// short group is never renormalised against a fixed window.
pub fn momentum(config: &FeatureConfig) -> Expr {
    col(ITEM_CNT_DAY)
        .ewm_mean(EWMOptions {
            alpha: config.ema_alpha(),
            adjust: false,
            bias: false,
            min_periods: config.min_periods,
            ignore_nulls: false,
        })
        .over(pair_keys())
        .alias(FeatureColumn::Momentum.name())
}

/// Trailing mean of unit price per pair.
pub fn price_trend(config: &FeatureConfig) -> Expr {
    col(ITEM_PRICE)
        .rolling_mean(RollingOptionsFixedWindow {
            window_size: config.price_window,
            min_periods: config.min_periods,
            ..Default::default()
        })
        .over(pair_keys())
        .alias(FeatureColumn::PriceTrend.name())
}

/// Trailing sample standard deviation of daily units per pair.
///
/// A one-observation window has no sample deviation; that slot is left
/// missing here and zeroed by the assembly step.
pub fn volatility(config: &FeatureConfig) -> Expr {
    col(ITEM_CNT_DAY)
        .rolling_std(RollingOptionsFixedWindow {
            window_size: config.volatility_window,
            min_periods: config.min_periods,
            ..Default::default()
        })
        .over(pair_keys())
        .alias(FeatureColumn::Volatility.name())
}

/// Append momentum, price trend and volatility to `lf`.
pub fn with_temporal_features(lf: LazyFrame, config: &FeatureConfig) -> LazyFrame {
    lf.with_columns([momentum(config), price_trend(config), volatility(config)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn values(df: &DataFrame, column: FeatureColumn) -> Vec<Option<f64>> {
        df.column(column.name())
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_groups_are_independent() {
        let df = df! {
            "shop_id" => &[1i64, 2, 1, 2],
            "item_id" => &[7i64, 7, 7, 7],
            "item_price" => &[10.0, 100.0, 20.0, 300.0],
            "item_cnt_day" => &[1.0, 5.0, 3.0, 5.0],
        }
        .unwrap();

        let out = with_temporal_features(df.lazy(), &FeatureConfig::default())
            .collect()
            .unwrap();

        let trend = values(&out, FeatureColumn::PriceTrend);
        assert_relative_eq!(trend[0].unwrap(), 10.0);
        assert_relative_eq!(trend[1].unwrap(), 100.0);
        assert_relative_eq!(trend[2].unwrap(), 15.0);
        assert_relative_eq!(trend[3].unwrap(), 200.0);

        let momentum = values(&out, FeatureColumn::Momentum);
        assert_relative_eq!(momentum[0].unwrap(), 1.0);
        assert_relative_eq!(momentum[2].unwrap(), 2.0 / 3.0 * 3.0 + 1.0 / 3.0 * 1.0);
        assert_relative_eq!(momentum[3].unwrap(), 5.0);

        // Constant counts have zero deviation once two observations exist.
        let vol = values(&out, FeatureColumn::Volatility);
        assert_relative_eq!(vol[3].unwrap(), 0.0);
    }

    #[test]
    fn test_price_window_is_trailing_two() {
        let df = df! {
            "shop_id" => &[1i64, 1, 1, 1],
            "item_id" => &[1i64, 1, 1, 1],
            "item_price" => &[10.0, 20.0, 40.0, 80.0],
            "item_cnt_day" => &[1.0, 1.0, 1.0, 1.0],
        }
        .unwrap();

        let out = with_temporal_features(df.lazy(), &FeatureConfig::default())
            .collect()
            .unwrap();
        let trend: Vec<f64> = values(&out, FeatureColumn::PriceTrend)
            .into_iter()
            .map(Option::unwrap)
            .collect();
        assert_eq!(trend, vec![10.0, 15.0, 30.0, 60.0]);
    }
}
