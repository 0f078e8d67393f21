//! Inference-path feature construction.

use crate::assemble::assemble_matrix;
use crate::category::{catalog_count_aggregate, catalog_item_counts, item_categories};
use crate::config::FeatureConfig;
use crate::error::Result;
use crate::history::{PRICE_MEAN, SALES_MEAN, SALES_STD, historical_aggregates};
use crate::matrix::FeatureMatrix;
use crate::schema::FeatureColumn;
use crate::training::ROW_ORDER;
use polars::prelude::*;
use shopcast_data::schema::{self, ITEM_CATEGORY_ID, ITEM_ID, SHOP_ID, tables};

/// Build features for scoring pairs, one row per pair, in input order.
///
/// Scoring pairs carry no price or count, so each windowed training
/// statistic is stood in for by a whole-history aggregate of the pair:
///
/// | slot        | training                 | inference              |
/// |-------------|--------------------------|------------------------|
/// | momentum    | EMA of daily units       | mean daily units       |
/// | price trend | trailing mean price      | mean price             |
/// | volatility  | trailing std of units    | std of daily units     |
/// | category    | in-sample mean units     | catalog item count     |
///
/// Pairs without history (or with a missing shop or item) get zero base
/// values through the shared missing-value policy instead of failing.
pub fn build_inference_features(
    scoring: &DataFrame,
    sales: &DataFrame,
    items: &DataFrame,
    config: &FeatureConfig,
) -> Result<FeatureMatrix> {
    schema::require_columns(scoring, tables::SCORING, &[SHOP_ID, ITEM_ID])?;
    schema::require_columns(items, tables::ITEMS, schema::ITEM_COLUMNS)?;
    let history = historical_aggregates(sales)?;

    let base = scoring
        .clone()
        .lazy()
        .select([
            col(SHOP_ID).cast(DataType::Int64),
            col(ITEM_ID).cast(DataType::Int64),
        ])
        .with_row_index(ROW_ORDER, None)
        .join(
            history,
            [col(SHOP_ID), col(ITEM_ID)],
            [col(SHOP_ID), col(ITEM_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            item_categories(items),
            [col(ITEM_ID)],
            [col(ITEM_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            catalog_item_counts(items),
            [col(ITEM_CATEGORY_ID)],
            [col(ITEM_CATEGORY_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .sort([ROW_ORDER], SortMultipleOptions::default())
        .with_columns([
            col(SALES_MEAN).alias(FeatureColumn::Momentum.name()),
            col(PRICE_MEAN).alias(FeatureColumn::PriceTrend.name()),
            col(SALES_STD).alias(FeatureColumn::Volatility.name()),
            catalog_count_aggregate(),
        ]);

    assemble_matrix(base, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sales() -> DataFrame {
        df! {
            "shop_id" => &[1i64, 1, 1, 2],
            "item_id" => &[5i64, 5, 5, 6],
            "item_price" => &[10.0, 20.0, 30.0, 50.0],
            "item_cnt_day" => &[2.0, 4.0, 6.0, 3.0],
        }
        .unwrap()
    }

    fn items() -> DataFrame {
        df! {
            "item_id" => &[5i64, 6, 7, 8],
            "item_category_id" => &[40i64, 40, 40, 41],
        }
        .unwrap()
    }

    #[test]
    fn test_known_pair_uses_history() {
        let scoring = df! {
            "ID" => &[0i64],
            "shop_id" => &[1i64],
            "item_id" => &[5i64],
        }
        .unwrap();
        let m = build_inference_features(&scoring, &sales(), &items(), &FeatureConfig::default())
            .unwrap();
        let row = m.row(0).unwrap();
        assert_relative_eq!(row.momentum, 4.0);
        assert_relative_eq!(row.price_trend, 20.0);
        assert_relative_eq!(row.volatility, 2.0);
        assert_relative_eq!(row.category_aggregate, 3.0);
        assert_relative_eq!(row.trend_volatility_ratio, 10.0);
        assert_relative_eq!(row.interaction, 3.0 * 4.0 * 20.0);
    }

    #[test]
    fn test_single_observation_pair_has_zero_volatility() {
        let scoring = df! {
            "ID" => &[0i64],
            "shop_id" => &[2i64],
            "item_id" => &[6i64],
        }
        .unwrap();
        let m = build_inference_features(&scoring, &sales(), &items(), &FeatureConfig::default())
            .unwrap();
        let row = m.row(0).unwrap();
        assert_relative_eq!(row.volatility, 0.0);
        assert_relative_eq!(row.trend_volatility_ratio, 50.0 / 0.001, epsilon = 1e-6);
    }

    #[test]
    fn test_order_is_preserved() {
        let scoring = df! {
            "ID" => &[0i64, 1, 2, 3],
            "shop_id" => &[Some(9i64), Some(1), None, Some(2)],
            "item_id" => &[Some(8i64), Some(5), Some(5), Some(6)],
        }
        .unwrap();
        let m = build_inference_features(&scoring, &sales(), &items(), &FeatureConfig::default())
            .unwrap();
        assert_eq!(m.nrows(), 4);
        let momentum = m.column(FeatureColumn::Momentum);
        assert_relative_eq!(momentum[0], 0.0);
        assert_relative_eq!(momentum[1], 4.0);
        assert_relative_eq!(momentum[2], 0.0);
        assert_relative_eq!(momentum[3], 3.0);
        // Unseen pair still gets the catalog count of its category.
        assert_relative_eq!(m.column(FeatureColumn::CategoryAggregate)[0], 1.0);
    }
}
