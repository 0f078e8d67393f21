//! Training-path feature construction.

use crate::assemble::assemble_matrix;
use crate::category::{in_sample_category_mean, item_categories};
use crate::config::FeatureConfig;
use crate::error::{FeatureError, Result};
use crate::matrix::FeatureMatrix;
use crate::temporal::with_temporal_features;
use ndarray::Array1;
use polars::prelude::*;
use shopcast_data::schema::{self, DATE, ITEM_CNT_DAY, ITEM_CNT_LOG, ITEM_ID, ITEM_PRICE, SHOP_ID, tables};

/// Row position carried through joins to restore frame order.
pub(crate) const ROW_ORDER: &str = "__row_order";

/// Feature matrix and row-aligned labels.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    /// One row per cleaned transaction.
    pub features: FeatureMatrix,
    /// `ln(1 + item_cnt_day)` of the same rows.
    pub labels: Array1<f64>,
}

impl TrainingSet {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Build training features from the cleaned sales history.
///
/// Rows are stably sorted by date first; transactions sharing a date keep
/// their input order. That order drives every windowed statistic:
///
/// 1. momentum: EMA of daily units per (shop, item), span 2, adjust off
/// 2. price trend: trailing mean price per pair, window 2
/// 3. volatility: trailing sample std of daily units per pair, window 3
/// 4. category aggregate: in-sample mean daily units of the category
///
/// Nothing is aggregated away: the matrix has one row per transaction and
/// the labels are the `item_cnt_log` values of those rows.
pub fn build_training_features(
    sales: &DataFrame,
    items: &DataFrame,
    config: &FeatureConfig,
) -> Result<TrainingSet> {
    schema::require_columns(sales, tables::SALES, schema::CLEANED_SALES_COLUMNS)?;
    schema::require_columns(items, tables::ITEMS, schema::ITEM_COLUMNS)?;

    let ordered = sales
        .clone()
        .lazy()
        .select([
            col(DATE),
            col(SHOP_ID).cast(DataType::Int64),
            col(ITEM_ID).cast(DataType::Int64),
            col(ITEM_PRICE).cast(DataType::Float64),
            col(ITEM_CNT_DAY).cast(DataType::Float64),
            col(ITEM_CNT_LOG).cast(DataType::Float64),
        ])
        .sort(
            [DATE],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .with_row_index(ROW_ORDER, None);

    let frame = with_temporal_features(ordered, config)
        .join(
            item_categories(items),
            [col(ITEM_ID)],
            [col(ITEM_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .sort([ROW_ORDER], SortMultipleOptions::default())
        .with_column(in_sample_category_mean())
        .collect()?;

    let labels = frame
        .column(ITEM_CNT_LOG)?
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.ok_or(FeatureError::MissingLabel(row)))
        .collect::<Result<Array1<f64>>>()?;
    let features = assemble_matrix(frame.lazy(), config)?;

    Ok(TrainingSet { features, labels })
}
