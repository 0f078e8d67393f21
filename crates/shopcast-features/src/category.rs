//! Category-level aggregates.
//!
//! The two paths fill the same slot with different statistics. Training
//! uses the in-sample mean of daily units per category, computed over the
//! very rows being featurized with no leave-one-out adjustment. Inference
//! uses the number of catalog items in the category. Both behaviours are
//! kept as built; unifying them changes what the fitted model has learned.

use crate::schema::FeatureColumn;
use polars::prelude::*;
use shopcast_data::schema::{ITEM_CATEGORY_ID, ITEM_CNT_DAY, ITEM_ID};

/// Name of the catalog item count column.
pub const CATEGORY_ITEM_COUNT: &str = "category_item_count";

/// One category per item.
///
/// A catalog listing an item twice keeps its first category so a join
/// never duplicates transactions.
pub fn item_categories(items: &DataFrame) -> LazyFrame {
    items
        .clone()
        .lazy()
        .select([
            col(ITEM_ID).cast(DataType::Int64),
            col(ITEM_CATEGORY_ID).cast(DataType::Int64),
        ])
        .filter(col(ITEM_ID).is_not_null())
        .group_by([col(ITEM_ID)])
        .agg([col(ITEM_CATEGORY_ID).first()])
}

/// Number of catalog rows per category.
pub fn catalog_item_counts(items: &DataFrame) -> LazyFrame {
    items
        .clone()
        .lazy()
        .select([col(ITEM_CATEGORY_ID).cast(DataType::Int64)])
        .filter(col(ITEM_CATEGORY_ID).is_not_null())
        .group_by([col(ITEM_CATEGORY_ID)])
        .agg([len().cast(DataType::Float64).alias(CATEGORY_ITEM_COUNT)])
}

/// In-sample mean of daily units per category, one value per row.
///
/// Rows whose item has no category stay missing rather than forming a
/// category of their own.
pub fn in_sample_category_mean() -> Expr {
    when(col(ITEM_CATEGORY_ID).is_null())
        .then(lit(NULL).cast(DataType::Float64))
        .otherwise(col(ITEM_CNT_DAY).mean().over([col(ITEM_CATEGORY_ID)]))
        .alias(FeatureColumn::CategoryAggregate.name())
}

/// Catalog item count of the row's category as the aggregate slot.
pub fn catalog_count_aggregate() -> Expr {
    col(CATEGORY_ITEM_COUNT).alias(FeatureColumn::CategoryAggregate.name())
}
