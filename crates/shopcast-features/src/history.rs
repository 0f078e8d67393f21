//! Per-pair historical aggregates for the inference path.

use crate::error::Result;
use polars::prelude::*;
use shopcast_data::schema::{self, ITEM_CNT_DAY, ITEM_ID, ITEM_PRICE, SHOP_ID, tables};

/// Mean daily units of the pair.
pub const SALES_MEAN: &str = "sales_mean";
/// Sample standard deviation of daily units of the pair.
pub const SALES_STD: &str = "sales_std";
/// Mean unit price of the pair.
pub const PRICE_MEAN: &str = "price_mean";
/// Sample standard deviation of unit price of the pair.
pub const PRICE_STD: &str = "price_std";

/// Mean and sample standard deviation of units and price per (shop, item).
///
/// A pair seen once has a missing standard deviation.
pub fn historical_aggregates(sales: &DataFrame) -> Result<LazyFrame> {
    schema::require_columns(
        sales,
        tables::SALES,
        &[SHOP_ID, ITEM_ID, ITEM_PRICE, ITEM_CNT_DAY],
    )?;

    Ok(sales
        .clone()
        .lazy()
        .select([
            col(SHOP_ID).cast(DataType::Int64),
            col(ITEM_ID).cast(DataType::Int64),
            col(ITEM_CNT_DAY).cast(DataType::Float64),
            col(ITEM_PRICE).cast(DataType::Float64),
        ])
        .group_by([col(SHOP_ID), col(ITEM_ID)])
        .agg([
            col(ITEM_CNT_DAY).mean().alias(SALES_MEAN),
            col(ITEM_CNT_DAY).std(1).alias(SALES_STD),
            col(ITEM_PRICE).mean().alias(PRICE_MEAN),
            col(ITEM_PRICE).std(1).alias(PRICE_STD),
        ]))
}
