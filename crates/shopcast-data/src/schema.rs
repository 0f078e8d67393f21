//! Column names of the raw and cleaned tables.
//!
//! Every stage refers to columns through these constants so a renamed
//! column fails at one place instead of deep inside a lazy query.

/// Transaction date, `dd.mm.yyyy` text in the raw table, `Date` once cleaned.
pub const DATE: &str = "date";
/// Shop identifier.
pub const SHOP_ID: &str = "shop_id";
/// Item identifier.
pub const ITEM_ID: &str = "item_id";
/// Unit price of the transaction.
pub const ITEM_PRICE: &str = "item_price";
/// Units sold that day.
pub const ITEM_CNT_DAY: &str = "item_cnt_day";
/// Calendar month derived from [`DATE`].
pub const MONTH: &str = "month";
/// Calendar year derived from [`DATE`].
pub const YEAR: &str = "year";
/// `ln(1 + item_cnt_day)`, the training label.
pub const ITEM_CNT_LOG: &str = "item_cnt_log";
/// Category identifier in the item catalog.
pub const ITEM_CATEGORY_ID: &str = "item_category_id";
/// Row identifier of a scoring pair.
pub const ROW_ID: &str = "ID";

/// Columns the raw sales history must carry.
pub const SALES_COLUMNS: &[&str] = &[DATE, SHOP_ID, ITEM_ID, ITEM_PRICE, ITEM_CNT_DAY];
/// Columns the item catalog must carry.
pub const ITEM_COLUMNS: &[&str] = &[ITEM_ID, ITEM_CATEGORY_ID];
/// Columns the scoring pairs table must carry.
pub const SCORING_COLUMNS: &[&str] = &[ROW_ID, SHOP_ID, ITEM_ID];
/// Columns a cleaned sales table carries in addition to [`SALES_COLUMNS`].
pub const CLEANED_SALES_COLUMNS: &[&str] = &[
    DATE,
    SHOP_ID,
    ITEM_ID,
    ITEM_PRICE,
    ITEM_CNT_DAY,
    MONTH,
    YEAR,
    ITEM_CNT_LOG,
];

/// Table names used in error messages and reports.
pub mod tables {
    /// Raw or cleaned sales history.
    pub const SALES: &str = "sales";
    /// Item catalog.
    pub const ITEMS: &str = "items";
    /// Scoring pairs.
    pub const SCORING: &str = "scoring pairs";
}

/// Check that `df` carries every column in `required`.
///
/// # Errors
/// Returns [`DataError::Schema`](crate::DataError::Schema) naming the first
/// missing column.
pub fn require_columns(
    df: &polars::prelude::DataFrame,
    table: &str,
    required: &[&str],
) -> crate::Result<()> {
    for name in required {
        if df.column(name).is_err() {
            return Err(crate::DataError::schema(
                table,
                format!("missing column `{name}`"),
            ));
        }
    }
    Ok(())
}
