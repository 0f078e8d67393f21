//! Sales history cleaning.
//!
//! Turns the raw sales table into the canonical cleaned table every later
//! stage reads: parsed dates, calendar columns, clipped daily counts,
//! strictly positive prices and the log-scale training label.

use crate::error::{DataError, Result};
use crate::ingest::RawTables;
use crate::report::Reporter;
use crate::schema::{self, tables};
use crate::store::{ArtifactStore, artifacts};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for sales cleaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// `strftime` format of the raw date column (default: `%d.%m.%Y`)
    pub date_format: String,
    /// Lower bound of the daily unit count (default: 0)
    pub min_count: f64,
    /// Upper bound of the daily unit count (default: 20)
    pub max_count: f64,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            date_format: "%d.%m.%Y".to_string(),
            min_count: 0.0,
            max_count: 20.0,
        }
    }
}

/// Tables produced by a preprocessing run.
#[derive(Debug, Clone)]
pub struct PreparedTables {
    /// Cleaned sales history.
    pub sales: DataFrame,
    /// Item catalog.
    pub items: DataFrame,
    /// Scoring pairs.
    pub scoring: DataFrame,
}

impl PreparedTables {
    /// Load the tables persisted by [`Preprocessor::run`].
    pub fn load(store: &ArtifactStore) -> Result<Self> {
        let sales = store.load_table(artifacts::SALES)?;
        schema::require_columns(&sales, tables::SALES, schema::CLEANED_SALES_COLUMNS)?;
        let items = store.load_table(artifacts::ITEMS)?;
        schema::require_columns(&items, tables::ITEMS, schema::ITEM_COLUMNS)?;
        let scoring = store.load_table(artifacts::SCORING)?;
        schema::require_columns(&scoring, tables::SCORING, schema::SCORING_COLUMNS)?;
        Ok(Self {
            sales,
            items,
            scoring,
        })
    }
}

/// Cleans raw tables and persists them for later stages.
#[derive(Debug, Default)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    /// Create a preprocessor with the given configuration.
    pub const fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub const fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Clean `raw` and persist all three tables to `store`.
    ///
    /// Nothing is written unless every table was produced successfully.
    pub fn run(
        &self,
        raw: RawTables,
        store: &ArtifactStore,
        reporter: &dyn Reporter,
    ) -> Result<PreparedTables> {
        reporter.stage("clean sales");
        let raw_rows = raw.sales.height();
        let mut sales = clean_sales(&raw.sales, &self.config)?;
        let dropped = raw_rows - sales.height();
        if dropped > 0 {
            reporter.warn(&format!(
                "dropped {dropped} sales rows with a missing or non-positive value"
            ));
        }
        reporter.info(&format!("kept {} of {} sales rows", sales.height(), raw_rows));

        let mut items = raw.items;
        let mut scoring = raw.scoring;

        reporter.stage("persist cleaned tables");
        store.save_tables(&mut [
            (artifacts::SALES, &mut sales),
            (artifacts::ITEMS, &mut items),
            (artifacts::SCORING, &mut scoring),
        ])?;
        reporter.info(&format!("cleaned tables written to {}", store.root().display()));

        Ok(PreparedTables {
            sales,
            items,
            scoring,
        })
    }
}

/// Parse the raw date text with the configured format.
fn parse_date(config: &PreprocessConfig) -> Expr {
    col(schema::DATE)
        .cast(DataType::String)
        .str()
        .to_date(StrptimeOptions {
            format: Some(config.date_format.as_str().into()),
            strict: false,
            exact: true,
            cache: true,
        })
}

/// Replace NaN with null so that null filters see it.
fn nan_to_null(expr: Expr) -> Expr {
    when(expr.clone().is_nan())
        .then(lit(NULL))
        .otherwise(expr)
}

/// Clamp `expr` into `[lo, hi]`; nulls stay null.
fn clip(expr: Expr, lo: f64, hi: f64) -> Expr {
    when(expr.clone().lt(lit(lo)))
        .then(lit(lo))
        .when(expr.clone().gt(lit(hi)))
        .then(lit(hi))
        .otherwise(expr)
}

/// Clean a raw sales table.
///
/// * `date` is parsed with `config.date_format`; any value that does not
///   conform fails the whole call.
/// * `month` and `year` are derived from the parsed date.
/// * `item_cnt_day` is clipped into `[min_count, max_count]`, never dropped.
/// * Rows with a non-positive, missing or NaN price, or a missing shop, item
///   or count, are removed. A NaN count counts as missing.
/// * `item_cnt_log = ln(1 + item_cnt_day)`.
///
/// # Errors
/// [`DataError::Schema`] for a missing column or an unparseable date.
pub fn clean_sales(raw: &DataFrame, config: &PreprocessConfig) -> Result<DataFrame> {
    schema::require_columns(raw, tables::SALES, schema::SALES_COLUMNS)?;

    let unparsed = raw
        .clone()
        .lazy()
        .select([
            col(schema::DATE).cast(DataType::String).alias("raw_date"),
            parse_date(config).alias("parsed_date"),
        ])
        .filter(col("parsed_date").is_null())
        .limit(1)
        .collect()?;
    if unparsed.height() > 0 {
        let value = unparsed.column("raw_date")?.get(0)?;
        return Err(DataError::schema(
            tables::SALES,
            format!(
                "date {value} does not match format `{}`",
                config.date_format
            ),
        ));
    }

    let cleaned = raw
        .clone()
        .lazy()
        .with_columns([
            parse_date(config).alias(schema::DATE),
            col(schema::SHOP_ID).cast(DataType::Int64),
            col(schema::ITEM_ID).cast(DataType::Int64),
            nan_to_null(col(schema::ITEM_PRICE).cast(DataType::Float64)).alias(schema::ITEM_PRICE),
            clip(
                nan_to_null(col(schema::ITEM_CNT_DAY).cast(DataType::Float64)),
                config.min_count,
                config.max_count,
            )
            .alias(schema::ITEM_CNT_DAY),
        ])
        .filter(
            col(schema::ITEM_PRICE)
                .gt(lit(0.0))
                .and(col(schema::SHOP_ID).is_not_null())
                .and(col(schema::ITEM_ID).is_not_null())
                .and(col(schema::ITEM_CNT_DAY).is_not_null()),
        )
        .with_columns([
            col(schema::DATE)
                .dt()
                .month()
                .cast(DataType::Int32)
                .alias(schema::MONTH),
            col(schema::DATE)
                .dt()
                .year()
                .cast(DataType::Int32)
                .alias(schema::YEAR),
            col(schema::ITEM_CNT_DAY).log1p().alias(schema::ITEM_CNT_LOG),
        ])
        .collect()?;

    Ok(cleaned)
}
