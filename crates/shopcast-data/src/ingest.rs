//! Raw table loading.
//!
//! Reads the three CSV inputs of a run from a data root:
//! `sales_train.csv`, `items.csv` and `test.csv`.

use crate::error::{DataError, Result};
use crate::report::Reporter;
use crate::schema::{self, tables};
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Raw sales history file name.
pub const RAW_SALES_FILE: &str = "sales_train.csv";
/// Item catalog file name.
pub const RAW_ITEMS_FILE: &str = "items.csv";
/// Scoring pairs file name.
pub const RAW_SCORING_FILE: &str = "test.csv";

/// Textual tokens read as missing in the scoring pairs table.
pub const SCORING_NULL_TOKENS: &[&str] = &["null", "nan"];

/// The three raw tables of a run.
#[derive(Debug, Clone)]
pub struct RawTables {
    /// Sales history, one row per transaction.
    pub sales: DataFrame,
    /// Item catalog.
    pub items: DataFrame,
    /// Pairs to score.
    pub scoring: DataFrame,
}

/// Locations of the raw inputs under a data root.
#[derive(Debug, Clone)]
pub struct RawPaths {
    /// Sales history CSV.
    pub sales: PathBuf,
    /// Item catalog CSV.
    pub items: PathBuf,
    /// Scoring pairs CSV.
    pub scoring: PathBuf,
}

impl RawPaths {
    /// Standard file names under `data_root`.
    pub fn under(data_root: &Path) -> Self {
        Self {
            sales: data_root.join(RAW_SALES_FILE),
            items: data_root.join(RAW_ITEMS_FILE),
            scoring: data_root.join(RAW_SCORING_FILE),
        }
    }
}

/// Load all raw tables from `data_root`.
///
/// # Errors
/// Fails with [`DataError::Io`] when a file is missing and
/// [`DataError::Schema`] when a required column is absent.
pub fn load_raw_tables(data_root: &Path, reporter: &dyn Reporter) -> Result<RawTables> {
    reporter.stage("load raw tables");
    let paths = RawPaths::under(data_root);

    let sales = read_sales(&paths.sales)?;
    let items = read_items(&paths.items)?;
    let scoring = read_scoring_pairs(&paths.scoring)?;

    reporter.info(&format!(
        "loaded {} sales rows, {} items, {} scoring pairs",
        sales.height(),
        items.height(),
        scoring.height()
    ));

    Ok(RawTables {
        sales,
        items,
        scoring,
    })
}

/// Read a raw sales history CSV.
pub fn read_sales(path: &Path) -> Result<DataFrame> {
    let df = read_csv(path, &[])?;
    schema::require_columns(&df, tables::SALES, schema::SALES_COLUMNS)?;
    Ok(df)
}

/// Read an item catalog CSV.
pub fn read_items(path: &Path) -> Result<DataFrame> {
    let df = read_csv(path, &[])?;
    schema::require_columns(&df, tables::ITEMS, schema::ITEM_COLUMNS)?;
    Ok(df)
}

/// Read a scoring pairs CSV, treating `null` and `nan` as missing.
pub fn read_scoring_pairs(path: &Path) -> Result<DataFrame> {
    let df = read_csv(path, SCORING_NULL_TOKENS)?;
    schema::require_columns(&df, tables::SCORING, schema::SCORING_COLUMNS)?;
    Ok(df)
}

/// Read any header-first CSV into memory.
pub(crate) fn read_csv(path: &Path, null_tokens: &[&str]) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(DataError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        ));
    }

    let mut reader = LazyCsvReader::new(path)
        .with_has_header(true)
        // Whole-file inference: counts may only turn fractional deep into the file.
        .with_infer_schema_length(None);
    if !null_tokens.is_empty() {
        let tokens = null_tokens.iter().map(|t| (*t).into()).collect();
        reader = reader.with_null_values(Some(NullValues::AllColumns(tokens)));
    }

    Ok(reader.finish()?.collect()?)
}
