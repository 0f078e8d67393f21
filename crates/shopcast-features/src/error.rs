//! Error types for feature construction.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Result type for feature construction.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Errors that can occur while building features.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// An input table lacks a column the builder reads.
    #[error(transparent)]
    Data(#[from] shopcast_data::DataError),

    /// A value survived the missing-value policy.
    #[error("Missing value in feature column {column} at row {row}")]
    MissingValues {
        /// Feature column holding the value
        column: &'static str,
        /// Row index in the matrix
        row: usize,
    },

    /// A matrix does not have the feature schema's width.
    #[error("Feature matrix has {actual} columns, expected {expected}")]
    ColumnCount {
        /// Expected number of columns
        expected: usize,
        /// Actual number of columns
        actual: usize,
    },

    /// Training labels are missing for some rows.
    #[error("Missing training label at row {0}")]
    MissingLabel(usize),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}
