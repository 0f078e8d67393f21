//! Error types for scaling and regression.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while scaling, fitting or predicting.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No usable model or scaler artifact.
    #[error("Model unavailable at {}: {reason}", path.display())]
    Unavailable {
        /// Where the artifact was expected
        path: PathBuf,
        /// Why it could not be used
        reason: String,
    },

    /// Predict or transform called before fitting.
    #[error("Model has not been fitted")]
    NotFitted,

    /// Input width does not match the fitted width.
    #[error("Dimension mismatch: expected {expected} columns, got {actual}")]
    DimensionMismatch {
        /// Expected number of columns
        expected: usize,
        /// Actual number of columns
        actual: usize,
    },

    /// Feature names differ from those seen at fit time.
    #[error("Feature schema mismatch: fitted on {fitted:?}, given {given:?}")]
    SchemaMismatch {
        /// Columns at fit time
        fitted: Vec<String>,
        /// Columns now
        given: Vec<String>,
    },

    /// Not enough rows to fit or split.
    #[error("Insufficient data: need at least {required} rows, got {actual}")]
    InsufficientData {
        /// Required number of rows
        required: usize,
        /// Actual number of rows
        actual: usize,
    },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Artifact store error while saving.
    #[error(transparent)]
    Store(#[from] shopcast_data::DataError),
}
