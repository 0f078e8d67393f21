//! Error types for data operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// A table is missing a column or holds a value of the wrong shape.
    #[error("Schema error in {table}: {reason}")]
    Schema {
        /// Table being read or cleaned
        table: String,
        /// What was wrong with it
        reason: String,
    },

    /// Source file missing or destination not writable.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        /// Path that was being read or written
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Artifact was never written under this name.
    #[error("Artifact not found: {}", path.display())]
    ArtifactNotFound {
        /// Expected location of the artifact
        path: PathBuf,
    },

    /// Artifact exists but could not be decoded.
    #[error("Corrupt artifact {}: {reason}", path.display())]
    CorruptArtifact {
        /// Location of the artifact
        path: PathBuf,
        /// Decoder message
        reason: String,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DataError {
    /// Build a schema error for `table`.
    pub fn schema(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Attach a path to an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
