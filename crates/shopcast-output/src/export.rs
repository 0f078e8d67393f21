//! Prediction table export.
//!
//! Records serialize to CSV through `csv`. Files are staged as a hidden
//! sibling and renamed into place, so a reader never observes a
//! half-written table.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        /// File being written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// One row of the predictions table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PredictionRecord {
    /// Scoring pair identifier.
    #[serde(rename = "ID")]
    pub id: i64,

    /// Predicted units for the month, in `[0, 20]`.
    pub item_cnt_month: f64,
}

impl PredictionRecord {
    /// Create a new record.
    pub const fn new(id: i64, item_cnt_month: f64) -> Self {
        Self { id, item_cnt_month }
    }
}

/// Trait for tables that can be written as CSV.
pub trait Exporter {
    /// Serialize to CSV bytes, header first.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_bytes(&self) -> Result<Vec<u8>, ExportError>;

    /// Write the CSV to `path`, replacing it atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path) -> Result<(), ExportError> {
        let content = self.export_to_bytes()?;
        write_atomically(path, &content)
    }
}

impl Exporter for [PredictionRecord] {
    fn export_to_bytes(&self) -> Result<Vec<u8>, ExportError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        if self.is_empty() {
            wtr.write_record(["ID", "item_cnt_month"])?;
        }
        for record in self {
            wtr.serialize(record)?;
        }
        wtr.into_inner().map_err(|e| ExportError::Csv(e.into_error().into()))
    }
}

/// Write the predictions table as CSV.
pub fn write_predictions(path: &Path, records: &[PredictionRecord]) -> Result<(), ExportError> {
    records.export_to_file(path)
}

/// `predictions_YYYYMMDD_HHMM.csv` for the given local time.
pub fn prediction_file_name(now: NaiveDateTime) -> String {
    format!("predictions_{}.csv", now.format("%Y%m%d_%H%M"))
}

fn write_atomically(path: &Path, content: &[u8]) -> Result<(), ExportError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staged = path.with_file_name(format!(".{file_name}.tmp"));

    let mut file = fs::File::create(&staged).map_err(|e| ExportError::io(&staged, e))?;
    file.write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| ExportError::io(&staged, e))?;
    fs::rename(&staged, path).map_err(|e| ExportError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_prediction_csv_has_two_columns() {
        let records = [PredictionRecord::new(0, 1.5), PredictionRecord::new(1, 0.0)];
        let bytes = records.export_to_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "ID,item_cnt_month\n0,1.5\n1,0.0\n");
    }

    #[test]
    fn test_empty_table_keeps_its_header() {
        let records: [PredictionRecord; 0] = [];
        let bytes = records.export_to_bytes().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "ID,item_cnt_month\n");
    }

    #[test]
    fn test_prediction_file_name() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 59)
            .unwrap();
        assert_eq!(prediction_file_name(now), "predictions_20240309_0705.csv");
    }

    #[test]
    fn test_file_export_is_csv_whatever_the_extension() {
        let dir = std::env::temp_dir().join(format!("shopcast_export_ext_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("predictions.json");

        [PredictionRecord::new(7, 2.0)].export_to_file(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "ID,item_cnt_month\n7,2.0\n");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_leaves_no_staging_file() {
        let dir = std::env::temp_dir().join(format!("shopcast_export_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("predictions.csv");

        write_predictions(&path, &[PredictionRecord::new(3, 4.25)]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "ID,item_cnt_month\n3,4.25\n");
        assert!(!dir.join(".predictions.csv.tmp").exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
