//! Artifact persistence.
//!
//! Every intermediate product of a run (cleaned tables, the scaled training
//! matrix, the fitted scaler) is stored under a stable name below one root
//! directory. Writes go to a hidden sibling file first and are renamed into
//! place, so a failed write never leaves a truncated artifact behind.

use crate::error::{DataError, Result};
use polars::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Stable artifact names.
pub mod artifacts {
    /// Cleaned sales history.
    pub const SALES: &str = "sales_processed.csv";
    /// Item catalog as loaded.
    pub const ITEMS: &str = "items_processed.csv";
    /// Scoring pairs as loaded.
    pub const SCORING: &str = "test_processed.csv";
    /// Scaled training feature matrix.
    pub const TRAIN_FEATURES: &str = "X_train_scaled.csv";
    /// Training labels.
    pub const TRAIN_LABELS: &str = "y_train.csv";
    /// Fitted scaler.
    pub const SCALER: &str = "scaler.json";
}

/// Directory-backed store of named artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Store rooted at `root`. The directory is not touched.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(root);
        fs::create_dir_all(&store.root).map_err(|e| DataError::io(&store.root, e))?;
        Ok(store)
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of artifact `name`.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Whether artifact `name` has been written.
    pub fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    /// Persist a table as CSV under `name`.
    pub fn save_table(&self, name: &str, df: &mut DataFrame) -> Result<()> {
        self.save_tables(&mut [(name, df)])
    }

    /// Persist several tables.
    ///
    /// Every table is written to its temporary file before the first rename,
    /// so a serialization failure leaves every previous artifact in place.
    /// The renames then run in order. If one fails, the tables already
    /// renamed stay replaced and the remaining temporary files are removed.
    pub fn save_tables(&self, tables: &mut [(&str, &mut DataFrame)]) -> Result<()> {
        let mut staged = Vec::with_capacity(tables.len());
        for (name, df) in tables.iter_mut() {
            let target = self.path(name);
            match stage(&target, |w| {
                CsvWriter::new(w).include_header(true).finish(df)?;
                Ok(())
            }) {
                Ok(tmp) => staged.push((tmp, target)),
                Err(e) => {
                    for (tmp, _) in &staged {
                        let _ = fs::remove_file(tmp);
                    }
                    return Err(e);
                }
            }
        }
        let mut pending = staged.iter();
        while let Some((tmp, target)) = pending.next() {
            if let Err(e) = commit(tmp, target) {
                for (rest, _) in pending {
                    let _ = fs::remove_file(rest);
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Load a CSV table written by [`save_table`](Self::save_table).
    ///
    /// ISO dates are parsed back into `Date` columns.
    pub fn load_table(&self, name: &str) -> Result<DataFrame> {
        let path = self.existing(name)?;
        LazyCsvReader::new(&path)
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_try_parse_dates(true)
            .finish()
            .and_then(|lf| lf.collect())
            .map_err(|e| DataError::CorruptArtifact {
                path,
                reason: e.to_string(),
            })
    }

    /// Persist `value` as JSON under `name`.
    pub fn save_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let target = self.path(name);
        let tmp = stage(&target, |w| {
            serde_json::to_writer_pretty(w, value)?;
            Ok(())
        })?;
        commit(&tmp, &target)
    }

    /// Load a JSON artifact written by [`save_json`](Self::save_json).
    pub fn load_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.existing(name)?;
        let file = File::open(&path).map_err(|e| DataError::io(&path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| DataError::CorruptArtifact {
            path,
            reason: e.to_string(),
        })
    }

    fn existing(&self, name: &str) -> Result<PathBuf> {
        let path = self.path(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(DataError::ArtifactNotFound { path })
        }
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.tmp"))
}

/// Write to the temporary sibling of `target` and return its path.
fn stage<F>(target: &Path, write: F) -> Result<PathBuf>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let tmp = temp_path(target);
    let file = File::create(&tmp).map_err(|e| DataError::io(&tmp, e))?;
    let mut writer = BufWriter::new(file);

    let written = write(&mut writer).and_then(|()| {
        writer.flush().map_err(|e| DataError::io(&tmp, e))?;
        writer.get_ref().sync_all().map_err(|e| DataError::io(&tmp, e))
    });
    if let Err(e) = written {
        drop(writer);
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(tmp)
}

fn commit(tmp: &Path, target: &Path) -> Result<()> {
    fs::rename(tmp, target).map_err(|e| {
        let _ = fs::remove_file(tmp);
        DataError::io(target, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Blob {
        mean: Vec<f64>,
        label: String,
    }

    fn scratch_store(name: &str) -> ArtifactStore {
        let dir = std::env::temp_dir().join(format!(
            "shopcast-store-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        ArtifactStore::open(dir).unwrap()
    }

    #[test]
    fn test_json_round_trip() {
        let store = scratch_store("json");
        let blob = Blob {
            mean: vec![1.5, -2.0],
            label: "scaler".to_string(),
        };
        store.save_json("blob.json", &blob).unwrap();
        let loaded: Blob = store.load_json("blob.json").unwrap();
        assert_eq!(loaded, blob);
        assert!(!store.path(".blob.json.tmp").exists());
        fs::remove_dir_all(store.root()).ok();
    }

    #[test]
    fn test_missing_artifact() {
        let store = scratch_store("missing");
        let err = store.load_json::<Blob>("nope.json").unwrap_err();
        assert!(matches!(err, DataError::ArtifactNotFound { .. }));
        let err = store.load_table("nope.csv").unwrap_err();
        assert!(matches!(err, DataError::ArtifactNotFound { .. }));
        fs::remove_dir_all(store.root()).ok();
    }

    #[test]
    fn test_corrupt_json_artifact() {
        let store = scratch_store("corrupt");
        fs::write(store.path("blob.json"), "{ not json").unwrap();
        let err = store.load_json::<Blob>("blob.json").unwrap_err();
        assert!(matches!(err, DataError::CorruptArtifact { .. }));
        fs::remove_dir_all(store.root()).ok();
    }

    #[test]
    fn test_table_round_trip_keeps_dates_and_nulls() {
        let store = scratch_store("table");
        let mut df = df! {
            "date" => &[
                chrono::NaiveDate::from_ymd_opt(2013, 1, 2).unwrap(),
                chrono::NaiveDate::from_ymd_opt(2013, 1, 3).unwrap(),
            ],
            "shop_id" => &[Some(59i64), None],
            "item_cnt_day" => &[1.0, 20.0],
        }
        .unwrap();

        store.save_table("sales.csv", &mut df).unwrap();
        let loaded = store.load_table("sales.csv").unwrap();

        assert_eq!(loaded.height(), 2);
        assert_eq!(loaded.column("date").unwrap().dtype(), &DataType::Date);
        assert_eq!(loaded.column("shop_id").unwrap().null_count(), 1);
        fs::remove_dir_all(store.root()).ok();
    }

    #[test]
    fn test_failed_rename_leaves_no_temporary_files() {
        let store = scratch_store("rename");
        // A non-empty directory cannot be replaced by a file.
        fs::create_dir_all(store.path("items.csv").join("blocker")).unwrap();
        let mut sales = df! { "a" => &[1i64] }.unwrap();
        let mut items = df! { "b" => &[2i64] }.unwrap();
        let mut scoring = df! { "c" => &[3i64] }.unwrap();

        let err = store
            .save_tables(&mut [
                ("sales.csv", &mut sales),
                ("items.csv", &mut items),
                ("scoring.csv", &mut scoring),
            ])
            .unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));

        assert!(store.exists("sales.csv"));
        assert!(!store.exists("scoring.csv"));
        let leftovers: Vec<_> = fs::read_dir(store.root())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "{leftovers:?}");
        fs::remove_dir_all(store.root()).ok();
    }

    #[test]
    fn test_overwrite_is_last_writer_wins() {
        let store = scratch_store("overwrite");
        store.save_json("v.json", &1_u32).unwrap();
        store.save_json("v.json", &2_u32).unwrap();
        assert_eq!(store.load_json::<u32>("v.json").unwrap(), 2);
        fs::remove_dir_all(store.root()).ok();
    }
}
