#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/shopcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod export;
pub mod summary;

pub use export::{ExportError, Exporter, PredictionRecord, prediction_file_name, write_predictions};
pub use summary::PredictionSummary;
