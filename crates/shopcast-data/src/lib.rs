#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/shopcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod ingest;
pub mod preprocess;
pub mod report;
pub mod schema;
pub mod store;

pub use error::{DataError, Result};
pub use ingest::{RawTables, load_raw_tables};
pub use preprocess::{PreparedTables, PreprocessConfig, Preprocessor, clean_sales};
pub use report::{Level, MemoryReporter, Reporter, TracingReporter};
pub use store::{ArtifactStore, artifacts};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
