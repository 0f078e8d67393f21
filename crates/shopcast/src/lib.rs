#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/shopcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod pipeline;

// Re-export main types from sub-crates
pub use shopcast_data as data;
pub use shopcast_features as features;
pub use shopcast_model as model;
pub use shopcast_output as output;

pub use pipeline::{InferReport, PipelineError, TrainOptions, TrainReport};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
