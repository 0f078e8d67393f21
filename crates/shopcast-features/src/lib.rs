#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/shopcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod assemble;
pub mod category;
pub mod config;
pub mod error;
pub mod history;
pub mod inference;
pub mod matrix;
pub mod schema;
pub mod temporal;
pub mod training;

pub use config::FeatureConfig;
pub use error::{FeatureError, Result};
pub use inference::build_inference_features;
pub use matrix::{FeatureMatrix, FeatureVector};
pub use schema::{FEATURE_COUNT, FeatureColumn};
pub use training::{TrainingSet, build_training_features};
