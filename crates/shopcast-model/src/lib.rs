#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/shopcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod evaluation;
pub mod boosting;
pub mod persist;
pub mod regressor;
pub mod scaler;
pub mod target;

pub use error::{ModelError, Result};
pub use evaluation::{HoldoutConfig, HoldoutSplit, r2_score};
pub use boosting::{GbdtConfig, GradientBoostedTrees};
pub use persist::{load_model, load_scaler, model_file_name, save_model, save_scaler};
pub use regressor::Regressor;
pub use scaler::{FittedScaler, StandardScaler};
pub use target::{MAX_PREDICTED_COUNT, inverse_target, inverse_targets, log_target};
