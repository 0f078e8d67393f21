//! Gradient-boosted regression trees.
//!
//! Least-squares boosting through the `gbdt` crate. [`GbdtConfig`] maps onto
//! `gbdt::config::Config`; the fitted `GBDT` is kept inside
//! [`GradientBoostedTrees`] together with the width it was fitted on, and
//! both serialize with serde.

use crate::error::{ModelError, Result};
use crate::regressor::Regressor;
use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec, ValueType};
use gbdt::gradient_boost::GBDT;
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Loss name understood by `gbdt::config::Config::set_loss`.
const SQUARED_ERROR: &str = "SquaredError";

/// Boosting hyper-parameters.
///
/// Row and column subsampling draw from the `gbdt` crate's own generator,
/// so fits with a ratio below 1.0 are not bit-reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GbdtConfig {
    /// Boosting rounds
    pub n_estimators: usize,
    /// Shrinkage applied to every tree
    pub learning_rate: f64,
    /// Maximum tree depth
    pub max_depth: u32,
    /// Minimum rows in a leaf
    pub min_child_samples: usize,
    /// Fraction of rows drawn per round
    pub subsample: f64,
    /// Fraction of columns drawn per round
    pub colsample_bytree: f64,
}

impl Default for GbdtConfig {
    fn default() -> Self {
        Self {
            n_estimators: 1000,
            learning_rate: 0.05,
            max_depth: 5,
            min_child_samples: 20,
            subsample: 0.8,
            colsample_bytree: 0.8,
        }
    }
}

impl GbdtConfig {
    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        let fraction = |v: f64| v > 0.0 && v <= 1.0;
        if self.n_estimators == 0 {
            return Err(ModelError::InvalidParameter("n_estimators must be positive".into()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ModelError::InvalidParameter(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_depth == 0 {
            return Err(ModelError::InvalidParameter("max_depth must be at least 1".into()));
        }
        if !fraction(self.subsample) || !fraction(self.colsample_bytree) {
            return Err(ModelError::InvalidParameter(
                "subsample and colsample_bytree must lie in (0, 1]".into(),
            ));
        }
        Ok(())
    }

    fn to_gbdt_config(&self, n_features: usize) -> Config {
        let mut cfg = Config::new();
        cfg.set_feature_size(n_features);
        cfg.set_max_depth(self.max_depth);
        cfg.set_min_leaf_size(self.min_child_samples.max(1));
        cfg.set_iterations(self.n_estimators);
        cfg.set_shrinkage(self.learning_rate as ValueType);
        cfg.set_loss(SQUARED_ERROR);
        cfg.set_data_sample_ratio(self.subsample);
        cfg.set_feature_sample_ratio(self.colsample_bytree);
        cfg.set_training_optimization_level(2);
        cfg.set_debug(false);
        cfg
    }
}

/// A boosted ensemble of regression trees.
#[derive(Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    config: GbdtConfig,
    n_features: Option<usize>,
    model: Option<GBDT>,
}

impl fmt::Debug for GradientBoostedTrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientBoostedTrees")
            .field("config", &self.config)
            .field("n_features", &self.n_features)
            .field("fitted", &self.model.is_some())
            .finish()
    }
}

impl GradientBoostedTrees {
    /// Unfitted ensemble with the given parameters.
    pub const fn new(config: GbdtConfig) -> Self {
        Self {
            config,
            n_features: None,
            model: None,
        }
    }

    /// Parameters
    pub const fn config(&self) -> &GbdtConfig {
        &self.config
    }

    /// Whether a fitted ensemble and a non-zero width are present.
    pub fn is_fitted(&self) -> bool {
        self.model.is_some() && self.n_features.is_some_and(|width| width > 0)
    }

    /// Predict one all-zero row and report whether the ensemble survives it.
    ///
    /// A deserialized ensemble whose trees reference features beyond the
    /// recorded width fails here instead of at scoring time.
    pub fn check_integrity(&self) -> Result<()> {
        let width = self.n_features.ok_or(ModelError::NotFitted)?;
        let zero_row = Array1::<f64>::zeros(width).insert_axis(ndarray::Axis(0));
        let out = self.predict(zero_row.view())?;
        if out.iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(ModelError::InvalidParameter("ensemble produced a non-finite prediction".into()))
        }
    }
}

impl Default for GradientBoostedTrees {
    fn default() -> Self {
        Self::new(GbdtConfig::default())
    }
}

fn row_values(row: ArrayView1<'_, f64>) -> Vec<ValueType> {
    row.iter().map(|v| *v as ValueType).collect()
}

impl Regressor for GradientBoostedTrees {
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<()> {
        self.config.validate()?;
        let (n_rows, n_cols) = x.dim();
        if y.len() != n_rows {
            return Err(ModelError::DimensionMismatch {
                expected: n_rows,
                actual: y.len(),
            });
        }
        if n_rows == 0 {
            return Err(ModelError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        if n_cols == 0 {
            return Err(ModelError::InvalidParameter("feature matrix has no columns".into()));
        }

        let mut data: DataVec = x
            .rows()
            .into_iter()
            .zip(y.iter())
            .map(|(row, label)| Data::new_training_data(row_values(row), 1.0, *label as ValueType, None))
            .collect();

        let mut model = GBDT::new(&self.config.to_gbdt_config(n_cols));
        model.fit(&mut data);

        self.model = Some(model);
        self.n_features = Some(n_cols);
        Ok(())
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let (Some(model), Some(width)) = (&self.model, self.n_features) else {
            return Err(ModelError::NotFitted);
        };
        if x.ncols() != width {
            return Err(ModelError::DimensionMismatch {
                expected: width,
                actual: x.ncols(),
            });
        }
        let data: DataVec = x
            .rows()
            .into_iter()
            .map(|row| Data::new_test_data(row_values(row), None))
            .collect();

        // Trees decoded from disk are not validated by the crate.
        let predicted = panic::catch_unwind(AssertUnwindSafe(|| model.predict(&data)))
            .map_err(|_| ModelError::InvalidParameter("ensemble failed to evaluate".into()))?;
        Ok(predicted.into_iter().map(f64::from).collect())
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }
}
