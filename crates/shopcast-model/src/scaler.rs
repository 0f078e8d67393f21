//! Per-column standardisation.
//!
//! [`StandardScaler::fit_transform`] is the one call made at training time.
//! It returns an immutable [`FittedScaler`] that is persisted next to the
//! scaled matrix; inference only ever calls [`FittedScaler::transform`] on
//! that persisted value and never refits.

use crate::error::{ModelError, Result};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use shopcast_features::{FeatureColumn, FeatureMatrix};

/// Standard deviations at or below this are treated as constant columns.
pub const ZERO_VARIANCE_EPSILON: f64 = 1e-12;

/// Fitted mean and scale per feature column.
///
/// A constant training column gets a scale of 1.0: it is centred but not
/// divided, so a degenerate column never turns into infinities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedScaler {
    columns: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
    n_samples: usize,
}

impl FittedScaler {
    /// Column names seen at fit time.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Per-column mean.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Per-column divisor (population standard deviation, or 1.0).
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Rows the scaler was fitted on.
    pub const fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Standardise a feature matrix.
    ///
    /// # Errors
    /// [`ModelError::SchemaMismatch`] if the scaler was fitted on a
    /// different column layout.
    pub fn transform(&self, features: &FeatureMatrix) -> Result<Array2<f64>> {
        let given: Vec<String> = FeatureColumn::names().map(String::from).to_vec();
        if given != self.columns {
            return Err(ModelError::SchemaMismatch {
                fitted: self.columns.clone(),
                given,
            });
        }
        self.transform_array(features.view())
    }

    /// Standardise a raw array with the fitted column count.
    pub fn transform_array(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.mean.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.mean.len(),
                actual: x.ncols(),
            });
        }
        let mean = Array1::from(self.mean.clone());
        let scale = Array1::from(self.scale.clone());
        Ok((&x - &mean) / &scale)
    }
}

/// Fits [`FittedScaler`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardScaler;

impl StandardScaler {
    /// Fit on a training feature matrix.
    pub fn fit(features: &FeatureMatrix) -> Result<FittedScaler> {
        let columns = FeatureColumn::names().map(String::from).to_vec();
        Self::fit_array(features.view(), columns)
    }

    /// Fit on a raw array with the given column names.
    ///
    /// # Errors
    /// [`ModelError::InsufficientData`] on an empty matrix and
    /// [`ModelError::DimensionMismatch`] if `columns` does not name every
    /// column.
    pub fn fit_array(x: ArrayView2<'_, f64>, columns: Vec<String>) -> Result<FittedScaler> {
        if columns.len() != x.ncols() {
            return Err(ModelError::DimensionMismatch {
                expected: x.ncols(),
                actual: columns.len(),
            });
        }
        let mean = x.mean_axis(Axis(0)).ok_or(ModelError::InsufficientData {
            required: 1,
            actual: 0,
        })?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > ZERO_VARIANCE_EPSILON { s } else { 1.0 });

        Ok(FittedScaler {
            columns,
            mean: mean.to_vec(),
            scale: scale.to_vec(),
            n_samples: x.nrows(),
        })
    }

    /// Fit on `features` and transform them in one step.
    pub fn fit_transform(features: &FeatureMatrix) -> Result<(FittedScaler, Array2<f64>)> {
        let scaler = Self::fit(features)?;
        let scaled = scaler.transform(features)?;
        Ok((scaler, scaled))
    }
}
