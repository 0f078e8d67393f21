//! Loading and saving the fitted scaler and regressor.

use crate::error::{ModelError, Result};
use crate::boosting::GradientBoostedTrees;
use crate::scaler::FittedScaler;
use shopcast_data::{ArtifactStore, artifacts};
use std::path::Path;

/// File name of a persisted model: `model_name` itself when it carries an
/// extension, `<model_name>.json` otherwise.
pub fn model_file_name(model_name: &str) -> String {
    if Path::new(model_name).extension().is_some() {
        model_name.to_string()
    } else {
        format!("{model_name}.json")
    }
}

/// Persist a fitted model under [`model_file_name`] in `store`.
pub fn save_model(store: &ArtifactStore, model_name: &str, model: &GradientBoostedTrees) -> Result<()> {
    if !model.is_fitted() {
        return Err(ModelError::NotFitted);
    }
    store.save_json(&model_file_name(model_name), model)?;
    Ok(())
}

/// Load a model.
///
/// # Errors
/// [`ModelError::Unavailable`] if the file is missing, cannot be decoded, or
/// decodes to an ensemble that fails to score a zero row of its own width.
pub fn load_model(store: &ArtifactStore, model_name: &str) -> Result<GradientBoostedTrees> {
    let name = model_file_name(model_name);
    let unavailable = |reason: String| ModelError::Unavailable {
        path: store.path(&name),
        reason,
    };
    let model: GradientBoostedTrees = store.load_json(&name).map_err(|e| unavailable(e.to_string()))?;
    if !model.is_fitted() {
        return Err(unavailable("model has not been fitted".into()));
    }
    model.check_integrity().map_err(|e| unavailable(e.to_string()))?;
    Ok(model)
}

/// Persist the training scaler next to the processed tables.
pub fn save_scaler(store: &ArtifactStore, scaler: &FittedScaler) -> Result<()> {
    store.save_json(artifacts::SCALER, scaler)?;
    Ok(())
}

/// Load the training scaler.
///
/// # Errors
/// [`ModelError::Unavailable`] if it is missing or cannot be decoded.
pub fn load_scaler(store: &ArtifactStore) -> Result<FittedScaler> {
    store
        .load_json(artifacts::SCALER)
        .map_err(|e| ModelError::Unavailable {
            path: store.path(artifacts::SCALER),
            reason: e.to_string(),
        })
}
