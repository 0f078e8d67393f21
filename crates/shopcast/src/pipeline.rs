//! The three stages of a forecasting run.
//!
//! Every stage takes its paths explicitly and reports through an injected
//! [`Reporter`]; none of them touches global logging state.

use chrono::NaiveDateTime;
use polars::prelude::*;
use shopcast_data::{
    ArtifactStore, DataError, PreparedTables, PreprocessConfig, Preprocessor, Reporter,
    artifacts, load_raw_tables, schema,
};
use shopcast_features::{
    FeatureConfig, FeatureError, FeatureMatrix, build_inference_features, build_training_features,
};
use shopcast_model::{
    GbdtConfig, GradientBoostedTrees, HoldoutConfig, HoldoutSplit, ModelError, Regressor,
    StandardScaler, inverse_targets, load_model, load_scaler, model_file_name, r2_score,
    save_model, save_scaler,
};
use shopcast_output::{
    ExportError, PredictionRecord, PredictionSummary, prediction_file_name, write_predictions,
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sub-directory of the data root holding cleaned tables and the scaler.
pub const PROCESSED_DIR: &str = "processed";

/// Errors from any stage of a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading, cleaning or persisting tables failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Feature construction failed.
    #[error(transparent)]
    Features(#[from] FeatureError),

    /// Scaling, fitting, predicting or model persistence failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Writing the predictions table failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Output directory could not be created.
    #[error("Cannot create {}: {source}", path.display())]
    CreateDir {
        /// Directory
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Result type for pipeline stages.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Store over `<data_root>/processed`.
pub fn processed_store(data_root: &Path) -> ArtifactStore {
    ArtifactStore::new(data_root.join(PROCESSED_DIR))
}

/// Load the raw tables under `data_root`, clean them and persist the
/// cleaned tables under `<data_root>/processed`.
pub fn prepare(
    data_root: &Path,
    config: &PreprocessConfig,
    reporter: &dyn Reporter,
) -> Result<PreparedTables> {
    let raw = load_raw_tables(data_root, reporter)?;
    let store = ArtifactStore::open(data_root.join(PROCESSED_DIR))?;
    Ok(Preprocessor::new(config.clone()).run(raw, &store, reporter)?)
}

/// Parameters of a training run.
#[derive(Debug, Clone, Default)]
pub struct TrainOptions {
    /// Feature windows
    pub features: FeatureConfig,
    /// Regressor parameters
    pub gbdt: GbdtConfig,
    /// Evaluation split
    pub holdout: HoldoutConfig,
}

/// Outcome of [`train`].
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// Training rows before the split
    pub rows: usize,
    /// Rows the regressor was fitted on
    pub train_rows: usize,
    /// Rows held out
    pub test_rows: usize,
    /// R² on the held-out rows, on the log scale
    pub holdout_r2: f64,
    /// Where the model was written
    pub model_path: PathBuf,
}

/// Build training features, fit the scaler and regressor, and save both.
///
/// The scaled matrix, the labels and the scaler land next to the cleaned
/// tables; the model lands in `model_root`. The model is fitted on the
/// training part of the holdout split only.
pub fn train(
    data_root: &Path,
    model_root: &Path,
    model_name: &str,
    options: &TrainOptions,
    reporter: &dyn Reporter,
) -> Result<TrainReport> {
    let store = processed_store(data_root);
    reporter.stage("load cleaned tables");
    let tables = PreparedTables::load(&store)?;

    reporter.stage("build training features");
    let training = build_training_features(&tables.sales, &tables.items, &options.features)?;
    reporter.info(&format!("{} training rows", training.len()));

    reporter.stage("scale features");
    let (scaler, scaled) = StandardScaler::fit_transform(&training.features)?;
    let scaled = FeatureMatrix::from_array(scaled)?;
    let mut feature_frame = scaled.to_frame()?;
    let mut label_frame = DataFrame::new(vec![Column::new(
        schema::ITEM_CNT_LOG.into(),
        training.labels.to_vec(),
    )])?;
    store.save_tables(&mut [
        (artifacts::TRAIN_FEATURES, &mut feature_frame),
        (artifacts::TRAIN_LABELS, &mut label_frame),
    ])?;
    save_scaler(&store, &scaler)?;

    reporter.stage("fit regressor");
    let split = HoldoutSplit::new(training.len(), &options.holdout)?;
    let (x_train, y_train, x_test, y_test) = split.apply(scaled.view(), training.labels.view());
    let mut model = GradientBoostedTrees::new(options.gbdt.clone());
    model.fit(x_train.view(), y_train.view())?;
    let holdout_r2 = r2_score(y_test.view(), model.predict(x_test.view())?.view())?;
    reporter.info(&format!(
        "holdout R² = {holdout_r2:.4} ({} fit rows, {} held out)",
        split.train.len(),
        split.test.len()
    ));

    reporter.stage("save model");
    let model_store = ArtifactStore::open(model_root)?;
    save_model(&model_store, model_name, &model)?;
    let model_path = model_store.path(&model_file_name(model_name));
    reporter.info(&format!("model written to {}", model_path.display()));

    Ok(TrainReport {
        rows: training.len(),
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        holdout_r2,
        model_path,
    })
}

/// Outcome of [`infer`].
#[derive(Debug, Clone)]
pub struct InferReport {
    /// Predictions table
    pub output_path: PathBuf,
    /// Distribution of the written predictions
    pub summary: PredictionSummary,
}

/// Score every pair in the cleaned scoring table.
///
/// The model and scaler are loaded first, so a missing or unreadable
/// artifact fails the run before any feature is computed and before
/// anything is written. The table is named after `now`.
pub fn infer(
    data_root: &Path,
    model_root: &Path,
    model_name: &str,
    output_root: &Path,
    now: NaiveDateTime,
    config: &FeatureConfig,
    reporter: &dyn Reporter,
) -> Result<InferReport> {
    let store = processed_store(data_root);
    reporter.stage("load model");
    let model = load_model(&ArtifactStore::new(model_root), model_name)?;
    let scaler = load_scaler(&store)?;

    reporter.stage("load cleaned tables");
    let tables = PreparedTables::load(&store)?;

    reporter.stage("build inference features");
    let features =
        build_inference_features(&tables.scoring, &tables.sales, &tables.items, config)?;

    reporter.stage("predict");
    let scaled = scaler.transform(&features)?;
    let counts = inverse_targets(model.predict(scaled.view())?.view());
    let records: Vec<PredictionRecord> = row_ids(&tables.scoring)?
        .into_iter()
        .zip(counts.iter())
        .map(|(id, count)| PredictionRecord::new(id, *count))
        .collect();

    reporter.stage("write predictions");
    fs::create_dir_all(output_root).map_err(|source| PipelineError::CreateDir {
        path: output_root.to_path_buf(),
        source,
    })?;
    let output_path = output_root.join(prediction_file_name(now));
    write_predictions(&output_path, &records)?;

    let summary = PredictionSummary::from_values(&counts.to_vec());
    reporter.info(&summary.to_string());
    reporter.info(&format!("predictions written to {}", output_path.display()));

    Ok(InferReport {
        output_path,
        summary,
    })
}

/// The `ID` of every scoring row, or its position when the `ID` is missing.
pub fn row_ids(scoring: &DataFrame) -> Result<Vec<i64>> {
    let ids = scoring.column(schema::ROW_ID)?.cast(&DataType::Int64)?;
    Ok(ids
        .i64()?
        .into_iter()
        .enumerate()
        .map(|(position, id)| id.unwrap_or(position as i64))
        .collect())
}
