//! One function per subcommand.

use super::progress::SpinnerReporter;
use chrono::Local;
use shopcast::data::PreprocessConfig;
use shopcast::features::FeatureConfig;
use shopcast::pipeline::{self, PipelineError, TrainOptions};
use std::path::Path;
use thiserror::Error;

/// A subcommand failed in one of its pipeline stages.
#[derive(Debug, Error)]
#[error("{command} failed: {source}")]
pub(crate) struct CommandError {
    command: &'static str,
    #[source]
    source: PipelineError,
}

pub(crate) type CommandResult = Result<(), CommandError>;

/// Run `stage` under a spinner, tagging its error with the command name.
fn with_spinner<T>(
    command: &'static str,
    stage: impl FnOnce(&SpinnerReporter) -> Result<T, PipelineError>,
    done: impl FnOnce(&T) -> String,
) -> Result<T, CommandError> {
    let reporter = SpinnerReporter::new(command);
    match stage(&reporter) {
        Ok(value) => {
            reporter.finish(done(&value));
            Ok(value)
        }
        Err(source) => {
            reporter.fail();
            Err(CommandError { command, source })
        }
    }
}

pub(crate) fn prepare(data_root: &Path) -> CommandResult {
    with_spinner(
        "prepare",
        |reporter| pipeline::prepare(data_root, &PreprocessConfig::default(), reporter),
        |tables| format!("{} cleaned sales rows", tables.sales.height()),
    )?;
    Ok(())
}

pub(crate) fn train(
    data_root: &Path,
    model_root: &Path,
    model_name: &str,
    options: &TrainOptions,
) -> CommandResult {
    let report = with_spinner(
        "train",
        |reporter| pipeline::train(data_root, model_root, model_name, options, reporter),
        |report| format!("holdout R² {:.4}", report.holdout_r2),
    )?;
    tracing::info!(
        rows = report.rows,
        fit_rows = report.train_rows,
        held_out = report.test_rows,
        r2 = report.holdout_r2,
        model = %report.model_path.display(),
        "training finished"
    );
    Ok(())
}

pub(crate) fn infer(
    data_root: &Path,
    model_root: &Path,
    model_name: &str,
    output_root: &Path,
) -> CommandResult {
    let now = Local::now().naive_local();
    let report = with_spinner(
        "infer",
        |reporter| {
            pipeline::infer(
                data_root,
                model_root,
                model_name,
                output_root,
                now,
                &FeatureConfig::default(),
                reporter,
            )
        },
        |report| format!("{} predictions", report.summary.count),
    )?;
    tracing::info!(
        count = report.summary.count,
        mean = report.summary.mean,
        std = report.summary.std,
        min = report.summary.min,
        max = report.summary.max,
        output = %report.output_path.display(),
        "inference finished"
    );
    Ok(())
}
