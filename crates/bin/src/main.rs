//! shopcast CLI binary.
//!
//! Provides the `prepare`, `train` and `infer` commands of a forecasting run.

mod integration;

use clap::{Parser, Subcommand};
use integration::commands;
use shopcast::model::GbdtConfig;
use shopcast::pipeline::TrainOptions;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopcast")]
#[command(about = "Monthly unit-sales forecasting per shop and item", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Clean the raw tables under a data root
    Prepare {
        /// Directory holding sales_train.csv, items.csv and test.csv
        #[arg(long)]
        data_root: PathBuf,
    },

    /// Build features, fit the scaler and regressor, and save the model
    Train {
        /// Prepared data root
        #[arg(long)]
        data_root: PathBuf,

        /// Directory the model is written to
        #[arg(long)]
        model_root: PathBuf,

        /// Model file name
        #[arg(long)]
        model_name: String,

        /// Boosting rounds
        #[arg(long)]
        n_estimators: Option<usize>,

        /// Shrinkage per round
        #[arg(long)]
        learning_rate: Option<f64>,
    },

    /// Score the prepared scoring pairs with a saved model
    Infer {
        /// Prepared data root
        #[arg(long)]
        data_root: PathBuf,

        /// Directory holding the model
        #[arg(long)]
        model_root: PathBuf,

        /// Model file name
        #[arg(long)]
        model_name: String,

        /// Directory the predictions table is written to
        #[arg(long)]
        output_root: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        tracing::error!("{e}");
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            tracing::debug!("caused by: {cause}");
            source = std::error::Error::source(cause);
        }
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> commands::CommandResult {
    match command {
        Commands::Prepare { data_root } => commands::prepare(&data_root),
        Commands::Train {
            data_root,
            model_root,
            model_name,
            n_estimators,
            learning_rate,
        } => {
            let options = TrainOptions {
                gbdt: gbdt_config(n_estimators, learning_rate),
                ..TrainOptions::default()
            };
            commands::train(&data_root, &model_root, &model_name, &options)
        }
        Commands::Infer {
            data_root,
            model_root,
            model_name,
            output_root,
        } => commands::infer(&data_root, &model_root, &model_name, &output_root),
    }
}

fn gbdt_config(n_estimators: Option<usize>, learning_rate: Option<f64>) -> GbdtConfig {
    let defaults = GbdtConfig::default();
    GbdtConfig {
        n_estimators: n_estimators.unwrap_or(defaults.n_estimators),
        learning_rate: learning_rate.unwrap_or(defaults.learning_rate),
        ..defaults
    }
}
