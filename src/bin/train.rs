//! Training Companion
//!
//! Fits the flower classifier, evaluates it on a held-out split, and
//! persists the model artifact plus an experiment record. The whole run is
//! measured by the instrumentation wrapper, like any serving call.

use std::path::{Path, PathBuf};

use clap::Parser;
use linfa::prelude::*;
use linfa_trees::DecisionTree;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use irisserve::error::{Error, Result};
use irisserve::experiment::{ExperimentRecord, TrainingParams};
use irisserve::instrument::{measure, LogSink};
use irisserve::model::TreeModel;

/// iristrain - Train the iris classifier and record the run
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory for the model artifact and experiment record
    #[arg(long, env = "OUT_DIR", default_value = "model")]
    out_dir: PathBuf,

    /// Maximum tree depth (unbounded when omitted)
    #[arg(long, env = "MAX_DEPTH")]
    max_depth: Option<usize>,

    /// Fraction of the dataset used for training
    #[arg(long, env = "SPLIT_RATIO", default_value = "0.8")]
    split_ratio: f32,

    /// Shuffle seed
    #[arg(long, env = "SEED", default_value = "42")]
    seed: u64,
}

fn main() {
    init_logging();

    let args = Args::parse();
    let params = TrainingParams {
        max_depth: args.max_depth,
        split_ratio: args.split_ratio,
        seed: args.seed,
    };
    let model_path = args.out_dir.join("iris_model.json");
    let record_path = args.out_dir.join("experiment.json");

    info!("Starting training pipeline");

    let outcome = measure("train_model", &LogSink, || train(&params, &model_path));

    let accuracy = match outcome {
        Ok(accuracy) => accuracy,
        Err(e) => {
            error!("Training pipeline failed: {}", e);
            std::process::exit(1);
        }
    };

    let record = ExperimentRecord::new(params, accuracy, model_path);
    if let Err(e) = record.save(&record_path) {
        error!("Failed to write experiment record: {}", e);
        std::process::exit(1);
    }

    info!(
        "Run {} finished, accuracy {:.4}, record at {}",
        record.run_id,
        accuracy,
        record_path.display()
    );
}

/// Fit, evaluate, and persist the classifier; returns held-out accuracy.
fn train(params: &TrainingParams, model_path: &Path) -> Result<f32> {
    info!("Loading dataset");
    let mut rng = SmallRng::seed_from_u64(params.seed);
    let (train, valid) = linfa_datasets::iris()
        .shuffle(&mut rng)
        .split_with_ratio(params.split_ratio);

    info!(
        "Fitting decision tree on {} samples (max depth: {:?})",
        train.nsamples(),
        params.max_depth
    );
    let tree = DecisionTree::params()
        .max_depth(params.max_depth)
        .fit(&train)
        .map_err(|e| Error::Training(e.to_string()))?;

    let predictions = tree.predict(&valid);
    let accuracy = predictions
        .confusion_matrix(&valid)
        .map_err(|e| Error::Training(e.to_string()))?
        .accuracy();
    info!(
        "Held-out accuracy on {} samples: {:.4}",
        valid.nsamples(),
        accuracy
    );

    TreeModel::new(tree).save(model_path)?;
    info!("Model written to {}", model_path.display());

    Ok(accuracy)
}

fn init_logging() {
    let filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}
