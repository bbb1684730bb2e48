//! Experiment Tracking
//!
//! Persists one training run's parameters, evaluation score, and artifact
//! location as a JSON record next to the model artifact.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Hyperparameters of one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingParams {
    /// Maximum tree depth; `None` lets the tree grow until pure
    pub max_depth: Option<usize>,
    /// Fraction of the dataset used for training, remainder held out
    pub split_ratio: f32,
    /// Shuffle seed, fixed for reproducible splits
    pub seed: u64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            split_ratio: 0.8,
            seed: 42,
        }
    }
}

/// Metadata for one completed training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    /// Unique run identifier
    pub run_id: String,
    /// When the run finished
    pub recorded_at: DateTime<Utc>,
    /// Hyperparameters used
    pub params: TrainingParams,
    /// Accuracy on the held-out split
    pub accuracy: f32,
    /// Where the model artifact was written
    pub model_path: PathBuf,
}

impl ExperimentRecord {
    /// Create a record for a run that just finished, stamped with a fresh
    /// run id and the current time.
    pub fn new(params: TrainingParams, accuracy: f32, model_path: PathBuf) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            recorded_at: Utc::now(),
            params,
            accuracy,
            model_path,
        }
    }

    /// Write the record as JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;

        Ok(())
    }

    /// Read a record back from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
