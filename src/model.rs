//! Model Layer
//!
//! The `Classifier` port the inference pipeline depends on, plus the
//! decision-tree adapter that owns the on-disk artifact format.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use linfa::traits::Predict;
use linfa_trees::DecisionTree;
use ndarray::Array2;

use crate::error::{Error, Result};

/// Number of input features per row
pub const FEATURE_COUNT: usize = 4;

/// Prediction capability: a batch of feature rows in, one class index per
/// row out.
///
/// The pipeline and service depend on this port only; the artifact format
/// behind it is opaque to them.
pub trait Classifier: Send + Sync {
    /// Predict class indices for a batch of feature rows.
    fn predict(&self, rows: &Array2<f64>) -> Result<Vec<usize>>;
}

/// Decision-tree classifier backed by a JSON artifact on disk.
pub struct TreeModel {
    tree: DecisionTree<f64, usize>,
}

impl TreeModel {
    /// Wrap a fitted tree.
    pub fn new(tree: DecisionTree<f64, usize>) -> Self {
        Self { tree }
    }

    /// Load the artifact from disk.
    ///
    /// A missing or corrupt file yields [`Error::StartupLoad`]; the caller
    /// decides whether that is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::StartupLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let tree = serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::StartupLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { tree })
    }

    /// Persist the artifact, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &self.tree)?;
        writer.flush()?;

        Ok(())
    }
}

impl std::fmt::Debug for TreeModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeModel").finish_non_exhaustive()
    }
}

impl Classifier for TreeModel {
    fn predict(&self, rows: &Array2<f64>) -> Result<Vec<usize>> {
        if rows.ncols() != FEATURE_COUNT {
            return Err(Error::Inference(format!(
                "expected {} features per row, got {}",
                FEATURE_COUNT,
                rows.ncols()
            )));
        }

        Ok(self.tree.predict(rows).to_vec())
    }
}
