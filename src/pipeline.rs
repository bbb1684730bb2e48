//! Inference Pipeline
//!
//! Linear validate → featurize → infer → map-label flow over one input
//! record. Stateless: safe to invoke concurrently once the model handle is
//! loaded and treated as immutable.

use ndarray::{array, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Classifier;

/// One inference request: the four flower measurements.
///
/// All fields are required floats; deserialization fails closed on missing
/// or non-numeric fields. No range validation beyond type correctness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
}

impl InputRecord {
    /// Arrange the four validated scalars into the single-row shape the
    /// model expects (one row, four columns).
    pub fn featurize(&self) -> Array2<f64> {
        array![[
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width
        ]]
    }
}

/// Inference result: predicted class index plus its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class index
    pub prediction: usize,
    /// Label looked up from the fixed class mapping
    pub class_name: String,
}

/// Map a class index to its species label.
///
/// The mapping is closed; any index outside it yields the `"unknown"`
/// sentinel rather than an error.
pub fn class_label(index: usize) -> &'static str {
    match index {
        0 => "setosa",
        1 => "versicolor",
        2 => "virginica",
        _ => "unknown",
    }
}

/// Run the pipeline for one record against a loaded classifier.
///
/// Precondition: the caller has already checked that a model is available.
pub fn run(model: &dyn Classifier, record: &InputRecord) -> Result<Prediction> {
    let features = record.featurize();
    let indices = model.predict(&features)?;
    let index = indices
        .first()
        .copied()
        .ok_or_else(|| Error::Inference("model returned no prediction".to_string()))?;

    Ok(Prediction {
        prediction: index,
        class_name: class_label(index).to_string(),
    })
}
