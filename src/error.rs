//! Error types for the model-serving daemon

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving or training the classifier
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Malformed or missing input fields
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Model handle unset when inference was requested
    #[error("Model is not loaded, service cannot serve predictions")]
    ModelUnavailable,

    /// Underlying prediction call failed
    #[error("Prediction failed: {0}")]
    Inference(String),

    /// Model artifact missing or corrupt at startup
    #[error("Failed to load model from {path}: {reason}")]
    StartupLoad { path: String, reason: String },

    /// Training pipeline failure
    #[error("Training failed: {0}")]
    Training(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for the degraded-but-expected case where the service keeps
    /// running without a model.
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, Error::ModelUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ModelUnavailable;
        assert_eq!(
            err.to_string(),
            "Model is not loaded, service cannot serve predictions"
        );

        let err = Error::StartupLoad {
            path: "/models/iris.json".to_string(),
            reason: "file not found".to_string(),
        };
        assert!(err.to_string().contains("/models/iris.json"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_is_model_unavailable() {
        assert!(Error::ModelUnavailable.is_model_unavailable());
        assert!(!Error::Inference("bad shape".to_string()).is_model_unavailable());
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
