//! Service Shell
//!
//! Owns the process-wide model lifecycle: load once at startup, hold in
//! memory, expose health and predict entry points. Prediction calls run
//! through the instrumentation wrapper.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::instrument::{measure, LogSink, ReportSink};
use crate::model::{Classifier, TreeModel};
use crate::pipeline::{self, InputRecord, Prediction};

/// Configuration for the service shell
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Path to the model artifact
    pub model_path: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model/iris_model.json"),
        }
    }
}

/// Fixed status payload returned by the health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    fn current() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Service shell owning the optional model handle.
pub struct Service {
    /// Written only here, during single-threaded startup, before any
    /// listener accepts traffic; all later access is read-only.
    model: Option<Arc<dyn Classifier>>,
    sink: Arc<dyn ReportSink>,
}

impl Service {
    /// Attempt the one-time model load and build the service.
    ///
    /// Load failure is not fatal: it is logged, the handle stays unset, and
    /// the process keeps serving health checks while inference is disabled.
    pub fn initialize(config: &ServiceConfig) -> Self {
        let model: Option<Arc<dyn Classifier>> = match TreeModel::load(&config.model_path) {
            Ok(model) => {
                info!("Model loaded from {}", config.model_path.display());
                Some(Arc::new(model))
            }
            Err(e) => {
                warn!("{}", e);
                warn!("'/predict' is disabled until a model artifact is provided");
                None
            }
        };

        Self {
            model,
            sink: Arc::new(LogSink),
        }
    }

    /// Build a service around an already-loaded classifier.
    pub fn with_model(model: Arc<dyn Classifier>) -> Self {
        Self {
            model: Some(model),
            sink: Arc::new(LogSink),
        }
    }

    /// Build a degraded service with no model: health checks only.
    pub fn without_model() -> Self {
        Self {
            model: None,
            sink: Arc::new(LogSink),
        }
    }

    /// Replace the observability sink the wrapper reports to.
    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Fixed liveness payload; never touches the model.
    pub fn health_check(&self) -> HealthResponse {
        HealthResponse::current()
    }

    /// True when a model is loaded and predictions can be served.
    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    /// Run instrumented inference for one record.
    ///
    /// Fails with [`Error::ModelUnavailable`] before the pipeline (or its
    /// instrumentation) runs when the handle is unset.
    pub fn predict(&self, record: &InputRecord) -> Result<Prediction> {
        let model = self.model.as_ref().ok_or(Error::ModelUnavailable)?;
        measure("predict", self.sink.as_ref(), || {
            pipeline::run(model.as_ref(), record)
        })
    }
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("model_loaded", &self.model.is_some())
            .finish()
    }
}
