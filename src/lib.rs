//! irisserve - Minimal Model-Serving Daemon
//!
//! Loads a pre-trained three-class flower classifier from disk once at
//! startup, exposes a health endpoint plus a single inference endpoint, and
//! measures wall-clock time and resident memory delta around every wrapped
//! call. A companion binary (`iristrain`) fits the classifier and persists
//! it together with experiment metadata.
//!
//! # Architecture
//!
//! ```text
//! request ──▶ HTTP boundary ──▶ Service Shell ──▶ Instrumentation Wrapper
//!                                                        │
//!                                         ┌──────────────┴─────────────┐
//!                                         ▼                            ▼
//!                                 Inference Pipeline            ResourceProbe
//!                                 (validate → featurize          (before/after
//!                                  → infer → map label)           samples)
//! ```
//!
//! The per-call resource report is a side channel: emitted to an
//! observability sink, never part of the response.
//!
//! # Modules
//!
//! - [`error`] - Error types
//! - [`experiment`] - Training-run metadata records
//! - [`instrument`] - Wrap-and-report measurement around arbitrary calls
//! - [`metrics`] - Aggregated prometheus metrics
//! - [`model`] - Classifier port and the decision-tree artifact adapter
//! - [`pipeline`] - Validate/featurize/infer/map-label flow
//! - [`probe`] - Process resource sampling
//! - [`server`] - hyper HTTP listeners (API + metrics exposition)
//! - [`service`] - Model lifecycle and the predict/health entry points

pub mod error;
pub mod experiment;
pub mod instrument;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod probe;
pub mod server;
pub mod service;

// Re-export commonly used types
pub use error::{Error, Result};
pub use experiment::{ExperimentRecord, TrainingParams};
pub use instrument::{measure, LogSink, ReportSink};
pub use model::{Classifier, TreeModel, FEATURE_COUNT};
pub use pipeline::{class_label, InputRecord, Prediction};
pub use probe::{ResourceReport, ResourceSample};
pub use service::{Service, ServiceConfig};
