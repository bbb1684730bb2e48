//! HTTP Boundary
//!
//! hyper-based listeners: the API server exposing health and predict, and
//! the metrics server exposing the prometheus registry. Request-per-call
//! concurrency is the runtime's: one spawned task per connection.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use once_cell::sync::Lazy;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::{Error, Result};
use crate::metrics::{self, outcome};
use crate::pipeline::InputRecord;
use crate::service::Service;

// =============================================================================
// Response Helpers
// =============================================================================

fn json_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// Error body in the `{"detail": ...}` shape the API speaks.
fn detail_response(status: StatusCode, detail: &str) -> Response<Full<Bytes>> {
    json_response(status, serde_json::json!({ "detail": detail }).to_string())
}

/// HTTP status for a failed prediction.
fn error_status(err: &Error) -> StatusCode {
    match err {
        Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Outcome label for a failed prediction.
fn error_outcome(err: &Error) -> &'static str {
    match err {
        Error::Validation(_) => outcome::INVALID,
        Error::ModelUnavailable => outcome::UNAVAILABLE,
        _ => outcome::ERROR,
    }
}

// =============================================================================
// API Server
// =============================================================================

async fn handle_predict(service: Arc<Service>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let started = Instant::now();

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            metrics::record_prediction(outcome::INVALID, 0.0);
            return detail_response(
                StatusCode::BAD_REQUEST,
                &format!("Failed to read request body: {}", e),
            );
        }
    };

    // Schema validation at the boundary: missing or non-numeric fields fail
    // closed before the pipeline runs.
    let record: InputRecord = match serde_json::from_slice(&body) {
        Ok(record) => record,
        Err(e) => {
            let err = Error::Validation(e.to_string());
            metrics::record_prediction(error_outcome(&err), 0.0);
            return detail_response(error_status(&err), &err.to_string());
        }
    };

    match service.predict(&record) {
        Ok(prediction) => {
            metrics::record_prediction(outcome::OK, started.elapsed().as_secs_f64());
            json_response(StatusCode::OK, serde_json::to_string(&prediction).unwrap())
        }
        Err(err) => {
            metrics::record_prediction(error_outcome(&err), 0.0);
            detail_response(error_status(&err), &err.to_string())
        }
    }
}

async fn api_handler(
    req: Request<Incoming>,
    service: Arc<Service>,
) -> std::result::Result<Response<Full<Bytes>>, std::convert::Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match (method, path.as_str()) {
        (Method::GET, "/") => json_response(
            StatusCode::OK,
            serde_json::to_string(&service.health_check()).unwrap(),
        ),
        (Method::POST, "/predict") => handle_predict(service, req).await,
        _ => detail_response(StatusCode::NOT_FOUND, "not found"),
    };

    Ok(response)
}

/// Serve the API on an already-bound listener.
pub async fn serve_api(listener: TcpListener, service: Arc<Service>) -> Result<()> {
    loop {
        let (stream, _) = listener
            .accept()
            .await
            .map_err(|e| Error::Internal(format!("API server accept error: {}", e)))?;

        let io = TokioIo::new(stream);
        let service = service.clone();

        tokio::spawn(async move {
            if let Err(e) = http1::Builder::new()
                .serve_connection(
                    io,
                    service_fn(move |req| {
                        let service = service.clone();
                        async move { api_handler(req, service).await }
                    }),
                )
                .await
            {
                tracing::error!("API server connection error: {}", e);
            }
        });
    }
}

/// Bind and run the API server.
pub async fn run_api_server(addr: &str, service: Arc<Service>) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| Error::Internal(format!("Invalid API server address: {}", e)))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind API server: {}", e)))?;

    info!("API server listening on {}", addr);

    serve_api(listener, service).await
}

// =============================================================================
// Metrics Server
// =============================================================================

async fn metrics_handler(
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, std::convert::Infallible> {
    use prometheus::{Encoder, TextEncoder};

    let response = match req.uri().path() {
        "/metrics" => {
            let encoder = TextEncoder::new();
            let metric_families = prometheus::gather();
            let mut buffer = Vec::new();
            encoder.encode(&metric_families, &mut buffer).unwrap();

            Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", encoder.format_type())
                .body(Full::new(Bytes::from(buffer)))
                .unwrap()
        }
        _ => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("not found")))
            .unwrap(),
    };

    Ok(response)
}

/// Serve metrics exposition on an already-bound listener.
pub async fn serve_metrics(listener: TcpListener) -> Result<()> {
    // Force registration before the first scrape.
    Lazy::force(&metrics::PREDICTIONS_TOTAL);
    Lazy::force(&metrics::PREDICT_DURATION_SECONDS);

    loop {
        let (stream, _) = listener
            .accept()
            .await
            .map_err(|e| Error::Internal(format!("Metrics server accept error: {}", e)))?;

        let io = TokioIo::new(stream);

        tokio::spawn(async move {
            if let Err(e) = http1::Builder::new()
                .serve_connection(io, service_fn(metrics_handler))
                .await
            {
                tracing::error!("Metrics server connection error: {}", e);
            }
        });
    }
}

/// Bind and run the metrics exposition server.
pub async fn run_metrics_server(addr: &str) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| Error::Internal(format!("Invalid metrics server address: {}", e)))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind metrics server: {}", e)))?;

    info!("Metrics server listening on {}", addr);

    serve_metrics(listener).await
}
