//! Model-Serving Daemon
//!
//! Loads the classifier once at startup, then serves health and predict
//! over HTTP with a separate metrics exposition listener.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use irisserve::error::Result;
use irisserve::server::{run_api_server, run_metrics_server};
use irisserve::service::{Service, ServiceConfig};

// =============================================================================
// CLI Arguments
// =============================================================================

/// irisserve - Minimal model-serving daemon for the iris classifier
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the model artifact
    #[arg(long, env = "MODEL_PATH", default_value = "model/iris_model.json")]
    model_path: PathBuf,

    /// API server bind address
    #[arg(long, env = "API_ADDR", default_value = "0.0.0.0:8000")]
    api_addr: String,

    /// Metrics server bind address
    #[arg(long, env = "METRICS_ADDR", default_value = "0.0.0.0:8081")]
    metrics_addr: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    info!("Starting irisserve");
    info!("  Model path: {}", args.model_path.display());
    info!("  API address: {}", args.api_addr);
    info!("  Metrics address: {}", args.metrics_addr);

    // One-time model load; a missing artifact degrades to health-only mode.
    let config = ServiceConfig {
        model_path: args.model_path,
    };
    let service = Arc::new(Service::initialize(&config));

    if service.is_ready() {
        info!("Inference enabled");
    } else {
        info!("Inference disabled, serving health checks only");
    }

    // Start metrics server
    let metrics_addr = args.metrics_addr.clone();
    tokio::spawn(async move {
        if let Err(e) = run_metrics_server(&metrics_addr).await {
            error!("Metrics server error: {}", e);
        }
    });

    // Run the API server
    run_api_server(&args.api_addr, service).await?;

    info!("Shutdown complete");
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse().unwrap());

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}
