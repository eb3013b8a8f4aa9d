//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own, without the workspace's `triage-run` wrapper.
//!
//! ## Intended use
//! Useful during development when iterating on handlers or the OpenAPI document.

use api_rest::{router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triage_core::config::{data_dir_from_env_value, model_path_from_env_value};
use triage_core::constants::DEFAULT_REST_ADDR;
use triage_core::{TriageConfig, TriageService};

/// Main entry point for the triage REST API server
///
/// # Environment Variables
/// - `TRIAGE_REST_ADDR`: Server address (default: "0.0.0.0:5000")
/// - `TRIAGE_DATA_DIR`: Reference table directory (default: "data")
/// - `TRIAGE_MODEL_PATH`: Classifier artifact (default: "models/logistic_regression.json")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the reference data or classifier cannot be loaded,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("triage_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("TRIAGE_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = TriageConfig::new(
        data_dir_from_env_value(std::env::var("TRIAGE_DATA_DIR").ok()),
        model_path_from_env_value(std::env::var("TRIAGE_MODEL_PATH").ok()),
    )?;
    let service = TriageService::load(&cfg)?;

    tracing::info!("-- Starting triage REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(AppState::new(service))).await?;

    Ok(())
}
