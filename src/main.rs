use api_rest::{router, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triage_core::config::{data_dir_from_env_value, model_path_from_env_value};
use triage_core::constants::DEFAULT_REST_ADDR;
use triage_core::{TriageConfig, TriageService};

/// Main entry point for the triage application
///
/// Loads the reference tables and the classifier once, then serves the REST API. The loaded data
/// is shared read-only by every request.
///
/// # Environment Variables
/// - `TRIAGE_REST_ADDR`: REST server address (default: "0.0.0.0:5000")
/// - `TRIAGE_DATA_DIR`: Directory holding `diseases.csv`, `sharp_medical_professionals.csv` and
///   `disease_to_specialization.json` (default: "data")
/// - `TRIAGE_MODEL_PATH`: Classifier artifact (default: "models/logistic_regression.json")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, loading or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("triage_run=info".parse()?)
                .add_directive("triage_core=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("TRIAGE_REST_ADDR")
        .unwrap_or_else(|_| DEFAULT_REST_ADDR.into())
        .parse()?;

    let cfg = TriageConfig::new(
        data_dir_from_env_value(std::env::var("TRIAGE_DATA_DIR").ok()),
        model_path_from_env_value(std::env::var("TRIAGE_MODEL_PATH").ok()),
    )?;
    let service = TriageService::load(&cfg)?;

    tracing::info!("++ Starting triage REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, router(AppState::new(service))).await?;

    Ok(())
}
