use api_shared::DiseaseProbability;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triage_core::config::{data_dir_from_env_value, model_path_from_env_value};
use triage_core::{TriageConfig, TriageError, TriageResult, TriageService};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Symptom triage CLI: disease prediction and doctor ranking")]
struct Cli {
    /// Directory holding the reference tables (falls back to TRIAGE_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Classifier artifact (falls back to TRIAGE_MODEL_PATH)
    #[arg(long, global = true)]
    model: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the three most likely diseases for a symptom vector
    PredictDisease {
        /// Symptom indicators (comma-separated), e.g. "1,0,0,1"
        #[arg(long, conflicts_with = "input")]
        symptoms: Option<String>,
        /// JSON file holding the symptom vector as an array of numbers
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Rank doctors against a list of disease predictions
    PredictDoctor {
        /// JSON file holding `[{"disease": ..., "probability": ...}]`
        input: PathBuf,
    },
    /// Check the reference tables against the classifier's classes
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("triage_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'triage --help' for commands");
        return Ok(());
    };

    let cfg = TriageConfig::new(
        cli.data_dir
            .unwrap_or_else(|| data_dir_from_env_value(std::env::var("TRIAGE_DATA_DIR").ok())),
        cli.model
            .unwrap_or_else(|| model_path_from_env_value(std::env::var("TRIAGE_MODEL_PATH").ok())),
    )?;
    let service = TriageService::load(&cfg)?;

    match command {
        Commands::PredictDisease { symptoms, input } => {
            let symptoms = match (symptoms, input) {
                (Some(list), _) => parse_symptoms(&list)?,
                (None, Some(path)) => read_json(&path)?,
                (None, None) => {
                    return Err("predict-disease needs --symptoms or --input".into());
                }
            };
            print_json(&service.predict_disease(&symptoms)?)?;
        }
        Commands::PredictDoctor { input } => {
            let predictions: Vec<DiseaseProbability> = read_json(&input)?;
            print_json(&service.predict_doctor(&predictions)?)?;
        }
        Commands::Check => {
            let issues = service.consistency_issues();
            if issues.is_empty() {
                println!(
                    "Reference data is consistent with {} classifier classes.",
                    service.classifier().classes().len()
                );
            } else {
                for issue in &issues {
                    println!("{}", issue);
                }
                return Err(format!("{} consistency issues found", issues.len()).into());
            }
        }
    }

    Ok(())
}

/// Parses a comma-separated list of symptom indicators.
fn parse_symptoms(list: &str) -> TriageResult<Vec<f64>> {
    list.split(',')
        .map(str::trim)
        .enumerate()
        .map(|(index, value)| {
            value.parse::<f64>().map_err(|_| {
                TriageError::InvalidInput(format!(
                    "symptom at index {index} is not a number: '{value}'"
                ))
            })
        })
        .collect()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path).map_err(|source| TriageError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_str(&text)
        .map_err(|e| TriageError::InvalidInput(format!("{}: {e}", path.display())))?;
    Ok(value)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
