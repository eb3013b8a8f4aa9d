//! # Triage Core
//!
//! Core business logic for the symptom triage service.
//!
//! This crate contains pure data operations:
//! - Loading the reference tables (diseases, doctors, specialty mapping) from `TRIAGE_DATA_DIR`
//! - Loading the symptom classifier artifact
//! - Top-3 disease prediction with metadata enrichment
//! - Doctor ranking by specialty overlap
//!
//! **No API concerns**: HTTP servers, routing and CLI parsing belong in `api-rest` and `cli`.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod enrich;
pub mod error;
pub mod predictor;
pub mod scorer;
pub mod service;
pub mod store;
pub mod validation;

pub use api_shared::{DiseaseProbability, EnrichedDisease, ScoredDoctor};
pub use classifier::{load_classifier, parse_classifier, Classifier};
pub use config::TriageConfig;
pub use error::{TriageError, TriageResult};
pub use predictor::{predict_top_k, PredictionResult};
pub use service::TriageService;
pub use store::{ConsistencyIssue, ReferenceData};
