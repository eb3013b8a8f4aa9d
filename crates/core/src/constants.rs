//! Constants used throughout the triage core crate.
//!
//! This module contains file names, column names and defaults so that loaders, the REST server
//! and the CLI agree on them.

/// Number of diseases returned by disease prediction.
pub const TOP_K: usize = 3;

/// Default directory holding the reference tables when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default classifier artifact location when no explicit path is configured.
pub const DEFAULT_MODEL_PATH: &str = "models/logistic_regression.json";

/// Default listen address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:5000";

/// Filename of the disease metadata table.
pub const DISEASES_FILENAME: &str = "diseases.csv";

/// Filename of the doctor directory table.
pub const DOCTORS_FILENAME: &str = "sharp_medical_professionals.csv";

/// Filename of the disease to specialty mapping.
pub const SPECIALTIES_FILENAME: &str = "disease_to_specialization.json";

/// Key column of the disease metadata table.
pub const DISEASE_KEY_COLUMN: &str = "Disease";

/// Disease columns whose name contains this marker are grouped into `precautions`.
pub const PRECAUTION_MARKER: &str = "Precaution";

/// Disease columns whose name contains this marker are grouped into `treatments`.
pub const TREATMENT_MARKER: &str = "Treatment";

/// Index column written by pandas when a frame is saved with its index.
pub const PANDAS_INDEX_COLUMN: &str = "Unnamed: 0";

/// Doctor directory columns holding list literals.
pub const LOCATION_COLUMN: &str = "Location";
pub const SPECIALTY_COLUMN: &str = "Specialty";
pub const PHONE_NUMBER_COLUMN: &str = "Phone Number";

/// Cell values treated as missing, matching the default pandas NA tokens.
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];
