use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("requested the top {k} predictions but only {available} classes are available")]
    InsufficientClasses { k: usize, available: usize },
    #[error("unknown disease: {0}")]
    UnknownDisease(String),
    #[error("no specialty mapping for disease: {0}")]
    UnknownSpecialtyMapping(String),
    #[error("malformed doctor record at row {row}, column '{column}': {reason}")]
    MalformedDoctorRecord {
        row: usize,
        column: String,
        reason: String,
    },
    #[error("model does not support probability inference: {0}")]
    ModelCapability(String),

    #[error("failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {table} table: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("failed to parse {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
}

impl TriageError {
    /// Stable, machine-readable identifier for the error variant.
    ///
    /// Transports expose this string so clients can distinguish failures without parsing
    /// messages.
    pub fn kind(&self) -> &'static str {
        match self {
            TriageError::InvalidInput(_) => "invalid_input",
            TriageError::InsufficientClasses { .. } => "insufficient_classes",
            TriageError::UnknownDisease(_) => "unknown_disease",
            TriageError::UnknownSpecialtyMapping(_) => "unknown_specialty_mapping",
            TriageError::MalformedDoctorRecord { .. } => "malformed_doctor_record",
            TriageError::ModelCapability(_) => "model_capability",
            TriageError::FileRead { .. } => "file_read",
            TriageError::Csv { .. } => "csv",
            TriageError::Json { .. } => "json",
        }
    }
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;
