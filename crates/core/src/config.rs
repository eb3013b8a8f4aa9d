//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Environment variables are never read during request handling.

use crate::constants::{
    DEFAULT_DATA_DIR, DEFAULT_MODEL_PATH, DISEASES_FILENAME, DOCTORS_FILENAME,
    SPECIALTIES_FILENAME,
};
use crate::{TriageError, TriageResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct TriageConfig {
    data_dir: PathBuf,
    model_path: PathBuf,
}

impl TriageConfig {
    /// Create a new `TriageConfig`.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidInput` if:
    /// - `data_dir` is not an existing directory,
    /// - `model_path` is not an existing file.
    pub fn new(data_dir: PathBuf, model_path: PathBuf) -> TriageResult<Self> {
        if !data_dir.is_dir() {
            return Err(TriageError::InvalidInput(format!(
                "data directory does not exist: {}",
                data_dir.display()
            )));
        }

        if !model_path.is_file() {
            return Err(TriageError::InvalidInput(format!(
                "model artifact does not exist: {}",
                model_path.display()
            )));
        }

        Ok(Self {
            data_dir,
            model_path,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn diseases_path(&self) -> PathBuf {
        self.data_dir.join(DISEASES_FILENAME)
    }

    pub fn doctors_path(&self) -> PathBuf {
        self.data_dir.join(DOCTORS_FILENAME)
    }

    pub fn specialties_path(&self) -> PathBuf {
        self.data_dir.join(SPECIALTIES_FILENAME)
    }
}

/// Resolve the data directory from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_DATA_DIR`].
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    path_or_default(value, DEFAULT_DATA_DIR)
}

/// Resolve the classifier artifact path from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_MODEL_PATH`].
pub fn model_path_from_env_value(value: Option<String>) -> PathBuf {
    path_or_default(value, DEFAULT_MODEL_PATH)
}

fn path_or_default(value: Option<String>, default: &str) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
