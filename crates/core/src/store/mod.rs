//! Reference data store.
//!
//! Read-only tables loaded once at startup and shared by every request:
//! - [`DiseaseTable`]: disease metadata keyed by disease name
//! - [`DoctorDirectory`]: doctor profiles with typed list columns
//! - [`SpecialtyMap`]: disease name to canonical specialty
//!
//! Nothing in this module is mutated after loading, so a `ReferenceData` can sit behind an `Arc`
//! and be read concurrently without locking.

mod cells;
pub mod diseases;
pub mod doctors;
pub mod list_literal;
pub mod specialties;

pub use diseases::{DiseaseRecord, DiseaseTable};
pub use doctors::{DoctorDirectory, DoctorRecord};
pub use specialties::SpecialtyMap;

use crate::config::TriageConfig;
use crate::{TriageError, TriageResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A mismatch between the reference tables and the classifier's classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyIssue {
    /// The classifier can predict a disease that has no metadata row.
    ClassMissingFromDiseaseTable(String),
    /// The classifier can predict a disease that has no specialty mapping.
    ClassMissingFromSpecialtyMap(String),
    /// The specialty mapping names a disease the metadata table does not know.
    SpecialtyForUnknownDisease(String),
}

impl std::fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsistencyIssue::ClassMissingFromDiseaseTable(d) => {
                write!(f, "classifier class '{d}' has no row in the diseases table")
            }
            ConsistencyIssue::ClassMissingFromSpecialtyMap(d) => {
                write!(f, "classifier class '{d}' has no specialty mapping")
            }
            ConsistencyIssue::SpecialtyForUnknownDisease(d) => {
                write!(f, "specialty mapping names unknown disease '{d}'")
            }
        }
    }
}

/// All reference tables, loaded together.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    diseases: DiseaseTable,
    doctors: DoctorDirectory,
    specialties: SpecialtyMap,
}

impl ReferenceData {
    pub fn new(diseases: DiseaseTable, doctors: DoctorDirectory, specialties: SpecialtyMap) -> Self {
        Self {
            diseases,
            doctors,
            specialties,
        }
    }

    /// Loads every table from the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns a `TriageError` if any file cannot be opened or parsed. Doctor list cells that are
    /// not valid list literals fail here with `MalformedDoctorRecord`.
    pub fn load(cfg: &TriageConfig) -> TriageResult<Self> {
        let diseases = DiseaseTable::from_reader(open(&cfg.diseases_path())?)?;
        let doctors = DoctorDirectory::from_reader(open(&cfg.doctors_path())?)?;
        let specialties = SpecialtyMap::from_reader(open(&cfg.specialties_path())?)?;

        Ok(Self::new(diseases, doctors, specialties))
    }

    pub fn diseases(&self) -> &DiseaseTable {
        &self.diseases
    }

    pub fn doctors(&self) -> &DoctorDirectory {
        &self.doctors
    }

    pub fn specialties(&self) -> &SpecialtyMap {
        &self.specialties
    }

    /// Cross-checks the tables against the classifier's class labels.
    ///
    /// Issues are returned in a stable order: per-class issues in class order, then unknown
    /// specialty-map keys in key order.
    pub fn consistency_issues<S: AsRef<str>>(&self, classes: &[S]) -> Vec<ConsistencyIssue> {
        let mut issues = Vec::new();

        for class in classes {
            let class = class.as_ref();
            if !self.diseases.contains(class) {
                issues.push(ConsistencyIssue::ClassMissingFromDiseaseTable(
                    class.to_string(),
                ));
            }
            if self.specialties.get(class).is_none() {
                issues.push(ConsistencyIssue::ClassMissingFromSpecialtyMap(
                    class.to_string(),
                ));
            }
        }

        for disease in self.specialties.diseases() {
            if !self.diseases.contains(disease) {
                issues.push(ConsistencyIssue::SpecialtyForUnknownDisease(
                    disease.to_string(),
                ));
            }
        }

        issues
    }
}

fn open(path: &Path) -> TriageResult<BufReader<File>> {
    let file = File::open(path).map_err(|source| TriageError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}
