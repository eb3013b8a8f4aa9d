//! Doctor directory.
//!
//! `Location`, `Specialty` and `Phone Number` are stored as list literals in the source CSV and
//! are parsed into typed lists here, once, so malformed rows are reported at load time.

use super::cells::{is_blank, parse_cell};
use super::list_literal::parse_string_list;
use crate::constants::{
    LOCATION_COLUMN, PANDAS_INDEX_COLUMN, PHONE_NUMBER_COLUMN, SPECIALTY_COLUMN,
};
use crate::{TriageError, TriageResult};
use api_shared::fields;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DoctorRecord {
    pub location: Vec<String>,
    /// Matching surface for scoring; compared case-insensitively.
    pub specialty: Vec<String>,
    pub phone_numbers: Vec<String>,
    /// Every other directory column. Blank cells are stored as `null`.
    pub profile: BTreeMap<String, Value>,
}

/// The full doctor directory in source order.
#[derive(Debug, Clone, Default)]
pub struct DoctorDirectory {
    doctors: Vec<DoctorRecord>,
    profile_columns: BTreeSet<String>,
}

impl DoctorDirectory {
    /// Creates a directory from records.
    ///
    /// The set of profile columns is the union over all records, so a record that lacks a column
    /// another record has is still reported with that column when scored.
    pub fn new(doctors: Vec<DoctorRecord>) -> Self {
        let profile_columns = doctors
            .iter()
            .flat_map(|d| d.profile.keys().cloned())
            .collect();
        Self {
            doctors,
            profile_columns,
        }
    }

    /// Reads the directory from CSV.
    ///
    /// Columns with an empty header or named `Unnamed: 0` are dataframe index columns and are
    /// dropped. A `Score` column is dropped too, since scoring adds its own `Score` field.
    ///
    /// Blank or NA list cells are read as empty lists rather than rejected, so a doctor with no
    /// listed phone number still loads.
    ///
    /// # Errors
    ///
    /// Returns a `TriageError` if:
    /// - the CSV is malformed,
    /// - one of the list columns is missing,
    /// - a list cell is not a valid list literal (`MalformedDoctorRecord`).
    pub fn from_reader<R: Read>(reader: R) -> TriageResult<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader
            .headers()
            .map_err(|source| TriageError::Csv {
                table: "doctors",
                source,
            })?
            .clone();

        for required in [LOCATION_COLUMN, SPECIALTY_COLUMN, PHONE_NUMBER_COLUMN] {
            if !headers.iter().any(|h| h == required) {
                return Err(TriageError::InvalidInput(format!(
                    "doctor directory has no '{required}' column"
                )));
            }
        }

        let mut doctors = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let row = index + 1;
            let row_data = result.map_err(|source| TriageError::Csv {
                table: "doctors",
                source,
            })?;

            let mut doctor = DoctorRecord::default();
            for (header, cell) in headers.iter().zip(row_data.iter()) {
                match header {
                    "" | PANDAS_INDEX_COLUMN => {}
                    fields::SCORE => {
                        if row == 1 {
                            tracing::warn!(
                                "dropping doctor column '{}': name is reserved for the computed score",
                                header
                            );
                        }
                    }
                    LOCATION_COLUMN => doctor.location = parse_list_cell(row, header, cell)?,
                    SPECIALTY_COLUMN => doctor.specialty = parse_list_cell(row, header, cell)?,
                    PHONE_NUMBER_COLUMN => {
                        doctor.phone_numbers = parse_list_cell(row, header, cell)?
                    }
                    _ => {
                        doctor.profile.insert(header.to_string(), parse_cell(cell));
                    }
                }
            }
            doctors.push(doctor);
        }

        let directory = Self::new(doctors);
        tracing::info!("loaded {} doctors", directory.len());
        Ok(directory)
    }

    pub fn doctors(&self) -> &[DoctorRecord] {
        &self.doctors
    }

    pub fn profile_columns(&self) -> &BTreeSet<String> {
        &self.profile_columns
    }

    pub fn len(&self) -> usize {
        self.doctors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doctors.is_empty()
    }
}

fn parse_list_cell(row: usize, column: &str, cell: &str) -> TriageResult<Vec<String>> {
    if is_blank(cell) {
        return Ok(Vec::new());
    }

    parse_string_list(cell).map_err(|e| TriageError::MalformedDoctorRecord {
        row,
        column: column.to_string(),
        reason: e.to_string(),
    })
}
