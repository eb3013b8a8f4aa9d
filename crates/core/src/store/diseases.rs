//! Disease metadata table.
//!
//! The source table is flat: one row per disease, keyed by the `Disease` column, with any number
//! of `Precaution*` and `Treatment*` columns. Those columns are grouped into ordered lists once,
//! when the table is loaded, so request handling never inspects column names.

use super::cells::parse_cell;
use crate::constants::{DISEASE_KEY_COLUMN, PRECAUTION_MARKER, TREATMENT_MARKER};
use crate::{TriageError, TriageResult};
use api_shared::fields;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;

/// Column names that would be shadowed by fields added during enrichment.
const RESERVED_COLUMNS: &[&str] = &[
    fields::NAME,
    fields::PROBABILITY,
    fields::PRECAUTIONS,
    fields::TREATMENTS,
];

/// Metadata for a single disease with its multi-valued columns already grouped.
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseRecord {
    pub name: String,
    /// Precaution columns in declared order; blank cells are kept as `null`.
    pub precautions: Vec<Value>,
    /// Treatment columns in declared order; blank cells are kept as `null`.
    pub treatments: Vec<Value>,
    pub attributes: BTreeMap<String, Value>,
}

impl DiseaseRecord {
    /// Builds a record from `(column, value)` pairs in declared column order.
    ///
    /// Matching is a case-sensitive substring test. A column whose name contains both markers is
    /// treated as a precaution.
    pub fn from_columns(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        let mut record = DiseaseRecord {
            name: name.into(),
            precautions: Vec::new(),
            treatments: Vec::new(),
            attributes: BTreeMap::new(),
        };

        for (column, value) in columns {
            if column.contains(PRECAUTION_MARKER) {
                record.precautions.push(value);
            } else if column.contains(TREATMENT_MARKER) {
                record.treatments.push(value);
            } else if RESERVED_COLUMNS.contains(&column.as_str()) {
                tracing::warn!(
                    "dropping disease column '{}' for '{}': name is reserved",
                    column,
                    record.name
                );
            } else {
                record.attributes.insert(column, value);
            }
        }

        record
    }
}

/// Disease metadata keyed by disease name.
#[derive(Debug, Clone, Default)]
pub struct DiseaseTable {
    records: BTreeMap<String, DiseaseRecord>,
}

impl DiseaseTable {
    /// Creates a table from already-built records.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidInput` if two records share a name.
    pub fn from_records(records: impl IntoIterator<Item = DiseaseRecord>) -> TriageResult<Self> {
        let mut table = BTreeMap::new();
        for record in records {
            if table.contains_key(&record.name) {
                return Err(TriageError::InvalidInput(format!(
                    "duplicate disease '{}' in diseases table",
                    record.name
                )));
            }
            table.insert(record.name.clone(), record);
        }
        Ok(Self { records: table })
    }

    /// Reads the table from CSV.
    ///
    /// # Errors
    ///
    /// Returns a `TriageError` if:
    /// - the CSV is malformed,
    /// - there is no `Disease` column,
    /// - a row has a blank disease name,
    /// - a disease name appears twice.
    pub fn from_reader<R: Read>(reader: R) -> TriageResult<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader
            .headers()
            .map_err(|source| TriageError::Csv {
                table: "diseases",
                source,
            })?
            .clone();

        let key_index = headers
            .iter()
            .position(|h| h == DISEASE_KEY_COLUMN)
            .ok_or_else(|| {
                TriageError::InvalidInput(format!(
                    "diseases table has no '{DISEASE_KEY_COLUMN}' column"
                ))
            })?;

        let mut records = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let row_data = result.map_err(|source| TriageError::Csv {
                table: "diseases",
                source,
            })?;

            let name = row_data.get(key_index).unwrap_or_default();
            if name.trim().is_empty() {
                return Err(TriageError::InvalidInput(format!(
                    "diseases table row {} has a blank disease name",
                    row + 1
                )));
            }

            let columns = headers
                .iter()
                .zip(row_data.iter())
                .enumerate()
                .filter(|(index, _)| *index != key_index)
                .map(|(_, (header, cell))| (header.to_string(), parse_cell(cell)));

            records.push(DiseaseRecord::from_columns(name, columns));
        }

        let table = Self::from_records(records)?;
        tracing::info!("loaded {} diseases", table.len());
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&DiseaseRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = "\
Disease,Fever,Description,Precaution_1,Precaution_2,Precaution_3,Treatment_1,Treatment_2
Flu,1,Viral infection,rest,drink fluids,,oseltamivir,
Migraine,0,Recurring headache,dark room,,,ibuprofen,triptans
";

    #[test]
    fn groups_precautions_and_treatments_in_column_order() {
        let table = DiseaseTable::from_reader(SAMPLE.as_bytes()).expect("valid table");
        assert_eq!(table.len(), 2);

        let flu = table.get("Flu").expect("Flu should exist");
        assert_eq!(
            flu.precautions,
            vec![json!("rest"), json!("drink fluids"), Value::Null]
        );
        assert_eq!(flu.treatments, vec![json!("oseltamivir"), Value::Null]);
        assert_eq!(flu.attributes.get("Fever"), Some(&json!(1)));
        assert_eq!(
            flu.attributes.get("Description"),
            Some(&json!("Viral infection"))
        );
        assert!(!flu.attributes.contains_key("Disease"));
    }

    #[test]
    fn grouping_is_substring_and_case_sensitive() {
        let record = DiseaseRecord::from_columns(
            "Cold",
            vec![
                ("Home Precautions".to_string(), json!("a")),
                ("precaution_lower".to_string(), json!("b")),
                ("Precaution or Treatment".to_string(), json!("c")),
                ("Alt Treatment".to_string(), json!("d")),
            ],
        );
        assert_eq!(record.precautions, vec![json!("a"), json!("c")]);
        assert_eq!(record.treatments, vec![json!("d")]);
        assert_eq!(record.attributes.get("precaution_lower"), Some(&json!("b")));
    }

    #[test]
    fn reserved_columns_are_dropped() {
        let record = DiseaseRecord::from_columns(
            "Cold",
            vec![
                ("name".to_string(), json!("shadow")),
                ("Severity".to_string(), json!(2)),
            ],
        );
        assert!(!record.attributes.contains_key("name"));
        assert_eq!(record.attributes.get("Severity"), Some(&json!(2)));
    }

    #[test]
    fn rejects_missing_key_column() {
        let err = DiseaseTable::from_reader("Name,Fever\nFlu,1\n".as_bytes())
            .expect_err("should reject table without Disease column");
        assert!(matches!(err, TriageError::InvalidInput(msg) if msg.contains("'Disease'")));
    }

    #[test]
    fn rejects_duplicate_and_blank_names() {
        let err = DiseaseTable::from_reader("Disease,Fever\nFlu,1\nFlu,0\n".as_bytes())
            .expect_err("should reject duplicates");
        assert!(matches!(err, TriageError::InvalidInput(msg) if msg.contains("duplicate disease 'Flu'")));

        let err = DiseaseTable::from_reader("Disease,Fever\n,1\n".as_bytes())
            .expect_err("should reject blank name");
        assert!(matches!(err, TriageError::InvalidInput(msg) if msg.contains("row 1")));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = DiseaseTable::from_reader("Disease,Fever\nFlu,1,extra\n".as_bytes())
            .expect_err("should reject ragged row");
        assert!(matches!(err, TriageError::Csv { table: "diseases", .. }));
    }
}
