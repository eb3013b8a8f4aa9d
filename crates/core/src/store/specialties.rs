use crate::{TriageError, TriageResult};
use std::collections::BTreeMap;
use std::io::Read;

/// Mapping from disease name to its canonical (lowercase) specialty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecialtyMap {
    specialties: BTreeMap<String, String>,
}

impl SpecialtyMap {
    /// Reads the mapping from a JSON object of `{"<disease>": "<specialty>"}`.
    ///
    /// Specialty values are trimmed and lowercased.
    pub fn from_reader<R: Read>(reader: R) -> TriageResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_reader(reader);
        let raw: BTreeMap<String, String> = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|source| TriageError::Json {
                what: "specialty mapping",
                source,
            })?;

        let map: Self = raw.into_iter().collect();
        tracing::info!("loaded {} specialty mappings", map.len());
        Ok(map)
    }

    pub fn get(&self, disease: &str) -> Option<&str> {
        self.specialties.get(disease).map(String::as_str)
    }

    pub fn diseases(&self) -> impl Iterator<Item = &str> {
        self.specialties.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.specialties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specialties.is_empty()
    }
}

impl<K: Into<String>, V: AsRef<str>> FromIterator<(K, V)> for SpecialtyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            specialties: iter
                .into_iter()
                .map(|(disease, specialty)| {
                    (disease.into(), specialty.as_ref().trim().to_lowercase())
                })
                .collect(),
        }
    }
}
