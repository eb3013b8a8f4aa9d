//! Joins a bare prediction against the disease metadata table.

use crate::predictor::PredictionResult;
use crate::store::DiseaseTable;
use crate::{TriageError, TriageResult};
use api_shared::EnrichedDisease;

/// Builds the display record for one predicted disease.
///
/// # Errors
///
/// Returns `TriageError::UnknownDisease` if the disease has no row in `diseases`.
pub fn enrich(
    prediction: &PredictionResult,
    diseases: &DiseaseTable,
) -> TriageResult<EnrichedDisease> {
    let record = diseases
        .get(&prediction.disease)
        .ok_or_else(|| TriageError::UnknownDisease(prediction.disease.clone()))?;

    Ok(EnrichedDisease {
        name: record.name.clone(),
        probability: prediction.probability,
        precautions: record.precautions.clone(),
        treatments: record.treatments.clone(),
        attributes: record.attributes.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use triage_types::Probability;

    const SAMPLE: &str = "\
Disease,Description,Precaution_1,Precaution_2,Precaution_3,Treatment_1
Migraine,Recurring headache,dark room,hydrate,,ibuprofen
";

    fn prediction(disease: &str, p: f64) -> PredictionResult {
        PredictionResult {
            disease: disease.into(),
            probability: Probability::new(p).unwrap(),
        }
    }

    #[test]
    fn echoes_name_and_probability() {
        let table = DiseaseTable::from_reader(SAMPLE.as_bytes()).expect("valid table");
        let enriched = enrich(&prediction("Migraine", 0.3), &table).expect("known disease");

        assert_eq!(enriched.name, "Migraine");
        assert_eq!(enriched.probability.value(), 0.3);
    }

    #[test]
    fn precautions_follow_declared_columns() {
        let table = DiseaseTable::from_reader(SAMPLE.as_bytes()).expect("valid table");
        let enriched = enrich(&prediction("Migraine", 0.3), &table).expect("known disease");

        assert_eq!(enriched.precautions.len(), 3);
        assert_eq!(
            enriched.precautions,
            vec![json!("dark room"), json!("hydrate"), Value::Null]
        );
        assert_eq!(enriched.treatments, vec![json!("ibuprofen")]);
        assert_eq!(
            enriched.attributes.get("Description"),
            Some(&json!("Recurring headache"))
        );
        assert!(!enriched.attributes.contains_key("Precaution_1"));
        assert!(!enriched.attributes.contains_key("Treatment_1"));
    }

    #[test]
    fn is_deterministic() {
        let table = DiseaseTable::from_reader(SAMPLE.as_bytes()).expect("valid table");
        let first = enrich(&prediction("Migraine", 0.3), &table).expect("known disease");
        let second = enrich(&prediction("Migraine", 0.3), &table).expect("known disease");
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).expect("serialise"),
            serde_json::to_string(&second).expect("serialise")
        );
    }

    #[test]
    fn unknown_disease_is_an_error() {
        let table = DiseaseTable::from_reader(SAMPLE.as_bytes()).expect("valid table");
        let err = enrich(&prediction("Gout", 0.2), &table).expect_err("Gout is not in the table");
        assert!(matches!(err, TriageError::UnknownDisease(name) if name == "Gout"));
    }
}
