//! Doctor relevance scoring.
//!
//! A doctor's score is the sum of the probabilities of every predicted disease whose mapped
//! specialty equals one of the doctor's specialties (case-insensitive). Each specialty occurrence
//! is counted, so a doctor listing the same specialty twice collects its probability twice.

use crate::store::{DoctorDirectory, DoctorRecord, SpecialtyMap};
use crate::{TriageError, TriageResult};
use api_shared::{DiseaseProbability, ScoredDoctor, MISSING_FIELD_SENTINEL};
use serde_json::Value;
use std::cmp::Ordering;

/// Scores every doctor against the predictions and returns the relevant ones, best first.
///
/// Doctors scoring zero are dropped. Doctors with equal scores keep their directory order.
/// Profile fields that are absent or null are reported as `-1`.
///
/// # Errors
///
/// Returns `TriageError::UnknownSpecialtyMapping` if any prediction names a disease missing from
/// `specialties`, whether or not a doctor would have matched it.
pub fn score_doctors(
    directory: &DoctorDirectory,
    predictions: &[DiseaseProbability],
    specialties: &SpecialtyMap,
) -> TriageResult<Vec<ScoredDoctor>> {
    let buckets = predictions
        .iter()
        .map(|p| {
            specialties
                .get(&p.disease)
                .map(|specialty| (specialty, p.probability.value()))
                .ok_or_else(|| TriageError::UnknownSpecialtyMapping(p.disease.clone()))
        })
        .collect::<TriageResult<Vec<_>>>()?;

    let mut scored: Vec<(f64, &DoctorRecord)> = directory
        .doctors()
        .iter()
        .map(|doctor| (specialty_score(&doctor.specialty, &buckets), doctor))
        .filter(|(score, _)| *score > 0.0)
        .collect();

    // Stable sort: equal scores stay in directory order.
    scored.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    tracing::debug!(
        "{} of {} doctors matched {} predictions",
        scored.len(),
        directory.len(),
        predictions.len()
    );

    Ok(scored
        .into_iter()
        .map(|(score, doctor)| to_scored_doctor(doctor, score, directory))
        .collect())
}

fn specialty_score(doctor_specialties: &[String], buckets: &[(&str, f64)]) -> f64 {
    let mut score = 0.0;
    for specialty in doctor_specialties {
        let specialty = specialty.to_lowercase();
        for (mapped, probability) in buckets {
            if specialty == *mapped {
                score += probability;
            }
        }
    }
    score
}

fn to_scored_doctor(doctor: &DoctorRecord, score: f64, directory: &DoctorDirectory) -> ScoredDoctor {
    let profile = directory
        .profile_columns()
        .iter()
        .map(|column| {
            let value = match doctor.profile.get(column) {
                Some(Value::Null) | None => Value::from(MISSING_FIELD_SENTINEL),
                Some(value) => value.clone(),
            };
            (column.clone(), value)
        })
        .collect();

    ScoredDoctor {
        profile,
        location: doctor.location.clone(),
        specialty: doctor.specialty.clone(),
        phone_numbers: doctor.phone_numbers.clone(),
        score,
    }
}
