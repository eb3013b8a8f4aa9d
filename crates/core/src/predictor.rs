//! Top-k extraction from a class probability distribution.

use crate::{TriageError, TriageResult};
use std::cmp::Ordering;
use triage_types::Probability;

/// A class label paired with the probability the classifier assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub disease: String,
    pub probability: Probability,
}

/// Selects the `k` most probable classes, most probable first.
///
/// Classes with equal probability keep their label order, so the result is identical across
/// runs for identical input.
///
/// # Arguments
///
/// * `probabilities` - One probability per class, indexed like `labels`.
/// * `labels` - Class labels.
/// * `k` - Number of results to return.
///
/// # Errors
///
/// Returns a `TriageError` if:
/// - `probabilities` and `labels` differ in length (`InvalidInput`),
/// - a probability is not finite or lies outside `[0, 1]` (`InvalidInput`),
/// - `k` is zero (`InvalidInput`),
/// - `k` exceeds the number of labels (`InsufficientClasses`).
pub fn predict_top_k<S: AsRef<str>>(
    probabilities: &[f64],
    labels: &[S],
    k: usize,
) -> TriageResult<Vec<PredictionResult>> {
    if probabilities.len() != labels.len() {
        return Err(TriageError::InvalidInput(format!(
            "got {} probabilities for {} class labels",
            probabilities.len(),
            labels.len()
        )));
    }

    if k == 0 {
        return Err(TriageError::InvalidInput(
            "k must be greater than 0".into(),
        ));
    }

    if k > labels.len() {
        return Err(TriageError::InsufficientClasses {
            k,
            available: labels.len(),
        });
    }

    let validated = probabilities
        .iter()
        .zip(labels)
        .map(|(&p, label)| {
            Probability::new(p).map_err(|e| {
                TriageError::InvalidInput(format!(
                    "probability for class '{}': {e}",
                    label.as_ref()
                ))
            })
        })
        .collect::<TriageResult<Vec<_>>>()?;

    let mut ranked: Vec<usize> = (0..validated.len()).collect();
    // Stable sort: equal probabilities stay in label order.
    ranked.sort_by(|&a, &b| {
        validated[b]
            .partial_cmp(&validated[a])
            .unwrap_or(Ordering::Equal)
    });

    Ok(ranked
        .into_iter()
        .take(k)
        .map(|index| PredictionResult {
            disease: labels[index].as_ref().to_string(),
            probability: validated[index],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(results: &[PredictionResult]) -> Vec<(&str, f64)> {
        results
            .iter()
            .map(|r| (r.disease.as_str(), r.probability.value()))
            .collect()
    }

    #[test]
    fn orders_by_descending_probability() {
        let results = predict_top_k(&[0.1, 0.6, 0.3], &["Flu", "Cold", "Migraine"], 3)
            .expect("valid input");
        assert_eq!(
            summary(&results),
            vec![("Cold", 0.6), ("Migraine", 0.3), ("Flu", 0.1)]
        );
    }

    #[test]
    fn returns_exactly_k_from_larger_distribution() {
        let probs = [0.05, 0.2, 0.1, 0.4, 0.05, 0.2];
        let labels = ["A", "B", "C", "D", "E", "F"];
        let results = predict_top_k(&probs, &labels, 3).expect("valid input");

        assert_eq!(results.len(), 3);
        assert!(results
            .windows(2)
            .all(|w| w[0].probability >= w[1].probability));
        for r in &results {
            assert!(probs.contains(&r.probability.value()));
        }
        assert_eq!(summary(&results), vec![("D", 0.4), ("B", 0.2), ("F", 0.2)]);
    }

    #[test]
    fn ties_keep_label_order() {
        let labels = ["Flu", "Cold", "Migraine", "Gout"];
        let results = predict_top_k(&[0.25, 0.25, 0.25, 0.25], &labels, 3).expect("valid input");
        assert_eq!(
            summary(&results),
            vec![("Flu", 0.25), ("Cold", 0.25), ("Migraine", 0.25)]
        );

        let again = predict_top_k(&[0.25, 0.25, 0.25, 0.25], &labels, 3).expect("valid input");
        assert_eq!(results, again);
    }

    #[test]
    fn rejects_k_above_class_count() {
        let err = predict_top_k(&[0.4, 0.6], &["Flu", "Cold"], 3)
            .expect_err("only two classes available");
        assert!(matches!(
            err,
            TriageError::InsufficientClasses { k: 3, available: 2 }
        ));
    }

    #[test]
    fn rejects_zero_k() {
        let err = predict_top_k(&[1.0], &["Flu"], 0).expect_err("k = 0");
        assert!(matches!(err, TriageError::InvalidInput(msg) if msg.contains("greater than 0")));
    }

    #[test]
    fn rejects_shape_mismatch() {
        let err = predict_top_k(&[0.5, 0.5], &["Flu", "Cold", "Migraine"], 2)
            .expect_err("length mismatch");
        assert!(
            matches!(err, TriageError::InvalidInput(msg) if msg.contains("2 probabilities for 3 class labels"))
        );
    }

    #[test]
    fn rejects_invalid_probability_values() {
        let err = predict_top_k(&[0.5, -0.1, 0.6], &["Flu", "Cold", "Migraine"], 3)
            .expect_err("negative probability");
        assert!(matches!(err, TriageError::InvalidInput(msg) if msg.contains("'Cold'")));

        let err = predict_top_k(&[0.5, f64::NAN, 0.5], &["Flu", "Cold", "Migraine"], 3)
            .expect_err("NaN probability");
        assert!(matches!(err, TriageError::InvalidInput(_)));
    }
}
