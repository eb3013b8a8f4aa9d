//! Input validation utilities.
//!
//! This module contains functions for validating request payloads before they reach the
//! classifier or the ranking code.

use crate::{TriageError, TriageResult};

/// Validates that a symptom feature vector matches the classifier's expected shape.
///
/// # Arguments
///
/// * `features` - The feature vector supplied by the caller.
/// * `expected_len` - The number of features the classifier was trained on.
///
/// # Errors
///
/// Returns a `TriageError::InvalidInput` if:
/// - the vector length differs from `expected_len`,
/// - any value is NaN or infinite.
pub fn validate_feature_vector(features: &[f64], expected_len: usize) -> TriageResult<()> {
    if features.len() != expected_len {
        return Err(TriageError::InvalidInput(format!(
            "expected {} symptom features, got {}",
            expected_len,
            features.len()
        )));
    }

    if let Some(index) = features.iter().position(|v| !v.is_finite()) {
        return Err(TriageError::InvalidInput(format!(
            "symptom feature at index {index} is not a finite number"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_vector() {
        assert!(validate_feature_vector(&[0.0, 1.0, 1.0], 3).is_ok());
    }

    #[test]
    fn rejects_wrong_length() {
        let err = validate_feature_vector(&[0.0, 1.0], 3).expect_err("should reject length");
        assert!(
            matches!(err, TriageError::InvalidInput(msg) if msg.contains("expected 3 symptom features, got 2"))
        );
    }

    #[test]
    fn rejects_non_finite_values() {
        let err = validate_feature_vector(&[0.0, f64::NAN, 1.0], 3).expect_err("should reject NaN");
        assert!(matches!(err, TriageError::InvalidInput(msg) if msg.contains("index 1")));
    }
}
