//! Symptom classifier.
//!
//! The classifier is an external artifact: a JSON file whose `kind` tag says which model family
//! it holds. Only logistic regression exposes class probabilities today. Any other kind still
//! loads, but every inference call on it fails with `ModelCapability`, so the server can start and
//! report the problem per request.
//!
//! Artifact layout for `logistic_regression`:
//!
//! ```json
//! {
//!   "kind": "logistic_regression",
//!   "classes": ["Cold", "Flu", "Migraine"],
//!   "coefficients": [[0.1, 2.0], [1.5, 0.2], [-0.4, 0.0]],
//!   "intercepts": [0.0, -0.5, 0.3],
//!   "multi_class": "multinomial"
//! }
//! ```

use crate::validation::validate_feature_vector;
use crate::{TriageError, TriageResult};
use serde::Deserialize;
use std::path::Path;

/// A model that maps a symptom feature vector to one probability per class.
pub trait Classifier: Send + Sync {
    /// Class labels, in the same order as the probabilities returned by `predict_proba`.
    fn classes(&self) -> &[String];

    /// Number of features the model expects.
    fn n_features(&self) -> usize;

    /// Returns one probability per class for a single feature vector.
    fn predict_proba(&self, features: &[f64]) -> TriageResult<Vec<f64>>;

    /// Short identifier of the model family.
    fn kind(&self) -> &str;
}

/// How per-class scores are turned into probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiClass {
    /// Softmax over all class scores.
    #[default]
    Multinomial,
    /// One-vs-rest: per-class sigmoid, normalised to sum to one.
    Ovr,
}

#[derive(Debug, Deserialize)]
struct ArtifactHeader {
    kind: String,
}

#[derive(Debug, Deserialize)]
struct LogisticRegressionParams {
    classes: Vec<String>,
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    #[serde(default)]
    multi_class: MultiClass,
}

/// A fitted linear classifier.
///
/// With two classes a single coefficient row may be given; it scores the second class.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    classes: Vec<String>,
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    multi_class: MultiClass,
    n_features: usize,
}

impl LogisticRegression {
    /// Creates a model after checking that its parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidInput` if:
    /// - there are no classes,
    /// - the number of coefficient rows is neither the class count nor 1 for a binary model,
    /// - coefficient rows differ in width or contain non-finite values,
    /// - the intercept count differs from the number of coefficient rows.
    pub fn new(
        classes: Vec<String>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
        multi_class: MultiClass,
    ) -> TriageResult<Self> {
        if classes.is_empty() {
            return Err(TriageError::InvalidInput(
                "model must declare at least one class".into(),
            ));
        }

        let binary_single_row = classes.len() == 2 && coefficients.len() == 1;
        if coefficients.len() != classes.len() && !binary_single_row {
            return Err(TriageError::InvalidInput(format!(
                "model has {} classes but {} coefficient rows",
                classes.len(),
                coefficients.len()
            )));
        }

        if intercepts.len() != coefficients.len() {
            return Err(TriageError::InvalidInput(format!(
                "model has {} coefficient rows but {} intercepts",
                coefficients.len(),
                intercepts.len()
            )));
        }

        let n_features = coefficients.first().map(Vec::len).unwrap_or(0);
        if coefficients.iter().any(|row| row.len() != n_features) {
            return Err(TriageError::InvalidInput(
                "model coefficient rows have different widths".into(),
            ));
        }

        let all_finite = coefficients
            .iter()
            .flatten()
            .chain(intercepts.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(TriageError::InvalidInput(
                "model parameters must be finite numbers".into(),
            ));
        }

        Ok(Self {
            classes,
            coefficients,
            intercepts,
            multi_class,
            n_features,
        })
    }

    fn decision_function(&self, features: &[f64]) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| {
                intercept + row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>()
            })
            .collect()
    }
}

impl Classifier for LogisticRegression {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, features: &[f64]) -> TriageResult<Vec<f64>> {
        validate_feature_vector(features, self.n_features)?;
        let scores = self.decision_function(features);
        if scores.iter().any(|z| !z.is_finite()) {
            return Err(TriageError::InvalidInput(
                "symptom features overflow the model's decision function".into(),
            ));
        }

        if scores.len() == 1 && self.classes.len() == 2 {
            let z = scores[0];
            return Ok(match self.multi_class {
                MultiClass::Ovr => {
                    let p = sigmoid(z);
                    vec![1.0 - p, p]
                }
                MultiClass::Multinomial => softmax(&[-z, z]),
            });
        }

        Ok(match self.multi_class {
            MultiClass::Multinomial => softmax(&scores),
            // Normalising sigmoids equals a softmax over their logs, which cannot underflow to 0/0.
            MultiClass::Ovr => {
                let log_probs: Vec<f64> = scores.iter().map(|z| log_sigmoid(*z)).collect();
                softmax(&log_probs)
            }
        })
    }

    fn kind(&self) -> &str {
        "logistic_regression"
    }
}

/// Placeholder for an artifact that cannot produce class probabilities.
#[derive(Debug, Clone)]
pub struct UnsupportedModel {
    kind: String,
}

impl UnsupportedModel {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

impl Classifier for UnsupportedModel {
    fn classes(&self) -> &[String] {
        &[]
    }

    fn n_features(&self) -> usize {
        0
    }

    fn predict_proba(&self, _features: &[f64]) -> TriageResult<Vec<f64>> {
        Err(TriageError::ModelCapability(format!(
            "artifact kind '{}' does not expose class probabilities",
            self.kind
        )))
    }

    fn kind(&self) -> &str {
        &self.kind
    }
}

/// Parses a classifier artifact from JSON text.
///
/// # Errors
///
/// Returns `TriageError::Json` if the text is not a valid artifact, or `InvalidInput` if the
/// parameters are inconsistent. Unknown kinds are not an error here; see [`UnsupportedModel`].
pub fn parse_classifier(json: &str) -> TriageResult<Box<dyn Classifier>> {
    let header: ArtifactHeader = from_json_str(json)?;

    match header.kind.as_str() {
        "logistic_regression" => {
            let params: LogisticRegressionParams = from_json_str(json)?;
            let model = LogisticRegression::new(
                params.classes,
                params.coefficients,
                params.intercepts,
                params.multi_class,
            )?;
            Ok(Box::new(model))
        }
        other => {
            tracing::warn!("model artifact kind '{}' has no probability inference", other);
            Ok(Box::new(UnsupportedModel::new(other)))
        }
    }
}

/// Reads and parses a classifier artifact from disk.
pub fn load_classifier(path: &Path) -> TriageResult<Box<dyn Classifier>> {
    let json = std::fs::read_to_string(path).map_err(|source| TriageError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let model = parse_classifier(&json)?;
    tracing::info!(
        "loaded {} model with {} classes and {} features from {}",
        model.kind(),
        model.classes().len(),
        model.n_features(),
        path.display()
    );
    Ok(model)
}

fn from_json_str<T: serde::de::DeserializeOwned>(json: &str) -> TriageResult<T> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|source| TriageError::Json {
        what: "model artifact",
        source,
    })
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn log_sigmoid(z: f64) -> f64 {
    -softplus(-z)
}

fn softplus(x: f64) -> f64 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}
