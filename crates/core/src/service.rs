//! Triage service facade.
//!
//! Bundles the reference data and the classifier behind one cloneable handle that transports
//! (REST, CLI) call into. Both halves are immutable after construction and shared through `Arc`.

use crate::classifier::{load_classifier, Classifier};
use crate::config::TriageConfig;
use crate::constants::TOP_K;
use crate::enrich::enrich;
use crate::predictor::predict_top_k;
use crate::scorer::score_doctors;
use crate::store::{ConsistencyIssue, ReferenceData};
use crate::TriageResult;
use api_shared::{DiseaseProbability, EnrichedDisease, ScoredDoctor};
use std::sync::Arc;

/// Disease prediction and doctor ranking over loaded reference data.
#[derive(Clone)]
pub struct TriageService {
    data: Arc<ReferenceData>,
    classifier: Arc<dyn Classifier>,
}

impl TriageService {
    pub fn new(data: ReferenceData, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            data: Arc::new(data),
            classifier,
        }
    }

    /// Loads the reference tables and the classifier named by `cfg`.
    ///
    /// Mismatches between the tables and the classifier's classes are logged as warnings and do
    /// not prevent startup; the affected requests fail individually.
    ///
    /// # Errors
    ///
    /// Returns a `TriageError` if any table or the model artifact cannot be read or parsed.
    pub fn load(cfg: &TriageConfig) -> TriageResult<Self> {
        let data = ReferenceData::load(cfg)?;
        let classifier: Arc<dyn Classifier> = Arc::from(load_classifier(cfg.model_path())?);

        tracing::info!(
            "loaded {} diseases, {} doctors and {} specialty mappings from {}",
            data.diseases().len(),
            data.doctors().len(),
            data.specialties().len(),
            cfg.data_dir().display()
        );

        let service = Self::new(data, classifier);
        for issue in service.consistency_issues() {
            tracing::warn!("reference data: {}", issue);
        }
        Ok(service)
    }

    /// Predicts the most likely diseases for a symptom vector, enriched with their metadata.
    ///
    /// Returns exactly three diseases, most probable first.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the vector has the wrong length or contains non-finite values.
    /// - `ModelCapability` if the loaded model cannot produce probabilities.
    /// - `InsufficientClasses` if the model knows fewer than three diseases.
    /// - `UnknownDisease` if a predicted disease has no metadata row.
    pub fn predict_disease(&self, symptoms: &[f64]) -> TriageResult<Vec<EnrichedDisease>> {
        let probabilities = self.classifier.predict_proba(symptoms)?;
        let top = predict_top_k(&probabilities, self.classifier.classes(), TOP_K)?;

        top.iter()
            .map(|prediction| enrich(prediction, self.data.diseases()))
            .collect()
    }

    /// Ranks doctors by how well their specialties cover the given predictions.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSpecialtyMapping` if a prediction names a disease without a specialty.
    pub fn predict_doctor(
        &self,
        predictions: &[DiseaseProbability],
    ) -> TriageResult<Vec<ScoredDoctor>> {
        score_doctors(
            self.data.doctors(),
            predictions,
            self.data.specialties(),
        )
    }

    /// Cross-checks the reference tables against the classifier's classes.
    pub fn consistency_issues(&self) -> Vec<ConsistencyIssue> {
        self.data.consistency_issues(self.classifier.classes())
    }

    pub fn data(&self) -> &ReferenceData {
        &self.data
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }
}

impl std::fmt::Debug for TriageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageService")
            .field("data", &self.data)
            .field("classifier", &self.classifier.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{LogisticRegression, MultiClass, UnsupportedModel};
    use crate::store::{DiseaseTable, DoctorDirectory, SpecialtyMap};
    use crate::validation::validate_feature_vector;
    use crate::TriageError;
    use serde_json::json;
    use triage_types::Probability;

    /// Returns the same distribution for every input of the right length.
    struct FixedClassifier {
        classes: Vec<String>,
        probabilities: Vec<f64>,
    }

    impl Classifier for FixedClassifier {
        fn classes(&self) -> &[String] {
            &self.classes
        }

        fn n_features(&self) -> usize {
            2
        }

        fn predict_proba(&self, features: &[f64]) -> TriageResult<Vec<f64>> {
            validate_feature_vector(features, self.n_features())?;
            Ok(self.probabilities.clone())
        }

        fn kind(&self) -> &str {
            "fixed"
        }
    }

    const DISEASES: &str = "\
Disease,Description,Precaution_1,Precaution_2
Flu,Viral infection,rest,fluids
Cold,Common cold,rest,
Migraine,Headache,dark room,hydrate
";

    const DOCTORS: &str = "\
,Name,Years Experience,Location,Specialty,Phone Number
0,Dr. Heart,12,['Sharp Memorial'],['Cardiology'],['555-0100']
1,Dr. Neuro,,['Sharp Grossmont'],['Neurology'],['555-0101']
";

    fn reference_data() -> ReferenceData {
        ReferenceData::new(
            DiseaseTable::from_reader(DISEASES.as_bytes()).expect("valid diseases"),
            DoctorDirectory::from_reader(DOCTORS.as_bytes()).expect("valid doctors"),
            [
                ("Flu", "internal medicine"),
                ("Cold", "internal medicine"),
                ("Migraine", "Neurology"),
            ]
            .into_iter()
            .collect::<SpecialtyMap>(),
        )
    }

    fn service_with(classes: &[&str], probabilities: &[f64]) -> TriageService {
        let classifier = FixedClassifier {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            probabilities: probabilities.to_vec(),
        };
        TriageService::new(reference_data(), Arc::new(classifier))
    }

    #[test]
    fn predict_disease_returns_top_three_enriched() {
        let service = service_with(&["Flu", "Cold", "Migraine"], &[0.1, 0.6, 0.3]);

        let result = service.predict_disease(&[1.0, 0.0]).expect("prediction");
        let names: Vec<&str> = result.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Cold", "Migraine", "Flu"]);
        assert_eq!(result[0].probability.value(), 0.6);
        assert_eq!(result[0].precautions, vec![json!("rest"), serde_json::Value::Null]);
        assert_eq!(result[1].attributes["Description"], json!("Headache"));
    }

    #[test]
    fn predict_disease_rejects_wrong_vector_length() {
        let service = service_with(&["Flu", "Cold", "Migraine"], &[0.1, 0.6, 0.3]);
        let err = service
            .predict_disease(&[1.0, 0.0, 1.0])
            .expect_err("three features for a two-feature model");
        assert!(matches!(err, TriageError::InvalidInput(_)));
    }

    #[test]
    fn predict_disease_needs_three_classes() {
        let service = service_with(&["Flu", "Cold"], &[0.4, 0.6]);
        let err = service
            .predict_disease(&[1.0, 0.0])
            .expect_err("two classes only");
        assert!(matches!(
            err,
            TriageError::InsufficientClasses { k: 3, available: 2 }
        ));
    }

    #[test]
    fn predict_disease_reports_unknown_disease() {
        let service = service_with(&["Flu", "Cold", "Gout"], &[0.1, 0.3, 0.6]);
        let err = service
            .predict_disease(&[1.0, 0.0])
            .expect_err("Gout has no metadata");
        assert!(matches!(err, TriageError::UnknownDisease(name) if name == "Gout"));
    }

    #[test]
    fn predict_disease_with_unsupported_model_is_capability_error() {
        let service = TriageService::new(
            reference_data(),
            Arc::new(UnsupportedModel::new("decision_tree")),
        );
        let err = service
            .predict_disease(&[1.0, 0.0])
            .expect_err("no probabilities");
        assert!(matches!(err, TriageError::ModelCapability(_)));
    }

    #[test]
    fn predict_disease_with_logistic_regression() {
        let model = LogisticRegression::new(
            vec!["Flu".into(), "Cold".into(), "Migraine".into()],
            vec![vec![0.0, 0.0], vec![2.0, 0.0], vec![0.0, 2.0]],
            vec![0.0, 0.0, 0.0],
            MultiClass::Multinomial,
        )
        .expect("valid model");
        let service = TriageService::new(reference_data(), Arc::new(model));

        let result = service.predict_disease(&[1.0, 0.0]).expect("prediction");
        assert_eq!(result[0].name, "Cold");
        assert_eq!(result.len(), 3);
        let total: f64 = result.iter().map(|d| d.probability.value()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn predict_doctor_ranks_matching_specialists() {
        let service = service_with(&["Flu", "Cold", "Migraine"], &[0.1, 0.6, 0.3]);
        let predictions = vec![DiseaseProbability {
            disease: "Migraine".into(),
            probability: Probability::new(0.3).expect("valid"),
        }];

        let doctors = service.predict_doctor(&predictions).expect("ranking");
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].profile["Name"], json!("Dr. Neuro"));
        assert_eq!(doctors[0].profile["Years Experience"], json!(-1));
        assert_eq!(doctors[0].score, 0.3);
    }

    #[test]
    fn predict_doctor_rejects_unmapped_disease() {
        let service = service_with(&["Flu", "Cold", "Migraine"], &[0.1, 0.6, 0.3]);
        let predictions = vec![DiseaseProbability {
            disease: "Gout".into(),
            probability: Probability::new(0.3).expect("valid"),
        }];
        let err = service.predict_doctor(&predictions).expect_err("unmapped");
        assert!(matches!(err, TriageError::UnknownSpecialtyMapping(name) if name == "Gout"));
    }

    #[test]
    fn consistency_issues_use_classifier_classes() {
        let service = service_with(&["Flu", "Cold", "Gout"], &[0.1, 0.3, 0.6]);
        let issues = service.consistency_issues();
        assert_eq!(
            issues,
            vec![
                ConsistencyIssue::ClassMissingFromDiseaseTable("Gout".into()),
                ConsistencyIssue::ClassMissingFromSpecialtyMap("Gout".into()),
            ]
        );
    }

    #[test]
    fn bundled_sample_data_loads_and_is_consistent() {
        let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let cfg = TriageConfig::new(
            root.join("data"),
            root.join("models/logistic_regression.json"),
        )
        .expect("bundled data should exist");
        let service = TriageService::load(&cfg).expect("bundled data should load");

        assert!(service.consistency_issues().is_empty());

        let result = service
            .predict_disease(&[0.0, 0.0, 0.0, 5.0, 0.0, 0.0])
            .expect("prediction");
        assert_eq!(result[0].name, "Migraine");

        let predictions: Vec<DiseaseProbability> = result
            .iter()
            .map(|d| DiseaseProbability {
                disease: d.name.clone(),
                probability: d.probability,
            })
            .collect();
        let doctors = service.predict_doctor(&predictions).expect("ranking");
        assert_eq!(doctors[0].profile["Name"], json!("Dr. James Chen"));
    }
}
