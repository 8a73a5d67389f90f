use std::sync::Arc;

use serde_json::json;
use triage_ai::workflows::triage::{
    explain::explain, AssessmentSource, ClassProbabilities, FeatureSchema, FeatureVector,
    LinearUrgencyModel, ModelInferenceError, ModelStatus, ObservationSubmission, PrimarySymptom,
    TriageService, UrgencyLevel, UrgencyModel, ValidationError,
};

fn submission(
    age: i64,
    heart_rate: i64,
    systolic_bp: i64,
    diastolic_bp: i64,
    temperature: f64,
    primary_symptom: &str,
) -> ObservationSubmission {
    ObservationSubmission {
        age,
        heart_rate,
        systolic_bp,
        diastolic_bp,
        temperature,
        primary_symptom: primary_symptom.to_string(),
    }
}

/// Model keyed on temperature only, standing in for an externally trained classifier.
struct FeverWatch {
    schema: FeatureSchema,
}

impl UrgencyModel for FeverWatch {
    fn name(&self) -> &str {
        "fever-watch"
    }

    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict(&self, features: &FeatureVector) -> Result<UrgencyLevel, ModelInferenceError> {
        let temperature = features
            .as_slice()
            .get(4)
            .copied()
            .ok_or(ModelInferenceError::FeatureLength {
                expected: self.schema.len(),
                found: features.len(),
            })?;
        Ok(if temperature >= 39.0 {
            UrgencyLevel::High
        } else {
            UrgencyLevel::Low
        })
    }

    fn predict_proba(
        &self,
        features: &FeatureVector,
    ) -> Result<Option<ClassProbabilities>, ModelInferenceError> {
        let label = self.predict(features)?;
        Ok(Some(
            UrgencyLevel::ALL
                .into_iter()
                .map(|level| (level, if level == label { 0.8 } else { 0.1 }))
                .collect(),
        ))
    }
}

#[test]
fn rule_only_service_classifies_end_to_end() {
    let service = TriageService::default();

    let critical = service
        .intake(submission(70, 130, 200, 120, 36.0, "chest_pain"))
        .expect("critical presentation is valid");
    let assessment = service.assess(&critical);
    assert_eq!(assessment.rule_result.score, 13);
    assert_eq!(assessment.label, UrgencyLevel::High);
    assert_eq!(assessment.source, AssessmentSource::RuleOnly);

    let healthy = service
        .intake(submission(30, 80, 120, 80, 36.5, "none"))
        .expect("healthy presentation is valid");
    let assessment = service.assess(&healthy);
    assert_eq!(assessment.rule_result.score, 0);
    assert_eq!(assessment.label, UrgencyLevel::Low);
}

#[test]
fn invalid_submission_never_reaches_scoring() {
    let service = TriageService::default();

    let error = service
        .intake(submission(30, 80, 120, 80, 44.0, "none"))
        .expect_err("temperature out of range");

    assert!(matches!(error, ValidationError::OutOfRange { .. }));
}

#[test]
fn external_model_plugs_into_the_service() {
    let model = FeverWatch {
        schema: FeatureSchema::standard(),
    };
    let service = TriageService::default()
        .with_model(Arc::new(model))
        .expect("standard schema accepted");

    let feverish = service
        .intake(submission(30, 80, 120, 80, 39.5, "headache"))
        .expect("valid");
    let outcome = service.assess_detailed(&feverish);

    assert_eq!(outcome.model_status, ModelStatus::Consulted);
    assert_eq!(outcome.assessment.rule_result.label, UrgencyLevel::Medium);
    assert_eq!(outcome.assessment.label, UrgencyLevel::High);
    assert_eq!(outcome.assessment.source, AssessmentSource::ModelAccepted);
    assert!(outcome.assessment.mismatch);
    assert!(explain(&outcome.assessment)
        .iter()
        .any(|line| line == "Model prediction: High (80% confidence)"));

    let critical = service
        .intake(submission(70, 130, 200, 120, 36.0, "chest_pain"))
        .expect("valid");
    let assessment = service.assess(&critical);
    assert_eq!(assessment.label, UrgencyLevel::High);
    assert_eq!(assessment.source, AssessmentSource::RuleOverride);
    assert!(assessment.override_applied);
}

#[test]
fn linear_artifact_loads_from_json() {
    let schema = FeatureSchema::standard();
    let width = schema.len();
    let mut medium_row = vec![0.0; width];
    // Age column.
    medium_row[0] = 0.1;
    let artifact = json!({
        "format_version": 1,
        "name": "age-drift",
        "schema": schema,
        "classes": ["Low", "Medium"],
        "coefficients": [vec![0.0; width], medium_row],
        "intercepts": [0.0, -5.0],
    });

    let model = LinearUrgencyModel::from_reader(artifact.to_string().as_bytes())
        .expect("artifact loads");
    let service = TriageService::default()
        .with_model(Arc::new(model))
        .expect("schema matches");

    let young = service
        .intake(submission(20, 80, 120, 80, 36.5, "none"))
        .expect("valid");
    let old = service
        .intake(submission(80, 80, 120, 80, 36.5, "none"))
        .expect("valid");

    let young = service.assess(&young);
    assert_eq!(young.label, UrgencyLevel::Low);
    assert_eq!(young.source, AssessmentSource::ModelAccepted);
    assert!(!young.mismatch);

    let old = service.assess(&old);
    assert_eq!(old.rule_result.label, UrgencyLevel::Low);
    assert_eq!(old.label, UrgencyLevel::Medium);
    assert!(old.mismatch);
    let probabilities = old
        .model_result
        .and_then(|model| model.probabilities)
        .expect("linear model reports probabilities");
    assert_eq!(probabilities.len(), 2);
    assert!(probabilities[&UrgencyLevel::Medium] > 0.9);
}

#[test]
fn symptom_codes_round_trip_through_catalogue() {
    for symptom in PrimarySymptom::ALL {
        let parsed: PrimarySymptom = symptom.code().parse().expect("code parses");
        assert_eq!(parsed, symptom);
        if symptom != PrimarySymptom::None {
            let parsed: PrimarySymptom = symptom.display_name().parse().expect("name parses");
            assert_eq!(parsed, symptom);
        }
    }
}
