use std::sync::Arc;
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::triage::domain::{
    ClassProbabilities, ObservationSubmission, PatientObservation, PrimarySymptom, RuleResult,
    ScoringFactor, UrgencyLevel,
};
use crate::workflows::triage::model::{
    FeatureSchema, FeatureVector, LinearModelArtifact, ModelInferenceError, UrgencyModel,
};
use crate::workflows::triage::scoring::{RuleScorer, ScoringPolicy};
use crate::workflows::triage::service::TriageService;

pub(super) fn baseline() -> PatientObservation {
    PatientObservation {
        age: 30,
        heart_rate: 80,
        systolic_bp: 120,
        diastolic_bp: 80,
        temperature: 36.5,
        primary_symptom: PrimarySymptom::None,
    }
}

pub(super) fn observation(
    age: u8,
    heart_rate: u16,
    systolic_bp: u16,
    diastolic_bp: u16,
    temperature: f64,
    primary_symptom: PrimarySymptom,
) -> PatientObservation {
    PatientObservation {
        age,
        heart_rate,
        systolic_bp,
        diastolic_bp,
        temperature,
        primary_symptom,
    }
}

pub(super) fn submission() -> ObservationSubmission {
    ObservationSubmission {
        age: 58,
        heart_rate: 112,
        systolic_bp: 150,
        diastolic_bp: 95,
        temperature: 38.0,
        primary_symptom: "headache".to_string(),
    }
}

pub(super) fn scorer() -> RuleScorer {
    RuleScorer::new(ScoringPolicy::default())
}

pub(super) fn points_for(result: &RuleResult, factor: ScoringFactor) -> u16 {
    result
        .components
        .iter()
        .find(|component| component.factor == factor)
        .map(|component| component.points)
        .expect("component present for every factor")
}

pub(super) fn rule_result(label: UrgencyLevel, score: u16) -> RuleResult {
    RuleResult {
        score,
        label,
        components: Vec::new(),
    }
}

/// Model that always answers with the same label.
pub(super) struct FixedModel {
    pub(super) label: UrgencyLevel,
    pub(super) probabilities: Option<ClassProbabilities>,
    pub(super) schema: FeatureSchema,
}

impl FixedModel {
    pub(super) fn new(label: UrgencyLevel) -> Self {
        Self {
            label,
            probabilities: None,
            schema: FeatureSchema::standard(),
        }
    }

    pub(super) fn confident(label: UrgencyLevel, confidence: f32) -> Self {
        let remainder = (1.0 - confidence) / 2.0;
        let probabilities = UrgencyLevel::ALL
            .iter()
            .map(|level| {
                if *level == label {
                    (*level, confidence)
                } else {
                    (*level, remainder)
                }
            })
            .collect();
        Self {
            probabilities: Some(probabilities),
            ..Self::new(label)
        }
    }
}

impl UrgencyModel for FixedModel {
    fn name(&self) -> &str {
        "fixed"
    }

    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict(&self, _features: &FeatureVector) -> Result<UrgencyLevel, ModelInferenceError> {
        Ok(self.label)
    }

    fn predict_proba(
        &self,
        _features: &FeatureVector,
    ) -> Result<Option<ClassProbabilities>, ModelInferenceError> {
        Ok(self.probabilities.clone())
    }
}

/// Model whose inference always fails.
pub(super) struct FailingModel {
    schema: FeatureSchema,
}

impl Default for FailingModel {
    fn default() -> Self {
        Self {
            schema: FeatureSchema::standard(),
        }
    }
}

impl UrgencyModel for FailingModel {
    fn name(&self) -> &str {
        "failing"
    }

    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict(&self, _features: &FeatureVector) -> Result<UrgencyLevel, ModelInferenceError> {
        Err(ModelInferenceError::Runtime("inference backend crashed".to_string()))
    }
}

/// Model that panics instead of answering.
pub(super) struct PanickingModel {
    schema: FeatureSchema,
}

impl Default for PanickingModel {
    fn default() -> Self {
        Self {
            schema: FeatureSchema::standard(),
        }
    }
}

impl UrgencyModel for PanickingModel {
    fn name(&self) -> &str {
        "panicking"
    }

    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict(&self, _features: &FeatureVector) -> Result<UrgencyLevel, ModelInferenceError> {
        panic!("weights corrupted");
    }
}

/// Model that blocks before answering.
pub(super) struct SlowModel {
    pub(super) delay: Duration,
    pub(super) label: UrgencyLevel,
    schema: FeatureSchema,
}

impl SlowModel {
    pub(super) fn new(delay: Duration, label: UrgencyLevel) -> Self {
        Self {
            delay,
            label,
            schema: FeatureSchema::standard(),
        }
    }
}

impl UrgencyModel for SlowModel {
    fn name(&self) -> &str {
        "slow"
    }

    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict(&self, _features: &FeatureVector) -> Result<UrgencyLevel, ModelInferenceError> {
        std::thread::sleep(self.delay);
        Ok(self.label)
    }
}

pub(super) fn service_with_model<M: UrgencyModel + 'static>(model: M) -> TriageService {
    TriageService::default()
        .with_model(Arc::new(model))
        .expect("model uses the standard schema")
}

pub(super) const CHEST_PAIN_COLUMN: usize = 7;

/// Linear artifact that predicts Low unless chest pain is present.
pub(super) fn linear_artifact() -> LinearModelArtifact {
    let schema = FeatureSchema::standard();
    let width = schema.len();
    let mut high_row = vec![0.0; width];
    high_row[CHEST_PAIN_COLUMN] = 5.0;

    LinearModelArtifact {
        format_version: 1,
        name: "chest-pain-sentinel".to_string(),
        schema,
        classes: vec![UrgencyLevel::Low, UrgencyLevel::Medium, UrgencyLevel::High],
        coefficients: vec![vec![0.0; width], vec![0.0; width], high_row],
        intercepts: vec![1.0, 0.0, -1.0],
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
