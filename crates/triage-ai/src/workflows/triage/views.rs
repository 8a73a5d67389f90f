use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{
    AssessmentSource, ClassProbabilities, PrimarySymptom, ScoreComponent, SymptomTier,
    UrgencyLevel,
};
use super::explain::{explain, summary};
use super::service::{AssessmentOutcome, ModelStatus};

/// Serializable representation of an assessment for API and CLI output.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentView {
    pub label: UrgencyLevel,
    pub guidance: &'static str,
    pub source: AssessmentSource,
    pub summary: String,
    pub rule_score: u16,
    pub rule_label: UrgencyLevel,
    pub components: Vec<ScoreComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_label: Option<UrgencyLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<ClassProbabilities>,
    pub mismatch: bool,
    pub override_applied: bool,
    pub model_status: ModelStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_notice: Option<String>,
    pub explanation: Vec<String>,
    pub assessed_at: DateTime<Utc>,
}

impl AssessmentView {
    pub fn from_outcome(outcome: &AssessmentOutcome, assessed_at: DateTime<Utc>) -> Self {
        let assessment = &outcome.assessment;
        let model = assessment.model_result.as_ref();

        Self {
            label: assessment.label,
            guidance: assessment.label.guidance(),
            source: assessment.source,
            summary: summary(assessment),
            rule_score: assessment.rule_result.score,
            rule_label: assessment.rule_result.label,
            components: assessment.rule_result.components.clone(),
            model_label: model.map(|model| model.label),
            probabilities: model.and_then(|model| model.probabilities.clone()),
            mismatch: assessment.mismatch,
            override_applied: assessment.override_applied,
            model_status: outcome.model_status.clone(),
            model_notice: outcome.model_status.notice(),
            explanation: explain(assessment),
            assessed_at,
        }
    }
}

/// Catalogue entry for a selectable symptom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymptomView {
    pub code: &'static str,
    pub display_name: &'static str,
    pub tier: SymptomTier,
}

pub fn symptom_catalogue() -> Vec<SymptomView> {
    PrimarySymptom::ALL
        .iter()
        .map(|symptom| SymptomView {
            code: symptom.code(),
            display_name: symptom.display_name(),
            tier: symptom.tier(),
        })
        .collect()
}
