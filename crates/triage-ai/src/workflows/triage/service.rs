use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::TriageConfig;

use super::domain::{
    FinalAssessment, ModelResult, ObservationSubmission, PatientObservation, RuleResult,
};
use super::intake::{ObservationGuard, ValidationError};
use super::model::{
    FeatureSchema, FeatureVector, LinearUrgencyModel, ModelInferenceError, ModelLoadError,
    ModelSchemaMismatch, SharedModel, UrgencyModel,
};
use super::reconciliation::reconcile;
use super::scoring::{PolicyError, RuleScorer, ScoringPolicy};

/// Service composing the intake guard, rule scorer, and optional model.
///
/// Built once at startup; every field is read-only afterwards so a single
/// instance can be shared across requests.
pub struct TriageService {
    guard: ObservationGuard,
    scorer: RuleScorer,
    model: Option<SharedModel>,
}

impl TriageService {
    /// Rule-only service.
    pub fn new(policy: ScoringPolicy) -> Self {
        Self {
            guard: ObservationGuard::default(),
            scorer: RuleScorer::new(policy),
            model: None,
        }
    }

    /// Attach a model, rejecting it if it was trained on another feature layout.
    pub fn with_model(mut self, model: SharedModel) -> Result<Self, ModelSchemaMismatch> {
        FeatureSchema::standard().ensure_matches(model.schema())?;
        self.model = Some(model);
        Ok(self)
    }

    pub fn with_guard(mut self, guard: ObservationGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Build the service from configuration, loading the policy and model artifact.
    ///
    /// A model that cannot be loaded degrades to rule-only mode unless the
    /// configuration marks it as required.
    pub fn from_config(config: &TriageConfig) -> Result<Self, TriageSetupError> {
        let policy = match &config.policy_path {
            Some(path) => {
                let policy = ScoringPolicy::from_path(path)?;
                info!(?path, "loaded scoring policy override");
                policy
            }
            None => ScoringPolicy::default(),
        };
        let service = Self::new(policy);

        let Some(path) = &config.model.path else {
            info!("no model artifact configured; assessments run rule-only");
            return Ok(service);
        };

        match LinearUrgencyModel::from_path(path) {
            Ok(model) => {
                info!(model = model.name(), ?path, "model artifact loaded");
                Ok(service.with_model(Arc::new(model))?)
            }
            Err(err) if config.model.required => Err(TriageSetupError::Model(err)),
            Err(err) if err.is_missing() => {
                warn!(%err, "model artifact unavailable; assessments run rule-only");
                Ok(service)
            }
            Err(err) => {
                error!(%err, "model artifact rejected; assessments run rule-only");
                Ok(service)
            }
        }
    }

    pub fn guard(&self) -> &ObservationGuard {
        &self.guard
    }

    pub fn policy(&self) -> &ScoringPolicy {
        self.scorer.policy()
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_ref().map(|model| model.name())
    }

    /// Validate a raw submission.
    pub fn intake(
        &self,
        submission: ObservationSubmission,
    ) -> Result<PatientObservation, ValidationError> {
        self.guard.observation_from_submission(submission)
    }

    pub fn score(&self, observation: &PatientObservation) -> RuleResult {
        self.scorer.score(observation)
    }

    /// Ask the model for a prediction. Failures, panics included, are logged
    /// and reported, never raised.
    pub fn consult_model(&self, observation: &PatientObservation) -> ModelConsultation {
        let Some(model) = &self.model else {
            return ModelConsultation::NotConfigured;
        };

        let features = FeatureVector::encode(observation);
        let label = match guarded(|| model.predict(&features)) {
            Ok(label) => label,
            Err(err) => {
                warn!(model = model.name(), %err, "model prediction failed; falling back to rules");
                return ModelConsultation::Failed(err);
            }
        };

        let probabilities = match guarded(|| model.predict_proba(&features)) {
            Ok(probabilities) => probabilities,
            Err(err) => {
                debug!(model = model.name(), %err, "model probabilities unavailable");
                None
            }
        };

        ModelConsultation::Predicted(ModelResult {
            label,
            probabilities,
        })
    }

    /// Reconcile a rule result with whatever the model consultation produced.
    pub fn conclude(&self, rule: RuleResult, consultation: ModelConsultation) -> AssessmentOutcome {
        let (model_result, model_status) = consultation.into_parts();
        let assessment = reconcile(rule, model_result);

        if assessment.override_applied {
            warn!(
                rule = %assessment.rule_result.label,
                model = ?assessment.model_result.as_ref().map(|model| model.label),
                "rule-detected High overrides model prediction"
            );
        } else if assessment.mismatch {
            info!(
                rule = %assessment.rule_result.label,
                label = %assessment.label,
                "model prediction accepted over disagreeing rules"
            );
        }
        debug!(
            label = %assessment.label,
            score = assessment.rule_result.score,
            source = assessment.source.label(),
            "triage assessment complete"
        );

        AssessmentOutcome {
            assessment,
            model_status,
        }
    }

    pub fn assess_detailed(&self, observation: &PatientObservation) -> AssessmentOutcome {
        let rule = self.score(observation);
        let consultation = self.consult_model(observation);
        self.conclude(rule, consultation)
    }

    /// Classify a validated observation. Never fails.
    pub fn assess(&self, observation: &PatientObservation) -> FinalAssessment {
        self.assess_detailed(observation).assessment
    }
}

/// Run a model call, turning a panic into a runtime error.
fn guarded<T>(
    call: impl FnOnce() -> Result<T, ModelInferenceError>,
) -> Result<T, ModelInferenceError> {
    panic::catch_unwind(AssertUnwindSafe(call)).unwrap_or_else(|payload| {
        Err(ModelInferenceError::Runtime(format!(
            "model panicked: {}",
            panic_message(payload.as_ref())
        )))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}

impl Default for TriageService {
    fn default() -> Self {
        Self::new(ScoringPolicy::default())
    }
}

/// Result of asking the model for a prediction.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelConsultation {
    NotConfigured,
    Predicted(ModelResult),
    Failed(ModelInferenceError),
    TimedOut,
}

impl ModelConsultation {
    pub fn into_parts(self) -> (Option<ModelResult>, ModelStatus) {
        match self {
            ModelConsultation::NotConfigured => (None, ModelStatus::NotConfigured),
            ModelConsultation::Predicted(result) => (Some(result), ModelStatus::Consulted),
            ModelConsultation::Failed(err) => (
                None,
                ModelStatus::Failed {
                    reason: err.to_string(),
                },
            ),
            ModelConsultation::TimedOut => (None, ModelStatus::TimedOut),
        }
    }
}

/// What happened on the model path for one assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ModelStatus {
    NotConfigured,
    Consulted,
    Failed { reason: String },
    TimedOut,
}

impl ModelStatus {
    /// Informational notice for callers when the model path was skipped.
    pub fn notice(&self) -> Option<String> {
        match self {
            ModelStatus::Consulted => None,
            ModelStatus::NotConfigured => {
                Some("Model not available; using rule-based classification".to_string())
            }
            ModelStatus::Failed { reason } => Some(format!(
                "Model prediction failed ({reason}); fell back to rule-based classification"
            )),
            ModelStatus::TimedOut => {
                Some("Model prediction timed out; fell back to rule-based classification".to_string())
            }
        }
    }
}

/// Final assessment plus the model-path status that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentOutcome {
    pub assessment: FinalAssessment,
    pub model_status: ModelStatus,
}

/// Error raised while building the triage service at startup.
#[derive(Debug, thiserror::Error)]
pub enum TriageSetupError {
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Model(#[from] ModelLoadError),
    #[error(transparent)]
    Schema(#[from] ModelSchemaMismatch),
}
