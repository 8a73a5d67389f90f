//! Single-patient triage urgency classification.
//!
//! Observations pass the intake guard, are scored by the rule table, and the
//! rule label is reconciled against an optional statistical model. Scoring and
//! reconciliation are pure; logging happens at the service boundary.

pub mod domain;
pub mod explain;
pub mod intake;
pub mod model;
mod reconciliation;
pub mod router;
pub mod scoring;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessmentSource, ClassProbabilities, FinalAssessment, ModelResult, ObservationSubmission,
    PatientObservation, PrimarySymptom, RuleResult, ScoreComponent, ScoringFactor, SymptomTier,
    UrgencyLevel,
};
pub use intake::{ObservationBounds, ObservationGuard, ValidationError};
pub use model::{
    FeatureSchema, FeatureVector, LinearUrgencyModel, ModelInferenceError, ModelLoadError,
    ModelSchemaMismatch, SharedModel, UrgencyModel,
};
pub use reconciliation::reconcile;
pub use router::{assess_with_timeout, triage_router};
pub use scoring::{PolicyError, RuleScorer, ScoringPolicy};
pub use service::{
    AssessmentOutcome, ModelConsultation, ModelStatus, TriageService, TriageSetupError,
};
pub use views::{symptom_catalogue, AssessmentView, SymptomView};
