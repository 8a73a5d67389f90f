use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tracing::warn;

use crate::error::AppError;

use super::domain::{ObservationSubmission, PatientObservation};
use super::model::ModelInferenceError;
use super::service::{AssessmentOutcome, ModelConsultation, TriageService};
use super::views::{symptom_catalogue, AssessmentView};

/// Shared handler state: the service plus an optional bound on model latency.
#[derive(Clone)]
pub struct TriageState {
    pub service: Arc<TriageService>,
    pub model_timeout: Option<Duration>,
}

/// Router builder exposing HTTP endpoints for assessments and reference data.
pub fn triage_router(service: Arc<TriageService>, model_timeout: Option<Duration>) -> Router {
    Router::new()
        .route("/api/v1/triage/assessments", post(assess_handler))
        .route("/api/v1/triage/symptoms", get(symptoms_handler))
        .route("/api/v1/triage/policy", get(policy_handler))
        .with_state(TriageState {
            service,
            model_timeout,
        })
}

pub(crate) async fn assess_handler(
    State(state): State<TriageState>,
    Json(submission): Json<ObservationSubmission>,
) -> Response {
    let observation = match state.service.intake(submission) {
        Ok(observation) => observation,
        Err(error) => return AppError::from(error).into_response(),
    };

    let outcome = assess_with_timeout(state.service, observation, state.model_timeout).await;
    let view = AssessmentView::from_outcome(&outcome, Utc::now());
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn symptoms_handler() -> Response {
    (StatusCode::OK, Json(symptom_catalogue())).into_response()
}

pub(crate) async fn policy_handler(State(state): State<TriageState>) -> Response {
    (StatusCode::OK, Json(state.service.policy().clone())).into_response()
}

/// Run an assessment with the model call moved onto the blocking pool.
///
/// Only the model consultation is bounded by `timeout`; if it does not answer
/// in time the assessment concludes rule-only and the late prediction is
/// discarded. A model task that dies is reported as a failed consultation.
pub async fn assess_with_timeout(
    service: Arc<TriageService>,
    observation: PatientObservation,
    timeout: Option<Duration>,
) -> AssessmentOutcome {
    if !service.has_model() {
        return service.assess_detailed(&observation);
    }

    let rule = service.score(&observation);
    let worker = Arc::clone(&service);
    let task = tokio::task::spawn_blocking(move || worker.consult_model(&observation));

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!(timeout_ms = limit.as_millis() as u64, "model prediction timed out");
                return service.conclude(rule, ModelConsultation::TimedOut);
            }
        },
        None => task.await,
    };

    let consultation = joined.unwrap_or_else(|join_error| {
        warn!(%join_error, "model task aborted; falling back to rules");
        ModelConsultation::Failed(ModelInferenceError::Runtime(join_error.to_string()))
    });

    service.conclude(rule, consultation)
}
