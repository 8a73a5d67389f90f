use super::common::*;
use crate::workflows::triage::domain::{ModelResult, PrimarySymptom, UrgencyLevel};
use crate::workflows::triage::explain::{explain, summary};
use crate::workflows::triage::reconcile;

#[test]
fn rule_only_explanation() {
    let assessment = scorer().score(&baseline());
    let assessment = reconcile(assessment, None);

    let lines = explain(&assessment);

    assert_eq!(
        lines,
        vec![
            format!("LOW urgency: {}", UrgencyLevel::Low.guidance()),
            "Rule-based score 0 suggests Low".to_string(),
            "Assessment based on rule-based scoring only".to_string(),
        ]
    );
    assert_eq!(
        summary(&assessment),
        "Low urgency via rule-based scoring (rule score 0)"
    );
}

#[test]
fn override_explanation_mentions_both_labels() {
    let rule = scorer().score(&observation(
        70,
        130,
        200,
        120,
        36.0,
        PrimarySymptom::ChestPain,
    ));
    let model = ModelResult {
        label: UrgencyLevel::Low,
        probabilities: Some(
            [
                (UrgencyLevel::Low, 0.75),
                (UrgencyLevel::Medium, 0.125),
                (UrgencyLevel::High, 0.125),
            ]
            .into_iter()
            .collect(),
        ),
    };

    let assessment = reconcile(rule, Some(model));
    let lines = explain(&assessment);

    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("HIGH urgency"));
    assert_eq!(lines[1], "Rule-based score 13 suggests High");
    assert_eq!(lines[2], "Model prediction: Low (75% confidence)");
    assert_eq!(
        lines[3],
        "Prediction mismatch: model says 'Low' but rule-based system suggests 'High'"
    );
    assert!(lines[4].starts_with("Override applied"));
    assert_eq!(
        summary(&assessment),
        "High urgency via rule override (rule score 13)"
    );
}

#[test]
fn accepted_mismatch_has_no_override_line() {
    let assessment = reconcile(
        rule_result(UrgencyLevel::Medium, 5),
        Some(ModelResult {
            label: UrgencyLevel::High,
            probabilities: None,
        }),
    );

    let lines = explain(&assessment);

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[2], "Model prediction: High");
    assert!(lines[3].starts_with("Prediction mismatch"));
    assert!(summary(&assessment).contains("model prediction"));
}
