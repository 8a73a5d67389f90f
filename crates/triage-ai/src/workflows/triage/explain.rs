//! Human-readable rendering of a `FinalAssessment`. Pure formatting only.

use super::domain::{AssessmentSource, FinalAssessment, UrgencyLevel};

/// One-line description of the outcome.
pub fn summary(assessment: &FinalAssessment) -> String {
    let decided_by = match assessment.source {
        AssessmentSource::RuleOnly => "rule-based scoring",
        AssessmentSource::ModelAccepted => "model prediction",
        AssessmentSource::RuleOverride => "rule override",
    };
    format!(
        "{} urgency via {} (rule score {})",
        assessment.label, decided_by, assessment.rule_result.score
    )
}

/// Ordered explanation lines, from headline to reconciliation detail.
pub fn explain(assessment: &FinalAssessment) -> Vec<String> {
    let mut lines = vec![format!(
        "{} urgency: {}",
        assessment.label.label().to_uppercase(),
        assessment.label.guidance()
    )];

    let rule = &assessment.rule_result;
    lines.push(format!(
        "Rule-based score {} suggests {}",
        rule.score, rule.label
    ));

    match &assessment.model_result {
        Some(model) => match model.confidence() {
            Some(confidence) => lines.push(format!(
                "Model prediction: {} ({:.0}% confidence)",
                model.label,
                confidence * 100.0
            )),
            None => lines.push(format!("Model prediction: {}", model.label)),
        },
        None => lines.push("Assessment based on rule-based scoring only".to_string()),
    }

    if assessment.mismatch {
        if let Some(model) = &assessment.model_result {
            lines.push(format!(
                "Prediction mismatch: model says '{}' but rule-based system suggests '{}'",
                model.label, rule.label
            ));
        }
    }

    if assessment.override_applied && assessment.label == UrgencyLevel::High {
        lines.push(
            "Override applied: clinical signs suggest HIGH urgency regardless of model prediction"
                .to_string(),
        );
    }

    lines
}
