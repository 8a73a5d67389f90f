use super::domain::{AssessmentSource, FinalAssessment, ModelResult, RuleResult, UrgencyLevel};

/// Combine the rule result with an optional model prediction.
///
/// A disagreeing model wins unless the rules flagged High, in which case the
/// rule label is kept and the override is recorded.
pub fn reconcile(rule: RuleResult, model: Option<ModelResult>) -> FinalAssessment {
    let Some(model) = model else {
        return FinalAssessment {
            label: rule.label,
            rule_result: rule,
            model_result: None,
            mismatch: false,
            override_applied: false,
            source: AssessmentSource::RuleOnly,
        };
    };

    if model.label == rule.label {
        return FinalAssessment {
            label: model.label,
            rule_result: rule,
            model_result: Some(model),
            mismatch: false,
            override_applied: false,
            source: AssessmentSource::ModelAccepted,
        };
    }

    if rule.label == UrgencyLevel::High {
        FinalAssessment {
            label: rule.label,
            rule_result: rule,
            model_result: Some(model),
            mismatch: true,
            override_applied: true,
            source: AssessmentSource::RuleOverride,
        }
    } else {
        FinalAssessment {
            label: model.label,
            rule_result: rule,
            model_result: Some(model),
            mismatch: true,
            override_applied: false,
            source: AssessmentSource::ModelAccepted,
        }
    }
}
