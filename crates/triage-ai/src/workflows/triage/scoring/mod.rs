mod config;
mod rules;

pub use config::{
    AgePolicy, PolicyError, ScoringPolicy, SymptomPolicy, TemperaturePolicy, UrgencyThresholds,
    VitalBandPolicy,
};

use super::domain::{PatientObservation, RuleResult, UrgencyLevel};

/// Stateless scorer that applies the scoring policy to an observation.
#[derive(Debug, Clone, Default)]
pub struct RuleScorer {
    policy: ScoringPolicy,
}

impl RuleScorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn score(&self, observation: &PatientObservation) -> RuleResult {
        let (components, score) = rules::score_observation(observation, &self.policy);

        RuleResult {
            score,
            label: self.label_for(score),
            components,
        }
    }

    pub fn label_for(&self, score: u16) -> UrgencyLevel {
        let thresholds = &self.policy.thresholds;
        if score >= thresholds.high {
            UrgencyLevel::High
        } else if score >= thresholds.medium {
            UrgencyLevel::Medium
        } else {
            UrgencyLevel::Low
        }
    }
}
