use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Triage priority assigned to a patient.
///
/// Variants are declared from least to most urgent so `Ord` follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

impl UrgencyLevel {
    pub const ALL: [UrgencyLevel; 3] = [UrgencyLevel::High, UrgencyLevel::Medium, UrgencyLevel::Low];

    pub const fn label(self) -> &'static str {
        match self {
            UrgencyLevel::High => "High",
            UrgencyLevel::Medium => "Medium",
            UrgencyLevel::Low => "Low",
        }
    }

    /// Care guidance shown alongside the label.
    pub const fn guidance(self) -> &'static str {
        match self {
            UrgencyLevel::High => {
                "Immediate medical attention required; patient should be seen immediately"
            }
            UrgencyLevel::Medium => {
                "Prompt care needed but not life-threatening; patient should be seen within 1-2 hours"
            }
            UrgencyLevel::Low => {
                "Routine care or self-care is acceptable; patient can wait for a standard appointment"
            }
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown urgency level '{0}'")]
pub struct UnknownUrgencyLevel(pub String);

impl FromStr for UrgencyLevel {
    type Err = UnknownUrgencyLevel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(UrgencyLevel::High),
            "medium" => Ok(UrgencyLevel::Medium),
            "low" => Ok(UrgencyLevel::Low),
            _ => Err(UnknownUrgencyLevel(value.to_string())),
        }
    }
}

/// Closed catalogue of presenting complaints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimarySymptom {
    None,
    AbdominalPain,
    ChestPain,
    Dizziness,
    Fever,
    Headache,
    ShortnessOfBreath,
    Cough,
    Diarrhea,
    Nausea,
    Vomiting,
}

impl PrimarySymptom {
    /// Catalogue order; the one-hot feature block follows it.
    pub const ALL: [PrimarySymptom; 11] = [
        PrimarySymptom::None,
        PrimarySymptom::AbdominalPain,
        PrimarySymptom::ChestPain,
        PrimarySymptom::Dizziness,
        PrimarySymptom::Fever,
        PrimarySymptom::Headache,
        PrimarySymptom::ShortnessOfBreath,
        PrimarySymptom::Cough,
        PrimarySymptom::Diarrhea,
        PrimarySymptom::Nausea,
        PrimarySymptom::Vomiting,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            PrimarySymptom::None => "none",
            PrimarySymptom::AbdominalPain => "abdominal_pain",
            PrimarySymptom::ChestPain => "chest_pain",
            PrimarySymptom::Dizziness => "dizziness",
            PrimarySymptom::Fever => "fever",
            PrimarySymptom::Headache => "headache",
            PrimarySymptom::ShortnessOfBreath => "shortness_of_breath",
            PrimarySymptom::Cough => "cough",
            PrimarySymptom::Diarrhea => "diarrhea",
            PrimarySymptom::Nausea => "nausea",
            PrimarySymptom::Vomiting => "vomiting",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            PrimarySymptom::None => "No specific symptoms",
            PrimarySymptom::AbdominalPain => "Abdominal Pain",
            PrimarySymptom::ChestPain => "Chest Pain",
            PrimarySymptom::Dizziness => "Dizziness",
            PrimarySymptom::Fever => "Fever",
            PrimarySymptom::Headache => "Headache",
            PrimarySymptom::ShortnessOfBreath => "Shortness of Breath",
            PrimarySymptom::Cough => "Cough",
            PrimarySymptom::Diarrhea => "Diarrhea",
            PrimarySymptom::Nausea => "Nausea",
            PrimarySymptom::Vomiting => "Vomiting",
        }
    }

    pub const fn tier(self) -> SymptomTier {
        match self {
            PrimarySymptom::ChestPain
            | PrimarySymptom::ShortnessOfBreath
            | PrimarySymptom::Dizziness => SymptomTier::Critical,
            PrimarySymptom::AbdominalPain | PrimarySymptom::Fever | PrimarySymptom::Headache => {
                SymptomTier::Severe
            }
            PrimarySymptom::None => SymptomTier::Absent,
            PrimarySymptom::Cough
            | PrimarySymptom::Diarrhea
            | PrimarySymptom::Nausea
            | PrimarySymptom::Vomiting => SymptomTier::Minor,
        }
    }
}

impl fmt::Display for PrimarySymptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown primary symptom '{0}'")]
pub struct UnknownSymptom(pub String);

impl FromStr for PrimarySymptom {
    type Err = UnknownSymptom;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        PrimarySymptom::ALL
            .into_iter()
            .find(|symptom| symptom.code() == normalized)
            .ok_or_else(|| UnknownSymptom(value.to_string()))
    }
}

/// Severity tier a symptom falls into for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomTier {
    Critical,
    Severe,
    Minor,
    Absent,
}

/// Raw, unvalidated observation as received from a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSubmission {
    pub age: i64,
    pub heart_rate: i64,
    pub systolic_bp: i64,
    pub diastolic_bp: i64,
    pub temperature: f64,
    pub primary_symptom: String,
}

/// Validated demographic and vital-sign snapshot for one assessment.
///
/// Produced by the intake guard; scoring assumes every field is within bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientObservation {
    pub age: u8,
    pub heart_rate: u16,
    pub systolic_bp: u16,
    pub diastolic_bp: u16,
    pub temperature: f64,
    pub primary_symptom: PrimarySymptom,
}

/// Factors contributing to the rule score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringFactor {
    Age,
    HeartRate,
    SystolicBp,
    DiastolicBp,
    Temperature,
    PrimarySymptom,
}

/// Discrete contribution to a rule score, kept for audit trails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoringFactor,
    pub points: u16,
    pub notes: String,
}

/// Output of the rule scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResult {
    pub score: u16,
    pub label: UrgencyLevel,
    pub components: Vec<ScoreComponent>,
}

pub type ClassProbabilities = BTreeMap<UrgencyLevel, f32>;

/// Prediction returned by the statistical model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub label: UrgencyLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<ClassProbabilities>,
}

impl ModelResult {
    pub fn confidence(&self) -> Option<f32> {
        self.probabilities
            .as_ref()
            .and_then(|distribution| distribution.get(&self.label).copied())
    }
}

/// Which side of the reconciliation decided the final label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentSource {
    RuleOnly,
    ModelAccepted,
    RuleOverride,
}

impl AssessmentSource {
    pub const fn label(self) -> &'static str {
        match self {
            AssessmentSource::RuleOnly => "rule_only",
            AssessmentSource::ModelAccepted => "model_accepted",
            AssessmentSource::RuleOverride => "rule_override",
        }
    }
}

/// Reconciled triage outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalAssessment {
    pub label: UrgencyLevel,
    pub rule_result: RuleResult,
    pub model_result: Option<ModelResult>,
    pub mismatch: bool,
    pub override_applied: bool,
    pub source: AssessmentSource,
}
