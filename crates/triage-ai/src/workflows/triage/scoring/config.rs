use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Point values and label thresholds applied by the rule scorer.
///
/// `Default` is the standard triage table; deployments may override it from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub age: AgePolicy,
    pub heart_rate: VitalBandPolicy,
    pub systolic_bp: VitalBandPolicy,
    pub diastolic_bp: VitalBandPolicy,
    pub temperature: TemperaturePolicy,
    pub symptom: SymptomPolicy,
    pub thresholds: UrgencyThresholds,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            age: AgePolicy::default(),
            heart_rate: VitalBandPolicy {
                critical_below: 50,
                critical_above: 120,
                critical_points: 3,
                elevated_below: Some(60),
                elevated_above: 100,
                elevated_points: 1,
            },
            systolic_bp: VitalBandPolicy {
                critical_below: 90,
                critical_above: 180,
                critical_points: 3,
                elevated_below: Some(100),
                elevated_above: 140,
                elevated_points: 1,
            },
            diastolic_bp: VitalBandPolicy {
                critical_below: 60,
                critical_above: 110,
                critical_points: 2,
                elevated_below: None,
                elevated_above: 90,
                elevated_points: 1,
            },
            temperature: TemperaturePolicy::default(),
            symptom: SymptomPolicy::default(),
            thresholds: UrgencyThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgePolicy {
    pub senior_from: u8,
    pub senior_points: u16,
    pub middle_from: u8,
    pub middle_points: u16,
}

impl Default for AgePolicy {
    fn default() -> Self {
        Self {
            senior_from: 65,
            senior_points: 2,
            middle_from: 45,
            middle_points: 1,
        }
    }
}

/// Two-band rule for an integer vital sign. Comparisons are strict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalBandPolicy {
    pub critical_below: u16,
    pub critical_above: u16,
    pub critical_points: u16,
    pub elevated_below: Option<u16>,
    pub elevated_above: u16,
    pub elevated_points: u16,
}

/// Three-band temperature rule in °C. Comparisons are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperaturePolicy {
    pub critical_fever: f64,
    pub critical_hypothermia: f64,
    pub critical_points: u16,
    pub fever: f64,
    pub hypothermia: f64,
    pub fever_points: u16,
    pub low_grade_fever: f64,
    pub low_grade_points: u16,
}

impl Default for TemperaturePolicy {
    fn default() -> Self {
        Self {
            critical_fever: 40.0,
            critical_hypothermia: 35.0,
            critical_points: 3,
            fever: 38.5,
            hypothermia: 35.5,
            fever_points: 2,
            low_grade_fever: 37.5,
            low_grade_points: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomPolicy {
    pub critical_points: u16,
    pub severe_points: u16,
    pub minor_points: u16,
}

impl Default for SymptomPolicy {
    fn default() -> Self {
        Self {
            critical_points: 3,
            severe_points: 2,
            minor_points: 1,
        }
    }
}

/// Minimum scores for each label; anything below `medium` is Low.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyThresholds {
    pub high: u16,
    pub medium: u16,
}

impl Default for UrgencyThresholds {
    fn default() -> Self {
        Self { high: 7, medium: 4 }
    }
}

/// Errors raised while loading or checking a scoring policy.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("failed to read scoring policy {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("scoring policy is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("inconsistent scoring policy: {0}")]
    Inconsistent(String),
}

impl ScoringPolicy {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PolicyError> {
        let policy: ScoringPolicy = serde_json::from_reader(reader)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Reject policies whose bands overlap in the wrong direction.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.thresholds.high <= self.thresholds.medium {
            return Err(PolicyError::Inconsistent(format!(
                "high threshold {} must exceed medium threshold {}",
                self.thresholds.high, self.thresholds.medium
            )));
        }
        if self.age.senior_from <= self.age.middle_from {
            return Err(PolicyError::Inconsistent(format!(
                "senior age {} must exceed middle age {}",
                self.age.senior_from, self.age.middle_from
            )));
        }

        for (name, band) in [
            ("heart_rate", &self.heart_rate),
            ("systolic_bp", &self.systolic_bp),
            ("diastolic_bp", &self.diastolic_bp),
        ] {
            if band.elevated_above > band.critical_above {
                return Err(PolicyError::Inconsistent(format!(
                    "{name}: elevated upper bound {} exceeds critical bound {}",
                    band.elevated_above, band.critical_above
                )));
            }
            if let Some(below) = band.elevated_below {
                if below < band.critical_below {
                    return Err(PolicyError::Inconsistent(format!(
                        "{name}: elevated lower bound {below} is below critical bound {}",
                        band.critical_below
                    )));
                }
            }
        }

        let temperature = &self.temperature;
        let ordered = temperature.critical_hypothermia <= temperature.hypothermia
            && temperature.low_grade_fever <= temperature.fever
            && temperature.fever <= temperature.critical_fever;
        if !ordered {
            return Err(PolicyError::Inconsistent(
                "temperature bands must widen from critical to low-grade".to_string(),
            ));
        }

        Ok(())
    }
}
