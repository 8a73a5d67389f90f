use serde::{Deserialize, Serialize};

use super::super::domain::{PatientObservation, PrimarySymptom};

pub const FEATURE_SCHEMA_VERSION: u32 = 1;

const VITAL_COLUMNS: [&str; 5] = ["Age", "HeartRate", "SystolicBP", "DiastolicBP", "Temperature"];

/// Ordered column list a model artifact was trained against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub columns: Vec<String>,
}

impl FeatureSchema {
    /// Vitals in fixed order followed by a one-hot block over every symptom.
    pub fn standard() -> Self {
        let columns = VITAL_COLUMNS
            .iter()
            .map(|column| column.to_string())
            .chain(
                PrimarySymptom::ALL
                    .iter()
                    .map(|symptom| format!("PrimarySymptom_{}", symptom.code())),
            )
            .collect();

        Self {
            version: FEATURE_SCHEMA_VERSION,
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Check that a declared schema is exactly this one.
    pub fn ensure_matches(&self, declared: &FeatureSchema) -> Result<(), ModelSchemaMismatch> {
        if declared.version != self.version {
            return Err(ModelSchemaMismatch::Version {
                expected: self.version,
                found: declared.version,
            });
        }
        if declared.columns.len() != self.columns.len() {
            return Err(ModelSchemaMismatch::ColumnCount {
                expected: self.columns.len(),
                found: declared.columns.len(),
            });
        }
        if let Some((index, (expected, found))) = self
            .columns
            .iter()
            .zip(&declared.columns)
            .enumerate()
            .find(|(_, (expected, found))| expected != found)
        {
            return Err(ModelSchemaMismatch::Column {
                index,
                expected: expected.clone(),
                found: found.clone(),
            });
        }
        Ok(())
    }
}

/// Raised when an artifact was trained against a different feature layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelSchemaMismatch {
    #[error("feature schema version {found} does not match expected version {expected}")]
    Version { expected: u32, found: u32 },
    #[error("model declares {found} feature columns, expected {expected}")]
    ColumnCount { expected: usize, found: usize },
    #[error("feature column {index} is '{found}', expected '{expected}'")]
    Column {
        index: usize,
        expected: String,
        found: String,
    },
}

/// Numeric encoding of an observation in `FeatureSchema::standard()` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn encode(observation: &PatientObservation) -> Self {
        let mut values = Vec::with_capacity(VITAL_COLUMNS.len() + PrimarySymptom::ALL.len());
        values.push(f32::from(observation.age));
        values.push(f32::from(observation.heart_rate));
        values.push(f32::from(observation.systolic_bp));
        values.push(f32::from(observation.diastolic_bp));
        values.push(observation.temperature as f32);
        values.extend(PrimarySymptom::ALL.iter().map(|symptom| {
            if *symptom == observation.primary_symptom {
                1.0
            } else {
                0.0
            }
        }));
        Self(values)
    }

    pub fn from_values(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
