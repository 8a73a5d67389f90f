use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::super::domain::{ClassProbabilities, UrgencyLevel};
use super::features::{FeatureSchema, FeatureVector};
use super::{ModelInferenceError, ModelLoadError, UrgencyModel};

pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// On-disk representation of a multinomial linear classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    pub format_version: u32,
    pub name: String,
    pub schema: FeatureSchema,
    pub classes: Vec<UrgencyLevel>,
    pub coefficients: Vec<Vec<f32>>,
    pub intercepts: Vec<f32>,
}

/// Loaded, validated classifier. Immutable after construction.
#[derive(Debug, Clone)]
pub struct LinearUrgencyModel {
    name: String,
    schema: FeatureSchema,
    classes: Vec<UrgencyLevel>,
    coefficients: Vec<Vec<f32>>,
    intercepts: Vec<f32>,
}

impl LinearUrgencyModel {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ModelLoadError::NotFound(path.to_path_buf())
            } else {
                ModelLoadError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelLoadError> {
        let artifact: LinearModelArtifact = serde_json::from_reader(reader)?;
        Self::from_artifact(artifact, &FeatureSchema::standard())
    }

    /// Validate an artifact against the schema the caller will encode with.
    pub fn from_artifact(
        artifact: LinearModelArtifact,
        expected: &FeatureSchema,
    ) -> Result<Self, ModelLoadError> {
        if artifact.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(ModelLoadError::UnsupportedFormat(artifact.format_version));
        }

        expected.ensure_matches(&artifact.schema)?;

        if artifact.classes.is_empty() {
            return Err(ModelLoadError::Malformed(
                "artifact declares no classes".to_string(),
            ));
        }
        let distinct: BTreeSet<_> = artifact.classes.iter().collect();
        if distinct.len() != artifact.classes.len() {
            return Err(ModelLoadError::Malformed(
                "artifact declares duplicate classes".to_string(),
            ));
        }
        if artifact.coefficients.len() != artifact.classes.len() {
            return Err(ModelLoadError::Malformed(format!(
                "expected {} coefficient rows, found {}",
                artifact.classes.len(),
                artifact.coefficients.len()
            )));
        }
        if let Some((row, weights)) = artifact
            .coefficients
            .iter()
            .enumerate()
            .find(|(_, weights)| weights.len() != expected.len())
        {
            return Err(ModelLoadError::Malformed(format!(
                "coefficient row {row} has {} weights, expected {}",
                weights.len(),
                expected.len()
            )));
        }
        if artifact.intercepts.len() != artifact.classes.len() {
            return Err(ModelLoadError::Malformed(format!(
                "expected {} intercepts, found {}",
                artifact.classes.len(),
                artifact.intercepts.len()
            )));
        }
        let finite = artifact
            .coefficients
            .iter()
            .flatten()
            .chain(&artifact.intercepts)
            .all(|weight| weight.is_finite());
        if !finite {
            return Err(ModelLoadError::Malformed(
                "artifact contains non-finite weights".to_string(),
            ));
        }

        Ok(Self {
            name: artifact.name,
            schema: artifact.schema,
            classes: artifact.classes,
            coefficients: artifact.coefficients,
            intercepts: artifact.intercepts,
        })
    }

    pub fn classes(&self) -> &[UrgencyLevel] {
        &self.classes
    }

    fn logits(&self, features: &FeatureVector) -> Result<Vec<f32>, ModelInferenceError> {
        if features.len() != self.schema.len() {
            return Err(ModelInferenceError::FeatureLength {
                expected: self.schema.len(),
                found: features.len(),
            });
        }

        let logits: Vec<f32> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(weights, intercept)| {
                weights
                    .iter()
                    .zip(features.as_slice())
                    .fold(*intercept, |acc, (weight, value)| acc + weight * value)
            })
            .collect();

        if logits.iter().any(|logit| !logit.is_finite()) {
            return Err(ModelInferenceError::NonFinite);
        }
        Ok(logits)
    }
}

impl UrgencyModel for LinearUrgencyModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict(&self, features: &FeatureVector) -> Result<UrgencyLevel, ModelInferenceError> {
        let logits = self.logits(features)?;
        let mut best = 0;
        for (index, logit) in logits.iter().enumerate() {
            if *logit > logits[best] {
                best = index;
            }
        }
        Ok(self.classes[best])
    }

    fn predict_proba(
        &self,
        features: &FeatureVector,
    ) -> Result<Option<ClassProbabilities>, ModelInferenceError> {
        let logits = self.logits(features)?;
        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exponentials: Vec<f32> = logits.iter().map(|logit| (logit - max).exp()).collect();
        let total: f32 = exponentials.iter().sum();

        let distribution = self
            .classes
            .iter()
            .zip(exponentials)
            .map(|(class, weight)| (*class, weight / total))
            .collect();
        Ok(Some(distribution))
    }
}
