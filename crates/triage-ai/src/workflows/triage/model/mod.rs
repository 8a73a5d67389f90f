//! Boundary to the optional statistical model.
//!
//! The triage core only depends on `UrgencyModel`; the bundled linear artifact
//! is one implementation loaded once at startup and shared read-only.

mod artifact;
mod features;

pub use artifact::{LinearModelArtifact, LinearUrgencyModel, SUPPORTED_FORMAT_VERSION};
pub use features::{FeatureSchema, FeatureVector, ModelSchemaMismatch, FEATURE_SCHEMA_VERSION};

use std::path::PathBuf;
use std::sync::Arc;

use super::domain::{ClassProbabilities, UrgencyLevel};

/// Contract for a pre-trained urgency classifier.
pub trait UrgencyModel: Send + Sync {
    fn name(&self) -> &str;

    /// Feature layout the model was trained against.
    fn schema(&self) -> &FeatureSchema;

    fn predict(&self, features: &FeatureVector) -> Result<UrgencyLevel, ModelInferenceError>;

    fn predict_proba(
        &self,
        _features: &FeatureVector,
    ) -> Result<Option<ClassProbabilities>, ModelInferenceError> {
        Ok(None)
    }
}

pub type SharedModel = Arc<dyn UrgencyModel>;

/// Failures while loading a model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("model artifact not found at {0:?}")]
    NotFound(PathBuf),
    #[error("failed to read model artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported model artifact format version {0}")]
    UnsupportedFormat(u32),
    #[error(transparent)]
    SchemaMismatch(#[from] ModelSchemaMismatch),
    #[error("malformed model artifact: {0}")]
    Malformed(String),
}

impl ModelLoadError {
    /// A missing artifact is an expected deployment state, not a defect.
    pub fn is_missing(&self) -> bool {
        matches!(self, ModelLoadError::NotFound(_))
    }
}

/// Failures raised while the model produces a prediction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelInferenceError {
    #[error("model expects {expected} features, received {found}")]
    FeatureLength { expected: usize, found: usize },
    #[error("model produced a non-finite score")]
    NonFinite,
    #[error("model runtime failure: {0}")]
    Runtime(String),
}
