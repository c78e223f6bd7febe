//! Crop recommendation model
//!
//! The four exported training artifacts are loaded once into a [`ModelBundle`]
//! and the request pipeline in [`pipeline`] runs every prediction against it.

use thiserror::Error;

pub mod artifacts;
pub mod classifier;
pub mod features;
pub mod label_encoder;
pub mod market;
pub mod pipeline;
pub mod scaler;

pub use artifacts::{resolve_artifact, ArtifactError, ArtifactKind, ModelArtifacts, ModelBundle};
pub use classifier::{Classifier, DecisionTree, TreeNode};
pub use features::{EncodedFeatures, FeatureSchema};
pub use label_encoder::LabelEncoder;
pub use market::simulate_market;
pub use pipeline::{recommend, PredictError, RecommendationResult};
pub use scaler::Scaler;

/// Failures that only show up once a vector is pushed through the artifacts,
/// usually because the artifacts were exported from different training runs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("scaler expects {expected} features, got {actual}")]
    ScalerWidth { expected: usize, actual: usize },

    #[error("classifier expects {expected} features, got {actual}")]
    ClassifierWidth { expected: usize, actual: usize },

    #[error("classifier emitted class index {index}, label encoder knows {known} classes")]
    UnknownClass { index: usize, known: usize },

    #[error("malformed classifier: {0}")]
    MalformedClassifier(String),
}
