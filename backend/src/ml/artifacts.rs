//! Model artifact loading
//!
//! Four JSON artifacts exported by the training pipeline are located by file
//! name prefix in the configured directory and loaded once at startup. Any
//! missing or unreadable artifact leaves the bundle degraded: the server still
//! runs, but every prediction reports the model as unavailable.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use shared::Observation;
use thiserror::Error;

use super::{
    Classifier, EncodedFeatures, FeatureSchema, InferenceError, LabelEncoder, Scaler,
};

const ARTIFACT_EXTENSION: &str = ".json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Classifier,
    Scaler,
    LabelEncoder,
    FeatureNames,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Classifier,
        ArtifactKind::Scaler,
        ArtifactKind::LabelEncoder,
        ArtifactKind::FeatureNames,
    ];

    /// File name prefix, e.g. `scaler_final.json` matches `scaler`
    pub fn prefix(&self) -> &'static str {
        match self {
            ArtifactKind::Classifier => "best_crop_model",
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::LabelEncoder => "label_encoder",
            ArtifactKind::FeatureNames => "feature_names",
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        file_name.starts_with(self.prefix()) && file_name.ends_with(ARTIFACT_EXTENSION)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Classifier => "classifier",
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::LabelEncoder => "label encoder",
            ArtifactKind::FeatureNames => "feature names",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact directory {path} is not readable: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("missing artifacts: {}", join_kinds(.0))]
    Missing(Vec<ArtifactKind>),

    #[error("failed to read {kind} from {path}: {source}")]
    Read {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {kind} from {path}: {source}")]
    Parse {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn join_kinds(kinds: &[ArtifactKind]) -> String {
    kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The four co-versioned artifacts, immutable once loaded
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub classifier: Classifier,
    pub scaler: Scaler,
    pub label_encoder: LabelEncoder,
    pub schema: FeatureSchema,
}

impl ModelArtifacts {
    /// Load all four artifacts from `dir`
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let mut resolved = Vec::with_capacity(ArtifactKind::ALL.len());
        let mut missing = Vec::new();

        for kind in ArtifactKind::ALL {
            match resolve_artifact(dir, kind)? {
                Some(path) => resolved.push(path),
                None => missing.push(kind),
            }
        }
        if !missing.is_empty() {
            return Err(ArtifactError::Missing(missing));
        }

        let [classifier, scaler, label_encoder, schema]: [PathBuf; 4] = resolved
            .try_into()
            .map_err(|_| ArtifactError::Missing(ArtifactKind::ALL.to_vec()))?;

        Ok(Self {
            classifier: read_artifact(ArtifactKind::Classifier, &classifier)?,
            scaler: read_artifact(ArtifactKind::Scaler, &scaler)?,
            label_encoder: read_artifact(ArtifactKind::LabelEncoder, &label_encoder)?,
            schema: read_artifact(ArtifactKind::FeatureNames, &schema)?,
        })
    }

    /// Cross-artifact mismatches that will fail the first inference.
    ///
    /// Loading does not reject these; they are reported so schema drift
    /// between training and serving is visible in the startup log.
    pub fn consistency_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let width = self.schema.len();

        if self.scaler.width() != width {
            warnings.push(format!(
                "scaler was fitted on {} features but the feature list has {}",
                self.scaler.width(),
                width
            ));
        }
        match self.classifier.n_features() {
            Some(n) if n != width => warnings.push(format!(
                "classifier expects {} features but the feature list has {}",
                n, width
            )),
            None => warnings.push("classifier has no weights".to_string()),
            _ => {}
        }
        if self.classifier.n_classes() > self.label_encoder.len() {
            warnings.push(format!(
                "classifier can emit {} classes but the label encoder knows {}",
                self.classifier.n_classes(),
                self.label_encoder.len()
            ));
        }

        warnings
    }

    /// Encode, align, scale, classify and decode one observation
    pub fn predict(&self, observation: &Observation) -> Result<String, InferenceError> {
        let encoded = EncodedFeatures::encode(observation);

        let dropped = self.schema.unknown_columns(&encoded);
        if !dropped.is_empty() {
            tracing::debug!(?dropped, "Encoded columns not present in the feature list");
        }

        let row = self.schema.align(&encoded);
        let scaled = self.scaler.transform(&row)?;
        let index = self.classifier.predict(&scaled)?;
        Ok(self.label_encoder.decode(index)?.to_string())
    }
}

/// Loaded artifacts, or the reason they are not available
#[derive(Debug, Clone)]
pub enum ModelBundle {
    Ready(ModelArtifacts),
    Degraded { reason: String },
}

impl ModelBundle {
    /// Load the bundle, degrading instead of failing
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        match ModelArtifacts::load(dir) {
            Ok(artifacts) => {
                tracing::info!(
                    "Model artifacts loaded from {} ({} features, {} classes)",
                    dir.display(),
                    artifacts.schema.len(),
                    artifacts.label_encoder.len()
                );
                for warning in artifacts.consistency_warnings() {
                    tracing::warn!("Model artifacts are inconsistent: {}", warning);
                }
                ModelBundle::Ready(artifacts)
            }
            Err(e) => {
                tracing::error!("Prediction disabled: {}", e);
                ModelBundle::Degraded {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn artifacts(&self) -> Option<&ModelArtifacts> {
        match self {
            ModelBundle::Ready(artifacts) => Some(artifacts),
            ModelBundle::Degraded { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelBundle::Ready(_))
    }

    pub fn status(&self) -> &'static str {
        if self.is_ready() {
            "loaded"
        } else {
            "degraded"
        }
    }
}

/// Pick the artifact file for `kind` in `dir`.
///
/// When several files match, the lexicographically greatest name wins so that
/// date- or version-suffixed exports resolve to the newest one.
pub fn resolve_artifact(dir: &Path, kind: ArtifactKind) -> Result<Option<PathBuf>, ArtifactError> {
    let entries = fs::read_dir(dir).map_err(|source| ArtifactError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| kind.matches(name))
        .collect();
    candidates.sort();

    if candidates.len() > 1 {
        tracing::warn!(
            "Several {} artifacts found in {}: {:?}; using the last",
            kind,
            dir.display(),
            candidates
        );
    }

    Ok(candidates.pop().map(|name| dir.join(name)))
}

fn read_artifact<T: DeserializeOwned>(kind: ArtifactKind, path: &Path) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| ArtifactError::Read {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        kind,
        path: path.to_path_buf(),
        source,
    })
}
