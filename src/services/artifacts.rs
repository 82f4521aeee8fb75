// Model Artifact Store
// Loads the four fitted artifacts (text vectorizer, text model, URL
// scaler, URL model) from JSON at startup. The resulting bundle is
// immutable and shared read-only across concurrent requests; a missing
// or incompatible artifact is fatal to the whole process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use super::inference::model::LinearModel;
use super::inference::vectorizer::TfidfVectorizer;
use super::url_features::{StandardScaler, URL_FEATURE_COUNT};

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const TEXT_MODEL_FILE: &str = "text_model.json";
pub const URL_SCALER_FILE: &str = "url_scaler.json";
pub const URL_MODEL_FILE: &str = "url_model.json";

pub const TFIDF_SCHEMA: &str = "phishscan/tfidf-v1";
pub const LINEAR_SCHEMA: &str = "phishscan/linear-v1";
pub const SCALER_SCHEMA: &str = "phishscan/scaler-v1";

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("failed to read artifact {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("artifact schema mismatch: {0}")]
    Schema(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VectorizerArtifact {
    pub schema: String,
    #[serde(default)]
    pub trained_at: Option<String>,
    #[serde(flatten)]
    pub vectorizer: TfidfVectorizer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LinearModelArtifact {
    pub schema: String,
    #[serde(default)]
    pub trained_at: Option<String>,
    #[serde(flatten)]
    pub model: LinearModel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerArtifact {
    pub schema: String,
    #[serde(default)]
    pub trained_at: Option<String>,
    #[serde(flatten)]
    pub scaler: StandardScaler,
}

/// Schema tags and training timestamp of the loaded artifacts, surfaced
/// by the health probe. `trained_at` is the most recent timestamp across
/// the four artifacts.
#[derive(Debug, Clone)]
pub struct BundleMetadata {
    pub vectorizer_schema: String,
    pub text_model_schema: String,
    pub url_scaler_schema: String,
    pub url_model_schema: String,
    pub trained_at: Option<DateTime<Utc>>,
}

/// All model state the pipeline ever consults. Constructed once at
/// startup, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    pub vectorizer: TfidfVectorizer,
    pub text_model: LinearModel,
    pub url_scaler: StandardScaler,
    pub url_model: LinearModel,
    pub metadata: BundleMetadata,
}

pub struct ArtifactStore {
    artifact_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(artifact_dir: PathBuf) -> Self {
        Self { artifact_dir }
    }

    /// Default artifact directory (overridable with PHISHSCAN_MODEL_DIR).
    pub fn default_artifact_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("PHISHSCAN_MODEL_DIR") {
            if !dir.trim().is_empty() {
                return PathBuf::from(dir);
            }
        }
        dirs::data_local_dir()
            .map(|p| p.join("phishscan").join("models"))
            .unwrap_or_else(|| PathBuf::from("models"))
    }

    /// Load and cross-validate the four artifacts. Each is independently
    /// loadable; any failure here aborts startup, there is no partial
    /// readiness.
    pub fn load_bundle(&self) -> Result<ModelBundle, ArtifactError> {
        let vectorizer: VectorizerArtifact = self.load_json(VECTORIZER_FILE)?;
        let text_model: LinearModelArtifact = self.load_json(TEXT_MODEL_FILE)?;
        let url_scaler: ScalerArtifact = self.load_json(URL_SCALER_FILE)?;
        let url_model: LinearModelArtifact = self.load_json(URL_MODEL_FILE)?;

        expect_schema(VECTORIZER_FILE, &vectorizer.schema, TFIDF_SCHEMA)?;
        expect_schema(TEXT_MODEL_FILE, &text_model.schema, LINEAR_SCHEMA)?;
        expect_schema(URL_SCALER_FILE, &url_scaler.schema, SCALER_SCHEMA)?;
        expect_schema(URL_MODEL_FILE, &url_model.schema, LINEAR_SCHEMA)?;

        vectorizer
            .vectorizer
            .validate()
            .map_err(|e| ArtifactError::Schema(e.to_string()))?;

        if text_model.model.n_features() != vectorizer.vectorizer.n_features() {
            return Err(ArtifactError::Schema(format!(
                "text model expects {} features but vectorizer produces {}",
                text_model.model.n_features(),
                vectorizer.vectorizer.n_features()
            )));
        }
        if url_scaler.scaler.n_features() != URL_FEATURE_COUNT {
            return Err(ArtifactError::Schema(format!(
                "URL scaler covers {} features, expected {}",
                url_scaler.scaler.n_features(),
                URL_FEATURE_COUNT
            )));
        }
        if url_model.model.n_features() != URL_FEATURE_COUNT {
            return Err(ArtifactError::Schema(format!(
                "URL model expects {} features, expected {}",
                url_model.model.n_features(),
                URL_FEATURE_COUNT
            )));
        }

        let trained_at = [
            parse_trained_at(VECTORIZER_FILE, &vectorizer.trained_at)?,
            parse_trained_at(TEXT_MODEL_FILE, &text_model.trained_at)?,
            parse_trained_at(URL_SCALER_FILE, &url_scaler.trained_at)?,
            parse_trained_at(URL_MODEL_FILE, &url_model.trained_at)?,
        ]
        .into_iter()
        .flatten()
        .max();

        info!(
            dir = %self.artifact_dir.display(),
            vocabulary = vectorizer.vectorizer.n_features(),
            "[ARTIFACTS] model bundle loaded"
        );

        Ok(ModelBundle {
            metadata: BundleMetadata {
                vectorizer_schema: vectorizer.schema,
                text_model_schema: text_model.schema,
                url_scaler_schema: url_scaler.schema,
                url_model_schema: url_model.schema,
                trained_at,
            },
            vectorizer: vectorizer.vectorizer,
            text_model: text_model.model,
            url_scaler: url_scaler.scaler,
            url_model: url_model.model,
        })
    }

    fn load_json<T: for<'de> Deserialize<'de>>(&self, name: &str) -> Result<T, ArtifactError> {
        let path = self.artifact_dir.join(name);
        let content = fs::read_to_string(&path).map_err(|source| ArtifactError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ArtifactError::Parse { path, source })
    }
}

/// A `trained_at` tag is optional but must be RFC 3339 when present.
fn parse_trained_at(
    file: &str,
    value: &Option<String>,
) -> Result<Option<DateTime<Utc>>, ArtifactError> {
    match value {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| {
                ArtifactError::Schema(format!(
                    "{} trained_at {:?} is not an RFC 3339 timestamp: {}",
                    file, raw, e
                ))
            }),
    }
}

fn expect_schema(file: &str, found: &str, expected: &str) -> Result<(), ArtifactError> {
    if found != expected {
        return Err(ArtifactError::Schema(format!(
            "{} carries schema {:?}, this build expects {:?}",
            file, found, expected
        )));
    }
    Ok(())
}
