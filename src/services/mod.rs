// Phishscan Core Services
// Migrated from the legacy Python backend

pub mod artifacts;
pub mod error;
pub mod extraction;
pub mod inference;
pub mod legacy_scorer;
pub mod subprocess;
pub mod text_processor;
pub mod url_features;

pub use artifacts::{ArtifactError, ArtifactStore, ModelBundle};
pub use error::ClassifyError;
pub use extraction::TextExtractor;
pub use inference::PhishClassifier;
pub use legacy_scorer::LegacyUrlScorer;
pub use subprocess::{run_subprocess, SubprocessOutput, DEFAULT_TIMEOUT, TIMEOUT_STATUS};
pub use text_processor::{canonicalize, CanonicalText, URL_SENTINEL};
pub use url_features::{extract_url_features, StandardScaler, SUSPICIOUS_KEYWORDS, URL_FEATURE_COUNT};
