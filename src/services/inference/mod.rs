// Inference Module
// Dual-model scoring core organized into specialized submodules:
// - vectorizer: fitted TF-IDF transform for canonicalized text
// - model: linear decision-function scoring shared by both classifiers
// - combiner: verdict reconciliation policy
// - pipeline: per-request orchestration across both pipelines

pub mod combiner;
pub mod model;
pub mod pipeline;
pub mod vectorizer;

pub use combiner::{combine, combine_url_verdicts};
pub use model::LinearModel;
pub use pipeline::PhishClassifier;
pub use vectorizer::TfidfVectorizer;
