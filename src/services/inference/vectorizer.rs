// Text Vectorizer
// Applies the fitted TF-IDF transform to canonicalized text. Vocabulary
// and idf weights come from the training-time artifact; nothing is
// re-fitted here.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::services::error::ClassifyError;

/// Token pattern used at training time: runs of two or more word chars.
fn token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w\w+\b").unwrap())
}

/// Fitted bag-of-terms vectorizer with idf weighting and L2 output
/// normalization. Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Token to output column.
    pub vocabulary: HashMap<String, usize>,
    /// idf weight per column; length defines the output dimension.
    pub idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Internal consistency check between vocabulary and idf table.
    /// An artifact violating this never entered training, so it is a
    /// configuration error, not a per-request one.
    pub fn validate(&self) -> Result<(), ClassifyError> {
        for (token, column) in &self.vocabulary {
            if *column >= self.idf.len() {
                return Err(ClassifyError::ModelSchemaMismatch(format!(
                    "vectorizer token {:?} maps to column {} but idf table has {} entries",
                    token,
                    column,
                    self.idf.len()
                )));
            }
        }
        Ok(())
    }

    /// Transform canonicalized (already lower-cased) text into a fixed
    /// dimension dense vector: term counts weighted by idf, L2-normalized.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.idf.len()];

        for token in token_pattern().find_iter(text) {
            if let Some(&column) = self.vocabulary.get(token.as_str()) {
                vector[column] += 1.0;
            }
        }

        for (value, idf) in vector.iter_mut().zip(self.idf.iter()) {
            *value *= idf;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in vector.iter_mut() {
                *value /= norm;
            }
        }

        vector
    }
}
