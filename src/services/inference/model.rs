// Linear Model Scoring
// Both classifiers (text, URL) are fitted logistic-regression weights;
// inference is a dot product against an immutable weight vector.

use serde::{Deserialize, Serialize};

use crate::models::Verdict;
use crate::services::error::ClassifyError;

/// Fitted binary linear classifier. Label 1 (decision score > 0) means
/// Phishing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// Raw decision-function value for one feature vector.
    pub fn decision(&self, features: &[f64]) -> Result<f64, ClassifyError> {
        if features.len() != self.weights.len() {
            return Err(ClassifyError::ModelSchemaMismatch(format!(
                "model expects {} features, got {}",
                self.weights.len(),
                features.len()
            )));
        }
        let dot: f64 = self
            .weights
            .iter()
            .zip(features.iter())
            .map(|(w, x)| w * x)
            .sum();
        Ok(dot + self.intercept)
    }

    /// Binary verdict: decision score above zero is label 1, Phishing.
    pub fn predict(&self, features: &[f64]) -> Result<Verdict, ClassifyError> {
        let score = self.decision(features)?;
        Ok(Verdict::from_label(if score > 0.0 { 1 } else { 0 }))
    }
}
