// Phishscan Data Models
// Migrated from the legacy Python API schemas

use serde::{Deserialize, Serialize};

// ============ Submission ============

/// One piece of correspondence submitted for classification.
/// Exactly one variant per request; empty submissions are rejected
/// before entering the pipeline.
#[derive(Debug, Clone)]
pub enum Submission {
    /// Raw message body pasted by the caller.
    TextContent(String),
    /// Uploaded document; the extension of `filename` drives the
    /// extraction strategy.
    DocumentUpload { bytes: Vec<u8>, filename: String },
    /// A bare web address, scored by the URL model only.
    UrlString(String),
}

// ============ Verdict ============

/// Binary classification output. Model label 1 maps to Phishing, 0 to Safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Phishing,
    Safe,
}

impl Verdict {
    pub fn from_label(label: i64) -> Self {
        if label == 1 {
            Verdict::Phishing
        } else {
            Verdict::Safe
        }
    }

    pub fn is_phishing(self) -> bool {
        matches!(self, Verdict::Phishing)
    }

    /// OR-combine two verdicts: a single Phishing condemns the pair.
    pub fn or(self, other: Verdict) -> Verdict {
        if self.is_phishing() || other.is_phishing() {
            Verdict::Phishing
        } else {
            Verdict::Safe
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Phishing => "Phishing",
            Verdict::Safe => "Safe",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ Classification Response ============

/// Externally visible result. A sub-prediction is `None` when that
/// pipeline did not run for this submission (a pure URL submission
/// produces no `text_prediction`, and vice versa).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub text_prediction: Option<Verdict>,
    pub url_prediction: Option<Verdict>,
    pub final_prediction: Verdict,
}

// ============ Error Envelope ============

/// Canonical error payload. Every recoverable failure on every call
/// path (text, URL, document) is reported in this one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub status: String,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

// ============ Health ============

/// Startup health report: which artifact schemas are loaded and when the
/// newest of them was trained. `trained_at` is RFC 3339, `None` when no
/// artifact carries a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub ok: bool,
    pub vectorizer_schema: String,
    pub text_model_schema: String,
    pub url_scaler_schema: String,
    pub url_model_schema: String,
    pub vocabulary_size: usize,
    pub trained_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_serializes_as_label_string() {
        assert_eq!(serde_json::to_string(&Verdict::Phishing).unwrap(), "\"Phishing\"");
        assert_eq!(serde_json::to_string(&Verdict::Safe).unwrap(), "\"Safe\"");
    }

    #[test]
    fn test_verdict_or_semantics() {
        assert_eq!(Verdict::Safe.or(Verdict::Safe), Verdict::Safe);
        assert_eq!(Verdict::Safe.or(Verdict::Phishing), Verdict::Phishing);
        assert_eq!(Verdict::Phishing.or(Verdict::Safe), Verdict::Phishing);
    }

    #[test]
    fn test_result_null_fields_serialize() {
        let result = ClassificationResult {
            text_prediction: None,
            url_prediction: Some(Verdict::Safe),
            final_prediction: Verdict::Safe,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["text_prediction"].is_null());
        assert_eq!(json["url_prediction"], "Safe");
    }

    #[test]
    fn test_error_envelope_shape() {
        let env = ErrorEnvelope::new("Empty URL");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Empty URL");
    }
}
