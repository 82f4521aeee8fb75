// Classification Error Taxonomy
// Every recoverable failure downgrades to a structured error response;
// a request context must never crash on caller input.

use thiserror::Error;

use crate::models::ErrorEnvelope;

#[derive(Error, Debug)]
pub enum ClassifyError {
    /// No usable content in the submission (blank text, empty URL).
    #[error("No input provided")]
    EmptyInput,
    /// Extraction ran successfully but produced nothing scoreable.
    #[error("No text could be extracted from file")]
    NoTextExtracted,
    /// External tool exited non-zero or was killed on timeout.
    #[error("Extraction tool failed: {diagnostic}")]
    ExtractionToolFailure { diagnostic: String },
    /// Feature vector shape disagrees with the loaded model. Unrecoverable
    /// for the request; at startup the artifact loader treats it as fatal.
    #[error("Model schema mismatch: {0}")]
    ModelSchemaMismatch(String),
    /// Legacy tool stdout was not parseable as the expected payload.
    #[error("Invalid output from legacy tool: {0}")]
    MalformedUpstreamOutput(String),
    /// Filesystem failure while staging an upload.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

impl ClassifyError {
    /// Normalize to the one canonical error envelope used on all call paths.
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::new(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_message_matches_display() {
        let err = ClassifyError::ExtractionToolFailure {
            diagnostic: "unsupported file type: .docx".to_string(),
        };
        let env = err.to_envelope();
        assert_eq!(env.status, "error");
        assert!(env.message.contains("unsupported file type"));
    }

    #[test]
    fn test_empty_input_message_is_legacy_compatible() {
        assert_eq!(ClassifyError::EmptyInput.to_string(), "No input provided");
    }
}
