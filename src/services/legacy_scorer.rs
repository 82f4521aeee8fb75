// Legacy URL Scorer
// Optional parity path: score a URL by invoking the legacy out-of-process
// tool instead of the in-process pipeline, and normalize its JSON stdout.

use serde_json::Value;
use std::time::Duration;
use tracing::info;

use crate::models::{ClassificationResult, Verdict};

use super::error::ClassifyError;
use super::subprocess::{run_subprocess, DEFAULT_TIMEOUT};

/// Invokes `<command...> --mode url <url>` through the process-isolation
/// boundary. Output shape drifted across legacy versions; [`score`]
/// normalizes every observed variant to the canonical result.
#[derive(Debug, Clone)]
pub struct LegacyUrlScorer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl LegacyUrlScorer {
    pub fn new(command: Vec<String>) -> Self {
        let mut parts = command.into_iter();
        let program = parts.next().unwrap_or_default();
        Self {
            program,
            args: parts.collect(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn score(&self, url: &str) -> Result<ClassificationResult, ClassifyError> {
        let mut args = self.args.clone();
        args.extend(["--mode".to_string(), "url".to_string(), url.to_string()]);

        let output = run_subprocess(&self.program, &args, None, self.timeout)
            .await
            .map_err(|e| ClassifyError::ExtractionToolFailure {
                diagnostic: format!("failed to launch {}: {}", self.program, e),
            })?;

        if !output.succeeded() {
            return Err(ClassifyError::ExtractionToolFailure {
                diagnostic: if output.stderr.trim().is_empty() {
                    format!("exit status {}", output.status)
                } else {
                    output.stderr.trim().to_string()
                },
            });
        }

        let result = parse_legacy_payload(output.stdout.trim())?;
        info!(url, verdict = %result.final_prediction, "[LEGACY] URL scored out-of-process");
        Ok(result)
    }
}

/// Normalize the legacy tool's stdout. Newer versions emit
/// `final_prediction` directly; older ones only `url_prediction` or a
/// bare `prediction` key.
pub fn parse_legacy_payload(stdout: &str) -> Result<ClassificationResult, ClassifyError> {
    let value: Value = serde_json::from_str(stdout)
        .map_err(|e| ClassifyError::MalformedUpstreamOutput(e.to_string()))?;

    let label = value
        .get("final_prediction")
        .or_else(|| value.get("url_prediction"))
        .or_else(|| value.get("prediction"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ClassifyError::MalformedUpstreamOutput("no prediction field in payload".to_string())
        })?;

    let verdict = match label {
        "Phishing" => Verdict::Phishing,
        "Safe" => Verdict::Safe,
        other => {
            return Err(ClassifyError::MalformedUpstreamOutput(format!(
                "unknown prediction label {other:?}"
            )))
        }
    };

    Ok(ClassificationResult {
        text_prediction: None,
        url_prediction: Some(verdict),
        final_prediction: verdict,
    })
}
