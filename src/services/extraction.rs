// Document Text Extraction
// Stages an upload into a scoped temp file and hands it to the external
// extractor through the process-isolation boundary. The service never
// parses document formats in-process.

use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::error::ClassifyError;
use super::subprocess::{run_subprocess, DEFAULT_TIMEOUT};

/// External extractor contract: `<command> <file-path>` prints the
/// extracted plain text on stdout and exits 0, or writes a diagnostic to
/// stderr and exits non-zero (deterministically so for unsupported
/// extensions).
#[derive(Debug, Clone)]
pub struct TextExtractor {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl TextExtractor {
    pub fn new(command: Vec<String>) -> Self {
        let mut parts = command.into_iter();
        let program = parts.next().unwrap_or_else(|| "extract_text".to_string());
        Self {
            program,
            args: parts.collect(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Default to the companion `extract_text` binary shipped next to the
    /// service executable, falling back to PATH lookup.
    pub fn companion() -> Self {
        let program = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|d| d.join("extract_text")))
            .filter(|p| p.exists())
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| "extract_text".to_string());
        Self::new(vec![program])
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extract plain text from uploaded bytes. The temp artifact holding
    /// the upload lives only for the duration of this call and is removed
    /// on every exit path, including extraction failure.
    pub async fn extract(&self, bytes: &[u8], filename: &str) -> Result<String, ClassifyError> {
        let suffix = extension_suffix(filename);
        let staged = tempfile::Builder::new()
            .prefix("phishscan_upload_")
            .suffix(&suffix)
            .tempfile()?;

        {
            let mut file = tokio::fs::File::create(staged.path()).await?;
            file.write_all(bytes).await?;
            file.flush().await?;
        }
        debug!(path = %staged.path().display(), bytes = bytes.len(), "[EXTRACT] upload staged");

        let mut args = self.args.clone();
        args.push(staged.path().to_string_lossy().into_owned());
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

        let text = output.stdout.trim().to_string();
        if text.is_empty() {
            return Err(ClassifyError::NoTextExtracted);
        }

        info!(filename, chars = text.chars().count(), "[EXTRACT] text extracted");
        Ok(text)
    }
}

/// Keep the original extension on the staged file so the extractor can
/// dispatch on it. Unknown names get no suffix.
fn extension_suffix(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
