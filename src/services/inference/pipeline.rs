// Classification Pipeline
// Routes a submission through the text and URL pipelines, runs both
// models, and reconciles their verdicts. Stateless per request; the only
// shared long-lived state is the read-only model bundle.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::models::{ClassificationResult, HealthReport, Submission, Verdict};
use crate::services::artifacts::ModelBundle;
use crate::services::error::ClassifyError;
use crate::services::extraction::TextExtractor;
use crate::services::legacy_scorer::LegacyUrlScorer;
use crate::services::text_processor::{canonicalize, is_blank};
use crate::services::url_features::extract_url_features;

use super::combiner::{combine, combine_url_verdicts};

pub struct PhishClassifier {
    bundle: Arc<ModelBundle>,
    extractor: TextExtractor,
    legacy_url_scorer: Option<LegacyUrlScorer>,
}

impl PhishClassifier {
    pub fn new(bundle: ModelBundle) -> Self {
        Self {
            bundle: Arc::new(bundle),
            extractor: TextExtractor::companion(),
            legacy_url_scorer: None,
        }
    }

    pub fn with_extractor(mut self, extractor: TextExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Route URL submissions through the legacy out-of-process scorer
    /// instead of the in-process URL pipeline.
    pub fn with_legacy_url_scorer(mut self, scorer: LegacyUrlScorer) -> Self {
        self.legacy_url_scorer = Some(scorer);
        self
    }

    pub fn health(&self) -> HealthReport {
        let meta = &self.bundle.metadata;
        HealthReport {
            ok: true,
            vectorizer_schema: meta.vectorizer_schema.clone(),
            text_model_schema: meta.text_model_schema.clone(),
            url_scaler_schema: meta.url_scaler_schema.clone(),
            url_model_schema: meta.url_model_schema.clone(),
            vocabulary_size: self.bundle.vectorizer.n_features(),
            trained_at: meta.trained_at.map(|dt| dt.to_rfc3339()),
        }
    }

    /// Classify one submission of any kind. Document submissions block on
    /// the external extractor; everything else is pure computation.
    pub async fn classify(&self, submission: Submission) -> Result<ClassificationResult, ClassifyError> {
        let request_id = Uuid::new_v4();

        match submission {
            Submission::TextContent(text) => {
                info!(%request_id, kind = "text", "[PIPELINE] request");
                self.classify_text(&text)
            }
            Submission::UrlString(url) => {
                info!(%request_id, kind = "url", "[PIPELINE] request");
                let trimmed = url.trim();
                if trimmed.is_empty() {
                    return Err(ClassifyError::EmptyInput);
                }
                match &self.legacy_url_scorer {
                    Some(scorer) => scorer.score(trimmed).await,
                    None => self.classify_url(trimmed),
                }
            }
            Submission::DocumentUpload { bytes, filename } => {
                info!(%request_id, kind = "document", filename, "[PIPELINE] request");
                let text = self.extractor.extract(&bytes, &filename).await?;
                self.classify_text(&text)
            }
        }
    }

    /// Text pipeline: canonicalize, score the text model, and score every
    /// embedded URL independently. One phishing link condemns the whole
    /// submission.
    pub fn classify_text(&self, raw: &str) -> Result<ClassificationResult, ClassifyError> {
        if is_blank(raw) {
            return Err(ClassifyError::EmptyInput);
        }

        let canonical = canonicalize(raw);
        let text_vector = self.bundle.vectorizer.transform(&canonical.text);
        let text_verdict = self.bundle.text_model.predict(&text_vector)?;

        let mut url_verdicts = Vec::with_capacity(canonical.urls.len());
        for url in &canonical.urls {
            url_verdicts.push(self.score_url(url)?);
        }
        let url_verdict = combine_url_verdicts(&url_verdicts);

        info!(
            text = %text_verdict,
            urls = canonical.urls.len(),
            "[PIPELINE] text classified"
        );

        combine(Some(text_verdict), url_verdict).ok_or(ClassifyError::EmptyInput)
    }

    /// In-process URL pipeline: six fixed features, fitted scaler, URL
    /// model. No text verdict is produced on this path.
    pub fn classify_url(&self, url: &str) -> Result<ClassificationResult, ClassifyError> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(ClassifyError::EmptyInput);
        }

        let verdict = self.score_url(trimmed)?;
        info!(verdict = %verdict, "[PIPELINE] url classified");
        combine(None, Some(verdict)).ok_or(ClassifyError::EmptyInput)
    }

    fn score_url(&self, url: &str) -> Result<Verdict, ClassifyError> {
        let features = extract_url_features(url);
        let scaled = self.bundle.url_scaler.transform(&features)?;
        self.bundle.url_model.predict(&scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::artifacts::{test_support::write_fixture_artifacts, ArtifactStore};

    fn classifier() -> PhishClassifier {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_artifacts(dir.path());
        let bundle = ArtifactStore::new(dir.path().to_path_buf())
            .load_bundle()
            .unwrap();
        PhishClassifier::new(bundle)
    }

    #[test]
    fn test_text_without_urls_has_null_url_prediction() {
        let result = classifier()
            .classify_text("hello about the meeting tomorrow")
            .unwrap();
        assert!(result.url_prediction.is_none());
        assert_eq!(result.final_prediction, result.text_prediction.unwrap());
    }

    #[test]
    fn test_phishing_text_with_ip_link_is_phishing() {
        let result = classifier()
            .classify_text("Please verify your account at http://192.168.0.1/verify now")
            .unwrap();
        assert_eq!(result.text_prediction, Some(Verdict::Phishing));
        assert_eq!(result.url_prediction, Some(Verdict::Phishing));
        assert_eq!(result.final_prediction, Verdict::Phishing);
    }

    #[test]
    fn test_blank_text_is_empty_input() {
        let err = classifier().classify_text("   \n ").unwrap_err();
        assert!(matches!(err, ClassifyError::EmptyInput));
    }

    #[test]
    fn test_url_submission_produces_no_text_prediction() {
        let result = classifier()
            .classify_url("http://192.168.0.1/login-verify")
            .unwrap();
        assert!(result.text_prediction.is_none());
        assert_eq!(result.final_prediction, result.url_prediction.unwrap());
    }

    #[tokio::test]
    async fn test_empty_url_submission_is_empty_input() {
        let err = classifier()
            .classify(Submission::UrlString("   ".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifyError::EmptyInput));
    }

    #[tokio::test]
    async fn test_document_path_extracts_then_classifies() {
        let classifier = classifier().with_extractor(
            crate::services::extraction::TextExtractor::new(vec!["cat".to_string()]),
        );
        let result = classifier
            .classify(Submission::DocumentUpload {
                bytes: b"hello about the meeting tomorrow".to_vec(),
                filename: "mail.txt".to_string(),
            })
            .await
            .unwrap();
        assert!(result.text_prediction.is_some());
        assert!(result.url_prediction.is_none());
    }

    #[tokio::test]
    async fn test_document_with_whitespace_text_is_no_text_extracted() {
        let classifier = classifier().with_extractor(
            crate::services::extraction::TextExtractor::new(vec!["cat".to_string()]),
        );
        let err = classifier
            .classify(Submission::DocumentUpload {
                bytes: b"  \n ".to_vec(),
                filename: "scan.pdf".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifyError::NoTextExtracted));
    }

    #[tokio::test]
    async fn test_legacy_scorer_takes_over_url_path() {
        let classifier = classifier().with_legacy_url_scorer(
            crate::services::legacy_scorer::LegacyUrlScorer::new(vec![
                "sh".to_string(),
                "-c".to_string(),
                r#"echo '{"prediction":"Safe"}'"#.to_string(),
            ]),
        );
        let result = classifier
            .classify(Submission::UrlString("http://example.com".to_string()))
            .await
            .unwrap();
        assert_eq!(result.url_prediction, Some(Verdict::Safe));
        assert_eq!(result.final_prediction, Verdict::Safe);
    }

    #[test]
    fn test_health_reports_loaded_schemas() {
        let health = classifier().health();
        assert!(health.ok);
        assert_eq!(health.vocabulary_size, 5);
        assert!(health.vectorizer_schema.contains("tfidf"));
        assert_eq!(health.trained_at.as_deref(), Some("2025-11-05T14:00:00+00:00"));
    }
}
