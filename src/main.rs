// Phishscan service entrypoint: loads the model bundle, classifies one
// submission from the command line, and prints the JSON result. The HTTP
// surface lives in front of this crate and is not part of it.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use phishscan::models::Submission;
use phishscan::services::artifacts::ArtifactStore;
use phishscan::services::extraction::TextExtractor;
use phishscan::services::inference::PhishClassifier;
use phishscan::services::legacy_scorer::LegacyUrlScorer;

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

fn build_classifier(args: &[String]) -> anyhow::Result<PhishClassifier> {
    let artifact_dir = parse_arg_value(args, "--models")
        .map(PathBuf::from)
        .unwrap_or_else(ArtifactStore::default_artifact_dir);

    // Artifact load failure is fatal: no partial readiness.
    let bundle = ArtifactStore::new(artifact_dir)
        .load_bundle()
        .context("model artifacts failed to load")?;

    let mut classifier = PhishClassifier::new(bundle);
    if let Some(cmd) = parse_arg_value(args, "--legacy-url-cmd") {
        let parts: Vec<String> = cmd.split_whitespace().map(|s| s.to_string()).collect();
        classifier = classifier.with_legacy_url_scorer(LegacyUrlScorer::new(parts));
    }
    if let Some(cmd) = parse_arg_value(args, "--extractor-cmd") {
        let parts: Vec<String> = cmd.split_whitespace().map(|s| s.to_string()).collect();
        classifier = classifier.with_extractor(TextExtractor::new(parts));
    }
    Ok(classifier)
}

fn build_submission(args: &[String]) -> anyhow::Result<Submission> {
    if let Some(text) = parse_arg_value(args, "--text") {
        return Ok(Submission::TextContent(text));
    }
    if let Some(url) = parse_arg_value(args, "--url") {
        return Ok(Submission::UrlString(url));
    }
    if let Some(path) = parse_arg_value(args, "--file") {
        let filename = std::path::Path::new(&path)
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let bytes =
            std::fs::read(&path).with_context(|| format!("failed to read upload {}", path))?;
        return Ok(Submission::DocumentUpload { bytes, filename });
    }
    anyhow::bail!("one of --text, --url, --file is required")
}

#[tokio::main]
async fn main() -> ExitCode {
    phishscan::init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage:\n  phishscan --text <body> | --url <address> | --file <path>\n    [--models <dir>] [--legacy-url-cmd <command>] [--extractor-cmd <command>] [--health]"
        );
        return ExitCode::FAILURE;
    }

    let classifier = match build_classifier(&args) {
        Ok(classifier) => classifier,
        Err(e) => {
            eprintln!("Fatal: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if has_flag(&args, "--health") {
        println!(
            "{}",
            serde_json::to_string_pretty(&classifier.health()).unwrap_or_default()
        );
        return ExitCode::SUCCESS;
    }

    let submission = match build_submission(&args) {
        Ok(submission) => submission,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match classifier.classify(submission).await {
        Ok(result) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&result).unwrap_or_default()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            // Canonical error envelope, same shape on every call path.
            println!(
                "{}",
                serde_json::to_string_pretty(&e.to_envelope()).unwrap_or_default()
            );
            ExitCode::FAILURE
        }
    }
}
