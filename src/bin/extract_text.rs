// Standalone text extractor invoked by the service across the process
// boundary. Contract: extracted plain text on stdout and exit 0, or a
// diagnostic on stderr and non-zero exit. Unsupported extensions fail
// deterministically.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use phishscan::services::subprocess::run_subprocess;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "tiff"];
const OCR_TIMEOUT: Duration = Duration::from_secs(60);

/// How a given file must be handled, decided from its extension alone.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ExtractionStrategy {
    Pdf,
    ImageOcr,
    /// Carries the (lower-cased) extension for the diagnostic.
    Unsupported(String),
}

fn strategy_for(path: &str) -> ExtractionStrategy {
    let extension = Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if extension == "pdf" {
        ExtractionStrategy::Pdf
    } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        ExtractionStrategy::ImageOcr
    } else {
        ExtractionStrategy::Unsupported(extension)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("Usage: extract_text <file_path>");
        return ExitCode::FAILURE;
    };

    if !Path::new(path).exists() {
        eprintln!("File not found: {}", path);
        return ExitCode::FAILURE;
    }

    let text = match strategy_for(path) {
        ExtractionStrategy::Pdf => extract_from_pdf(path),
        ExtractionStrategy::ImageOcr => extract_from_image(path).await,
        ExtractionStrategy::Unsupported(extension) => {
            eprintln!("Unsupported file type: .{}", extension);
            return ExitCode::FAILURE;
        }
    };

    match text {
        Ok(text) if !text.trim().is_empty() => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Ok(_) => {
            eprintln!("No text extracted from file.");
            ExitCode::FAILURE
        }
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

/// Page-by-page PDF text extraction, in-process.
fn extract_from_pdf(path: &str) -> Result<String, String> {
    pdf_extract::extract_text(path).map_err(|e| format!("Error processing PDF file {}: {}", path, e))
}

/// OCR via the system tesseract binary; `stdout` as the output base makes
/// it print the recognized text instead of writing a file.
async fn extract_from_image(path: &str) -> Result<String, String> {
    let args = vec![path.to_string(), "stdout".to_string()];
    let output = run_subprocess("tesseract", &args, None, OCR_TIMEOUT)
        .await
        .map_err(|e| format!("Failed to launch tesseract: {}", e))?;

    if !output.succeeded() {
        return Err(format!(
            "Error processing image file {}: {}",
            path,
            output.stderr.trim()
        ));
    }
    Ok(output.stdout)
}
