//! Subcommand implementations and the helpers they share.

pub mod batch;
pub mod config;
pub mod process;

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use docsort_core::models::{DocsortConfig, ProcessOutcome};
use docsort_core::pdf::{PdfProcessor, PdfTextExtractor};

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DocsortConfig> {
    if let Some(path) = config_path {
        return Ok(DocsortConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(DocsortConfig::from_file(&default_path)?)
    } else {
        Ok(DocsortConfig::default())
    }
}

/// Read the text of a `.pdf` (text layer) or `.txt` (OCR output) file.
pub fn read_document_text(path: &Path, config: &DocsortConfig) -> anyhow::Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "txt" => Ok(fs::read_to_string(path)?),
        "pdf" => {
            let extractor = PdfTextExtractor::open(path)?;
            debug!("PDF has {} pages", extractor.page_count());

            if !extractor.has_text_layer(config.text.text_layer_min_chars) {
                warn!(
                    "{} has no usable text layer; pass OCR output as a .txt file instead",
                    path.display()
                );
            }
            Ok(extractor.extract_text(config.text.max_pages)?)
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

/// One CSV row per outcome, keyed by the source file name.
pub fn csv_header() -> [&'static str; 8] {
    [
        "file",
        "has_text",
        "doc_type",
        "issuer",
        "date",
        "account_last4",
        "asx_code",
        "suggested_filename",
    ]
}

pub fn csv_record(file: &str, outcome: &ProcessOutcome) -> [String; 8] {
    let fields = &outcome.fields;
    [
        file.to_string(),
        outcome.has_text.to_string(),
        fields.doc_type.map(|t| t.to_string()).unwrap_or_default(),
        fields.issuer.clone().unwrap_or_default(),
        fields.date_iso.clone().unwrap_or_default(),
        fields.account_last4.clone().unwrap_or_default(),
        fields.asx_code.clone().unwrap_or_default(),
        outcome.suggested_filename.clone(),
    ]
}
