//! Error types for the docsort-core library.
//!
//! Classification, date/issuer resolution and filename rendering are total
//! and never return these; they cover the I/O edges around the engine.

use thiserror::Error;

/// Main error type for the docsort library.
#[derive(Error, Debug)]
pub enum DocsortError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// The external classifier returned something unusable.
    #[error("external classifier error: {0}")]
    External(#[from] ExternalError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to reading the PDF text layer.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors at the boundary with the external (LLM) classifier.
#[derive(Error, Debug)]
pub enum ExternalError {
    /// The response could not be parsed as a field guess.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The classifier could not be reached or is disabled.
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
}

/// Errors related to loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// The filename separator would make filenames ambiguous.
    #[error("invalid filename separator {0:?}: must be non-empty and contain no letters or digits")]
    InvalidSeparator(String),

    /// The cache key length is outside what a SHA-256 hex digest provides.
    #[error("invalid cache key length {0}: must be between 1 and 64")]
    InvalidKeyLength(usize),

    /// The cache would never hold an entry.
    #[error("cache capacity must be at least 1")]
    ZeroCapacity,
}

/// Result type for the docsort library.
pub type Result<T> = std::result::Result<T, DocsortError>;
