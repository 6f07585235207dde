//! PDF text layer access.
//!
//! Only the embedded text layer is read; scanned pages without one yield
//! little or no text and are reported as insufficient by the engine.

mod extractor;

pub use extractor::PdfTextExtractor;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF text layer implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Text of the first `max_pages` pages, separated by blank lines.
    fn extract_text(&self, max_pages: usize) -> Result<String>;

    /// Whether any page carries more than `min_chars` trimmed characters.
    fn has_text_layer(&self, min_chars: usize) -> bool;
}
