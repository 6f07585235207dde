//! Text layer extraction using lopdf and pdf-extract.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, trace};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text layer reader.
///
/// Page texts are extracted once, on load.
pub struct PdfTextExtractor {
    document: Option<Document>,
    pages: Vec<String>,
}

impl PdfTextExtractor {
    /// Create an extractor with no document loaded.
    pub fn new() -> Self {
        Self {
            document: None,
            pages: Vec::new(),
        }
    }

    /// Read and load a PDF file.
    pub fn open(path: &Path) -> crate::Result<Self> {
        let data = std::fs::read(path)?;
        let mut extractor = Self::new();
        extractor.load(&data)?;
        Ok(extractor)
    }

    fn pages_text(&self) -> Result<&[String]> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }
        Ok(&self.pages)
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfTextExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        // Handle PDFs with empty password encryption
        let pages = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf_extract reads the decrypted copy
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            pdf_extract::extract_text_from_mem_by_pages(&decrypted_data)
        } else {
            pdf_extract::extract_text_from_mem_by_pages(data)
        }
        .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        debug!("Loaded PDF with {} pages", page_count);
        self.pages = pages;
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self, max_pages: usize) -> Result<String> {
        let pages = self.pages_text()?;
        let text = pages
            .iter()
            .take(max_pages)
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        trace!(chars = text.len(), max_pages, "extracted text layer");
        Ok(text)
    }

    fn has_text_layer(&self, min_chars: usize) -> bool {
        let has_text = self
            .pages_text()
            .map(|pages| pages.iter().any(|p| p.trim().chars().count() > min_chars))
            .unwrap_or(false);
        debug!(has_text, "PDF text layer check");
        has_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Object};

    fn empty_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfTextExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert!(!extractor.has_text_layer(100));
        assert!(matches!(extractor.extract_text(2), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_load_garbage() {
        let mut extractor = PdfTextExtractor::new();
        assert!(matches!(
            extractor.load(b"not a pdf at all"),
            Err(PdfError::Parse(_))
        ));
    }

    #[test]
    fn test_load_without_pages() {
        let mut extractor = PdfTextExtractor::new();
        assert!(matches!(extractor.load(&empty_pdf()), Err(PdfError::NoPages)));
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_failed_load_keeps_extractor_empty() {
        let mut extractor = PdfTextExtractor::new();
        assert!(extractor.load(&empty_pdf()).is_err());
        assert!(extractor.pages.is_empty());
        assert!(!extractor.has_text_layer(0));
        assert!(matches!(extractor.extract_text(2), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_text_comes_from_loaded_pages() {
        let mut extractor = PdfTextExtractor::new();
        extractor.document = Some(Document::with_version("1.5"));
        extractor.pages = vec![
            "  First page text  ".to_string(),
            "   ".to_string(),
            "Third page".to_string(),
        ];
        assert_eq!(extractor.extract_text(1).unwrap(), "First page text");
        assert_eq!(extractor.extract_text(5).unwrap(), "First page text\n\nThird page");
        assert!(extractor.has_text_layer(10));
        assert!(!extractor.has_text_layer(20));
    }
}
