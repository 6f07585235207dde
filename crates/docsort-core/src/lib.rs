//! Core library for financial document classification and renaming.
//!
//! This crate provides:
//! - PDF text layer extraction
//! - Rule-based document type classification with priority overrides
//! - Date, issuer, account and ASX code resolution
//! - Reconciliation with an advisory external field guess
//! - Deterministic filename rendering and a validated result cache

pub mod document;
pub mod error;
pub mod models;
pub mod pdf;

pub use document::{
    DocTypeClassifier, DocumentEngine, ExternalExtractor, ExternalGuess, FilenameBuilder,
    ResultCache, ResultReconciler,
};
pub use error::{ConfigError, DocsortError, ExternalError, PdfError, Result};
pub use models::{
    ClassificationResult, DateStyle, DocType, DocsortConfig, ExtractedFields, ProcessOutcome,
};
pub use pdf::{PdfProcessor, PdfTextExtractor};
