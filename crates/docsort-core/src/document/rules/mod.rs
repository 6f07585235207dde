//! Rule-based extractors for financial document text.

pub mod account;
pub mod dates;
pub mod evidence;
pub mod issuer;
pub mod patterns;
pub mod taxonomy;

pub use account::{AccountExtractor, AsxCodeExtractor};
pub use dates::{parse_date_token, DateExtractor, DateResolver};
pub use evidence::{contains_term, find_term, TextEvidence};
pub use issuer::IssuerResolver;
pub use taxonomy::{PatternRule, PriorityRule, PATTERN_RULES};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
