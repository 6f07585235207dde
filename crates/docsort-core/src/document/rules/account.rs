//! Account reference and ASX ticker extraction.

use super::patterns::{ACCOUNT_NUMBER, ASX_CODE};
use super::{ExtractionMatch, FieldExtractor};

/// Extracts the last four characters of a labelled account/holder reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountExtractor;

impl AccountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for AccountExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in ACCOUNT_NUMBER.captures_iter(text) {
            let Some(token) = caps.get(1) else {
                continue;
            };
            if !token.as_str().chars().any(|c| c.is_ascii_digit()) {
                continue;
            }

            let account: String = token
                .as_str()
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_uppercase())
                .collect();
            if account.len() < 4 {
                continue;
            }

            let last4 = account[account.len() - 4..].to_string();
            let full = &caps[0];
            let confidence = if full.to_ascii_uppercase().starts_with("ACCOUNT") {
                0.9
            } else {
                0.85
            };
            results.push(
                ExtractionMatch::new(last4, confidence, full)
                    .with_position(token.start(), token.end()),
            );
        }

        results
    }
}

/// Extracts an ASX ticker code from a labelled field.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsxCodeExtractor;

impl AsxCodeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for AsxCodeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        ASX_CODE
            .captures_iter(text)
            .filter_map(|caps| {
                let code = caps.get(1)?;
                // Postcodes and amounts share the label
                if !code.as_str().chars().any(|c| c.is_ascii_uppercase()) {
                    return None;
                }
                Some(
                    ExtractionMatch::new(code.as_str().to_string(), 0.9, &caps[0])
                        .with_position(code.start(), code.end()),
                )
            })
            .collect()
    }
}
