//! Boundary with the external (LLM) field extractor.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ExternalError;
use crate::models::DocType;

/// Advisory field guess produced outside the rule engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalGuess {
    pub doc_type: Option<DocType>,
    pub issuer: Option<String>,
    pub date_iso: Option<String>,
    pub account_last4: Option<String>,
    pub asx_code: Option<String>,
    pub suggested_filename: Option<String>,
}

impl ExternalGuess {
    /// Parse a raw model response.
    ///
    /// Tolerates Markdown code fences, `"null"` and empty strings for absent
    /// values, and unknown document types. A top-level `null` is an empty
    /// guess.
    pub fn from_response(raw: &str) -> Result<Self, ExternalError> {
        let body = strip_fences(raw);
        let value: Value =
            serde_json::from_str(body).map_err(|e| ExternalError::Malformed(e.to_string()))?;

        let object = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => {
                return Err(ExternalError::Malformed(format!(
                    "expected an object, got {other}"
                )))
            }
        };

        let field = |key: &str| object.get(key).and_then(present_string);

        Ok(Self {
            doc_type: field("doc_type").and_then(|s| DocType::parse(&s)),
            issuer: field("issuer"),
            date_iso: field("date_iso"),
            account_last4: field("account_last4"),
            asx_code: field("asx_code"),
            suggested_filename: field("suggested_filename"),
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening fence line.
    let rest = rest.split_once('\n').map_or(rest, |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn present_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim(),
        _ => return None,
    };
    if s.is_empty() || s.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(s.to_string())
    }
}

/// Source of advisory field guesses.
pub trait ExternalExtractor: Send + Sync {
    /// Guess fields for `text`. `Ok(None)` means the extractor declined.
    fn extract(&self, text: &str) -> Result<Option<ExternalGuess>, ExternalError>;
}

impl<F> ExternalExtractor for F
where
    F: Fn(&str) -> Result<Option<ExternalGuess>, ExternalError> + Send + Sync,
{
    fn extract(&self, text: &str) -> Result<Option<ExternalGuess>, ExternalError> {
        self(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_json() {
        let guess = ExternalGuess::from_response(
            r#"{"doc_type": "BuyContract", "issuer": "XYZ ETF", "date_iso": "2025-11-13",
               "account_last4": "1234", "asx_code": "XYZ",
               "suggested_filename": "20251113_XyzEtf_BuyContract.pdf"}"#,
        )
        .unwrap();
        assert_eq!(guess.doc_type, Some(DocType::BuyContract));
        assert_eq!(guess.issuer.as_deref(), Some("XYZ ETF"));
        assert_eq!(guess.asx_code.as_deref(), Some("XYZ"));
        assert_eq!(
            guess.suggested_filename.as_deref(),
            Some("20251113_XyzEtf_BuyContract.pdf")
        );
    }

    #[test]
    fn test_fenced_response() {
        let raw = "```json\n{\"doc_type\": \"dividendstatement\", \"issuer\": \"BHP\"}\n```";
        let guess = ExternalGuess::from_response(raw).unwrap();
        assert_eq!(guess.doc_type, Some(DocType::DividendStatement));
        assert_eq!(guess.issuer.as_deref(), Some("BHP"));
    }

    #[test]
    fn test_null_like_values_are_absent() {
        let guess = ExternalGuess::from_response(
            r#"{"doc_type": "null", "issuer": "", "date_iso": null, "asx_code": 42}"#,
        )
        .unwrap();
        assert!(guess.is_empty());
    }

    #[test]
    fn test_unknown_doc_type_is_absent() {
        let guess =
            ExternalGuess::from_response(r#"{"doc_type": "Invoice", "issuer": "Acme"}"#).unwrap();
        assert_eq!(guess.doc_type, None);
        assert_eq!(guess.issuer.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_top_level_null() {
        assert!(ExternalGuess::from_response("null").unwrap().is_empty());
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            ExternalGuess::from_response("I think it's a dividend statement"),
            Err(ExternalError::Malformed(_))
        ));
        assert!(matches!(
            ExternalGuess::from_response("[1, 2]"),
            Err(ExternalError::Malformed(_))
        ));
    }

    #[test]
    fn test_closure_extractor() {
        let extractor = |_: &str| -> Result<Option<ExternalGuess>, ExternalError> {
            Err(ExternalError::Unavailable("offline".into()))
        };
        assert!(extractor.extract("text").is_err());
    }
}
