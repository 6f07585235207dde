//! Merging rule-based fields with an external guess.

use tracing::{debug, warn};

use crate::models::{DocType, ExtractedFields};

use super::external::ExternalGuess;
use super::filename::FilenameBuilder;
use super::rules::issuer::is_excluded_name;
use super::rules::{parse_date_token, TextEvidence};

/// A forced document type correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correction {
    /// Type the text was about to be filed under, `None` if unknown.
    pub from: Option<DocType>,
    /// Type named by the strong evidence.
    pub to: DocType,
}

/// Result of reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciled {
    pub fields: ExtractedFields,
    /// External filename, only when `fields` render to exactly this name.
    pub suggested_filename: Option<String>,
    pub corrections: Vec<Correction>,
}

/// Applies the per-field trust policy between rule and external results.
#[derive(Debug, Clone, Default)]
pub struct ResultReconciler {
    filenames: FilenameBuilder,
}

impl ResultReconciler {
    pub fn new(filenames: FilenameBuilder) -> Self {
        Self { filenames }
    }

    pub fn reconcile(
        &self,
        rule: &ExtractedFields,
        external: Option<&ExternalGuess>,
        evidence: &TextEvidence,
    ) -> Reconciled {
        let mut corrections = Vec::new();

        let candidate = external.and_then(|e| e.doc_type).or(rule.doc_type);
        let doc_type = match evidence.strong_category() {
            Some(strong) => {
                if candidate != Some(strong) {
                    warn!(
                        from = ?candidate,
                        to = %strong,
                        "strong evidence overrides document type"
                    );
                    corrections.push(Correction {
                        from: candidate,
                        to: strong,
                    });
                }
                Some(strong)
            }
            None => candidate,
        };

        let external_date = external
            .and_then(|e| e.date_iso.as_deref())
            .and_then(parse_date_token)
            .map(|d| d.format("%Y-%m-%d").to_string());
        let rule_wins_date =
            rule.date_iso.is_some() && doc_type.is_some_and(DocType::prefers_rule_date);
        let date_iso = if rule_wins_date {
            rule.date_iso.clone()
        } else {
            external_date.or_else(|| rule.date_iso.clone())
        };

        let external_issuer = external
            .and_then(|e| e.issuer.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .filter(|name| {
                let excluded = is_excluded_name(name, evidence);
                if excluded {
                    debug!(%name, "ignoring excluded external issuer");
                }
                !excluded
            })
            .map(String::from);

        let fields = ExtractedFields {
            doc_type,
            issuer: external_issuer.or_else(|| rule.issuer.clone()),
            date_iso,
            account_last4: prefer_external(
                external.and_then(|e| e.account_last4.as_deref()),
                &rule.account_last4,
            ),
            asx_code: prefer_external(
                external.and_then(|e| e.asx_code.as_deref()),
                &rule.asx_code,
            ),
        };

        let suggested_filename = external
            .and_then(|e| e.suggested_filename.as_deref())
            .filter(|name| self.agrees_with(name, &fields))
            .map(String::from);

        Reconciled {
            fields,
            suggested_filename,
            corrections,
        }
    }

    /// Whether an external filename is exactly what `fields` would render to.
    fn agrees_with(&self, filename: &str, fields: &ExtractedFields) -> bool {
        let agrees = self.filenames.build(fields) == filename;
        if !agrees {
            debug!(%filename, "discarding external filename that disagrees with fields");
        }
        agrees
    }
}

fn prefer_external(external: Option<&str>, rule: &Option<String>) -> Option<String> {
    external
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .or_else(|| rule.clone())
}
