//! Document field models shared by the classifier, resolvers and cache.

use serde::{Deserialize, Serialize};

/// Closed taxonomy of financial document types.
///
/// "Unknown" is represented as `Option::None` wherever a type is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocType {
    DividendStatement,
    DistributionStatement,
    CapitalCallStatement,
    CallAndDistributionStatement,
    PeriodicStatement,
    BankStatement,
    BuyContract,
    SellContract,
    HoldingStatement,
    TaxStatement,
    NetAssetSummaryStatement,
    FinancialStatement,
    Other,
}

impl DocType {
    /// Every variant, in declaration order.
    pub const ALL: [DocType; 13] = [
        DocType::DividendStatement,
        DocType::DistributionStatement,
        DocType::CapitalCallStatement,
        DocType::CallAndDistributionStatement,
        DocType::PeriodicStatement,
        DocType::BankStatement,
        DocType::BuyContract,
        DocType::SellContract,
        DocType::HoldingStatement,
        DocType::TaxStatement,
        DocType::NetAssetSummaryStatement,
        DocType::FinancialStatement,
        DocType::Other,
    ];

    /// Variant name as it appears on the wire.
    pub fn name(self) -> &'static str {
        match self {
            DocType::DividendStatement => "DividendStatement",
            DocType::DistributionStatement => "DistributionStatement",
            DocType::CapitalCallStatement => "CapitalCallStatement",
            DocType::CallAndDistributionStatement => "CallAndDistributionStatement",
            DocType::PeriodicStatement => "PeriodicStatement",
            DocType::BankStatement => "BankStatement",
            DocType::BuyContract => "BuyContract",
            DocType::SellContract => "SellContract",
            DocType::HoldingStatement => "HoldingStatement",
            DocType::TaxStatement => "TaxStatement",
            DocType::NetAssetSummaryStatement => "NetAssetSummaryStatement",
            DocType::FinancialStatement => "FinancialStatement",
            DocType::Other => "Other",
        }
    }

    /// Parse a type name, case-insensitively.
    ///
    /// Returns `None` for `"null"`, empty strings and unrecognized names.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
    }

    /// Fixed tag used in generated filenames.
    pub fn filename_tag(self) -> &'static str {
        match self {
            DocType::CallAndDistributionStatement => "DistributionAndCapitalCallStatement",
            other => other.name(),
        }
    }

    /// Reverse of [`DocType::filename_tag`].
    pub fn from_filename_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.filename_tag() == tag)
    }

    /// Types whose rule-based date beats an external guess.
    pub fn prefers_rule_date(self) -> bool {
        matches!(
            self,
            DocType::DividendStatement
                | DocType::DistributionStatement
                | DocType::CallAndDistributionStatement
                | DocType::NetAssetSummaryStatement
        )
    }

    /// Trade confirmations, where the issuer is the traded security.
    pub fn is_trade(self) -> bool {
        matches!(self, DocType::BuyContract | DocType::SellContract)
    }
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Structured fields resolved for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Document type, `None` when unknown.
    pub doc_type: Option<DocType>,

    /// Fund/company name, or the traded security for contracts.
    pub issuer: Option<String>,

    /// Effective date as `YYYY-MM-DD`.
    pub date_iso: Option<String>,

    /// Last four characters of the account/holder reference.
    pub account_last4: Option<String>,

    /// ASX ticker code.
    pub asx_code: Option<String>,
}

/// Outcome of document type classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Winning type, `None` if nothing scored.
    pub doc_type: Option<DocType>,
    /// Score of the winner, 0 when unclassified.
    pub score: u32,
}

impl ClassificationResult {
    pub fn new(doc_type: DocType, score: u32) -> Self {
        Self {
            doc_type: Some(doc_type),
            score,
        }
    }

    pub fn unclassified() -> Self {
        Self::default()
    }
}

/// Response of [`crate::DocumentEngine::process`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutcome {
    /// Whether enough text was available to classify.
    pub has_text: bool,
    /// Resolved fields.
    pub fields: ExtractedFields,
    /// Normalized filename for the document.
    pub suggested_filename: String,
}
