//! Issuer / investment name resolution.
//!
//! Trade confirmations name the traded security; every other document names
//! the fund or company. Brokers, registrars and the investor are never an
//! issuer.

use tracing::debug;

use crate::models::DocType;

use super::evidence::{contains_term, find_term, TextEvidence};
use super::patterns::{
    first_column, ABN_MARKER, COLUMN_SPLIT, COMPANY_LABEL, COMPANY_SUFFIX, FUND_LABEL,
    INVESTMENT_LABEL, LABEL_PREFIX, PARENTHETICAL, SECURITY_DESCRIPTION, SECURITY_DESCRIPTORS,
    STOCK_DESCRIPTION, TRADE_LEAD_IN, TRAILING_AMOUNTS, TRAILING_COLUMNS, TRAILING_ELLIPSIS,
    TRAILING_TERMS, WHITESPACE_RUN,
};

/// Brokers, registrars and service providers.
pub const EXCLUDED_NAMES: &[&str] = &[
    "COMMSEC",
    "JBWERE",
    "ORD MINNETT",
    "MORGAN STANLEY",
    "COMPUTERSHARE",
    "LINK MARKET SERVICES",
    "AUTOMIC",
    "BOARDROOM",
    "CMC MARKETS",
    "NABTRADE",
    "BELL POTTER",
    "MIDSEC",
    "FIDANTE",
    "EQUITY & SUPER",
    "EQUITYSUPER",
    "OIF REGISTRY SERVICES",
];

/// Known fund managers, matched in order.
pub const CANONICAL_ISSUERS: &[&str] = &["Vanguard", "iShares", "BlackRock", "Betashares", "Magellan"];

/// Name variants mapped to their canonical form, checked before the list.
pub const ISSUER_VARIANTS: &[(&str, &str)] = &[
    ("iShares by BlackRock", "iShares"),
    ("BlackRock Investment Management", "BlackRock"),
    ("Vanguard Investments Australia", "Vanguard"),
    ("Magellan Asset Management", "Magellan"),
    ("BetaShares Capital", "Betashares"),
];

const DISCLAIMER_TERMS: &[&str] = &["IN AUSTRALIA", "LIABILITY", "MEMBERS", "UNLESS OTHERWISE STATED"];

const PLACEHOLDERS: &[&str] = &["UNKNOWN", "N/A", "NA", "NONE", "NULL", "NIL", "-"];

/// Table headers and document labels that are never part of a name.
const NON_NAME_TERMS: &[&str] = &[
    "QUANTITY",
    "PRICE",
    "CONSIDERATION",
    "BROKERAGE",
    "CURRENCY",
    "ORDER STATUS",
    "ACCOUNT NO",
    "CONFIRMATION NO",
    "TRADE DATE",
    "SETTLEMENT DATE",
    "HIN",
    "ADVISER NAME",
    "FOLLOWING",
    "TAX INVOICE",
    "BUY CONFIRMATION",
    "SELL CONFIRMATION",
    "RETAIN FOR TAXATION PURPOSES",
    "DESCRIPTION",
];

const MAX_NAME_LEN: usize = 100;

/// Document title phrases a fund name is printed in front of.
fn title_phrases(doc_type: DocType) -> &'static [&'static str] {
    match doc_type {
        DocType::DividendStatement => &["DIVIDEND STATEMENT", "DIVIDEND ADVICE"],
        DocType::DistributionStatement => &[
            "DISTRIBUTION STATEMENT",
            "DISTRIBUTION ADVICE",
            "DISTRIBUTION PAYMENT",
        ],
        DocType::CapitalCallStatement | DocType::CallAndDistributionStatement => &[
            "CALL AND DISTRIBUTION STATEMENT",
            "CAPITAL CALL NOTICE",
            "NOTICE OF CAPITAL CALL",
            "CAPITAL CALL",
            "DISTRIBUTION STATEMENT",
        ],
        DocType::HoldingStatement | DocType::NetAssetSummaryStatement => &[
            "SHARE SUMMARY",
            "NAV STATEMENT",
            "NAV SUMMARY",
            "NET ASSET SUMMARY",
            "HOLDING STATEMENT",
        ],
        DocType::TaxStatement => &["ANNUAL TAX STATEMENT", "TAXATION STATEMENT", "TAX STATEMENT"],
        DocType::FinancialStatement => &["DIRECTORS' REPORT", "FINANCIAL STATEMENTS"],
        DocType::PeriodicStatement => &["PERIODIC STATEMENT"],
        DocType::BankStatement => &["BANK STATEMENT"],
        DocType::BuyContract | DocType::SellContract | DocType::Other => &[],
    }
}

/// Resolves the issuer of a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssuerResolver;

impl IssuerResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the issuer from raw text.
    pub fn resolve(&self, text: &str, doc_type: Option<DocType>) -> Option<String> {
        self.resolve_with_evidence(text, doc_type, &TextEvidence::new(text))
    }

    /// Resolve the issuer reusing already computed evidence for `text`.
    pub fn resolve_with_evidence(
        &self,
        text: &str,
        doc_type: Option<DocType>,
        evidence: &TextEvidence,
    ) -> Option<String> {
        if doc_type.is_some_and(DocType::is_trade) {
            if let Some(name) = self.security_name(text, evidence) {
                return Some(name);
            }
        }

        if let Some(name) = canonical_issuer(evidence) {
            return Some(name.to_string());
        }

        match doc_type {
            Some(doc_type) if !doc_type.is_trade() => self.fund_name(text, doc_type, evidence),
            _ => None,
        }
    }

    fn security_name(&self, text: &str, evidence: &TextEvidence) -> Option<String> {
        let labelled = [&*COMPANY_LABEL, &*STOCK_DESCRIPTION, &*SECURITY_DESCRIPTION];
        for (source, re) in labelled.into_iter().enumerate() {
            if let Some(name) = first_accepted(
                re.captures_iter(text).map(|caps| caps[1].to_string()),
                evidence,
            ) {
                debug!(source, %name, "security name from label");
                return Some(name);
            }
        }

        if let Some(name) = first_accepted(table_descriptions(text), evidence) {
            debug!(%name, "security name from transaction table");
            return Some(name);
        }

        let trailing = [&*INVESTMENT_LABEL, &*TRADE_LEAD_IN];
        for re in trailing {
            if let Some(name) = first_accepted(
                re.captures_iter(text).map(|caps| caps[1].to_string()),
                evidence,
            ) {
                return Some(name);
            }
        }

        first_accepted(
            COMPANY_SUFFIX
                .captures_iter(text)
                .map(|caps| caps[1].to_string()),
            evidence,
        )
    }

    fn fund_name(
        &self,
        text: &str,
        doc_type: DocType,
        evidence: &TextEvidence,
    ) -> Option<String> {
        let labelled = FUND_LABEL
            .captures_iter(text)
            .map(|caps| first_column(&caps[1]).to_string());
        if let Some(name) = first_accepted_plain(labelled, evidence) {
            return Some(name);
        }

        let phrases = title_phrases(doc_type);
        let titles = text.lines().filter_map(|line| title_before(line, phrases));
        if let Some(name) = first_accepted_plain(titles, evidence) {
            return Some(name);
        }

        let before_abn = text.lines().filter_map(|line| {
            let m = ABN_MARKER.find(line)?;
            Some(line[..m.start()].to_string())
        });
        first_accepted_plain(before_abn, evidence)
    }
}

fn canonical_issuer(evidence: &TextEvidence) -> Option<&'static str> {
    for &(variant, canonical) in ISSUER_VARIANTS {
        if evidence.has(&variant.to_uppercase()) {
            return Some(canonical);
        }
    }
    CANONICAL_ISSUERS
        .iter()
        .copied()
        .find(|name| evidence.has(&name.to_uppercase()))
}

/// Text preceding the first title phrase on a line.
fn title_before(line: &str, phrases: &[&str]) -> Option<String> {
    let upper = line.to_uppercase();
    // Byte offsets only line up when upper-casing kept every length.
    if upper.len() != line.len() {
        return None;
    }
    phrases.iter().find_map(|phrase| {
        let start = find_term(&upper, phrase)?;
        (start > 0).then(|| line[..start].to_string())
    })
}

/// Candidate values of a transaction table's description column.
fn table_descriptions(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut out = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let upper = line.to_uppercase();
        let is_header = contains_term(&upper, "DESCRIPTION")
            && ["QUANTITY", "PRICE", "CODE"]
                .iter()
                .any(|t| contains_term(&upper, t));
        if !is_header {
            continue;
        }

        for row in lines[i + 1..]
            .iter()
            .filter(|l| !l.trim().is_empty())
            .take(5)
        {
            let longest = COLUMN_SPLIT
                .split(row.trim())
                .filter(|col| col.chars().filter(|c| c.is_alphabetic()).count() >= 2)
                .max_by_key(|col| col.chars().count());
            if let Some(col) = longest {
                out.push(col.to_string());
            }
        }
    }

    out
}

fn first_accepted(
    candidates: impl IntoIterator<Item = String>,
    evidence: &TextEvidence,
) -> Option<String> {
    candidates
        .into_iter()
        .map(|raw| clean_security_name(&raw))
        .find(|name| is_acceptable(name, evidence))
}

fn first_accepted_plain(
    candidates: impl IntoIterator<Item = String>,
    evidence: &TextEvidence,
) -> Option<String> {
    candidates
        .into_iter()
        .map(|raw| trim_name(&raw))
        .find(|name| is_acceptable(name, evidence))
}

/// Strip column spill, descriptors and notes from a security name.
pub fn clean_security_name(raw: &str) -> String {
    let name = first_column(raw);
    let name = LABEL_PREFIX.replace(name.trim(), "");
    let name = PARENTHETICAL.replace_all(&name, "");
    let name = TRAILING_TERMS.replace(&name, "");
    let name = TRAILING_COLUMNS.replace(&name, "");
    let name = TRAILING_AMOUNTS.replace(&name, "");
    let name = SECURITY_DESCRIPTORS.replace_all(&name, " ");
    trim_name(&name)
}

fn trim_name(raw: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(raw, " ");
    let collapsed = TRAILING_ELLIPSIS.replace(&collapsed, "");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '|' | ':' | ',' | ';' | '–'))
        .to_string()
}

fn is_acceptable(name: &str, evidence: &TextEvidence) -> bool {
    if name.chars().filter(|c| c.is_alphabetic()).count() < 2
        || name.chars().count() < 3
        || name.len() > MAX_NAME_LEN
    {
        return false;
    }

    let upper = name.to_uppercase();
    if PLACEHOLDERS.contains(&upper.as_str()) {
        return false;
    }
    if DISCLAIMER_TERMS
        .iter()
        .chain(NON_NAME_TERMS)
        .any(|t| contains_term(&upper, t))
    {
        return false;
    }

    !is_excluded_name(name, evidence)
}

/// Whether `name` refers to a broker, registrar or the investor.
pub fn is_excluded_name(name: &str, evidence: &TextEvidence) -> bool {
    let upper = name.trim().to_uppercase();
    if upper.is_empty() {
        return false;
    }
    if EXCLUDED_NAMES.iter().any(|ex| contains_term(&upper, ex)) {
        return true;
    }
    evidence
        .investor_names()
        .iter()
        .any(|investor| contains_term(&upper, investor) || contains_term(investor, &upper))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolve(text: &str, doc_type: DocType) -> Option<String> {
        IssuerResolver::new().resolve(text, Some(doc_type))
    }

    #[test]
    fn test_company_label_beats_description() {
        let text = "Company: Insurance Australia Group Ltd\nSecurity Description: IAG ORDINARY FULLY PAID";
        assert_eq!(
            resolve(text, DocType::BuyContract),
            Some("Insurance Australia Group Ltd".to_string())
        );
    }

    #[test]
    fn test_inline_security_description() {
        let text = "BUY CONFIRMATION ... Security Description BETASHARES AUSTRALIA 200 ETF Price 23.46";
        assert_eq!(
            resolve(text, DocType::BuyContract),
            Some("BETASHARES AUSTRALIA 200 ETF".to_string())
        );
    }

    #[test]
    fn test_descriptors_and_notes_removed() {
        assert_eq!(clean_security_name("BRAMBLES LIMITED FPO"), "BRAMBLES LIMITED");
        assert_eq!(
            clean_security_name("NAB CAPITAL NOTES (NABPF) FRN Callable 2027"),
            "NAB CAPITAL NOTES"
        );
        assert_eq!(
            clean_security_name("CLEO DIAGNOSTICS LTD ORDINARY FULLY PAID   1,000   0.45"),
            "CLEO DIAGNOSTICS LTD"
        );
    }

    #[test]
    fn test_trailing_ellipsis_removed() {
        let text = "BUY CONFIRMATION\nSecurity Description: XYZ ETF ... Confirmation Date: 13 Nov 2025";
        assert_eq!(resolve(text, DocType::BuyContract), Some("XYZ ETF".to_string()));
        assert_eq!(clean_security_name("ACME HOLDINGS LTD…"), "ACME HOLDINGS LTD");
    }

    #[test]
    fn test_generic_greeting_does_not_block_issuer() {
        let text = "Dear Investor,\nInvestor Mutual Fund Distribution Statement\nPayment Date: 15/05/2024";
        assert_eq!(
            resolve(text, DocType::DistributionStatement),
            Some("Investor Mutual Fund".to_string())
        );
    }

    #[test]
    fn test_transaction_table_row() {
        let text = "TRADE CONFIRMATION\n\
                    Code | Description | Quantity | Price\n\
                    VAS | VANGUARD AUSTRALIAN SHARES INDEX ETF | 100 | 95.10\n";
        assert_eq!(
            resolve(text, DocType::BuyContract),
            Some("VANGUARD AUSTRALIAN SHARES INDEX ETF".to_string())
        );
    }

    #[test]
    fn test_disclaimer_falls_through() {
        let text = "Security Description: Liability limited by a scheme approved under Professional Standards Legislation\n\
                    Investment: Perpetual Diversified Income Active ETF";
        assert_eq!(
            resolve(text, DocType::BuyContract),
            Some("Perpetual Diversified Income Active ETF".to_string())
        );
    }

    #[test]
    fn test_broker_lead_in_is_skipped() {
        let text = "MIDSEC PTY LTD has bought for you\nCLEO DIAGNOSTICS LTD 1,000 0.45";
        assert_eq!(
            resolve(text, DocType::BuyContract),
            Some("CLEO DIAGNOSTICS LTD".to_string())
        );
    }

    #[test]
    fn test_investor_never_returned() {
        let text = "Account Name: GENLIM PTY LTD\nWe have sold: GENLIM PTY LTD";
        assert_eq!(resolve(text, DocType::SellContract), None);
    }

    #[test]
    fn test_canonical_variants() {
        assert_eq!(
            resolve("Distribution from iShares by BlackRock", DocType::DistributionStatement),
            Some("iShares".to_string())
        );
        assert_eq!(
            resolve("VANGUARD Diversified Growth Index", DocType::HoldingStatement),
            Some("Vanguard".to_string())
        );
    }

    #[test]
    fn test_registrar_is_not_issuer() {
        let text = "Computershare Investor Services\nDistribution Advice";
        assert_eq!(resolve(text, DocType::DistributionStatement), None);
    }

    #[test]
    fn test_fund_label() {
        let text = "Fund: Ares Diversified Credit Fund - Class I\nComputershare";
        assert_eq!(
            resolve(text, DocType::DistributionStatement),
            Some("Ares Diversified Credit Fund - Class I".to_string())
        );
    }

    #[test]
    fn test_title_before_phrase() {
        assert_eq!(
            resolve("XYZ Fund NAV Statement\nAs at 30 June", DocType::NetAssetSummaryStatement),
            Some("XYZ Fund".to_string())
        );
        assert_eq!(
            resolve(
                "BIOSCEPTRE INTERNATIONAL LIMITED DIRECTORS' REPORT AND FINANCIAL STATEMENTS",
                DocType::FinancialStatement
            ),
            Some("BIOSCEPTRE INTERNATIONAL LIMITED".to_string())
        );
    }

    #[test]
    fn test_name_before_abn() {
        let text = "Causeway Wholesale Private Debt Income Fund | ABN 12 345 678 901\nPayment Date 15/05/2024";
        assert_eq!(
            resolve(text, DocType::PeriodicStatement),
            Some("Causeway Wholesale Private Debt Income Fund".to_string())
        );
    }

    #[test]
    fn test_exclusion_list() {
        let ev = TextEvidence::new("Dear Simon Cunnington,");
        assert!(is_excluded_name("CommSec", &ev));
        assert!(is_excluded_name("Morgan Stanley Fund Services", &ev));
        assert!(is_excluded_name("Simon Cunnington", &ev));
        assert!(!is_excluded_name("Magellan Global Fund", &ev));
        for name in CANONICAL_ISSUERS {
            assert!(!is_excluded_name(name, &ev));
        }
    }
}
