//! Upper-cased document text and the strong-signal predicates derived from it.
//!
//! The classifier tiers, the reconciler's forced corrections and the cache's
//! hit validation all read the same [`TextEvidence`], so they agree on which
//! category a text unambiguously belongs to.

use crate::models::DocType;

use super::patterns::{first_column, INVESTOR_NAME};

const CALL_AND_DISTRIBUTION_PHRASES: &[&str] = &[
    "CALL AND DISTRIBUTION STATEMENT",
    "CALL & DISTRIBUTION STATEMENT",
    "DIST AND CAPITAL CALL",
    "DISTRIBUTION AND CAPITAL CALL",
];

const CONFIRMATION_TERMS: &[&str] = &["CONFIRMATION", "CONTRACT NOTE"];

const BUY_TERMS: &[&str] = &["BUY", "WE HAVE BOUGHT", "HAS BOUGHT", "TRANSACTION TYPE: BUY"];

const BOUGHT_PHRASES: &[&str] = &["HAS BOUGHT", "WE HAVE BOUGHT", "BOUGHT FOR YOU"];

const SOLD_PHRASES: &[&str] = &[
    "HAS SOLD",
    "WE HAVE SOLD",
    "SOLD FOR YOU",
    "TRANSACTION TYPE: SELL",
    "SELL CONFIRMATION",
];

const DISTRIBUTION_PHRASES: &[&str] = &[
    "DISTRIBUTION STATEMENT",
    "DISTRIBUTION ADVICE",
    "DISTRIBUTION PAYMENT",
];

const NAV_PHRASES: &[&str] = &[
    "NAV STATEMENT",
    "NAV SUMMARY",
    "NET ASSET SUMMARY",
    "NET ASSET VALUE SUMMARY",
];

/// Check whether `term` occurs in `haystack` as a whole phrase.
///
/// Both sides are expected upper-case. A match must not be preceded or
/// followed by an ASCII alphanumeric character.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    find_term(haystack, term).is_some()
}

/// Byte offset of the first whole-phrase occurrence of `term`.
pub fn find_term(haystack: &str, term: &str) -> Option<usize> {
    if term.is_empty() {
        return None;
    }

    let bytes = haystack.as_bytes();
    let mut from = 0;
    while let Some(offset) = haystack[from..].find(term) {
        let start = from + offset;
        let end = start + term.len();

        let clean_before = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
        let clean_after = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if clean_before && clean_after {
            return Some(start);
        }

        from = start
            + haystack[start..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
    }
    None
}

/// Text prepared for rule matching.
#[derive(Debug, Clone)]
pub struct TextEvidence {
    upper: String,
    investor_names: Vec<String>,
}

impl TextEvidence {
    pub fn new(text: &str) -> Self {
        let upper = text.to_uppercase();
        let investor_names = collect_investor_names(&upper);
        Self {
            upper,
            investor_names,
        }
    }

    /// The upper-cased text.
    pub fn upper(&self) -> &str {
        &self.upper
    }

    /// Upper-cased names of the investor/account holder found in the text.
    pub fn investor_names(&self) -> &[String] {
        &self.investor_names
    }

    /// Whole-phrase match of an upper-case term.
    pub fn has(&self, term: &str) -> bool {
        contains_term(&self.upper, term)
    }

    pub fn has_any(&self, terms: &[&str]) -> bool {
        terms.iter().any(|t| self.has(t))
    }

    pub fn has_all(&self, terms: &[&str]) -> bool {
        terms.iter().all(|t| self.has(t))
    }

    /// Number of terms present.
    pub fn count(&self, terms: &[&str]) -> u32 {
        terms.iter().filter(|t| self.has(t)).count() as u32
    }

    pub fn is_call_and_distribution(&self) -> bool {
        self.has_any(CALL_AND_DISTRIBUTION_PHRASES)
            || self.has_all(&["CAPITAL CALL", "DISTRIBUTION", "STATEMENT"])
    }

    pub fn is_buy_contract(&self) -> bool {
        (self.has_any(CONFIRMATION_TERMS) && self.has_any(BUY_TERMS))
            || self.has_any(BOUGHT_PHRASES)
    }

    pub fn is_sell_contract(&self) -> bool {
        self.has_any(SOLD_PHRASES) && !self.is_buy_contract()
    }

    pub fn is_distribution_statement(&self) -> bool {
        self.has_any(DISTRIBUTION_PHRASES) && !self.is_buy_contract()
    }

    pub fn is_nav_summary(&self) -> bool {
        self.has_any(NAV_PHRASES) || self.has_all(&["FUND PERFORMANCE", "SHAREHOLDER"])
    }

    /// The category the text unambiguously names, if any.
    ///
    /// Precedence: call-and-distribution, then buy contract, then
    /// distribution statement.
    pub fn strong_category(&self) -> Option<DocType> {
        if self.is_call_and_distribution() {
            Some(DocType::CallAndDistributionStatement)
        } else if self.is_buy_contract() {
            Some(DocType::BuyContract)
        } else if self.is_distribution_statement() {
            Some(DocType::DistributionStatement)
        } else {
            None
        }
    }
}

/// Words a salutation may address without naming anyone.
const GENERIC_ADDRESSEES: &[&str] = &[
    "INVESTOR",
    "INVESTORS",
    "SHAREHOLDER",
    "SHAREHOLDERS",
    "UNITHOLDER",
    "UNITHOLDERS",
    "MEMBER",
    "MEMBERS",
    "CLIENT",
    "CUSTOMER",
    "SIR",
    "MADAM",
    "VALUED",
];

fn collect_investor_names(upper: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in INVESTOR_NAME.captures_iter(upper) {
        let name = first_column(&caps[2])
            .trim()
            .trim_end_matches(|c: char| c == ',' || c == '.' || c == ':')
            .trim();
        if caps.name("salutation").is_some() && !is_personal_salutation(name) {
            continue;
        }
        if name.chars().filter(|c| c.is_alphabetic()).count() >= 3
            && !names.iter().any(|n| n == name)
        {
            names.push(name.to_string());
        }
    }
    names
}

/// A salutation names a person only with two or more words, not all generic.
fn is_personal_salutation(name: &str) -> bool {
    let words: Vec<&str> = name.split_whitespace().collect();
    words.len() >= 2
        && !name
            .split(|c: char| !c.is_alphabetic())
            .filter(|w| !w.is_empty())
            .all(|w| GENERIC_ADDRESSEES.contains(&w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_contains_term_is_word_bounded() {
        assert!(contains_term("YOUR HIN: X0001234567", "HIN"));
        assert!(!contains_term("WITHIN 30 DAYS", "HIN"));
        assert!(!contains_term("NAVIGATOR FUND", "NAV"));
        assert!(contains_term("NAV STATEMENT", "NAV"));
        assert!(contains_term("BUY-SELL SPREAD", "BUY"));
        assert!(!contains_term("BUYER", "BUY"));
        assert!(contains_term("TRANSACTION TYPE: BUY", "TRANSACTION TYPE: BUY"));
        assert!(!contains_term("ANYTHING", ""));
    }

    #[test]
    fn test_contains_term_skips_bad_occurrence() {
        assert!(contains_term("BUYBACK THEN BUY", "BUY"));
        assert!(contains_term("CAFÉ BUY", "BUY"));
    }

    #[test]
    fn test_buy_contract_signals() {
        let ev = TextEvidence::new("Trade Confirmation\nTransaction: Buy\nETF Fund units");
        assert!(ev.is_buy_contract());
        assert_eq!(ev.strong_category(), Some(DocType::BuyContract));

        let ev = TextEvidence::new("MIDSEC PTY LTD has bought for you the following");
        assert!(ev.is_buy_contract());

        let ev = TextEvidence::new("Buy-back offer booklet");
        assert!(!ev.is_buy_contract());
    }

    #[test]
    fn test_sell_requires_no_buy() {
        let ev = TextEvidence::new("We have sold the following securities for you");
        assert!(ev.is_sell_contract());

        let ev = TextEvidence::new("We have sold ... we have bought");
        assert!(!ev.is_sell_contract());
    }

    #[test]
    fn test_strong_category_precedence() {
        let ev = TextEvidence::new("Capital Call Notice and Distribution Statement, Confirmation: Buy");
        assert_eq!(ev.strong_category(), Some(DocType::CallAndDistributionStatement));

        let ev = TextEvidence::new("Distribution Statement for the ETF. Contract note: BUY");
        assert_eq!(ev.strong_category(), Some(DocType::BuyContract));
        assert!(!ev.is_distribution_statement());

        let ev = TextEvidence::new("Distribution Advice\nPayment Date 15/05/2024");
        assert_eq!(ev.strong_category(), Some(DocType::DistributionStatement));

        let ev = TextEvidence::new("Holding statement as at 30 June");
        assert_eq!(ev.strong_category(), None);
    }

    #[test]
    fn test_nav_summary() {
        assert!(TextEvidence::new("XYZ Fund NAV Statement").is_nav_summary());
        assert!(TextEvidence::new("Fund Performance for each Shareholder").is_nav_summary());
        assert!(!TextEvidence::new("NAVIGATOR statement").is_nav_summary());
    }

    #[test]
    fn test_investor_names() {
        let ev = TextEvidence::new("Account Name: GENLIM PTY LTD\nDear Simon Cunnington,\nHIN 123");
        assert_eq!(
            ev.investor_names(),
            &["GENLIM PTY LTD".to_string(), "SIMON CUNNINGTON".to_string()]
        );
    }

    #[test]
    fn test_generic_salutations_are_not_investors() {
        for greeting in [
            "Dear Investor,",
            "Dear Shareholder",
            "Dear Unitholders,",
            "Dear Sir/Madam,",
            "Dear Sir / Madam",
            "Dear Valued Investor,",
            "Dear Simon,",
        ] {
            let ev = TextEvidence::new(&format!("{greeting}\nAcme Fund Distribution Statement"));
            assert!(ev.investor_names().is_empty(), "{greeting}");
        }

        let ev = TextEvidence::new("Dear Investor,\nAccount Name: JANE CITIZEN");
        assert_eq!(ev.investor_names(), &["JANE CITIZEN".to_string()]);
    }
}
