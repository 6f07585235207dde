//! Common regex patterns for financial document extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Date token shapes, in preference order.
pub const DATE_TOKEN: &str = r"\d{1,2}[/-]\d{1,2}[/-]\d{4}|\d{4}[/-]\d{1,2}[/-]\d{1,2}|\d{1,2}\s+[A-Za-z]{3,9}\.?,?\s+\d{4}|\d{1,2}[/-]\d{1,2}[/-]\d{2}";

lazy_static! {
    // Date shapes
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[/-](\d{1,2})[/-](\d{1,2})\b"
    ).unwrap();

    pub static ref DATE_LONG: Regex = Regex::new(
        r"\b(\d{1,2})\s+([A-Za-z]{3,9})\.?,?\s+(\d{4})\b"
    ).unwrap();

    pub static ref DATE_DMY_SHORT: Regex = Regex::new(
        r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{2})\b"
    ).unwrap();

    // Account and ticker references
    pub static ref ACCOUNT_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:Account\s+Number|Account\s+No|Holder\s+ID|HIN|SRN|Account)\b[\s:#.]*([A-Z0-9-]{6,})"
    ).unwrap();

    pub static ref ASX_CODE: Regex = Regex::new(
        r"\b(?i:ASX\s+Code|Security\s+Code|Code)\b[\s:]*([A-Z0-9]{3,6})\b"
    ).unwrap();

    // Investor / account holder names
    pub static ref INVESTOR_NAME: Regex = Regex::new(
        r"(?i)\b(?:(?:Account\s+Name|Holder\s+Name|Investor\s+Name|Account\s+Holder)[^\S\n]*:|(?P<salutation>Dear)\b)[^\S\n]*([^\n,]+)"
    ).unwrap();

    // Security name sources on trade confirmations
    pub static ref COMPANY_LABEL: Regex = Regex::new(
        r"(?i)\bCompany[^\S\n]*:[^\S\n]*([^\n]+)"
    ).unwrap();

    pub static ref STOCK_DESCRIPTION: Regex = Regex::new(
        r"(?i)\bStock\s+Description\b[\s:]*([^\n]+)"
    ).unwrap();

    pub static ref SECURITY_DESCRIPTION: Regex = Regex::new(
        r"(?i)\bSecurity\s+Description\b[\s:]*([^\n]+)"
    ).unwrap();

    pub static ref INVESTMENT_LABEL: Regex = Regex::new(
        r"(?i)\b(?:Investment|Security)[^\S\n]*:[^\S\n]*([^\n]+)"
    ).unwrap();

    pub static ref TRADE_LEAD_IN: Regex = Regex::new(
        r"(?i)\b(?:we\s+have|has)\s+(?:bought|sold)\b(?:\s+for\s+you\b)?[\s:]*([^\n]+)"
    ).unwrap();

    pub static ref COMPANY_SUFFIX: Regex = Regex::new(
        r"(?i)\b([A-Z][A-Z0-9&.' -]*?\b(?:LTD|LIMITED|TRUST|GROUP|HOLDINGS|ETF|FUND))\b"
    ).unwrap();

    // Fund name sources on statements
    pub static ref FUND_LABEL: Regex = Regex::new(
        r"(?i)\bFund(?:\s+Name)?[^\S\n]*:[^\S\n]*([^\n]+)"
    ).unwrap();

    pub static ref ABN_MARKER: Regex = Regex::new(
        r"(?i)\bABN\b"
    ).unwrap();

    // Candidate cleanup
    pub static ref COLUMN_SPLIT: Regex = Regex::new(
        r"[^\S\n]*\|[^\S\n]*|\t+|[^\S\n]{2,}"
    ).unwrap();

    pub static ref PARENTHETICAL: Regex = Regex::new(
        r"\s*\([^)]*\)"
    ).unwrap();

    pub static ref TRAILING_TERMS: Regex = Regex::new(
        r"(?i)\s+(?:FRN|CALLABLE|MATURES?|MATURING)\b.*$"
    ).unwrap();

    pub static ref TRAILING_ELLIPSIS: Regex = Regex::new(
        r"(?:\s*(?:\.{2,}|…))+\s*$"
    ).unwrap();

    pub static ref TRAILING_COLUMNS: Regex = Regex::new(
        r"(?i)\s+(?:(?:PRICE|QUANTITY|CONSIDERATION|BROKERAGE|TRADE\s+DATE|SETTLEMENT\s+DATE|CONFIRMATION\s+DATE|ASX\s+CODE|SECURITY\s+CODE|GST|TOTAL|CURRENCY)\b|UNITS?\s+\d).*$"
    ).unwrap();

    pub static ref TRAILING_AMOUNTS: Regex = Regex::new(
        r"(?:\s+\$?\d[\d,]*\.\d+|\s+\$?\d{1,3}(?:,\d{3})+)+$"
    ).unwrap();

    pub static ref SECURITY_DESCRIPTORS: Regex = Regex::new(
        r"(?i)\b(?:ORDINARY\s+FULLY\s+PAID|FULLY\s+PAID\s+ORDINARY|FULLY\s+PAID|FPO|ORDINARY\s+SHARES?|ORD\s+SHARES?|STAPLED\s+SECURITIES?)\b"
    ).unwrap();

    pub static ref LABEL_PREFIX: Regex = Regex::new(
        r"(?i)^(?:Security\s+Description|Stock\s+Description|Investment|Security|Company|Code)\b[:\s]*"
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).unwrap();

    // Filename rendering
    pub static ref CORPORATE_SUFFIX: Regex = Regex::new(
        r"(?i)\b(?:PTY\.?\s*LTD|LIMITED|LTD)\b\.?"
    ).unwrap();
}

/// First column of a table-like line (split on `|`, tabs or wide gaps).
pub fn first_column(s: &str) -> &str {
    let s = s.trim_start_matches(|c: char| c == '|' || c.is_whitespace());
    COLUMN_SPLIT.split(s).next().unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_column() {
        assert_eq!(first_column("XYZ ETF    100    23.46"), "XYZ ETF");
        assert_eq!(first_column("| Quantity | Price"), "Quantity");
        assert_eq!(first_column("GENLIM PTY LTD\tHIN 1234"), "GENLIM PTY LTD");
        assert_eq!(first_column("Single Value"), "Single Value");
    }

    #[test]
    fn test_asx_code_label_is_case_insensitive_but_code_is_not() {
        let caps = ASX_CODE.captures("asx code: VAS").unwrap();
        assert_eq!(&caps[1], "VAS");
        assert!(ASX_CODE.captures("Code: vas").is_none());
    }

    #[test]
    fn test_trade_lead_in_spans_line_break() {
        let caps = TRADE_LEAD_IN
            .captures("MIDSEC PTY LTD has bought for you\nXYZ ETF 100 units")
            .unwrap();
        assert_eq!(&caps[1], "XYZ ETF 100 units");
    }
}
