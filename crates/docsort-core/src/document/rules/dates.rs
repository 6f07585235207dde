//! Label-aware date extraction with day-first disambiguation.

use std::collections::HashMap;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::trace;

use crate::models::DocType;

use super::patterns::{DATE_DMY, DATE_DMY_SHORT, DATE_LONG, DATE_TOKEN, DATE_YMD};
use super::{ExtractionMatch, FieldExtractor};

const DIVIDEND_LABELS: &[&str] = &["Payment Date", "Record Date", "Statement Date", "Date"];
const DISTRIBUTION_LABELS: &[&str] = &[
    "Payment Date",
    "Record Date",
    "Distribution Date",
    "Statement Date",
    "Date",
];
const STATEMENT_LABELS: &[&str] = &["Statement Date", "Date"];
const PERIOD_LABELS: &[&str] = &["Statement Date", "Period End", "Date"];
const TRADE_LABELS: &[&str] = &[
    "Confirmation Date",
    "Transaction Date",
    "Trade Date",
    "Settlement Date",
    "As at Date",
    "Date",
];
const TAX_LABELS: &[&str] = &["Statement Date", "Tax Year", "Date"];
const NAV_LABELS: &[&str] = &["Statement Date", "As at Date", "Date"];
const FINANCIAL_LABELS: &[&str] = &[
    "Year End Date",
    "For the year ended",
    "Statement Date",
    "Date",
];

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

lazy_static! {
    static ref LABELED_DATES: HashMap<&'static str, Regex> = {
        let mut map = HashMap::new();
        for labels in [
            DIVIDEND_LABELS,
            DISTRIBUTION_LABELS,
            STATEMENT_LABELS,
            PERIOD_LABELS,
            TRADE_LABELS,
            TAX_LABELS,
            NAV_LABELS,
            FINANCIAL_LABELS,
        ] {
            for label in labels {
                map.entry(*label).or_insert_with(|| {
                    let words: Vec<String> =
                        label.split_whitespace().map(regex::escape).collect();
                    Regex::new(&format!(
                        r"(?i)\b{}\b[\s:]+({})\b",
                        words.join(r"\s+"),
                        DATE_TOKEN
                    ))
                    .unwrap()
                });
            }
        }
        map
    };
}

/// Date labels to try for a document type, highest priority first.
pub fn label_priorities(doc_type: DocType) -> &'static [&'static str] {
    match doc_type {
        DocType::DividendStatement => DIVIDEND_LABELS,
        DocType::DistributionStatement => DISTRIBUTION_LABELS,
        DocType::PeriodicStatement | DocType::BankStatement => PERIOD_LABELS,
        DocType::BuyContract | DocType::SellContract => TRADE_LABELS,
        DocType::TaxStatement => TAX_LABELS,
        DocType::NetAssetSummaryStatement => NAV_LABELS,
        DocType::FinancialStatement => FINANCIAL_LABELS,
        DocType::CallAndDistributionStatement
        | DocType::HoldingStatement
        | DocType::CapitalCallStatement
        | DocType::Other => STATEMENT_LABELS,
    }
}

/// Resolves the effective date of a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateResolver {
    extractor: DateExtractor,
}

impl DateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the document date as `YYYY-MM-DD`.
    ///
    /// Labels for the document type are tried in priority order; if none
    /// yields a date the earliest date anywhere in the text is used.
    pub fn resolve(&self, text: &str, doc_type: Option<DocType>) -> Option<String> {
        if let Some(doc_type) = doc_type {
            for label in label_priorities(doc_type) {
                if let Some(date) = extract_labeled_date(text, label) {
                    trace!(label, %date, "labeled date");
                    return Some(date.format("%Y-%m-%d").to_string());
                }
            }
        }

        self.extractor
            .extract(text)
            .map(|m| m.value.format("%Y-%m-%d").to_string())
    }
}

/// First parseable date following `label`.
pub fn extract_labeled_date(text: &str, label: &str) -> Option<NaiveDate> {
    let re = LABELED_DATES.get(label)?;
    re.captures_iter(text)
        .find_map(|caps| parse_date_token(&caps[1]))
}

/// Generic date extractor over every supported shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    /// Earliest-positioned date in the text.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// All dates, ordered by position, without overlapping matches.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut found: Vec<Self::Output> = Vec::new();

        let shapes: [(&Regex, fn(&Captures) -> Option<NaiveDate>, f32); 4] = [
            (&*DATE_DMY, parse_numeric_dmy, 0.9),
            (&*DATE_YMD, parse_ymd, 0.95),
            (&*DATE_LONG, parse_long, 0.95),
            (&*DATE_DMY_SHORT, parse_numeric_dmy, 0.7),
        ];

        for (re, parse, confidence) in shapes {
            for caps in re.captures_iter(text) {
                let Some(date) = parse(&caps) else {
                    continue;
                };
                let Some(full) = caps.get(0) else {
                    continue;
                };
                let overlaps = found.iter().any(|m| {
                    m.position
                        .is_some_and(|(s, e)| full.start() < e && s < full.end())
                });
                if !overlaps {
                    found.push(
                        ExtractionMatch::new(date, confidence, full.as_str())
                            .with_position(full.start(), full.end()),
                    );
                }
            }
        }

        found.sort_by_key(|m| m.position.map_or(usize::MAX, |(s, _)| s));
        found
    }
}

/// Parse a single date token in any supported shape.
///
/// Numeric day/month tokens are read day-first and only fall back to
/// month-first when the day-first reading is not a valid date.
pub fn parse_date_token(token: &str) -> Option<NaiveDate> {
    let token = token.trim();
    let full = |re: &Regex| {
        re.captures(token)
            .filter(|caps| caps.get(0).is_some_and(|m| m.as_str() == token))
    };

    if let Some(caps) = full(&*DATE_DMY) {
        return parse_numeric_dmy(&caps);
    }
    if let Some(caps) = full(&*DATE_YMD) {
        return parse_ymd(&caps);
    }
    if let Some(caps) = full(&*DATE_LONG) {
        return parse_long(&caps);
    }
    if let Some(caps) = full(&*DATE_DMY_SHORT) {
        return parse_numeric_dmy(&caps);
    }
    None
}

fn parse_numeric_dmy(caps: &Captures) -> Option<NaiveDate> {
    let first: u32 = caps[1].parse().ok()?;
    let second: u32 = caps[2].parse().ok()?;
    let year = parse_year(&caps[3])?;

    NaiveDate::from_ymd_opt(year, second, first)
        .or_else(|| NaiveDate::from_ymd_opt(year, first, second))
}

fn parse_ymd(caps: &Captures) -> Option<NaiveDate> {
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_long(caps: &Captures) -> Option<NaiveDate> {
    let day: u32 = caps[1].parse().ok()?;
    let month = month_from_name(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() == 2 {
        // Two-digit year: 00-49 is 20xx, 50-99 is 19xx
        Some(if year < 50 { 2000 + year } else { 1900 + year })
    } else {
        Some(year)
    }
}

/// Month number from a full name or an abbreviation of at least 3 letters.
fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_ascii_lowercase();
    if name.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(&name))
        .map(|i| i as u32 + 1)
}
