//! Document type taxonomy: priority tiers and the generic pattern table.
//!
//! All terms are upper-case and unique within their list; they are matched
//! as whole phrases against the upper-cased text.

use crate::models::{DocType, ScoringConfig};

use super::evidence::TextEvidence;

/// Term lists scored by the generic classification loop.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub doc_type: DocType,
    pub must: &'static [&'static str],
    pub hints: &'static [&'static str],
    /// Any of these present disqualifies the type regardless of score.
    pub exclude: &'static [&'static str],
    /// When non-empty, at least one must be present.
    pub require_any: &'static [&'static str],
}

/// A short-circuit category evaluated before the generic loop.
#[derive(Debug, Clone, Copy)]
pub struct PriorityRule {
    /// Lower tiers are evaluated first; the first firing tier wins.
    pub tier: u8,
    pub doc_type: DocType,
    pub base_score: u32,
    pub hints: &'static [&'static str],
    pub trigger: fn(&TextEvidence) -> bool,
}

impl PriorityRule {
    /// Score if the trigger fires, `None` otherwise.
    pub fn evaluate(&self, evidence: &TextEvidence, per_hint: u32) -> Option<u32> {
        (self.trigger)(evidence)
            .then(|| self.base_score + per_hint * evidence.count(self.hints))
    }
}

const CALL_AND_DISTRIBUTION_HINTS: &[&str] = &[
    "CAPITAL CALL",
    "CALL",
    "DISTRIBUTION",
    "NET CASH DISTRIBUTION",
    "NOTIONAL CAPITAL CALL",
    "CALLED CAPITAL",
    "UNCALLED COMMITTED CAPITAL",
    "DIST & CAPITAL CALL",
];

const BUY_HINTS: &[&str] = &[
    "WE HAVE BOUGHT",
    "HAS BOUGHT",
    "TRANSACTION TYPE: BUY",
    "TRADE CONFIRMATION",
    "CONSIDERATION",
    "BROKERAGE",
    "TRADE DATE",
    "SETTLEMENT DATE",
    "CONFIRMATION DATE",
];

const SELL_HINTS: &[&str] = &[
    "WE HAVE SOLD",
    "HAS SOLD",
    "TRANSACTION TYPE: SELL",
    "SELL CONFIRMATION",
    "TRADE CONFIRMATION",
    "CONSIDERATION",
    "BROKERAGE",
    "TRADE DATE",
    "SETTLEMENT DATE",
    "CONFIRMATION DATE",
];

const DISTRIBUTION_HINTS: &[&str] = &[
    "DISTRIBUTION",
    "PAYMENT DATE",
    "RECORD DATE",
    "DISTRIBUTION RATE",
    "HOLDING BALANCE",
    "GROSS DISTRIBUTION",
    "NET DISTRIBUTION",
];

const NAV_HINTS: &[&str] = &[
    "NAV",
    "NET ASSET VALUE",
    "UNIT PRICE",
    "FUND PERFORMANCE",
    "SHAREHOLDER VALUE",
    "SHAREHOLDER ACTIVITY",
    "OPENING BALANCE",
    "CLOSING BALANCE",
];

/// Priority tiers in evaluation order.
pub fn priority_rules(scoring: &ScoringConfig) -> Vec<PriorityRule> {
    let mut rules = vec![
        PriorityRule {
            tier: 1,
            doc_type: DocType::CallAndDistributionStatement,
            base_score: scoring.priority_base,
            hints: CALL_AND_DISTRIBUTION_HINTS,
            trigger: TextEvidence::is_call_and_distribution,
        },
        PriorityRule {
            tier: 2,
            doc_type: DocType::BuyContract,
            base_score: scoring.priority_base,
            hints: BUY_HINTS,
            trigger: TextEvidence::is_buy_contract,
        },
        PriorityRule {
            tier: 3,
            doc_type: DocType::SellContract,
            base_score: scoring.priority_base,
            hints: SELL_HINTS,
            trigger: TextEvidence::is_sell_contract,
        },
        PriorityRule {
            tier: 4,
            doc_type: DocType::DistributionStatement,
            base_score: scoring.distribution_base,
            hints: DISTRIBUTION_HINTS,
            trigger: TextEvidence::is_distribution_statement,
        },
        PriorityRule {
            tier: 5,
            doc_type: DocType::NetAssetSummaryStatement,
            base_score: scoring.priority_base,
            hints: NAV_HINTS,
            trigger: TextEvidence::is_nav_summary,
        },
    ];
    rules.sort_by_key(|r| r.tier);
    rules
}

/// Generic scoring table, in tie-breaking order.
pub static PATTERN_RULES: &[PatternRule] = &[
    PatternRule {
        doc_type: DocType::DividendStatement,
        must: &["DIVIDEND STATEMENT"],
        hints: &[
            "RECORD DATE",
            "PAYMENT DATE",
            "DRP",
            "DIVIDEND REINVESTMENT",
            "DIVIDEND",
        ],
        exclude: &[],
        require_any: &[],
    },
    PatternRule {
        doc_type: DocType::DistributionStatement,
        must: &[
            "DISTRIBUTION STATEMENT",
            "DISTRIBUTION ADVICE",
            "DISTRIBUTION PAYMENT",
        ],
        hints: &[
            "DISTRIBUTION",
            "PAYMENT DATE",
            "RECORD DATE",
            "ETF",
            "MANAGED FUND",
            "DISTRIBUTION RATE",
            "HOLDING BALANCE",
            "GROSS DISTRIBUTION",
            "NET DISTRIBUTION",
        ],
        exclude: &[
            "CONFIRMATION",
            "CONTRACT NOTE",
            "BUY",
            "SELL",
            "WE HAVE BOUGHT",
            "HAS BOUGHT",
            "TRANSACTION TYPE: BUY",
            "TRADE",
            "BROKERAGE",
            "CONSIDERATION",
        ],
        require_any: &[],
    },
    PatternRule {
        doc_type: DocType::CallAndDistributionStatement,
        must: &[
            "CALL AND DISTRIBUTION STATEMENT",
            "CALL & DISTRIBUTION STATEMENT",
            "DIST AND CAPITAL CALL",
            "DISTRIBUTION AND CAPITAL CALL",
        ],
        hints: CALL_AND_DISTRIBUTION_HINTS,
        exclude: &[],
        require_any: &[],
    },
    PatternRule {
        doc_type: DocType::CapitalCallStatement,
        must: &["CAPITAL CALL", "NOTICE OF CAPITAL CALL"],
        hints: &[
            "CALL AMOUNT",
            "AMOUNT DUE",
            "DUE DATE",
            "CALLED CAPITAL",
            "UNCALLED COMMITTED CAPITAL",
            "COMMITMENT",
        ],
        exclude: &["DISTRIBUTION"],
        require_any: &[],
    },
    PatternRule {
        doc_type: DocType::PeriodicStatement,
        must: &["PERIODIC STATEMENT"],
        hints: &[
            "TRANSACTIONS",
            "UNIT BALANCE",
            "REDEMPTION PRICE",
            "BUY-SELL SPREAD",
            "FEES AND COSTS",
        ],
        exclude: &[],
        require_any: &[],
    },
    PatternRule {
        doc_type: DocType::BankStatement,
        must: &["BANK STATEMENT"],
        hints: &[
            "BSB",
            "BANK ACCOUNT",
            "BANKING",
            "ACCOUNT BALANCE",
            "BANK TRANSACTION",
            "BANK STATEMENT",
        ],
        exclude: &[
            "CONFIRMATION",
            "CONTRACT NOTE",
            "BUY",
            "SELL",
            "TRADE",
            "BROKERAGE",
            "CONSIDERATION",
            "NAV",
            "NET ASSET VALUE",
            "FUND PERFORMANCE",
            "SHAREHOLDER",
            "CHESS",
            "HIN",
            "SRN",
            "PORTFOLIO",
            "HOLDINGS",
        ],
        require_any: &[],
    },
    PatternRule {
        doc_type: DocType::BuyContract,
        must: &["CONFIRMATION", "BUY CONFIRMATION", "CONTRACT NOTE"],
        hints: &[
            "WE HAVE BOUGHT",
            "TRANSACTION TYPE: BUY",
            "TRADE CONFIRMATION",
            "PURCHASE",
            "ACQUISITION",
            "BUY ORDER",
            "CONSIDERATION",
            "BROKERAGE",
            "TRADE DATE",
            "SETTLEMENT DATE",
            "CONFIRMATION DATE",
            "CONFIRMATION",
        ],
        exclude: &[],
        require_any: &["BUY", "WE HAVE BOUGHT", "TRANSACTION TYPE: BUY"],
    },
    PatternRule {
        doc_type: DocType::SellContract,
        must: &["SELL"],
        hints: &[
            "SELL CONFIRMATION",
            "TRADE CONFIRMATION",
            "SALE",
            "DISPOSAL",
            "SELL ORDER",
            "CONTRACT NOTE",
            "WE HAVE SOLD",
            "WE CONFIRM THE FOLLOWING TRANSACTION",
            "TRANSACTION TYPE: SELL",
        ],
        exclude: &[],
        require_any: &[],
    },
    PatternRule {
        doc_type: DocType::HoldingStatement,
        must: &[
            "CHESS",
            "ISSUER SPONSORED",
            "SRN",
            "HIN",
            "NAV STATEMENT",
            "FUND PERFORMANCE",
            "SHAREHOLDER VALUE",
            "SHAREHOLDER ACTIVITY",
        ],
        hints: &[
            "HOLDER IDENTIFICATION NUMBER",
            "STATEMENT DATE",
            "HOLDINGS",
            "PORTFOLIO",
            "NET ASSET VALUE",
            "NAV PER SHARE",
            "SHAREHOLDER",
            "FUND PERFORMANCE",
            "OPENING BALANCE",
            "CLOSING BALANCE",
        ],
        exclude: &[
            "CONFIRMATION",
            "CONTRACT NOTE",
            "BUY",
            "SELL",
            "TRADE",
            "BROKERAGE",
            "CONSIDERATION",
            "WE HAVE BOUGHT",
            "WE HAVE SOLD",
        ],
        require_any: &[],
    },
    PatternRule {
        doc_type: DocType::TaxStatement,
        must: &[
            "ANNUAL TAX STATEMENT",
            "TAX SUMMARY",
            "AMMA",
            "AMIT",
            "NAV & TAXATION STATEMENT",
            "NAV AND TAXATION STATEMENT",
            "TAXATION STATEMENT",
            "NAV AND TAXATION",
        ],
        hints: &[
            "TAX YEAR",
            "ASSESSABLE INCOME",
            "TAX RETURN",
            "TAXATION",
            "TAX WITHHELD",
            "TAX PAYABLE",
        ],
        exclude: &[],
        require_any: &[],
    },
    PatternRule {
        doc_type: DocType::NetAssetSummaryStatement,
        must: &[
            "NET ASSET SUMMARY",
            "NAV SUMMARY",
            "NAV STATEMENT",
            "NET ASSET VALUE SUMMARY",
        ],
        hints: &[
            "NET ASSET VALUE",
            "NAV",
            "UNIT PRICE",
            "ASSET SUMMARY",
            "ASSET VALUE",
            "UNIT BALANCE",
            "TOTAL ASSETS",
            "TOTAL LIABILITIES",
            "NAV PER SHARE",
            "FUND PERFORMANCE",
            "SHAREHOLDER VALUE",
        ],
        exclude: &[
            "CONFIRMATION",
            "CONTRACT NOTE",
            "BUY",
            "SELL",
            "TRADE",
            "BROKERAGE",
            "CONSIDERATION",
            "TAXATION",
            "TAX YEAR",
            "TAX RETURN",
        ],
        require_any: &[],
    },
    PatternRule {
        doc_type: DocType::FinancialStatement,
        must: &["FINANCIAL STATEMENTS", "DIRECTORS' REPORT"],
        hints: &[
            "FOR THE YEAR ENDED",
            "STATEMENT OF FINANCIAL POSITION",
            "BALANCE SHEET",
            "PROFIT OR LOSS",
            "INCOME STATEMENT",
            "AUDITOR'S REPORT",
            "ANNUAL REPORT",
        ],
        exclude: &[],
        require_any: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn all_lists() -> Vec<&'static [&'static str]> {
        let mut lists: Vec<&'static [&'static str]> = vec![
            CALL_AND_DISTRIBUTION_HINTS,
            BUY_HINTS,
            SELL_HINTS,
            DISTRIBUTION_HINTS,
            NAV_HINTS,
        ];
        for rule in PATTERN_RULES {
            lists.extend([rule.must, rule.hints, rule.exclude, rule.require_any]);
        }
        lists
    }

    #[test]
    fn test_terms_are_upper_case_and_unique() {
        for list in all_lists() {
            let mut seen = HashSet::new();
            for term in list {
                assert_eq!(*term, term.to_uppercase(), "term not upper-case");
                assert!(seen.insert(*term), "duplicate term {term}");
            }
        }
    }

    #[test]
    fn test_generic_table_order() {
        let order: Vec<DocType> = PATTERN_RULES.iter().map(|r| r.doc_type).collect();
        assert_eq!(
            order,
            vec![
                DocType::DividendStatement,
                DocType::DistributionStatement,
                DocType::CallAndDistributionStatement,
                DocType::CapitalCallStatement,
                DocType::PeriodicStatement,
                DocType::BankStatement,
                DocType::BuyContract,
                DocType::SellContract,
                DocType::HoldingStatement,
                DocType::TaxStatement,
                DocType::NetAssetSummaryStatement,
                DocType::FinancialStatement,
            ]
        );
    }

    #[test]
    fn test_priority_tiers_sorted() {
        let rules = priority_rules(&ScoringConfig::default());
        let tiers: Vec<u8> = rules.iter().map(|r| r.tier).collect();
        assert_eq!(tiers, vec![1, 2, 3, 4, 5]);
        assert_eq!(rules[3].base_score, 90);
    }

    #[test]
    fn test_priority_rule_scores_hints() {
        let rules = priority_rules(&ScoringConfig::default());
        let buy = &rules[1];
        let ev = TextEvidence::new("TRADE CONFIRMATION: BUY\nBrokerage 9.50\nTrade Date 09/05/2025");
        assert_eq!(buy.evaluate(&ev, 5), Some(95 + 3 * 5));
        assert_eq!(buy.evaluate(&TextEvidence::new("Bank statement"), 5), None);
    }
}
