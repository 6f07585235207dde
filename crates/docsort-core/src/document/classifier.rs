//! Document type classification.

use tracing::debug;

use crate::models::{ClassificationResult, ScoringConfig};

use super::rules::taxonomy::{priority_rules, PatternRule, PriorityRule, PATTERN_RULES};
use super::rules::TextEvidence;

/// Scores the document type taxonomy against a text.
#[derive(Debug, Clone)]
pub struct DocTypeClassifier {
    scoring: ScoringConfig,
    tiers: Vec<PriorityRule>,
    rules: &'static [PatternRule],
}

impl DocTypeClassifier {
    pub fn new(scoring: ScoringConfig) -> Self {
        let tiers = priority_rules(&scoring);
        Self {
            scoring,
            tiers,
            rules: PATTERN_RULES,
        }
    }

    /// Classify raw text.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        self.classify_evidence(&TextEvidence::new(text))
    }

    /// Classify already prepared evidence.
    ///
    /// The first priority tier whose trigger fires decides the type; the
    /// generic loop only runs when no tier fired.
    pub fn classify_evidence(&self, evidence: &TextEvidence) -> ClassificationResult {
        for tier in &self.tiers {
            if let Some(score) = tier.evaluate(evidence, self.scoring.per_hint) {
                debug!(tier = tier.tier, doc_type = %tier.doc_type, score, "priority tier fired");
                return ClassificationResult::new(tier.doc_type, score);
            }
        }

        let mut best = ClassificationResult::unclassified();
        for rule in self.rules {
            let score = self.score_rule(rule, evidence);
            if score > best.score {
                best = ClassificationResult::new(rule.doc_type, score);
            }
        }

        match best.doc_type {
            Some(doc_type) => debug!(%doc_type, score = best.score, "generic rule won"),
            None => debug!("no document type matched"),
        }
        best
    }

    /// Generic score of one rule, 0 if the rule is ineligible.
    fn score_rule(&self, rule: &PatternRule, evidence: &TextEvidence) -> u32 {
        if evidence.has_any(rule.exclude) {
            return 0;
        }
        if !rule.require_any.is_empty() && !evidence.has_any(rule.require_any) {
            return 0;
        }

        let s = &self.scoring;
        let must = evidence.count(rule.must);
        let hints = evidence.count(rule.hints);

        let score = if must as usize == rule.must.len() {
            s.all_must_base + hints * s.per_hint
        } else if must > 0 {
            s.some_must_base + hints * s.per_hint
        } else if hints > 0 {
            s.hints_only_base + hints * s.per_hint
        } else {
            0
        };

        if score > 0 {
            score + evidence.count(rule.require_any) * s.per_require_any
        } else {
            0
        }
    }
}

impl Default for DocTypeClassifier {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
