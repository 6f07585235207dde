//! The `process(text)` pipeline.

use tracing::{debug, info, warn};

use crate::models::{ClassificationResult, DocsortConfig, ExtractedFields, ProcessOutcome};

use super::cache::{CacheEntry, ResultCache};
use super::classifier::DocTypeClassifier;
use super::external::{ExternalExtractor, ExternalGuess};
use super::filename::FilenameBuilder;
use super::reconcile::ResultReconciler;
use super::rules::{
    AccountExtractor, AsxCodeExtractor, DateResolver, FieldExtractor, IssuerResolver, TextEvidence,
};

/// Classifies documents, resolves their fields and names them.
///
/// Shareable across threads; concurrent callers share one result cache.
pub struct DocumentEngine {
    config: DocsortConfig,
    classifier: DocTypeClassifier,
    dates: DateResolver,
    issuers: IssuerResolver,
    accounts: AccountExtractor,
    asx_codes: AsxCodeExtractor,
    filenames: FilenameBuilder,
    reconciler: ResultReconciler,
    cache: Option<ResultCache>,
    external: Option<Box<dyn ExternalExtractor>>,
}

enum GuessSource {
    Configured,
    Supplied(Option<ExternalGuess>),
}

impl DocumentEngine {
    pub fn new(config: DocsortConfig) -> Self {
        let filenames = FilenameBuilder::new(&config.filename);
        let cache = config
            .cache
            .enabled
            .then(|| ResultCache::from_config(&config.cache));

        Self {
            classifier: DocTypeClassifier::new(config.scoring.clone()),
            dates: DateResolver::new(),
            issuers: IssuerResolver::new(),
            accounts: AccountExtractor::new(),
            asx_codes: AsxCodeExtractor::new(),
            reconciler: ResultReconciler::new(filenames.clone()),
            filenames,
            cache,
            external: None,
            config,
        }
    }

    /// Attach an external extractor consulted for texts with enough content.
    pub fn with_external(mut self, extractor: Box<dyn ExternalExtractor>) -> Self {
        self.external = Some(extractor);
        self
    }

    pub fn config(&self) -> &DocsortConfig {
        &self.config
    }

    pub fn filenames(&self) -> &FilenameBuilder {
        &self.filenames
    }

    pub fn cache(&self) -> Option<&ResultCache> {
        self.cache.as_ref()
    }

    /// Classify a text without resolving any other field.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        self.classifier.classify(text)
    }

    /// Whether `text` carries enough content to be worth classifying.
    pub fn has_text(&self, text: &str) -> bool {
        text.trim().chars().count() >= self.config.text.min_text_length
    }

    /// Process a text, consulting the configured external extractor.
    pub fn process(&self, text: &str) -> ProcessOutcome {
        self.run(text, GuessSource::Configured)
    }

    /// Process a text with an external guess supplied by the caller.
    pub fn process_with_guess(&self, text: &str, guess: Option<ExternalGuess>) -> ProcessOutcome {
        self.run(text, GuessSource::Supplied(guess))
    }

    fn run(&self, text: &str, source: GuessSource) -> ProcessOutcome {
        let has_text = self.has_text(text);
        let evidence = TextEvidence::new(text);

        let key = self.cache.as_ref().map(|cache| cache.key(text));
        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(hit) = cache.get(key, &evidence) {
                info!(
                    doc_type = ?hit.fields.doc_type,
                    filename = %hit.suggested_filename,
                    cached = true,
                    "processed document"
                );
                return ProcessOutcome {
                    has_text,
                    fields: hit.fields,
                    suggested_filename: hit.suggested_filename,
                };
            }
        }

        let classification = self.classifier.classify_evidence(&evidence);
        let guess = match source {
            GuessSource::Supplied(guess) => guess,
            GuessSource::Configured if has_text => self.external_guess(text),
            GuessSource::Configured => None,
        };

        let doc_type = classification
            .doc_type
            .or_else(|| guess.as_ref().and_then(|g| g.doc_type));
        let rule = ExtractedFields {
            doc_type: classification.doc_type,
            issuer: self.issuers.resolve_with_evidence(text, doc_type, &evidence),
            date_iso: self.dates.resolve(text, doc_type),
            account_last4: self.accounts.extract(text).map(|m| m.value),
            asx_code: self.asx_codes.extract(text).map(|m| m.value),
        };
        debug!(?rule, score = classification.score, "rule-based fields");

        let reconciled = self.reconciler.reconcile(&rule, guess.as_ref(), &evidence);
        let fields = reconciled.fields;
        let suggested_filename = reconciled
            .suggested_filename
            .unwrap_or_else(|| self.filenames.build(&fields));

        if let (Some(cache), Some(key), Some(_)) = (&self.cache, key, fields.doc_type) {
            cache.put(
                key,
                CacheEntry {
                    fields: fields.clone(),
                    suggested_filename: suggested_filename.clone(),
                },
            );
        }

        info!(
            doc_type = ?fields.doc_type,
            filename = %suggested_filename,
            corrections = reconciled.corrections.len(),
            cached = false,
            "processed document"
        );

        ProcessOutcome {
            has_text,
            fields,
            suggested_filename,
        }
    }

    fn external_guess(&self, text: &str) -> Option<ExternalGuess> {
        let extractor = self.external.as_ref()?;
        match extractor.extract(text) {
            Ok(guess) => guess,
            Err(e) => {
                warn!(error = %e, "external extractor failed, using rule-based fields only");
                None
            }
        }
    }
}

impl Default for DocumentEngine {
    fn default() -> Self {
        Self::new(DocsortConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExternalError;
    use crate::models::DocType;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const DIVIDEND: &str = "BHP GROUP LIMITED\nDividend Statement\nRecord Date: 01/03/2024\n\
                            Payment Date: 20/03/2024\nHIN: X0001234567";

    #[test]
    fn test_process_dividend() {
        let engine = DocumentEngine::default();
        let outcome = engine.process(DIVIDEND);
        assert!(outcome.has_text);
        assert_eq!(outcome.fields.doc_type, Some(DocType::DividendStatement));
        assert_eq!(outcome.fields.date_iso.as_deref(), Some("2024-03-20"));
        assert_eq!(outcome.fields.account_last4.as_deref(), Some("4567"));
        assert!(outcome.suggested_filename.starts_with("20240320_"));
        assert!(outcome.suggested_filename.ends_with("_DividendStatement.pdf"));
    }

    #[test]
    fn test_short_text_skips_external() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let engine = DocumentEngine::default().with_external(Box::new(
            move |_: &str| -> Result<Option<ExternalGuess>, ExternalError> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            },
        ));

        let outcome = engine.process("scan");
        assert!(!outcome.has_text);
        assert_eq!(outcome.suggested_filename, "YYYY-MM-DD_Unknown_Unknown.pdf");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        engine.process(DIVIDEND);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failing_external_falls_back_to_rules() {
        let engine = DocumentEngine::default().with_external(Box::new(
            |_: &str| -> Result<Option<ExternalGuess>, ExternalError> {
                Err(ExternalError::Malformed("not json".into()))
            },
        ));
        let outcome = engine.process(DIVIDEND);
        assert_eq!(outcome.fields.doc_type, Some(DocType::DividendStatement));
    }

    #[test]
    fn test_cache_serves_repeat() {
        let engine = DocumentEngine::default();
        let first = engine.process(DIVIDEND);
        assert_eq!(engine.cache().map(ResultCache::len), Some(1));

        // Same text modulo whitespace hits the cache even with a conflicting guess.
        let guess = ExternalGuess {
            doc_type: Some(DocType::TaxStatement),
            ..Default::default()
        };
        let second = engine.process_with_guess(&DIVIDEND.replace('\n', "  \n "), Some(guess));
        assert_eq!(second, first);
    }

    #[test]
    fn test_unclassified_is_not_cached() {
        let engine = DocumentEngine::default();
        engine.process("This text is long enough to count but names no known document kind at all.");
        assert_eq!(engine.cache().map(ResultCache::is_empty), Some(true));
    }

    #[test]
    fn test_guess_fills_unknown_type() {
        let engine = DocumentEngine::default();
        let guess = ExternalGuess {
            doc_type: Some(DocType::Other),
            issuer: Some("Acme Trust".into()),
            date_iso: Some("2024-01-31".into()),
            ..Default::default()
        };
        let outcome = engine.process_with_guess(
            "This text is long enough to count but names no known document kind at all.",
            Some(guess),
        );
        assert_eq!(outcome.fields.doc_type, Some(DocType::Other));
        assert_eq!(outcome.suggested_filename, "20240131_AcmeTrust_Other.pdf");
    }

    #[test]
    fn test_cache_disabled() {
        let mut config = DocsortConfig::default();
        config.cache.enabled = false;
        let engine = DocumentEngine::new(config);
        engine.process(DIVIDEND);
        assert!(engine.cache().is_none());
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DocumentEngine>();
    }
}
