//! Content-addressed result cache with classification-aware invalidation.
//!
//! Entries are keyed by a truncated SHA-256 of the whitespace-normalized
//! text and evicted first-in first-out. Every hit is re-checked against the
//! strong evidence of the text before it is served.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::models::{CacheConfig, ExtractedFields};

use super::rules::TextEvidence;

/// Cached result for one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub fields: ExtractedFields,
    pub suggested_filename: String,
}

/// Thread-safe FIFO cache of processing results.
pub struct ResultCache {
    inner: Mutex<CacheInner>,
    key_length: usize,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    order: VecDeque<String>,
    capacity: usize,
}

impl ResultCache {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize, key_length: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(capacity),
                order: VecDeque::with_capacity(capacity),
                capacity,
            }),
            key_length: key_length.clamp(1, 64),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity, config.key_length)
    }

    /// Cache key of `text`: whitespace runs collapse, ends are trimmed.
    pub fn key(&self, text: &str) -> String {
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(self.key_length);
        digest
    }

    /// Look up `key`, dropping the entry if `evidence` contradicts it.
    pub fn get(&self, key: &str, evidence: &TextEvidence) -> Option<CacheEntry> {
        let mut inner = self.inner.lock();
        let entry = inner.entries.get(key)?;

        if is_stale(entry, evidence) {
            warn!(
                key,
                cached = ?entry.fields.doc_type,
                expected = ?evidence.strong_category(),
                "purging cache entry contradicted by text"
            );
            inner.entries.remove(key);
            inner.order.retain(|k| k != key);
            return None;
        }

        debug!(key, "cache hit");
        Some(entry.clone())
    }

    /// Store `entry`. Re-putting a key replaces the value in place.
    pub fn put(&self, key: String, entry: CacheEntry) {
        let mut inner = self.inner.lock();

        if let Some(existing) = inner.entries.get_mut(&key) {
            *existing = entry;
            return;
        }

        while inner.entries.len() >= inner.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
            debug!(key = %oldest, "evicted cache entry");
        }

        inner.order.push_back(key.clone());
        inner.entries.insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

fn is_stale(entry: &CacheEntry, evidence: &TextEvidence) -> bool {
    let Some(strong) = evidence.strong_category() else {
        return false;
    };
    if entry.fields.doc_type != Some(strong) {
        return true;
    }

    let stem = entry
        .suggested_filename
        .strip_suffix(".pdf")
        .unwrap_or(&entry.suggested_filename);
    let tag = strong.filename_tag();
    match stem.strip_suffix(tag) {
        Some(prefix) => prefix
            .chars()
            .next_back()
            .map_or(true, |c| c.is_alphanumeric()),
        None => true,
    }
}
