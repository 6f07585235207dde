//! Configuration structures for the document engine.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, Result};

/// Main configuration for the docsort engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsortConfig {
    /// Classifier scoring constants.
    pub scoring: ScoringConfig,

    /// Filename rendering options.
    pub filename: FilenameConfig,

    /// Result cache sizing.
    pub cache: CacheConfig,

    /// Text sufficiency thresholds.
    pub text: TextConfig,
}

/// Classifier scoring constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Base score when every `must` term matched.
    pub all_must_base: u32,

    /// Base score when some `must` terms matched.
    pub some_must_base: u32,

    /// Base score when only hints matched.
    pub hints_only_base: u32,

    /// Added per matched hint.
    pub per_hint: u32,

    /// Added per matched `require_any` term on a positive score.
    pub per_require_any: u32,

    /// Base score of the priority tiers (call/distribution, buy, sell, NAV).
    pub priority_base: u32,

    /// Base score of the distribution statement tier.
    pub distribution_base: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            all_must_base: 80,
            some_must_base: 50,
            hints_only_base: 30,
            per_hint: 5,
            per_require_any: 10,
            priority_base: 95,
            distribution_base: 90,
        }
    }
}

/// How the date part of a filename is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `20251113`
    #[default]
    Compact,
    /// `2025-11-13`
    Iso,
}

/// Filename rendering options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilenameConfig {
    /// Joins date, issuer and type tag.
    pub separator: String,

    /// Date rendering.
    pub date_style: DateStyle,
}

impl Default for FilenameConfig {
    fn default() -> Self {
        Self {
            separator: "_".to_string(),
            date_style: DateStyle::Compact,
        }
    }
}

/// Result cache sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the in-process result cache.
    pub enabled: bool,

    /// Maximum number of entries before FIFO eviction.
    pub capacity: usize,

    /// Hex characters of the SHA-256 digest used as key.
    pub key_length: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 100,
            key_length: 16,
        }
    }
}

/// Text sufficiency thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Minimum trimmed characters for a document to count as having text.
    pub min_text_length: usize,

    /// Pages read from a PDF text layer.
    pub max_pages: usize,

    /// Trimmed characters a page needs for the PDF to count as text-based.
    pub text_layer_min_chars: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            min_text_length: 50,
            max_pages: 2,
            text_layer_min_chars: 100,
        }
    }
}

impl DocsortConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let sep = &self.filename.separator;
        if sep.is_empty() || sep.chars().any(char::is_alphanumeric) {
            return Err(ConfigError::InvalidSeparator(sep.clone()));
        }
        if self.cache.key_length == 0 || self.cache.key_length > 64 {
            return Err(ConfigError::InvalidKeyLength(self.cache.key_length));
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}
