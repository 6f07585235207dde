//! Data models for documents and configuration.

pub mod config;
pub mod fields;

pub use config::{
    CacheConfig, DateStyle, DocsortConfig, FilenameConfig, ScoringConfig, TextConfig,
};
pub use fields::{ClassificationResult, DocType, ExtractedFields, ProcessOutcome};
