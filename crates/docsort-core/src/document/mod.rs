//! Financial document classification and naming.
//!
//! Raw text flows through [`TextEvidence`], the [`DocTypeClassifier`], the
//! date and issuer resolvers, the [`ResultReconciler`] and finally the
//! [`FilenameBuilder`]; [`DocumentEngine`] wires them together around a
//! shared [`ResultCache`].

pub mod cache;
pub mod classifier;
pub mod engine;
pub mod external;
pub mod filename;
pub mod reconcile;
pub mod rules;

pub use cache::{CacheEntry, ResultCache};
pub use classifier::DocTypeClassifier;
pub use engine::DocumentEngine;
pub use external::{ExternalExtractor, ExternalGuess};
pub use filename::{render_issuer, FilenameBuilder};
pub use reconcile::{Correction, Reconciled, ResultReconciler};
pub use rules::{DateResolver, FieldExtractor, IssuerResolver, TextEvidence};
