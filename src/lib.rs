// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod category;
pub mod config;
pub mod content;
pub mod gazetteer;
pub mod ingest;
pub mod invalidation;
pub mod lexicon;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod relevance;
pub mod severity;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::category::Category;
pub use crate::gazetteer::{Gazetteer, LocationEntry};
pub use crate::ingest::types::{RawArticle, SourceError, SourceProvider};
pub use crate::lexicon::Lexicon;
pub use crate::pipeline::{ClassifyOutcome, ClassifyStats, Classifier, ConflictEvent, Rejection};
pub use crate::severity::Severity;
