//! Handover Search - catalog scoring and adaptive selection
//!
//! This crate turns a free-text handover narration into ranked suggestions:
//! - `Catalog`: category/pathway entries with their embedding matrix
//! - `similarity_scores`: query vector against a catalog, mapped into [0, 1]
//! - `select_categories`: adaptive threshold with floor and top-k backfill
//! - `select_pathway`: single best pathway above a floor
//! - `SuggestionEngine`: both catalogs plus the request-level operations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Narration: "SOB with wheeze, sats 88%"                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  EmbeddingProvider (dense or TF-IDF, one per catalog)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Scorer: dot product per catalog row → [0, 1]               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!               ┌──────────────┴──────────────┐
//!               ▼                             ▼
//! ┌───────────────────────────┐ ┌───────────────────────────────┐
//! │  Category selector        │ │  Pathway selector             │
//! │  threshold/floor/top-k    │ │  best above floor, or none    │
//! └───────────────────────────┘ └───────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use handover_search::{CategoryQuery, SuggestionEngine};
//!
//! let engine = SuggestionEngine::from_paths(&source, categories, pathways).await?;
//! let response = engine.suggest_categories(&CategoryQuery::new("BGL 2.9, drowsy")).await?;
//! for s in response.suggestions {
//!     println!("{}: {:.2} {:?}", s.id, s.final_score, s.why);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod candidate;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod scorer;
pub mod selector;

pub use candidate::Candidate;
pub use catalog::{Catalog, CatalogEntry, CatalogKind};
pub use engine::{
    CategoryMeta, CategoryQuery, CategoryResponse, PathwayMeta, PathwayQuery, PathwayResponse,
    PathwaySuggestion, Suggestion, SuggestionEngine, DISCLAIMER, MAX_TEXT_LEN,
};
pub use error::{Error, Result};
pub use scorer::similarity_scores;
pub use selector::{
    select_categories, select_pathway, CategoryParams, CategorySelection, Strategy,
    LOW_CONF_THRESHOLD, PATHWAY_MIN_SCORE,
};
