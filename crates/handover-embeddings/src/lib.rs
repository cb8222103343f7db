//! Handover Embeddings - text to vector providers
//!
//! This crate provides the embedding side of the suggestion engine:
//! - `EmbeddingProvider`: async trait every backend implements
//! - `TfidfEmbedder`: sparse lexical backend, always available
//! - `TractEmbeddingProvider`: dense sentence-transformers backend (`dense` feature)
//! - `EmbedderSource`: one-time backend selection from configuration
//!
//! # Example
//!
//! ```ignore
//! use handover_embeddings::{EmbedderConfig, EmbedderSource};
//!
//! let source = EmbedderSource::from_config(&EmbedderConfig::default())?;
//! let embedder = source.embedder_for(&corpus);
//! let query = embedder.embed_text("sats 88% on room air").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod factory;
pub mod provider;
pub mod tfidf;
#[cfg(feature = "dense")]
pub mod tract;

pub use error::{Error, Result};
pub use factory::{EmbedderConfig, EmbedderMode, EmbedderSource};
pub use provider::{EmbeddingProvider, ScoreRange, SharedEmbeddingProvider};
pub use tfidf::TfidfEmbedder;
#[cfg(feature = "dense")]
pub use tract::TractEmbeddingProvider;
