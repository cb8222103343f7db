//! Error types for handover-embeddings

use thiserror::Error;

/// Embedding error type
#[derive(Debug, Error)]
pub enum Error {
    /// Provider failed while embedding
    #[error("provider error: {0}")]
    Provider(String),

    /// Model could not be fetched, loaded or executed
    #[error("model error: {0}")]
    Model(String),

    /// Tokenizer could not be loaded or failed to encode
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Requested provider is not compiled in or not configured
    #[error("provider not available: {0}")]
    NotAvailable(String),

    /// Unknown embedder mode in configuration
    #[error("unknown embedder mode: {0}")]
    UnknownMode(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
