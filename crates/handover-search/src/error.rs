//! Error types for handover-search

use crate::catalog::CatalogKind;
use thiserror::Error;

/// Error type for catalog loading and suggestion requests
#[derive(Error, Debug)]
pub enum Error {
    /// Catalog file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file is not a JSON array
    #[error("Catalog parse error: {0}")]
    Parse(String),

    /// A catalog entry is missing fields or has the wrong types
    #[error("Malformed {kind} entry at index {index}: {reason}")]
    MalformedEntry {
        /// Catalog the entry belongs to
        kind: CatalogKind,
        /// Position of the entry in the file
        index: usize,
        /// Deserialization failure
        reason: String,
    },

    /// Two entries share an id
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId {
        /// Catalog the entry belongs to
        kind: CatalogKind,
        /// The repeated id
        id: String,
    },

    /// Embedding matrix and entry list disagree in length
    #[error("Matrix mismatch: {entries} entries but {rows} vectors")]
    MatrixMismatch {
        /// Number of entries
        entries: usize,
        /// Number of matrix rows
        rows: usize,
    },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: usize,
        /// Actual dimensions
        actual: usize,
    },

    /// Embedding provider failed
    #[error("Embedding error: {0}")]
    Embedding(#[from] handover_embeddings::Error),

    /// Query parameters out of range
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl Error {
    /// True for errors caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidQuery(_))
    }
}

/// Result type for catalog and suggestion operations
pub type Result<T> = std::result::Result<T, Error>;
