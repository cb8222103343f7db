//! Category and pathway catalogs
//!
//! A catalog is an ordered list of entries plus one embedding row per entry,
//! in the same order. It is built once at startup and never mutated.
//!
//! # Example
//!
//! ```ignore
//! use handover_search::{Catalog, CatalogKind};
//!
//! let entries = Catalog::read_entries("data/categories.json".as_ref(), CatalogKind::Category)?;
//! let embedder = source.embedder_for(&Catalog::documents(&entries));
//! let catalog = Catalog::build(CatalogKind::Category, entries, embedder.as_ref()).await?;
//! ```

use crate::error::{Error, Result};
use handover_embeddings::EmbeddingProvider;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Which catalog an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// Structured data fields
    Category,
    /// Clinical protocols
    Pathway,
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Category => write!(f, "category"),
            Self::Pathway => write!(f, "pathway"),
        }
    }
}

/// One catalog entry as stored in the catalog file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable identifier, unique within the catalog
    pub id: String,
    /// Display title
    pub title: String,
    /// Free-text description
    pub description: String,
    /// Example phrasings (embedded only)
    #[serde(default)]
    pub examples: Vec<String>,
    /// Synonyms and abbreviations (embedded only)
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl CatalogEntry {
    /// Text that gets embedded for this entry
    pub fn document(&self) -> String {
        format!(
            "{}. {}. Examples: {}. Synonyms: {}.",
            self.title,
            self.description,
            self.examples.join("; "),
            self.synonyms.join(", ")
        )
    }
}

/// Immutable catalog: entries plus a parallel embedding matrix
#[derive(Debug, Clone)]
pub struct Catalog {
    kind: CatalogKind,
    entries: Vec<CatalogEntry>,
    matrix: Vec<Vec<f32>>,
    dimensions: usize,
}

impl Catalog {
    /// Parse catalog entries from JSON text, rejecting malformed entries and duplicate ids
    pub fn parse_entries(json: &str, kind: CatalogKind) -> Result<Vec<CatalogEntry>> {
        let raw: Vec<serde_json::Value> =
            serde_json::from_str(json).map_err(|e| Error::Parse(e.to_string()))?;

        let mut seen = HashSet::with_capacity(raw.len());
        let mut entries = Vec::with_capacity(raw.len());
        for (index, value) in raw.into_iter().enumerate() {
            let entry: CatalogEntry =
                serde_json::from_value(value).map_err(|e| Error::MalformedEntry {
                    kind,
                    index,
                    reason: e.to_string(),
                })?;
            if !seen.insert(entry.id.clone()) {
                return Err(Error::DuplicateId { kind, id: entry.id });
            }
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Read and parse a catalog file
    pub fn read_entries(path: &Path, kind: CatalogKind) -> Result<Vec<CatalogEntry>> {
        let json = std::fs::read_to_string(path)?;
        let entries = Self::parse_entries(&json, kind)?;
        debug!("Read {} {} entries from {}", entries.len(), kind, path.display());
        Ok(entries)
    }

    /// Embedded documents for `entries`, in order
    pub fn documents(entries: &[CatalogEntry]) -> Vec<String> {
        entries.iter().map(CatalogEntry::document).collect()
    }

    /// Assemble a catalog from precomputed vectors, checking shape invariants
    pub fn from_parts(
        kind: CatalogKind,
        entries: Vec<CatalogEntry>,
        matrix: Vec<Vec<f32>>,
        dimensions: usize,
    ) -> Result<Self> {
        if matrix.len() != entries.len() {
            return Err(Error::MatrixMismatch {
                entries: entries.len(),
                rows: matrix.len(),
            });
        }
        if let Some(row) = matrix.iter().find(|row| row.len() != dimensions) {
            return Err(Error::DimensionMismatch {
                expected: dimensions,
                actual: row.len(),
            });
        }

        let mut seen = HashSet::with_capacity(entries.len());
        if let Some(dup) = entries.iter().find(|e| !seen.insert(e.id.as_str())) {
            return Err(Error::DuplicateId {
                kind,
                id: dup.id.clone(),
            });
        }

        Ok(Self {
            kind,
            entries,
            matrix,
            dimensions,
        })
    }

    /// Embed every entry's document and assemble the catalog
    #[instrument(skip(entries, embedder), fields(entries = entries.len(), model = embedder.name()))]
    pub async fn build(
        kind: CatalogKind,
        entries: Vec<CatalogEntry>,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Self> {
        let matrix = embedder.embed_texts(&Self::documents(&entries)).await?;
        let catalog = Self::from_parts(kind, entries, matrix, embedder.dimensions())?;
        info!(
            "{} catalog built: {} entries, {} dims ({})",
            kind,
            catalog.len(),
            catalog.dimensions,
            embedder.name()
        );
        Ok(catalog)
    }

    /// Catalog kind
    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    /// Entries in catalog order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Embedding rows in catalog order
    pub fn matrix(&self) -> &[Vec<f32>] {
        &self.matrix
    }

    /// Vector dimensionality
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
