//! Startup selection of the embedding backend
//!
//! The backend is chosen exactly once. A dense provider is shared by every
//! catalog; the TF-IDF backend fits a separate embedder per catalog corpus.

use crate::error::{Error, Result};
use crate::provider::SharedEmbeddingProvider;
use crate::tfidf::TfidfEmbedder;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// Which embedding backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderMode {
    /// Dense model when available, TF-IDF otherwise
    #[default]
    Auto,
    /// Dense model; failure to load is fatal
    Dense,
    /// TF-IDF only
    Tfidf,
}

impl FromStr for EmbedderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "dense" => Ok(Self::Dense),
            "tfidf" => Ok(Self::Tfidf),
            other => Err(Error::UnknownMode(other.to_string())),
        }
    }
}

/// Embedding backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderConfig {
    /// Backend selection
    #[serde(default)]
    pub mode: EmbedderMode,
    /// Hugging Face model id for the dense backend
    #[serde(default = "default_model")]
    pub model: String,
    /// Model cache directory (defaults to the platform cache dir)
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

fn default_model() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            mode: EmbedderMode::Auto,
            model: default_model(),
            cache_dir: None,
        }
    }
}

impl EmbedderConfig {
    /// Model cache directory, falling back to `<cache>/handover/models`
    pub fn resolved_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .or_else(dirs::home_dir)
                .map(|p| p.join("handover").join("models"))
                .unwrap_or_else(|| PathBuf::from(".handover/models"))
        })
    }
}

/// The embedding backend chosen at startup
#[derive(Clone)]
pub enum EmbedderSource {
    /// One dense provider shared by every catalog
    Dense(SharedEmbeddingProvider),
    /// A TF-IDF embedder fitted per catalog
    Tfidf,
}

impl EmbedderSource {
    /// Resolve the backend from configuration
    pub fn from_config(config: &EmbedderConfig) -> Result<Self> {
        match config.mode {
            EmbedderMode::Tfidf => {
                info!("Embedder mode: tfidf");
                Ok(Self::Tfidf)
            }
            EmbedderMode::Dense => load_dense(config).map(Self::Dense),
            EmbedderMode::Auto => match load_dense(config) {
                Ok(provider) => Ok(Self::Dense(provider)),
                Err(e) => {
                    warn!("Dense embeddings unavailable, falling back to TF-IDF: {}", e);
                    Ok(Self::Tfidf)
                }
            },
        }
    }

    /// Embedder to use for a catalog whose embedded documents are `corpus`
    pub fn embedder_for(&self, corpus: &[String]) -> SharedEmbeddingProvider {
        match self {
            Self::Dense(provider) => provider.clone(),
            Self::Tfidf => Arc::new(TfidfEmbedder::fit(corpus)),
        }
    }

    /// True when a dense provider is active
    pub fn is_dense(&self) -> bool {
        matches!(self, Self::Dense(_))
    }
}

#[cfg(feature = "dense")]
fn load_dense(config: &EmbedderConfig) -> Result<SharedEmbeddingProvider> {
    let cache_dir = config.resolved_cache_dir();
    let provider =
        crate::tract::TractEmbeddingProvider::from_hub(&config.model, Some(cache_dir.as_path()))?;
    Ok(Arc::new(provider))
}

#[cfg(not(feature = "dense"))]
fn load_dense(_config: &EmbedderConfig) -> Result<SharedEmbeddingProvider> {
    Err(Error::NotAvailable(
        "Dense embeddings not enabled. Compile with --features dense".to_string(),
    ))
}
