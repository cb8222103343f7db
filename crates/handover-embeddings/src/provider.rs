//! Embedding provider abstraction
//!
//! Everything downstream of this module (catalog build, scoring, selection)
//! is written against [`EmbeddingProvider`] only. The concrete variant is
//! chosen once at startup; callers may read `name()` for diagnostics and
//! `score_range()` to map raw dot products into [0, 1].

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Natural range of the dot product between two vectors from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreRange {
    /// Scores already lie in [0, 1] (non-negative sparse vectors, e.g. TF-IDF)
    Unit,
    /// Cosine similarity of unit vectors, in [-1, 1]
    SignedCosine,
}

impl ScoreRange {
    /// Wire name of the range
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::SignedCosine => "signed-cosine",
        }
    }
}

impl std::fmt::Display for ScoreRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for embedding providers
///
/// Providers must tolerate concurrent calls from many in-flight requests.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, one vector per input in input order
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_texts(&[text.to_string()]).await?;
        if vectors.is_empty() {
            return Err(crate::Error::Provider(
                "provider returned no vector".to_string(),
            ));
        }
        Ok(vectors.swap_remove(0))
    }

    /// Output dimensionality
    fn dimensions(&self) -> usize;

    /// Provider name, reported in response metadata
    fn name(&self) -> &str;

    /// Range of raw similarity scores between two of this provider's vectors
    fn score_range(&self) -> ScoreRange;
}

/// Wrapper for thread-safe embedding provider access
pub type SharedEmbeddingProvider = Arc<dyn EmbeddingProvider>;

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant;

    #[async_trait]
    impl EmbeddingProvider for Constant {
        async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn name(&self) -> &str {
            "constant"
        }

        fn score_range(&self) -> ScoreRange {
            ScoreRange::Unit
        }
    }

    #[tokio::test]
    async fn test_embed_text_is_first_batch_row() {
        let provider = Constant;
        let single = provider.embed_text("abc").await.unwrap();
        let batch = provider.embed_texts(&["abc".to_string()]).await.unwrap();
        assert_eq!(single, batch[0]);
    }

    #[test]
    fn test_score_range_wire_names() {
        assert_eq!(
            serde_json::to_string(&ScoreRange::SignedCosine).unwrap(),
            "\"signed-cosine\""
        );
        assert_eq!(serde_json::to_string(&ScoreRange::Unit).unwrap(), "\"unit\"");
        assert_eq!(ScoreRange::SignedCosine.to_string(), "signed-cosine");
    }
}
