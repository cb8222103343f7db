//! Suggestion engine: the two request-level operations.
//!
//! The engine owns both catalogs and the embedder each was built with. It is
//! constructed once at startup and shared read-only (`Arc<SuggestionEngine>`)
//! by every request.

use crate::candidate::Candidate;
use crate::catalog::{Catalog, CatalogEntry, CatalogKind};
use crate::error::{Error, Result};
use crate::scorer::similarity_scores;
use crate::selector::{
    select_categories, select_pathway, CategoryParams, Strategy, DEFAULT_DELTA,
    DEFAULT_MAX_RESULTS, DEFAULT_MIN_RESULTS,
};
use handover_embeddings::{EmbedderSource, SharedEmbeddingProvider};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

/// Attached to every response
pub const DISCLAIMER: &str = "Navigation aid only; not clinical decision support.";

/// Maximum accepted narration length, in characters
pub const MAX_TEXT_LEN: usize = 2000;

/// Rule-based boosting is not implemented; the wire field is always zero.
pub const RULE_BOOST: f64 = 0.0;

fn default_delta() -> f64 {
    DEFAULT_DELTA
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_min_results() -> usize {
    DEFAULT_MIN_RESULTS
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn validate_text(text: &str) -> Result<()> {
    let len = text.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(Error::InvalidQuery(format!(
            "text is {} characters, maximum is {}",
            len, MAX_TEXT_LEN
        )));
    }
    Ok(())
}

/// Category suggestion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryQuery {
    /// Free-text narration
    pub text: String,
    /// Relative margin below the best score, in [0, 1]
    #[serde(default = "default_delta")]
    pub delta: f64,
    /// Explicit floor (>= 0) replacing the 0.65 default
    #[serde(default)]
    pub min_score: Option<f64>,
    /// Maximum suggestions, in [1, 50]
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Minimum suggestions, in [1, 20]
    #[serde(default = "default_min_results")]
    pub min_results: usize,
    /// Caller session, accepted for compatibility
    #[serde(default)]
    pub session_id: Option<String>,
}

impl CategoryQuery {
    /// Query with default parameters
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delta: DEFAULT_DELTA,
            min_score: None,
            max_results: DEFAULT_MAX_RESULTS,
            min_results: DEFAULT_MIN_RESULTS,
            session_id: None,
        }
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        validate_text(&self.text)?;
        if !(0.0..=1.0).contains(&self.delta) {
            return Err(Error::InvalidQuery(format!(
                "delta must be in [0, 1], got {}",
                self.delta
            )));
        }
        if let Some(min_score) = self.min_score {
            if min_score.is_nan() || min_score < 0.0 {
                return Err(Error::InvalidQuery(format!(
                    "min_score must be >= 0, got {}",
                    min_score
                )));
            }
        }
        if !(1..=50).contains(&self.max_results) {
            return Err(Error::InvalidQuery(format!(
                "max_results must be in [1, 50], got {}",
                self.max_results
            )));
        }
        if !(1..=20).contains(&self.min_results) {
            return Err(Error::InvalidQuery(format!(
                "min_results must be in [1, 20], got {}",
                self.min_results
            )));
        }
        Ok(())
    }

    fn params(&self) -> CategoryParams {
        CategoryParams {
            delta: self.delta,
            min_score: self.min_score,
            min_results: self.min_results,
            max_results: self.max_results,
        }
    }
}

/// One category suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Suggestion {
    /// Category id
    pub id: String,
    /// Category title
    pub title: String,
    /// Semantic score plus rule boost (currently equal to `semantic_score`)
    pub final_score: f64,
    /// Similarity score in [0, 1]
    pub semantic_score: f64,
    /// Always 0.0
    pub rule_boost: f64,
    /// Explanation trace
    pub why: Vec<String>,
}

impl From<Candidate> for Suggestion {
    fn from(c: Candidate) -> Self {
        Self {
            id: c.id,
            title: c.title,
            final_score: round4(c.semantic_score + RULE_BOOST),
            semantic_score: round4(c.semantic_score),
            rule_boost: RULE_BOOST,
            why: c.why,
        }
    }
}

/// Category response metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryMeta {
    /// Embedder name
    pub model: String,
    /// Wall time spent on the request
    pub latency_ms: u64,
    /// Fixed disclaimer
    pub disclaimer: String,
    /// Echoed `delta`
    pub delta: f64,
    /// Echoed `min_score`
    pub min_score: Option<f64>,
    /// Echoed `max_results`
    pub max_results: usize,
    /// Echoed `min_results`
    pub min_results: usize,
    /// Rule that set the threshold
    pub strategy_used: Strategy,
    /// Best score across the catalog
    pub s_max: f64,
    /// `s_max` below the 0.65 confidence floor
    pub low_confidence_mode: bool,
    /// The confidence floor constant
    pub low_conf_threshold: f64,
    /// Final threshold
    pub threshold_score: f64,
    /// Floor applied during selection
    pub floor_score: f64,
    /// Backfilled ids that met the floor
    pub floor_added_ids: Vec<String>,
    /// Backfilled ids below the floor
    pub topk_added_ids: Vec<String>,
    /// Reserved; always empty
    pub forced_ids: Vec<String>,
    /// Reserved; always empty
    pub baseline_added_ids: Vec<String>,
    /// Reserved; always false
    pub max_exceeded_due_to_forced: bool,
}

/// Category suggestion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    /// Suggestions by descending score
    pub suggestions: Vec<Suggestion>,
    /// Selection metadata
    pub meta: CategoryMeta,
}

/// Pathway suggestion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PathwayQuery {
    /// Free-text narration
    pub text: String,
    /// Explicit floor in [0, 1] replacing the 0.35 default
    #[serde(default)]
    pub min_score: Option<f64>,
    /// Caller session, accepted for compatibility
    #[serde(default)]
    pub session_id: Option<String>,
}

impl PathwayQuery {
    /// Query with the default floor
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            min_score: None,
            session_id: None,
        }
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        validate_text(&self.text)?;
        if let Some(min_score) = self.min_score {
            if !(0.0..=1.0).contains(&min_score) {
                return Err(Error::InvalidQuery(format!(
                    "min_score must be in [0, 1], got {}",
                    min_score
                )));
            }
        }
        Ok(())
    }
}

/// The matched pathway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PathwaySuggestion {
    /// Pathway id
    pub id: String,
    /// Pathway title
    pub title: String,
    /// Similarity score in [0, 1]
    pub score: f64,
    /// Explanation trace
    pub why: Vec<String>,
}

/// Pathway response metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PathwayMeta {
    /// Embedder name
    pub model: String,
    /// Wall time spent on the request
    pub latency_ms: u64,
    /// Fixed disclaimer
    pub disclaimer: String,
    /// Echoed `min_score`
    pub min_score: Option<f64>,
    /// Floor applied
    pub threshold_score: f64,
    /// Best pathway score (0.0 for empty text)
    pub top_score: f64,
}

/// Pathway suggestion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PathwayResponse {
    /// Best pathway, or null when nothing clears the floor
    pub suggestion: Option<PathwaySuggestion>,
    /// Selection metadata
    pub meta: PathwayMeta,
}

/// Category and pathway catalogs with their embedders
pub struct SuggestionEngine {
    categories: Catalog,
    category_embedder: SharedEmbeddingProvider,
    pathways: Catalog,
    pathway_embedder: SharedEmbeddingProvider,
}

impl SuggestionEngine {
    /// Assemble an engine from prebuilt catalogs
    pub fn new(
        categories: Catalog,
        category_embedder: SharedEmbeddingProvider,
        pathways: Catalog,
        pathway_embedder: SharedEmbeddingProvider,
    ) -> Result<Self> {
        for (catalog, embedder) in [
            (&categories, &category_embedder),
            (&pathways, &pathway_embedder),
        ] {
            if catalog.dimensions() != embedder.dimensions() {
                return Err(Error::DimensionMismatch {
                    expected: embedder.dimensions(),
                    actual: catalog.dimensions(),
                });
            }
        }

        Ok(Self {
            categories,
            category_embedder,
            pathways,
            pathway_embedder,
        })
    }

    /// Embed both catalogs with embedders from `source`
    pub async fn build(
        source: &EmbedderSource,
        category_entries: Vec<CatalogEntry>,
        pathway_entries: Vec<CatalogEntry>,
    ) -> Result<Self> {
        let category_embedder = source.embedder_for(&Catalog::documents(&category_entries));
        let categories = Catalog::build(
            CatalogKind::Category,
            category_entries,
            category_embedder.as_ref(),
        )
        .await?;

        let pathway_embedder = source.embedder_for(&Catalog::documents(&pathway_entries));
        let pathways =
            Catalog::build(CatalogKind::Pathway, pathway_entries, pathway_embedder.as_ref())
                .await?;

        Self::new(categories, category_embedder, pathways, pathway_embedder)
    }

    /// Load both catalog files and build the engine
    pub async fn from_paths(
        source: &EmbedderSource,
        categories_path: &Path,
        pathways_path: &Path,
    ) -> Result<Self> {
        let category_entries = Catalog::read_entries(categories_path, CatalogKind::Category)?;
        let pathway_entries = Catalog::read_entries(pathways_path, CatalogKind::Pathway)?;
        let engine = Self::build(source, category_entries, pathway_entries).await?;
        info!(
            categories = engine.categories.len(),
            pathways = engine.pathways.len(),
            model = engine.category_model(),
            "Suggestion engine ready"
        );
        Ok(engine)
    }

    /// Category catalog
    pub fn categories(&self) -> &Catalog {
        &self.categories
    }

    /// Pathway catalog
    pub fn pathways(&self) -> &Catalog {
        &self.pathways
    }

    /// Name of the category embedder
    pub fn category_model(&self) -> &str {
        self.category_embedder.name()
    }

    /// Name of the pathway embedder
    pub fn pathway_model(&self) -> &str {
        self.pathway_embedder.name()
    }

    /// Score every category. Empty text scores 0.0 everywhere without embedding.
    pub async fn score_categories(&self, text: &str) -> Result<Vec<Candidate>> {
        if text.trim().is_empty() {
            return Ok(self
                .categories
                .entries()
                .iter()
                .map(|entry| Candidate::new(entry, 0.0))
                .collect());
        }
        score_catalog(&self.categories, &self.category_embedder, text).await
    }

    /// Score every pathway. Empty text yields no candidates.
    pub async fn score_pathways(&self, text: &str) -> Result<Vec<Candidate>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        score_catalog(&self.pathways, &self.pathway_embedder, text).await
    }

    /// Suggest a bounded, ranked set of categories for `query.text`
    #[instrument(skip(self, query), fields(text_len = query.text.len()))]
    pub async fn suggest_categories(&self, query: &CategoryQuery) -> Result<CategoryResponse> {
        query.validate()?;
        let start = Instant::now();

        let scored = self.score_categories(&query.text).await?;
        let selection = select_categories(&scored, &query.params());
        let latency_ms = start.elapsed().as_millis() as u64;

        info!("suggest latency_ms={} model={}", latency_ms, self.category_model());
        debug!(
            strategy = ?selection.diagnostics.strategy_used,
            s_max = selection.diagnostics.s_max,
            selected = selection.selected.len(),
            "Category selection"
        );

        let d = selection.diagnostics;
        Ok(CategoryResponse {
            suggestions: selection.selected.into_iter().map(Suggestion::from).collect(),
            meta: CategoryMeta {
                model: self.category_model().to_string(),
                latency_ms,
                disclaimer: DISCLAIMER.to_string(),
                delta: query.delta,
                min_score: query.min_score,
                max_results: query.max_results,
                min_results: query.min_results,
                strategy_used: d.strategy_used,
                s_max: d.s_max,
                low_confidence_mode: d.low_confidence_mode,
                low_conf_threshold: d.low_conf_threshold,
                threshold_score: d.threshold_score,
                floor_score: d.floor_score,
                floor_added_ids: d.floor_added_ids,
                topk_added_ids: d.topk_added_ids,
                forced_ids: Vec::new(),
                baseline_added_ids: Vec::new(),
                max_exceeded_due_to_forced: false,
            },
        })
    }

    /// Suggest at most one pathway for `query.text`
    #[instrument(skip(self, query), fields(text_len = query.text.len()))]
    pub async fn suggest_pathway(&self, query: &PathwayQuery) -> Result<PathwayResponse> {
        query.validate()?;
        let start = Instant::now();

        let candidates = self.score_pathways(&query.text).await?;
        let (selected, d) = select_pathway(&candidates, query.min_score);
        let latency_ms = start.elapsed().as_millis() as u64;

        info!(
            "pathway_suggest latency_ms={} model={}",
            latency_ms,
            self.pathway_model()
        );

        Ok(PathwayResponse {
            suggestion: selected.map(|c| PathwaySuggestion {
                id: c.id,
                title: c.title,
                score: round4(c.semantic_score),
                why: c.why,
            }),
            meta: PathwayMeta {
                model: self.pathway_model().to_string(),
                latency_ms,
                disclaimer: DISCLAIMER.to_string(),
                min_score: d.min_score,
                threshold_score: d.threshold_score,
                top_score: d.top_score,
            },
        })
    }
}

async fn score_catalog(
    catalog: &Catalog,
    embedder: &SharedEmbeddingProvider,
    text: &str,
) -> Result<Vec<Candidate>> {
    let query = embedder.embed_text(text).await?;
    let scores = similarity_scores(&query, catalog.matrix(), embedder.score_range())?;
    Ok(catalog
        .entries()
        .iter()
        .zip(scores)
        .map(|(entry, score)| Candidate::new(entry, score))
        .collect())
}
