//! Dense sentence embeddings via tract-onnx
//!
//! Runs a sentence-transformers ONNX export (default
//! `sentence-transformers/all-MiniLM-L6-v2`) locally. Token embeddings are
//! mean-pooled over the attention mask and L2-normalized, so the dot product
//! of two vectors is their cosine similarity.

use crate::error::{Error, Result};
use crate::provider::{EmbeddingProvider, ScoreRange};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info, instrument};
use tract_onnx::prelude::*;

/// Default Hugging Face model id
pub const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Maximum tokens per input (longer inputs are truncated)
const MAX_TOKENS: usize = 256;

type EmbeddingPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Dense embedding provider backed by an ONNX transformer model
pub struct TractEmbeddingProvider {
    plan: Arc<EmbeddingPlan>,
    tokenizer: Arc<Tokenizer>,
    name: String,
    dimensions: usize,
}

impl TractEmbeddingProvider {
    /// Load the default model, downloading it on first use
    pub fn new() -> Result<Self> {
        Self::from_hub(DEFAULT_MODEL, None)
    }

    /// Load `model_id` from the Hugging Face hub, caching under `cache_dir`
    pub fn from_hub(model_id: &str, cache_dir: Option<&Path>) -> Result<Self> {
        use hf_hub::api::sync::{Api, ApiBuilder};

        let api = match cache_dir {
            Some(dir) => ApiBuilder::new().with_cache_dir(dir.to_path_buf()).build(),
            None => Api::new(),
        }
        .map_err(|e| Error::Model(format!("HuggingFace API error: {}", e)))?;

        let repo = api.model(model_id.to_string());
        let model_path = repo
            .get("onnx/model.onnx")
            .map_err(|e| Error::Model(format!("Model download error: {}", e)))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| Error::Tokenizer(format!("Tokenizer download error: {}", e)))?;

        Self::from_files(model_id, &model_path, &tokenizer_path)
    }

    /// Load from local ONNX model and tokenizer files
    pub fn from_files(model_id: &str, model_path: &Path, tokenizer_path: &Path) -> Result<Self> {
        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| Error::Tokenizer(format!("Failed to load tokenizer: {}", e)))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| Error::Tokenizer(format!("Failed to configure truncation: {}", e)))?;
        tokenizer.with_padding(None);

        let plan = tract_onnx::onnx()
            .model_for_path(model_path)
            .map_err(|e| Error::Model(format!("Failed to load ONNX model: {}", e)))?
            .into_optimized()
            .map_err(|e| Error::Model(format!("Model optimize error: {}", e)))?
            .into_runnable()
            .map_err(|e| Error::Model(format!("Model runnable error: {}", e)))?;

        let probe = embed_one(&plan, &tokenizer, "dimension probe")?;
        let dimensions = probe.len();

        info!(
            "Dense embedding model loaded: {} ({} dimensions) from {}",
            model_id,
            dimensions,
            model_path.display()
        );

        Ok(Self {
            plan: Arc::new(plan),
            tokenizer: Arc::new(tokenizer),
            name: format!("sentence-transformers:{}", short_model_name(model_id)),
            dimensions,
        })
    }
}

fn short_model_name(model_id: &str) -> &str {
    model_id.rsplit('/').next().unwrap_or(model_id)
}

fn embed_one(plan: &EmbeddingPlan, tokenizer: &Tokenizer, text: &str) -> Result<Vec<f32>> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| Error::Tokenizer(format!("Encoding failed: {}", e)))?;

    let seq_len = encoding.get_ids().len();
    let mask: Vec<i64> = encoding.get_attention_mask().iter().map(|&m| m as i64).collect();
    let columns: [Vec<i64>; 3] = [
        encoding.get_ids().iter().map(|&id| id as i64).collect(),
        mask.clone(),
        encoding.get_type_ids().iter().map(|&t| t as i64).collect(),
    ];

    // Some exports take only input_ids + attention_mask.
    let input_count = plan.model().inputs.len().min(columns.len());
    let mut inputs: TVec<TValue> = tvec![];
    for column in columns.into_iter().take(input_count) {
        let tensor: Tensor = tract_ndarray::Array2::from_shape_vec((1, seq_len), column)
            .map_err(|e| Error::Model(format!("Input tensor error: {}", e)))?
            .into();
        inputs.push(tensor.into());
    }

    let outputs = plan
        .run(inputs)
        .map_err(|e| Error::Model(format!("Inference error: {}", e)))?;

    let hidden = outputs[0]
        .to_array_view::<f32>()
        .map_err(|e| Error::Model(format!("Output parse error: {}", e)))?
        .into_dimensionality::<tract_ndarray::Ix3>()
        .map_err(|e| Error::Model(format!("Unexpected output shape: {}", e)))?;

    let dimensions = hidden.shape()[2];
    let mut pooled = vec![0.0f32; dimensions];
    let mut counted = 0.0f32;
    for (token, &m) in mask.iter().enumerate().take(hidden.shape()[1]) {
        if m == 0 {
            continue;
        }
        counted += 1.0;
        for (d, value) in pooled.iter_mut().enumerate() {
            *value += hidden[[0, token, d]];
        }
    }
    if counted > 0.0 {
        for value in &mut pooled {
            *value /= counted;
        }
    }

    let norm: f32 = pooled.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for value in &mut pooled {
            *value /= norm;
        }
    }
    Ok(pooled)
}

#[async_trait]
impl EmbeddingProvider for TractEmbeddingProvider {
    #[instrument(skip(self, texts), fields(batch_size = texts.len()))]
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let texts = texts.to_vec();
        let plan = self.plan.clone();
        let tokenizer = self.tokenizer.clone();

        // tract inference is synchronous and CPU-bound
        let embeddings = tokio::task::spawn_blocking(move || {
            texts
                .iter()
                .map(|text| embed_one(&plan, &tokenizer, text))
                .collect::<Result<Vec<_>>>()
        })
        .await
        .map_err(|e| Error::Provider(format!("Task join error: {}", e)))??;

        debug!("Generated {} dense embeddings", embeddings.len());
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn score_range(&self) -> ScoreRange {
        ScoreRange::SignedCosine
    }
}
