//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File, FileFormat};
use handover_embeddings::EmbedderMode;

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let builder = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            File::with_name(&format!(
                "config/{}",
                std::env::var("HANDOVER_ENV").unwrap_or_else(|_| "development".to_string())
            ))
            .required(false),
        )
        .add_source(File::with_name("config/local").required(false))
        // 3. Environment variables (highest priority)
        // HANDOVER_EMBEDDER__MODE=tfidf, single `_` after the prefix
        .add_source(
            Environment::with_prefix("HANDOVER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = apply_embedder_shorthands(
        builder,
        std::env::var("EMBEDDER_MODE").ok(),
        std::env::var("EMBEDDER_MODEL").ok(),
    )?
    .build()
    .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// `EMBEDDER_MODE` and `EMBEDDER_MODEL` win over `HANDOVER_EMBEDDER__MODE`
/// and `HANDOVER_EMBEDDER__MODEL`.
fn apply_embedder_shorthands(
    builder: ConfigBuilder<DefaultState>,
    mode: Option<String>,
    model: Option<String>,
) -> Result<ConfigBuilder<DefaultState>> {
    let mode = mode
        .map(|value| value.parse::<EmbedderMode>())
        .transpose()
        .context("Invalid EMBEDDER_MODE")?;
    let model = model.filter(|value| !value.trim().is_empty());

    builder
        .set_override_option("embedder.mode", mode.map(mode_key))
        .context("Failed to apply EMBEDDER_MODE")?
        .set_override_option("embedder.model", model)
        .context("Failed to apply EMBEDDER_MODEL")
}

fn mode_key(mode: EmbedderMode) -> &'static str {
    match mode {
        EmbedderMode::Auto => "auto",
        EmbedderMode::Dense => "dense",
        EmbedderMode::Tfidf => "tfidf",
    }
}
