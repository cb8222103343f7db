//! Server configuration types

use anyhow::{bail, Result};
use handover_embeddings::EmbedderConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub embedder: EmbedderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reject configurations the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        for path in [&self.catalog.categories_path, &self.catalog.pathways_path] {
            if !path.is_file() {
                bail!("Catalog file not found: {}", path.display());
            }
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allow cross-origin requests from any origin
    #[serde(default = "default_true")]
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: true,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_true() -> bool {
    true
}

/// Catalog file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_categories_path")]
    pub categories_path: PathBuf,
    #[serde(default = "default_pathways_path")]
    pub pathways_path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            categories_path: default_categories_path(),
            pathways_path: default_pathways_path(),
        }
    }
}

fn default_categories_path() -> PathBuf {
    PathBuf::from("data/categories.json")
}

fn default_pathways_path() -> PathBuf {
    PathBuf::from("data/pathways.json")
}

/// Log output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for daily rolling log files; stdout only when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,
}
