//! Server initialization
//!
//! Builds the suggestion engine once, then serves the HTTP API until a
//! shutdown signal arrives.

use super::config::{AppConfig, ServerConfig};
use super::shutdown::wait_for_shutdown_signal;
use crate::api::api_router;
use anyhow::{Context, Result};
use axum::{Extension, Router};
use handover_embeddings::EmbedderSource;
use handover_search::SuggestionEngine;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Resolve the embedder and load both catalogs
pub async fn build_engine(config: &AppConfig) -> Result<Arc<SuggestionEngine>> {
    let embedder_config = config.embedder.clone();
    // Model download and graph optimization block
    let source = tokio::task::spawn_blocking(move || EmbedderSource::from_config(&embedder_config))
        .await
        .context("Embedder initialization task panicked")?
        .context("Failed to initialize embedder")?;

    let engine = SuggestionEngine::from_paths(
        &source,
        &config.catalog.categories_path,
        &config.catalog.pathways_path,
    )
    .await
    .context("Failed to load catalogs")?;

    Ok(Arc::new(engine))
}

/// Assemble the application router around a shared engine
pub fn build_router(engine: Arc<SuggestionEngine>, server: &ServerConfig) -> Router {
    let app = api_router()
        .layer(Extension(engine))
        .layer(TraceLayer::new_for_http());

    if server.cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Run the server
pub async fn run(config: AppConfig) -> Result<()> {
    config.validate()?;

    let engine = build_engine(&config).await?;
    info!(
        model = engine.category_model(),
        pathway_model = engine.pathway_model(),
        categories = engine.categories().len(),
        pathways = engine.pathways().len(),
        "Catalogs loaded"
    );

    let app = build_router(engine, &config.server);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    info!("HTTP server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Handover shutdown complete");
    Ok(())
}
