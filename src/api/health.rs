//! Health check endpoint

use axum::extract::Extension;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use handover_search::SuggestionEngine;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Health response with the loaded models and catalog sizes
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Category embedder name
    pub model: String,
    /// Pathway embedder name
    pub pathway_model: String,
    /// Number of category entries
    pub categories: usize,
    /// Number of pathway entries
    pub pathways: usize,
}

/// Create health routes
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Report service status
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(
    Extension(engine): Extension<Arc<SuggestionEngine>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: engine.category_model().to_string(),
        pathway_model: engine.pathway_model().to_string(),
        categories: engine.categories().len(),
        pathways: engine.pathways().len(),
    })
}
