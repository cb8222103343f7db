//! API Documentation - Swagger UI
//!
//! Provides OpenAPI documentation at /docs

use axum::Router;
use handover_search::{
    CategoryMeta, CategoryQuery, CategoryResponse, PathwayMeta, PathwayQuery, PathwayResponse,
    PathwaySuggestion, Strategy, Suggestion,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::{error::ErrorResponse, health::HealthResponse};

/// Handover suggestion API OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Handover Suggestions API",
        version = "0.1.0",
        description = "Semantic navigation aid for paramedic handover narration.

## Overview
- **Categories**: ranked data-entry categories for a free-text narration
- **Pathways**: the single best-matching clinical pathway, if any

Navigation aid only; not clinical decision support.
",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        crate::api::suggest::suggest,
        crate::api::suggest::suggest_pathway,
        crate::api::health::health_check,
    ),
    components(
        schemas(
            CategoryQuery,
            CategoryResponse,
            CategoryMeta,
            Suggestion,
            Strategy,
            PathwayQuery,
            PathwayResponse,
            PathwayMeta,
            PathwaySuggestion,
            HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "suggest", description = "Category and pathway suggestions"),
        (name = "health", description = "Service status"),
    )
)]
pub struct ApiDoc;

/// Create documentation routes
pub fn docs_routes() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api/openapi.json", ApiDoc::openapi()))
}
