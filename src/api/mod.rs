//! Web API module
//!
//! Provides REST endpoints for:
//! - Category suggestions
//! - Pathway suggestions
//! - Health and OpenAPI documentation

pub mod docs;
pub mod error;
pub mod health;
pub mod suggest;

use axum::Router;

pub use docs::docs_routes;
pub use health::health_routes;
pub use suggest::suggest_routes;

/// Create the API router with all endpoints
pub fn api_router() -> Router {
    Router::new()
        .merge(suggest_routes())
        .merge(health_routes())
        .merge(docs_routes())
}
