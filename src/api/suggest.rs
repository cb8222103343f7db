//! Suggestion endpoints
//!
//! - `POST /suggest`: ranked category suggestions
//! - `POST /pathways/suggest`: at most one pathway

use axum::{extract::Extension, routing::post, Json, Router};
use handover_search::{
    CategoryQuery, CategoryResponse, PathwayQuery, PathwayResponse, SuggestionEngine,
};
use std::sync::Arc;

use super::error::{ApiError, ErrorResponse};

/// Create suggestion routes
pub fn suggest_routes() -> Router {
    Router::new()
        .route("/suggest", post(suggest))
        .route("/pathways/suggest", post(suggest_pathway))
}

/// Suggest data-entry categories for a narration
#[utoipa::path(
    post,
    path = "/suggest",
    tag = "suggest",
    request_body = CategoryQuery,
    responses(
        (status = 200, description = "Ranked category suggestions", body = CategoryResponse),
        (status = 422, description = "Parameters out of range", body = ErrorResponse),
        (status = 500, description = "Embedding failure", body = ErrorResponse)
    )
)]
pub async fn suggest(
    Extension(engine): Extension<Arc<SuggestionEngine>>,
    Json(query): Json<CategoryQuery>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let response = engine.suggest_categories(&query).await?;
    Ok(Json(response))
}

/// Suggest the single best clinical pathway for a narration
#[utoipa::path(
    post,
    path = "/pathways/suggest",
    tag = "suggest",
    request_body = PathwayQuery,
    responses(
        (status = 200, description = "Best pathway, or null suggestion", body = PathwayResponse),
        (status = 422, description = "Parameters out of range", body = ErrorResponse),
        (status = 500, description = "Embedding failure", body = ErrorResponse)
    )
)]
pub async fn suggest_pathway(
    Extension(engine): Extension<Arc<SuggestionEngine>>,
    Json(query): Json<PathwayQuery>,
) -> Result<Json<PathwayResponse>, ApiError> {
    let response = engine.suggest_pathway(&query).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{body_json, post_json, test_engine};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    async fn app() -> Router {
        suggest_routes().layer(Extension(test_engine().await))
    }

    #[tokio::test]
    async fn test_suggest_returns_bounded_ranked_list() {
        let response = app()
            .await
            .oneshot(post_json("/suggest", r#"{"text": "low blood glucose, BGL 2.9"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let suggestions = body["suggestions"].as_array().unwrap();
        assert!((3..=8).contains(&suggestions.len()));
        assert_eq!(suggestions[0]["id"], "Blood Glucose.value");
        assert_eq!(suggestions[0]["rule_boost"], 0.0);
        assert_eq!(body["meta"]["model"], "tfidf");
        assert_eq!(body["meta"]["delta"], 0.12);
        assert_eq!(body["meta"]["forced_ids"], serde_json::json!([]));

        let scores: Vec<f64> = suggestions
            .iter()
            .map(|s| s["semantic_score"].as_f64().unwrap())
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_suggest_rejects_out_of_range_delta() {
        let response = app()
            .await
            .oneshot(post_json("/suggest", r#"{"text": "chest pain", "delta": 2.0}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["code"], "INVALID_QUERY");
    }

    #[tokio::test]
    async fn test_pathway_empty_text_is_null() {
        let response = app()
            .await
            .oneshot(post_json("/pathways/suggest", r#"{"text": ""}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["suggestion"].is_null());
        assert_eq!(body["meta"]["top_score"], 0.0);
        assert_eq!(body["meta"]["threshold_score"], 0.35);
    }

    #[tokio::test]
    async fn test_pathway_match() {
        let response = app()
            .await
            .oneshot(post_json(
                "/pathways/suggest",
                r#"{"text": "wheeze, asthma attack, inhaler not helping", "min_score": 0.1}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["suggestion"]["id"], "asthma");
        assert_eq!(body["suggestion"]["why"][1], "selected_by_threshold");
    }
}
