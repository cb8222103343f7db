//! Engine errors as HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error};
use utoipa::ToSchema;

/// JSON error body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Machine-readable code
    pub code: String,
}

/// Rejection produced by the suggestion handlers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<handover_search::Error> for ApiError {
    fn from(err: handover_search::Error) -> Self {
        if err.is_client_error() {
            debug!(error = %err, "Rejected suggestion request");
            ApiError {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                body: ErrorResponse {
                    error: err.to_string(),
                    code: "INVALID_QUERY".to_string(),
                },
            }
        } else {
            error!(error = %err, "Suggestion request failed");
            ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: ErrorResponse {
                    error: err.to_string(),
                    code: "INTERNAL_ERROR".to_string(),
                },
            }
        }
    }
}
