//! HTTP endpoints.
//!
//! Axum-based surface serving the dashboard pages and the JSON data
//! they are built from. Every request recomputes the pipeline from the
//! cached workbook read; there is no server-side push, the browser
//! reloads on a timer.

pub mod routes;
pub mod state;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use state::AppState;

/// API error types.
///
/// Unknown routes get axum's default 404; everything this surface can
/// fail on itself is an internal problem (workbook read errors).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<crate::load::LoadError> for ApiError {
    fn from(e: crate::load::LoadError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::pages::leaderboard))
        .route("/stats", get(routes::pages::group_stats))
        .route("/api/leaderboard", get(routes::data::leaderboard))
        .route("/api/groups", get(routes::data::groups))
        .route("/health", get(routes::data::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
