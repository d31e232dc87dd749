//! REST API endpoints.
//!
//! Axum-based HTTP API for team generation, match simulation, tournament
//! scheduling, and the leaderboard.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod routes;
pub mod state;

use crate::models::FormationError;
use crate::schedule::ScheduleError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body: message plus an internal trace for diagnostics.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub trace: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                trace: format!("{:?}", self),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::IndexOutOfRange { .. } => ApiError::NotFound(err.to_string()),
            ScheduleError::MalformedTeamReference(_)
            | ScheduleError::SlotAlreadyResolved { .. }
            | ScheduleError::MatchNotReady { .. } => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<FormationError> for ApiError {
    fn from(err: FormationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// CORS layer for the configured origin; `*` means any.
pub fn cors_layer(origin: &str) -> CorsLayer {
    match origin.trim() {
        "*" => CorsLayer::permissive(),
        exact => match exact.parse() {
            Ok(value) => CorsLayer::new()
                .allow_origin(AllowOrigin::exact(value))
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
            Err(_) => {
                tracing::warn!("invalid CORS origin {exact:?}, falling back to permissive");
                CorsLayer::permissive()
            }
        },
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::meta::health))
        .route("/api/generate", post(routes::generate::generate))
        .route("/api/simulate", post(routes::matches::simulate))
        .route("/api/tournament", post(routes::tournament::schedule))
        .route("/api/tournament/advance", post(routes::tournament::advance))
        .route("/api/tournament/run", post(routes::tournament::run))
        .route("/api/leaderboard", get(routes::leaderboard::leaderboard))
        .route("/api/leaderboard/rating", post(routes::leaderboard::set_rating))
        .route("/api/leaderboard/reset", post(routes::leaderboard::reset))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
