use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{LeaderboardSnapshot, PlayerStat};

// ── Leaderboard Endpoints ───────────────────────────────────────

pub async fn leaderboard(State(state): State<AppState>) -> Json<LeaderboardSnapshot> {
    Json(state.stats.read().await.snapshot())
}

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub player: String,
    pub rating: f64,
}

pub async fn set_rating(
    State(state): State<AppState>,
    Json(request): Json<RatingRequest>,
) -> Result<Json<PlayerStat>, ApiError> {
    if request.player.trim().is_empty() {
        return Err(ApiError::BadRequest("player name is required".to_string()));
    }
    if !request.rating.is_finite() {
        return Err(ApiError::BadRequest("rating must be a finite number".to_string()));
    }

    let mut stats = state.stats.write().await;
    stats.set_rating(&request.player, request.rating);
    let updated = stats
        .get(&request.player)
        .cloned()
        .ok_or_else(|| ApiError::Internal("rating write failed".to_string()))?;
    Ok(Json(updated))
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub cleared: usize,
}

pub async fn reset(State(state): State<AppState>) -> Json<ResetResponse> {
    let mut stats = state.stats.write().await;
    let cleared = stats.len();
    stats.reset();
    tracing::info!(cleared, "reset player statistics");
    Json(ResetResponse { cleared })
}
