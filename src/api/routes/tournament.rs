use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::generate::ScheduledMatch;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Bracket, MatchResult, Team};
use crate::schedule::{advance_match, build_bracket, round_robin, TournamentMode};
use crate::simulate::{run_bracket, BracketMatchRecord};

// ── Schedule Endpoint ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TournamentRequest {
    pub teams: Vec<Team>,

    #[serde(default)]
    pub mode: TournamentMode,
}

#[derive(Debug, Serialize)]
pub struct TournamentResponse {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<ScheduledMatch>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bracket: Option<Bracket>,
}

pub async fn schedule(
    Json(request): Json<TournamentRequest>,
) -> Result<Json<TournamentResponse>, ApiError> {
    if request.teams.len() < 2 {
        return Err(ApiError::BadRequest(
            "a tournament needs at least 2 teams".to_string(),
        ));
    }

    let response = match request.mode {
        TournamentMode::RoundRobin => TournamentResponse {
            schedule: round_robin(request.teams.len())
                .iter()
                .map(|f| ScheduledMatch {
                    team_a: request.teams[f.team_a].label(f.team_a),
                    team_b: request.teams[f.team_b].label(f.team_b),
                })
                .collect(),
            bracket: None,
        },
        TournamentMode::Knockout => {
            let mut rng = rand::thread_rng();
            TournamentResponse {
                schedule: Vec::new(),
                bracket: Some(build_bracket(request.teams.len(), &mut rng)),
            }
        }
    };

    Ok(Json(response))
}

// ── Advance Endpoint ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    pub bracket: Bracket,
    pub round: usize,
    pub match_index: usize,
    pub result: MatchResult,
}

pub async fn advance(
    Json(request): Json<AdvanceRequest>,
) -> Result<Json<Bracket>, ApiError> {
    let mut bracket = request.bracket;
    advance_match(
        &mut bracket,
        request.round,
        request.match_index,
        request.result.home_advances(),
    )?;
    Ok(Json(bracket))
}

// ── Run Endpoint ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub teams: Vec<Team>,
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub bracket: Bracket,
    pub matches: Vec<BracketMatchRecord>,
    pub champion: Option<String>,
}

/// Build a knockout bracket and simulate it to completion.
pub async fn run(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> Result<Json<RunResponse>, ApiError> {
    if request.teams.len() < 2 {
        return Err(ApiError::BadRequest(
            "a tournament needs at least 2 teams".to_string(),
        ));
    }

    // ThreadRng is not Send: no await may occur while it is alive
    let mut stats = state.stats.write().await;
    let mut rng = rand::thread_rng();
    let mut bracket = build_bracket(request.teams.len(), &mut rng);
    let matches = run_bracket(&request.teams, &mut bracket, &mut stats, &mut rng)?;
    drop(stats);

    let champion = bracket
        .champion()
        .map(|index| request.teams[index].label(index));

    tracing::info!(
        teams = request.teams.len(),
        matches = matches.len(),
        champion = champion.as_deref().unwrap_or("-"),
        "ran knockout tournament"
    );

    Ok(Json(RunResponse {
        bracket,
        matches,
        champion,
    }))
}
