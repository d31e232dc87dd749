use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Bracket, FormationSpec, Player, Team};
use crate::schedule::{build_bracket, round_robin, TournamentMode};
use crate::split::build_teams;

// ── Generate Endpoint ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub players: Vec<Player>,

    #[serde(default = "default_team_count", alias = "teamCount")]
    pub team_count: usize,

    #[serde(default, alias = "tournamentType")]
    pub tournament_type: TournamentMode,

    #[serde(default)]
    pub formation: Option<FormationSpec>,
}

fn default_team_count() -> usize {
    2
}

/// One schedule row, sides as "Team N" labels.
#[derive(Debug, Serialize)]
pub struct ScheduledMatch {
    pub team_a: String,
    pub team_b: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub teams: Vec<Team>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<ScheduledMatch>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bracket: Option<Bracket>,
}

pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    if request.team_count == 0 {
        return Err(ApiError::BadRequest(
            "team_count must be at least 1".to_string(),
        ));
    }

    let formation = request
        .formation
        .as_ref()
        .map(FormationSpec::resolve)
        .transpose()?;

    let mut rng = rand::thread_rng();
    let teams = build_teams(
        &request.players,
        request.team_count,
        formation.as_ref(),
        state.engine.trials,
        &mut rng,
    );

    tracing::info!(
        players = request.players.len(),
        teams = teams.len(),
        mode = ?request.tournament_type,
        "generated balanced teams"
    );

    let (schedule, bracket) = match request.tournament_type {
        TournamentMode::RoundRobin => {
            // the original only attaches a schedule to fields larger than
            // two teams
            let fixtures = if request.team_count > 2 {
                round_robin(teams.len())
            } else {
                Vec::new()
            };
            let schedule = fixtures
                .iter()
                .map(|f| ScheduledMatch {
                    team_a: crate::team_label(f.team_a),
                    team_b: crate::team_label(f.team_b),
                })
                .collect();
            (schedule, None)
        }
        TournamentMode::Knockout => {
            let bracket = if teams.len() >= 2 {
                Some(build_bracket(teams.len(), &mut rng))
            } else {
                None
            };
            (Vec::new(), bracket)
        }
    };

    Ok(Json(GenerateResponse {
        teams,
        schedule,
        bracket,
    }))
}
