use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{MatchResult, SlotRef, Team};
use crate::schedule::{parse_side_ref, ScheduleError};
use crate::simulate::simulate_match;

// ── Simulate Endpoint ───────────────────────────────────────────

/// A match side: a 0-based team index or a "Team N" label.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SideSelector {
    Index(usize),
    Label(String),
}

impl SideSelector {
    fn resolve(&self, team_count: usize) -> Result<usize, ApiError> {
        let index = match self {
            SideSelector::Index(index) => *index,
            SideSelector::Label(label) => match parse_side_ref(label)? {
                SlotRef::Team(index) => index,
                SlotRef::WinnerOf(_) | SlotRef::Bye => {
                    return Err(ApiError::BadRequest(format!(
                        "reference {label:?} cannot name a team outside a bracket"
                    )))
                }
            },
        };
        if index >= team_count {
            return Err(ScheduleError::IndexOutOfRange {
                what: "team",
                index,
                len: team_count,
            }
            .into());
        }
        Ok(index)
    }
}

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub teams: Vec<Team>,
    pub home: SideSelector,
    pub away: SideSelector,
}

pub async fn simulate(
    State(state): State<AppState>,
    Json(request): Json<SimulateRequest>,
) -> Result<Json<MatchResult>, ApiError> {
    let home_index = request.home.resolve(request.teams.len())?;
    let away_index = request.away.resolve(request.teams.len())?;

    let home = &request.teams[home_index];
    let away = &request.teams[away_index];

    // ThreadRng is not Send: no await may occur while it is alive
    let mut stats = state.stats.write().await;
    let mut rng = rand::thread_rng();
    let result = simulate_match(
        &home.label(home_index),
        home,
        &away.label(away_index),
        away,
        &mut rng,
    );
    stats.record_match(&result, home, away, &mut rng);
    drop(stats);

    tracing::info!(
        home = %result.home,
        away = %result.away,
        score = ?result.score,
        "simulated match"
    );

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::config::EngineConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn two_teams() -> Value {
        json!([
            {"players": [
                {"name": "A", "position": "Forward", "level": "Advanced"},
                {"name": "B", "position": "Goalkeeper", "level": "Advanced"},
                {"name": "C", "position": "Defender", "level": "Advanced"},
                {"name": "D", "position": "Midfielder", "level": "Beginner"},
            ]},
            {"players": []},
        ])
    }

    #[tokio::test]
    async fn test_simulate_by_index() {
        let state = AppState::new(EngineConfig::default());
        let app = build_router(state.clone());

        let (status, json) = post_json(
            app,
            "/api/simulate",
            json!({"teams": two_teams(), "home": 0, "away": 1}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["home"], "Team 1");
        assert_eq!(json["away"], "Team 2");
        // strength 10 vs 0 dominates
        assert_eq!(json["predicted_winner"], "home");
        assert!(json["win_probability"]["home"].as_f64().unwrap() > 0.9);

        // the match was folded into the stats store
        let stats = state.stats.read().await;
        assert_eq!(stats.get("A").unwrap().appearances, 1);
    }

    #[tokio::test]
    async fn test_simulate_by_label() {
        let app = build_router(AppState::new(EngineConfig::default()));

        let (status, json) = post_json(
            app,
            "/api/simulate",
            json!({"teams": two_teams(), "home": "Team 2", "away": "Team 1"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["home"], "Team 2");
        assert_eq!(json["predicted_winner"], "away");
    }

    #[tokio::test]
    async fn test_simulate_malformed_reference() {
        let app = build_router(AppState::new(EngineConfig::default()));

        let (status, json) = post_json(
            app,
            "/api/simulate",
            json!({"teams": two_teams(), "home": "Squad 1", "away": 1}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Malformed team reference"));
    }

    #[tokio::test]
    async fn test_simulate_index_out_of_range() {
        let app = build_router(AppState::new(EngineConfig::default()));

        let (status, json) = post_json(
            app,
            "/api/simulate",
            json!({"teams": two_teams(), "home": 0, "away": 5}),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_simulate_winner_reference_rejected() {
        let app = build_router(AppState::new(EngineConfig::default()));

        let (status, _) = post_json(
            app,
            "/api/simulate",
            json!({"teams": two_teams(), "home": "Winner of Match 1", "away": 1}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
