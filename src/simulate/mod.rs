//! Match simulation — strength, win probability, expected goals, and
//! Poisson scorelines.
//!
//! Two stochastic views of the same match are produced: the logistic
//! win-probability model names a predicted winner, and an independent
//! Poisson draw produces the scoreline. They may disagree; both are
//! returned.

use chrono::Utc;
use rand::Rng;

use crate::leaderboard::StatsStore;
use crate::models::{
    Bracket, ExpectedGoals, MatchResult, PredictedWinner, Scoreline, Team, WinProbability,
};
use crate::schedule::{advance_match, ScheduleError};

/// Steepness of the logistic win-probability curve.
const STEEPNESS: f64 = 3.0;

/// Combined expected-goals budget for an average match.
const GOALS_TOTAL_BASE: f64 = 2.6;

/// Weight of the strength share against the logistic probability in the
/// expected-goals blend.
const SHARE_WEIGHT: f64 = 0.55;

/// Floor applied to either side's expected-goals rate.
const MIN_GOAL_RATE: f64 = 0.05;

/// Iteration cap on the Knuth Poisson sampler.
const POISSON_MAX_ITERATIONS: u32 = 100;

/// Probability margin under which the prediction is a draw.
const DRAW_EPSILON: f64 = 1e-9;

/// Aggregate strength of a team: the sum of effective skill scores.
pub fn team_strength(team: &Team) -> f64 {
    team.players.iter().map(|p| p.skill_score()).sum()
}

/// Logistic win probabilities for the given strengths; always sums to 1.0.
///
/// The strength difference is normalized by the average strength (floored
/// at 1 so weak fields stay stable). A saturated exponential collapses to
/// probability 0 or 1 rather than failing.
pub fn win_probability(strength_home: f64, strength_away: f64) -> (f64, f64) {
    let average = (strength_home + strength_away) / 2.0;
    let x = (strength_home - strength_away) / average.max(1.0) * STEEPNESS;
    let p_home = 1.0 / (1.0 + (-x).exp());
    (p_home, 1.0 - p_home)
}

/// Expected-goals rates for both sides.
///
/// Each side's rate blends its share of combined strength with the
/// logistic win probability, so the stronger side's expectation rises and
/// the weaker side's falls, floored at a small positive minimum. Two
/// zero-strength sides get an equal baseline.
pub fn expected_goals(strength_home: f64, strength_away: f64) -> (f64, f64) {
    let total = strength_home + strength_away;
    let share_home = if total > 0.0 {
        strength_home / total
    } else {
        0.5
    };
    let (p_home, p_away) = win_probability(strength_home, strength_away);

    let rate = |share: f64, probability: f64| {
        (GOALS_TOTAL_BASE * (SHARE_WEIGHT * share + (1.0 - SHARE_WEIGHT) * probability))
            .max(MIN_GOAL_RATE)
    };
    (rate(share_home, p_home), rate(1.0 - share_home, p_away))
}

/// Knuth repeated-multiplication Poisson draw, capped at 100 iterations so
/// extreme rates degrade gracefully instead of looping unboundedly.
pub fn poisson_sample<R: Rng + ?Sized>(rate: f64, rng: &mut R) -> u32 {
    let threshold = (-rate.max(0.0)).exp();
    let mut count = 0u32;
    let mut product = 1.0f64;
    while product > threshold && count < POISSON_MAX_ITERATIONS {
        product *= rng.gen::<f64>();
        count += 1;
    }
    count.saturating_sub(1)
}

/// Simulate one match between two teams.
pub fn simulate_match<R: Rng + ?Sized>(
    home_label: &str,
    home: &Team,
    away_label: &str,
    away: &Team,
    rng: &mut R,
) -> MatchResult {
    let strength_home = team_strength(home);
    let strength_away = team_strength(away);

    let (p_home, p_away) = win_probability(strength_home, strength_away);
    let (rate_home, rate_away) = expected_goals(strength_home, strength_away);

    let score = Scoreline {
        home: poisson_sample(rate_home, rng),
        away: poisson_sample(rate_away, rng),
    };

    let predicted_winner = if (p_home - p_away).abs() < DRAW_EPSILON {
        PredictedWinner::Draw
    } else if p_home > p_away {
        PredictedWinner::Home
    } else {
        PredictedWinner::Away
    };

    MatchResult {
        home: home_label.to_string(),
        away: away_label.to_string(),
        predicted_winner,
        win_probability: WinProbability {
            home: p_home,
            away: p_away,
        },
        expected_goals: ExpectedGoals {
            home: rate_home,
            away: rate_away,
        },
        score,
        played_at: Utc::now(),
    }
}

/// One resolved bracket fixture.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BracketMatchRecord {
    pub round: usize,
    pub match_index: usize,
    pub result: MatchResult,
}

/// Simulate a knockout bracket to completion.
///
/// Walks the rounds in order; byes advance without touching the simulator,
/// contested matches are simulated, folded into the stats store, and their
/// winners propagated.
pub fn run_bracket<R: Rng + ?Sized>(
    teams: &[Team],
    bracket: &mut Bracket,
    stats: &mut StatsStore,
    rng: &mut R,
) -> Result<Vec<BracketMatchRecord>, ScheduleError> {
    let mut records = Vec::new();

    for round in 0..bracket.rounds.len() {
        for match_index in 0..bracket.rounds[round].len() {
            if bracket.rounds[round][match_index].winner.is_some() {
                // byes and cascades resolve without simulation
                continue;
            }
            let home_id = bracket.resolve_slot(round, match_index, 0);
            let away_id = bracket.resolve_slot(round, match_index, 1);
            let (Some(home_id), Some(away_id)) = (home_id, away_id) else {
                continue;
            };

            let home = teams
                .get(home_id)
                .ok_or(ScheduleError::IndexOutOfRange {
                    what: "team",
                    index: home_id,
                    len: teams.len(),
                })?;
            let away = teams
                .get(away_id)
                .ok_or(ScheduleError::IndexOutOfRange {
                    what: "team",
                    index: away_id,
                    len: teams.len(),
                })?;

            let result = simulate_match(
                &home.label(home_id),
                home,
                &away.label(away_id),
                away,
                rng,
            );
            stats.record_match(&result, home, away, rng);
            advance_match(bracket, round, match_index, result.home_advances())?;
            records.push(BracketMatchRecord {
                round,
                match_index,
                result,
            });
        }
    }

    Ok(records)
}
