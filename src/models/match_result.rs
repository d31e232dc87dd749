//! Match outcome model — probabilities, expected goals, and a sampled score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Side favored by the probability model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictedWinner {
    Home,
    Away,
    Draw,
}

/// Win probabilities for both sides; sums to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WinProbability {
    pub home: f64,
    pub away: f64,
}

/// Expected-goals rates feeding the Poisson scoreline draw.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExpectedGoals {
    pub home: f64,
    pub away: f64,
}

/// A simulated integer scoreline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreline {
    pub home: u32,
    pub away: u32,
}

/// The full simulated outcome of one match.
///
/// The predicted winner comes from the probability comparison alone; the
/// scoreline is an independent draw and the two may disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// Home side label
    pub home: String,

    /// Away side label
    pub away: String,

    /// Side favored by the win-probability model
    pub predicted_winner: PredictedWinner,

    /// Win probabilities
    pub win_probability: WinProbability,

    /// Expected-goals rates
    pub expected_goals: ExpectedGoals,

    /// Sampled scoreline
    pub score: Scoreline,

    /// When this simulation ran
    pub played_at: DateTime<Utc>,
}

impl MatchResult {
    /// Whether the home side advances from a knockout tie: the sampled
    /// score decides, the probability model breaks a drawn scoreline.
    pub fn home_advances(&self) -> bool {
        match self.score.home.cmp(&self.score.away) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => self.win_probability.home >= self.win_probability.away,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(score: (u32, u32), prob_home: f64) -> MatchResult {
        MatchResult {
            home: "Team 1".to_string(),
            away: "Team 2".to_string(),
            predicted_winner: PredictedWinner::Home,
            win_probability: WinProbability {
                home: prob_home,
                away: 1.0 - prob_home,
            },
            expected_goals: ExpectedGoals {
                home: 1.3,
                away: 1.3,
            },
            score: Scoreline {
                home: score.0,
                away: score.1,
            },
            played_at: Utc::now(),
        }
    }

    #[test]
    fn test_home_advances_on_score() {
        assert!(result((2, 1), 0.3).home_advances());
        assert!(!result((0, 1), 0.9).home_advances());
    }

    #[test]
    fn test_drawn_score_falls_back_to_probability() {
        assert!(result((1, 1), 0.6).home_advances());
        assert!(!result((1, 1), 0.4).home_advances());
        // exactly even: home holds
        assert!(result((0, 0), 0.5).home_advances());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let r = result((3, 0), 0.8);
        let json = serde_json::to_string(&r).unwrap();
        let back: MatchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.score, r.score);
        assert_eq!(back.predicted_winner, PredictedWinner::Home);
    }
}
