//! Per-player statistics models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Running counters for one player.
///
/// Created lazily on first reference, all counters defaulting to zero.
/// The rating counter is only ever set externally; simulation never
/// touches it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStat {
    pub goals: u32,
    pub assists: u32,
    pub appearances: u32,
    pub rating: f64,
}

/// One leaderboard row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub goals: u32,
    pub assists: u32,
    pub appearances: u32,
    pub rating: f64,
}

impl LeaderboardEntry {
    pub fn new(name: &str, stat: &PlayerStat) -> Self {
        Self {
            name: name.to_string(),
            goals: stat.goals,
            assists: stat.assists,
            appearances: stat.appearances,
            rating: stat.rating,
        }
    }
}

/// Ranked leaderboard views at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardSnapshot {
    /// When these views were computed
    pub computed_at: DateTime<Utc>,

    /// Top players by goals, descending
    pub top_scorers: Vec<LeaderboardEntry>,

    /// Top players by rating, descending
    pub top_rated: Vec<LeaderboardEntry>,
}
