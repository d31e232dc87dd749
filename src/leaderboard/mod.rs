//! Transient per-player statistics and ranked leaderboard views.
//!
//! The store is an explicit object constructed at process start and shared
//! by reference into request handling — counters survive across requests
//! but not process restarts, and `reset` is the only way to clear them.

use std::collections::HashMap;

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{LeaderboardEntry, LeaderboardSnapshot, MatchResult, PlayerStat, Team};

/// Leaderboard views are truncated to this many rows.
const LEADERBOARD_LIMIT: usize = 10;

/// Process-wide player statistics, keyed by player name.
#[derive(Debug, Default)]
pub struct StatsStore {
    stats: HashMap<String, PlayerStat>,
}

impl StatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every counter.
    pub fn reset(&mut self) {
        self.stats.clear();
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PlayerStat> {
        self.stats.get(name)
    }

    /// Counters for a player, created lazily at zero.
    fn entry_mut(&mut self, name: &str) -> &mut PlayerStat {
        self.stats.entry(name.to_string()).or_default()
    }

    /// Externally-supplied rating; simulation never writes this.
    pub fn set_rating(&mut self, name: &str, rating: f64) {
        self.entry_mut(name).rating = rating;
    }

    /// Fold one simulated match into the counters.
    ///
    /// Every player on both sides gains an appearance; each simulated goal
    /// goes to a uniformly-random player of the scoring side. A side with
    /// no roster simply leaves its goals unattributed.
    pub fn record_match<R: Rng + ?Sized>(
        &mut self,
        result: &MatchResult,
        home: &Team,
        away: &Team,
        rng: &mut R,
    ) {
        for player in home.players.iter().chain(&away.players) {
            self.entry_mut(&player.name).appearances += 1;
        }
        self.attribute_goals(home, result.score.home, rng);
        self.attribute_goals(away, result.score.away, rng);
    }

    fn attribute_goals<R: Rng + ?Sized>(&mut self, team: &Team, goals: u32, rng: &mut R) {
        for _ in 0..goals {
            if let Some(scorer) = team.players.choose(rng) {
                self.entry_mut(&scorer.name).goals += 1;
            }
        }
    }

    /// Top players by goals, descending; ties break by name for stable
    /// output.
    pub fn top_scorers(&self) -> Vec<LeaderboardEntry> {
        self.ranked_by(|stat| stat.goals as f64)
    }

    /// Top players by rating, descending.
    pub fn top_rated(&self) -> Vec<LeaderboardEntry> {
        self.ranked_by(|stat| stat.rating)
    }

    fn ranked_by(&self, key: impl Fn(&PlayerStat) -> f64) -> Vec<LeaderboardEntry> {
        let mut rows: Vec<(&String, &PlayerStat)> = self.stats.iter().collect();
        rows.sort_by(|a, b| {
            key(b.1)
                .partial_cmp(&key(a.1))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        rows.into_iter()
            .take(LEADERBOARD_LIMIT)
            .map(|(name, stat)| LeaderboardEntry::new(name, stat))
            .collect()
    }

    /// Both ranked views, stamped.
    pub fn snapshot(&self) -> LeaderboardSnapshot {
        LeaderboardSnapshot {
            computed_at: Utc::now(),
            top_scorers: self.top_scorers(),
            top_rated: self.top_rated(),
        }
    }
}
