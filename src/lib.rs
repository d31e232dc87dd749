//! # Squad Forge
//!
//! Balanced football team builder with match and tournament simulation.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, teams, formations, brackets, stats)
//! - **split**: Fitness-guided stochastic splitting and the formation fallback
//! - **simulate**: Win probabilities, expected goals, Poisson scorelines
//! - **schedule**: Round-robin fixtures, knockout brackets, advancement
//! - **leaderboard**: Transient per-player statistics and ranked views
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod leaderboard;
pub mod models;
pub mod schedule;
pub mod simulate;
pub mod split;

pub use models::*;

/// Canonical display label for the team at `index` (0-based): "Team N".
pub fn team_label(index: usize) -> String {
    format!("Team {}", index + 1)
}
