//! Partition fitness scoring.
//!
//! A candidate split of the roster into teams is scored with a single
//! non-negative penalty; lower is better and 0.0 is the (possibly
//! unreachable) ideal of perfectly equal scores, positional balance, and
//! team sizes.

use crate::models::{Player, Position, Team};

/// Hard weight on the one-goalkeeper-per-team constraint.
const GOALKEEPER_WEIGHT: f64 = 5.0;

/// Score a partition of players into teams.
pub fn partition_fitness(teams: &[Team]) -> f64 {
    let groups: Vec<Vec<&Player>> = teams
        .iter()
        .map(|team| team.players.iter().collect())
        .collect();
    fitness_of_groups(&groups)
}

/// Score a borrowed partition; the trial loop uses this form so candidate
/// deals never clone players.
pub(crate) fn fitness_of_groups(groups: &[Vec<&Player>]) -> f64 {
    if groups.is_empty() {
        return 0.0;
    }
    let team_count = groups.len() as f64;
    let total_players: usize = groups.iter().map(Vec::len).sum();
    if total_players == 0 {
        // empty teams are trivially balanced
        return 0.0;
    }

    let mean_size = total_players as f64 / team_count;
    let scores: Vec<f64> = groups
        .iter()
        .map(|group| group.iter().map(|p| p.skill_score()).sum())
        .collect();
    let mean_score: f64 = scores.iter().sum::<f64>() / team_count;

    // expected per-team headcount for each position
    let expected: Vec<f64> = Position::ALL
        .iter()
        .map(|&pos| {
            let total = groups
                .iter()
                .flat_map(|group| group.iter())
                .filter(|p| p.position == pos)
                .count();
            total as f64 / team_count
        })
        .collect();

    let mut score_penalty = 0.0;
    let mut position_penalty = 0.0;
    let mut size_penalty = 0.0;

    for (group, score) in groups.iter().zip(&scores) {
        score_penalty += (score - mean_score).abs();

        let counts: Vec<usize> = Position::ALL
            .iter()
            .map(|&pos| group.iter().filter(|p| p.position == pos).count())
            .collect();

        let goalkeepers = counts[0] as f64;
        position_penalty += GOALKEEPER_WEIGHT * (goalkeepers - 1.0).abs();
        for (count, expected) in counts.iter().zip(&expected) {
            position_penalty += (*count as f64 - expected).abs();
        }

        size_penalty += (group.len() as f64 - mean_size).abs();
    }

    score_penalty + position_penalty + size_penalty
}
