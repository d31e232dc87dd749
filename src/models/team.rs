//! Team model — an assembled side with derived strength and shape counts.

use serde::{Deserialize, Serialize};

use super::{Player, Position};

/// An assembled team.
///
/// Membership is fixed once returned by the splitter for the remainder of a
/// request; simulation never mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Team {
    /// Optional display name (the boundary lets users name teams after
    /// generation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Players assigned to this team
    #[serde(default)]
    pub players: Vec<Player>,
}

impl Team {
    /// Create an empty team.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a team from a player list.
    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            name: None,
            players,
        }
    }

    pub fn size(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Sum of effective skill scores across the roster.
    pub fn total_score(&self) -> f64 {
        self.players.iter().map(Player::skill_score).sum()
    }

    /// Number of players at the given position.
    pub fn position_count(&self, position: Position) -> usize {
        self.players
            .iter()
            .filter(|p| p.position == position)
            .count()
    }

    pub fn has_captain(&self) -> bool {
        self.players.iter().any(|p| p.captain)
    }

    /// Display label: the user-supplied name, or "Team N" (1-based).
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => crate::team_label(index),
        }
    }
}
