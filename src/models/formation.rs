//! Formation model — required per-position headcounts for a starting lineup.
//!
//! A formation always implies exactly one goalkeeper; only the outfield
//! counts are spelled out, in the conventional "D-M-F" order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Position;

/// Formation parsing/validation errors.
#[derive(Debug, Error)]
pub enum FormationError {
    #[error("Invalid formation spec: {0:?}")]
    InvalidSpec(String),
}

/// Required outfield headcounts for one team's starting lineup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    pub defenders: usize,
    pub midfielders: usize,
    pub forwards: usize,
}

impl Formation {
    pub fn new(defenders: usize, midfielders: usize, forwards: usize) -> Self {
        Self {
            defenders,
            midfielders,
            forwards,
        }
    }

    /// Look up a named preset.
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "balanced" => Some(Self::new(4, 3, 3)),
            "classic" => Some(Self::new(4, 4, 2)),
            "defensive" => Some(Self::new(5, 3, 2)),
            "attacking" => Some(Self::new(3, 4, 3)),
            _ => None,
        }
    }

    /// Parse a preset name or a "D-M-F" numeric string.
    pub fn parse(spec: &str) -> Result<Self, FormationError> {
        if let Some(preset) = Self::preset(spec) {
            return Ok(preset);
        }

        let parts: Vec<&str> = spec.trim().split('-').collect();
        if parts.len() != 3 {
            return Err(FormationError::InvalidSpec(spec.to_string()));
        }
        let counts: Vec<usize> = parts
            .iter()
            .map(|p| p.trim().parse::<usize>())
            .collect::<Result<_, _>>()
            .map_err(|_| FormationError::InvalidSpec(spec.to_string()))?;

        Ok(Self::new(counts[0], counts[1], counts[2]))
    }

    /// Even outfield split for a team of `team_size` players (goalkeeper
    /// included); remainders go to defenders, then midfielders.
    pub fn even_split(team_size: usize) -> Self {
        let outfield = team_size.saturating_sub(1);
        let base = outfield / 3;
        let remainder = outfield % 3;
        Self::new(
            base + usize::from(remainder >= 1),
            base + usize::from(remainder >= 2),
            base,
        )
    }

    /// Required headcount for a position (always 1 for the goalkeeper).
    pub fn required(&self, position: Position) -> usize {
        match position {
            Position::Goalkeeper => 1,
            Position::Defender => self.defenders,
            Position::Midfielder => self.midfielders,
            Position::Forward => self.forwards,
        }
    }

    pub fn outfield_total(&self) -> usize {
        self.defenders + self.midfielders + self.forwards
    }
}

impl std::str::FromStr for Formation {
    type Err = FormationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Formation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.defenders, self.midfielders, self.forwards
        )
    }
}

/// A formation as supplied by the boundary: either a named/numeric string
/// or an explicit mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FormationSpec {
    Named(String),
    Counts(Formation),
}

impl FormationSpec {
    pub fn resolve(&self) -> Result<Formation, FormationError> {
        match self {
            FormationSpec::Named(s) => Formation::parse(s),
            FormationSpec::Counts(f) => Ok(*f),
        }
    }
}
