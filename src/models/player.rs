//! Player model — roster entries fed into the team splitter.

use serde::{Deserialize, Deserializer, Serialize};

/// On-pitch position of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    /// All positions, goalkeeper first.
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Outfield positions in quota-filling (and substitution) order.
    pub const OUTFIELD: [Position; 3] =
        [Position::Defender, Position::Midfielder, Position::Forward];
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Goalkeeper => write!(f, "Goalkeeper"),
            Position::Defender => write!(f, "Defender"),
            Position::Midfielder => write!(f, "Midfielder"),
            Position::Forward => write!(f, "Forward"),
        }
    }
}

/// Self-declared skill bracket, mapped to an integer score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    /// Numeric skill score used for balancing and match strength.
    pub fn score(&self) -> f64 {
        match self {
            SkillLevel::Beginner => 1.0,
            SkillLevel::Intermediate => 2.0,
            SkillLevel::Advanced => 3.0,
        }
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkillLevel::Beginner => write!(f, "Beginner"),
            SkillLevel::Intermediate => write!(f, "Intermediate"),
            SkillLevel::Advanced => write!(f, "Advanced"),
        }
    }
}

/// A roster entry.
///
/// Immutable input except for the `captain` flag, which team assembly may
/// set once per team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Player name, unique within a request
    pub name: String,

    /// On-pitch position
    pub position: Position,

    /// Skill bracket
    pub level: SkillLevel,

    /// Optional numeric rating override; accepts a number or a numeric
    /// string, anything else falls back to the level score
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<f64>,

    /// Captain flag
    #[serde(default)]
    pub captain: bool,
}

impl Player {
    /// Create a new player without a rating override or captain flag.
    pub fn new(name: impl Into<String>, position: Position, level: SkillLevel) -> Self {
        Self {
            name: name.into(),
            position,
            level,
            rating: None,
            captain: false,
        }
    }

    /// Effective skill score: the rating override when present, otherwise
    /// the level-based score.
    pub fn skill_score(&self) -> f64 {
        self.rating.unwrap_or_else(|| self.level.score())
    }
}

/// Accepts a number or numeric string; any other value decodes to `None`.
fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| match v {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|r| r.is_finite()))
}
