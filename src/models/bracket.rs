//! Knockout bracket model — tagged slots, rounds, and winner resolution.

use serde::{Deserialize, Serialize};

/// One side of a bracket match.
///
/// Slots are tagged variants rather than loose labels: a resolved team
/// index, a pending reference to an earlier match's winner, or a bye.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRef {
    /// Resolved team (0-based index into the request's team list)
    Team(usize),
    /// Winner of match K (0-based) in the previous round
    WinnerOf(usize),
    /// Uncontested advancement
    Bye,
}

impl SlotRef {
    /// Whether this slot is still waiting on an earlier match.
    pub fn is_open(&self) -> bool {
        matches!(self, SlotRef::WinnerOf(_))
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, SlotRef::Bye)
    }
}

/// One match inside a bracket round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketMatch {
    /// Home and away slots
    pub slots: [SlotRef; 2],

    /// Winning team index, set exactly once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<usize>,
}

impl BracketMatch {
    pub fn new(home: SlotRef, away: SlotRef) -> Self {
        Self {
            slots: [home, away],
            winner: None,
        }
    }

    /// Whether exactly one side is present and the other is a bye.
    pub fn is_bye(&self) -> bool {
        self.slots.iter().filter(|s| s.is_bye()).count() == 1
    }
}

/// A single-elimination bracket: ordered rounds of ordered matches.
///
/// Round `r + 1` always holds `ceil(len(round r) / 2)` matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bracket {
    pub rounds: Vec<Vec<BracketMatch>>,
}

impl Bracket {
    /// Resolve one side of a match to a team index, if decided.
    ///
    /// The single resolver for slot values: a `Team` slot is itself, a
    /// `WinnerOf` slot looks at the feeding match's recorded winner, and a
    /// bye resolves to nothing.
    pub fn resolve_slot(&self, round: usize, match_index: usize, side: usize) -> Option<usize> {
        let slot = self.rounds.get(round)?.get(match_index)?.slots.get(side)?;
        match slot {
            SlotRef::Team(team) => Some(*team),
            SlotRef::WinnerOf(feeder) => {
                let prev = round.checked_sub(1)?;
                self.rounds.get(prev)?.get(*feeder)?.winner
            }
            SlotRef::Bye => None,
        }
    }

    /// The tournament champion, once the final has resolved.
    pub fn champion(&self) -> Option<usize> {
        self.rounds.last()?.first()?.winner
    }
}
