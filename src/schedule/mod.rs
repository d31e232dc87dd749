//! Fixture generation — round-robin pairing lists and knockout brackets.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Bracket, BracketMatch, SlotRef};

/// Scheduling and bracket errors.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Index out of range: {what} {index} (of {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Malformed team reference: {0:?}")]
    MalformedTeamReference(String),

    #[error("Bracket slot already resolved: round {round}, match {match_index}")]
    SlotAlreadyResolved { round: usize, match_index: usize },

    #[error("Match not ready: round {round}, match {match_index} has an unresolved side")]
    MatchNotReady { round: usize, match_index: usize },
}

/// Tournament format selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TournamentMode {
    #[default]
    RoundRobin,
    Knockout,
}

/// One round-robin fixture between two team indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub team_a: usize,
    pub team_b: usize,
}

/// All unordered team pairs in ascending nested order:
/// 0v1, 0v2, ..., 1v2, ... — `n(n-1)/2` fixtures.
pub fn round_robin(team_count: usize) -> Vec<Fixture> {
    let mut fixtures = Vec::new();
    for i in 0..team_count {
        for j in (i + 1)..team_count {
            fixtures.push(Fixture {
                team_a: i,
                team_b: j,
            });
        }
    }
    fixtures
}

/// Build a single-elimination bracket over `team_count` teams.
///
/// Seeding is a random shuffle. Each round pairs entrants consecutively;
/// an odd field gives its trailing entrant a bye, which resolves
/// immediately (and cascades) without ever touching the simulator. Later
/// rounds reference the previous round's winners until resolved.
pub fn build_bracket<R: Rng + ?Sized>(team_count: usize, rng: &mut R) -> Bracket {
    if team_count == 0 {
        return Bracket::default();
    }

    let mut seeds: Vec<usize> = (0..team_count).collect();
    seeds.shuffle(rng);

    let mut rounds: Vec<Vec<BracketMatch>> = Vec::new();

    // round 1 from the seeded field
    let first: Vec<BracketMatch> = seeds
        .chunks(2)
        .map(|pair| {
            let home = SlotRef::Team(pair[0]);
            let away = pair.get(1).map(|&t| SlotRef::Team(t)).unwrap_or(SlotRef::Bye);
            BracketMatch::new(home, away)
        })
        .collect();
    let mut previous = first.len();
    rounds.push(first);

    // later rounds reference winners of the previous one
    while previous > 1 {
        let count = previous.div_ceil(2);
        let matches: Vec<BracketMatch> = (0..count)
            .map(|m| {
                let home = SlotRef::WinnerOf(2 * m);
                let away = if 2 * m + 1 < previous {
                    SlotRef::WinnerOf(2 * m + 1)
                } else {
                    SlotRef::Bye
                };
                BracketMatch::new(home, away)
            })
            .collect();
        rounds.push(matches);
        previous = count;
    }

    let mut bracket = Bracket { rounds };

    // byes in round 1 auto-resolve to the present side
    let byes: Vec<(usize, usize)> = bracket.rounds[0]
        .iter()
        .enumerate()
        .filter_map(|(index, m)| match (m.is_bye(), m.slots[0]) {
            (true, SlotRef::Team(team)) => Some((index, team)),
            _ => None,
        })
        .collect();
    for (match_index, winner) in byes {
        if let Err(err) = record_winner(&mut bracket, 0, match_index, winner) {
            // freshly built rounds are always well-formed
            tracing::warn!("bye resolution failed on a fresh bracket: {err}");
        }
    }

    bracket
}

/// Resolve a contested match and propagate the winner.
///
/// `home_advances` selects between the two resolved sides. Errors when the
/// match is out of range, already resolved, or still waiting on a feeder.
pub fn advance_match(
    bracket: &mut Bracket,
    round: usize,
    match_index: usize,
    home_advances: bool,
) -> Result<(), ScheduleError> {
    check_match(bracket, round, match_index)?;
    if bracket.rounds[round][match_index].winner.is_some() {
        return Err(ScheduleError::SlotAlreadyResolved { round, match_index });
    }

    let home = bracket.resolve_slot(round, match_index, 0);
    let away = bracket.resolve_slot(round, match_index, 1);
    let winner = match (home, away) {
        (Some(home), Some(away)) => {
            if home_advances {
                home
            } else {
                away
            }
        }
        // one present side and a bye: the present side advances regardless
        (Some(team), None) if bracket.rounds[round][match_index].slots[1].is_bye() => team,
        (None, Some(team)) if bracket.rounds[round][match_index].slots[0].is_bye() => team,
        _ => return Err(ScheduleError::MatchNotReady { round, match_index }),
    };

    record_winner(bracket, round, match_index, winner)
}

/// Write a winner into a match and propagate into the next round's open
/// slot (`match_index / 2`, left side if still open, else right). A filled
/// slot is never overwritten; winner-vs-bye matches cascade immediately.
fn record_winner(
    bracket: &mut Bracket,
    round: usize,
    match_index: usize,
    winner: usize,
) -> Result<(), ScheduleError> {
    check_match(bracket, round, match_index)?;

    bracket.rounds[round][match_index].winner = Some(winner);

    let next_round = round + 1;
    if next_round >= bracket.rounds.len() {
        // the final just resolved
        return Ok(());
    }

    let slot_index = match_index / 2;
    let len = bracket.rounds[next_round].len();
    let next = bracket.rounds[next_round]
        .get_mut(slot_index)
        .ok_or(ScheduleError::IndexOutOfRange {
            what: "match",
            index: slot_index,
            len,
        })?;

    let side = if next.slots[0].is_open() {
        0
    } else if next.slots[1].is_open() {
        1
    } else {
        return Err(ScheduleError::SlotAlreadyResolved {
            round: next_round,
            match_index: slot_index,
        });
    };
    next.slots[side] = SlotRef::Team(winner);

    // a lone side against a bye advances without simulation
    if next.winner.is_none() && next.is_bye() {
        return record_winner(bracket, next_round, slot_index, winner);
    }

    Ok(())
}

/// Parse a boundary-side string reference: `"Team N"` or
/// `"Winner of Match K"`, both 1-based.
pub fn parse_side_ref(reference: &str) -> Result<SlotRef, ScheduleError> {
    let trimmed = reference.trim();
    if let Some(rest) = trimmed.strip_prefix("Team ") {
        let number: usize = rest
            .trim()
            .parse()
            .map_err(|_| ScheduleError::MalformedTeamReference(reference.to_string()))?;
        if number == 0 {
            return Err(ScheduleError::MalformedTeamReference(reference.to_string()));
        }
        return Ok(SlotRef::Team(number - 1));
    }
    if let Some(rest) = trimmed.strip_prefix("Winner of Match ") {
        let number: usize = rest
            .trim()
            .parse()
            .map_err(|_| ScheduleError::MalformedTeamReference(reference.to_string()))?;
        if number == 0 {
            return Err(ScheduleError::MalformedTeamReference(reference.to_string()));
        }
        return Ok(SlotRef::WinnerOf(number - 1));
    }
    Err(ScheduleError::MalformedTeamReference(reference.to_string()))
}

fn check_match(bracket: &Bracket, round: usize, match_index: usize) -> Result<(), ScheduleError> {
    let rounds = bracket.rounds.len();
    let matches = bracket
        .rounds
        .get(round)
        .ok_or(ScheduleError::IndexOutOfRange {
            what: "round",
            index: round,
            len: rounds,
        })?;
    if match_index >= matches.len() {
        return Err(ScheduleError::IndexOutOfRange {
            what: "match",
            index: match_index,
            len: matches.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_round_robin_pair_count() {
        for n in 0..8 {
            let fixtures = round_robin(n);
            assert_eq!(fixtures.len(), n * n.saturating_sub(1) / 2);
        }
    }

    #[test]
    fn test_round_robin_every_pair_once() {
        let fixtures = round_robin(5);
        let pairs: HashSet<(usize, usize)> = fixtures
            .iter()
            .map(|f| (f.team_a.min(f.team_b), f.team_a.max(f.team_b)))
            .collect();
        assert_eq!(pairs.len(), 10);
        for f in &fixtures {
            assert!(f.team_a < f.team_b);
        }
        assert_eq!(fixtures[0], Fixture { team_a: 0, team_b: 1 });
        assert_eq!(fixtures[1], Fixture { team_a: 0, team_b: 2 });
    }

    #[test]
    fn test_bracket_shape_five_teams() {
        let mut rng = StdRng::seed_from_u64(5);
        let bracket = build_bracket(5, &mut rng);

        let shape: Vec<usize> = bracket.rounds.iter().map(Vec::len).collect();
        assert_eq!(shape, vec![3, 2, 1]);

        // the bye match resolved at build time, the contested ones did not
        let byes: Vec<&BracketMatch> = bracket.rounds[0]
            .iter()
            .filter(|m| m.is_bye())
            .collect();
        assert_eq!(byes.len(), 1);
        assert!(byes[0].winner.is_some());
        for m in bracket.rounds[0].iter().filter(|m| !m.is_bye()) {
            assert!(m.winner.is_none());
        }
    }

    #[test]
    fn test_bracket_round_invariant() {
        for n in 1..12 {
            let mut rng = StdRng::seed_from_u64(n as u64);
            let bracket = build_bracket(n, &mut rng);
            for pair in bracket.rounds.windows(2) {
                assert_eq!(pair[1].len(), pair[0].len().div_ceil(2));
            }
            assert_eq!(bracket.rounds.last().map(Vec::len), Some(1));
        }
    }

    #[test]
    fn test_bracket_seeds_cover_all_teams() {
        let mut rng = StdRng::seed_from_u64(23);
        let bracket = build_bracket(6, &mut rng);
        let seeded: HashSet<usize> = bracket.rounds[0]
            .iter()
            .flat_map(|m| m.slots.iter())
            .filter_map(|slot| match slot {
                SlotRef::Team(team) => Some(*team),
                _ => None,
            })
            .collect();
        assert_eq!(seeded, (0..6).collect::<HashSet<usize>>());
    }

    #[test]
    fn test_advance_fills_next_round_once() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut bracket = build_bracket(4, &mut rng);

        advance_match(&mut bracket, 0, 0, true).unwrap();
        assert!(matches!(
            bracket.rounds[1][0].slots[0],
            SlotRef::Team(_)
        ));

        // resolving the same match again is refused
        let err = advance_match(&mut bracket, 0, 0, false).unwrap_err();
        assert!(matches!(err, ScheduleError::SlotAlreadyResolved { .. }));

        advance_match(&mut bracket, 0, 1, false).unwrap();
        assert!(matches!(
            bracket.rounds[1][0].slots[1],
            SlotRef::Team(_)
        ));
        assert!(bracket.rounds[1][0].winner.is_none());
    }

    #[test]
    fn test_advance_out_of_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut bracket = build_bracket(4, &mut rng);

        let err = advance_match(&mut bracket, 9, 0, true).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::IndexOutOfRange { what: "round", .. }
        ));
        let err = advance_match(&mut bracket, 0, 9, true).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::IndexOutOfRange { what: "match", .. }
        ));
    }

    #[test]
    fn test_advance_not_ready() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut bracket = build_bracket(4, &mut rng);

        // round 2 feeders have not resolved yet
        let err = advance_match(&mut bracket, 1, 0, true).unwrap_err();
        assert!(matches!(err, ScheduleError::MatchNotReady { .. }));
    }

    #[test]
    fn test_bye_cascade_in_five_team_bracket() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut bracket = build_bracket(5, &mut rng);

        // the round-1 bye fed its winner into round 2's trailing bye match,
        // which cascades straight into the final
        let bye_winner = bracket.rounds[0]
            .iter()
            .find(|m| m.is_bye())
            .and_then(|m| m.winner)
            .unwrap();
        assert_eq!(bracket.rounds[1][1].winner, Some(bye_winner));
        // cascade fills the final's first still-open slot
        assert_eq!(bracket.rounds[2][0].slots[0], SlotRef::Team(bye_winner));
        assert!(bracket.rounds[2][0].winner.is_none());

        // playing out the two contested round-1 matches fills the rest
        advance_match(&mut bracket, 0, 0, true).unwrap();
        advance_match(&mut bracket, 0, 1, true).unwrap();
        advance_match(&mut bracket, 1, 0, false).unwrap();
        assert!(bracket.rounds[2][0].winner.is_none());
        advance_match(&mut bracket, 2, 0, true).unwrap();
        assert!(bracket.champion().is_some());
    }

    #[test]
    fn test_parse_side_ref() {
        assert_eq!(parse_side_ref("Team 1").unwrap(), SlotRef::Team(0));
        assert_eq!(parse_side_ref("  Team 12 ").unwrap(), SlotRef::Team(11));
        assert_eq!(
            parse_side_ref("Winner of Match 3").unwrap(),
            SlotRef::WinnerOf(2)
        );

        for bad in ["Team zero", "Team 0", "team 1", "Winner of Match 0", "Squad 1", ""] {
            assert!(
                matches!(
                    parse_side_ref(bad),
                    Err(ScheduleError::MalformedTeamReference(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }
}
