//! Formation-constrained greedy fallback builder.
//!
//! Used when the stochastic splitter cannot produce the requested number of
//! non-empty teams, or when the caller demands strict formation
//! conformance. Fills positional quotas team by team, substituting across
//! positions when a bucket runs dry, then repairs missing goalkeepers
//! best-effort.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Formation, Player, Position, Team};

/// Build `team_count` teams that follow `formation` as closely as the pool
/// allows.
pub fn build_with_formation<R: Rng + ?Sized>(
    players: &[Player],
    team_count: usize,
    formation: &Formation,
    rng: &mut R,
) -> Vec<Team> {
    if team_count == 0 {
        return Vec::new();
    }

    let mut teams: Vec<Team> = (0..team_count).map(|_| Team::new()).collect();

    let mut pool: Vec<Player> = players.to_vec();
    pool.shuffle(rng);

    let mut buckets = PositionBuckets::from_pool(pool);

    // one goalkeeper per team, emergency outfield substitute when dry
    for team in &mut teams {
        let keeper = buckets
            .take(Position::Goalkeeper)
            .or_else(|| buckets.take_outfield_substitute(None));
        if let Some(player) = keeper {
            team.players.push(player);
        }
    }

    // outfield quotas, position-major
    for position in Position::OUTFIELD {
        let required = formation.required(position);
        for team in &mut teams {
            for _ in 0..required {
                let player = buckets
                    .take(position)
                    .or_else(|| buckets.take_outfield_substitute(Some(position)))
                    .or_else(|| buckets.take(Position::Goalkeeper));
                match player {
                    Some(player) => team.players.push(player),
                    None => break,
                }
            }
        }
    }

    // leftovers: strongest first, each to the currently-smallest team
    let mut leftovers = buckets.drain();
    leftovers.sort_by(|a, b| {
        b.skill_score()
            .partial_cmp(&a.skill_score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for player in leftovers {
        if let Some(smallest) = teams.iter_mut().min_by_key(|t| t.size()) {
            smallest.players.push(player);
        }
    }

    repair_goalkeepers(&mut teams);

    teams
}

/// Any team without a goalkeeper steals one from the first team holding a
/// spare. Best-effort: leaves the team keeperless when no spare exists.
fn repair_goalkeepers(teams: &mut [Team]) {
    for i in 0..teams.len() {
        if teams[i].position_count(Position::Goalkeeper) >= 1 {
            continue;
        }
        let donor = (0..teams.len())
            .find(|&j| j != i && teams[j].position_count(Position::Goalkeeper) > 1);
        if let Some(j) = donor {
            if let Some(k) = teams[j]
                .players
                .iter()
                .position(|p| p.position == Position::Goalkeeper)
            {
                let keeper = teams[j].players.remove(k);
                teams[i].players.push(keeper);
            }
        }
    }
}

/// Per-position pools, drawn from in shuffled order.
struct PositionBuckets {
    goalkeepers: Vec<Player>,
    defenders: Vec<Player>,
    midfielders: Vec<Player>,
    forwards: Vec<Player>,
}

impl PositionBuckets {
    fn from_pool(pool: Vec<Player>) -> Self {
        let mut buckets = Self {
            goalkeepers: Vec::new(),
            defenders: Vec::new(),
            midfielders: Vec::new(),
            forwards: Vec::new(),
        };
        for player in pool {
            buckets.bucket_mut(player.position).push(player);
        }
        buckets
    }

    fn bucket_mut(&mut self, position: Position) -> &mut Vec<Player> {
        match position {
            Position::Goalkeeper => &mut self.goalkeepers,
            Position::Defender => &mut self.defenders,
            Position::Midfielder => &mut self.midfielders,
            Position::Forward => &mut self.forwards,
        }
    }

    fn take(&mut self, position: Position) -> Option<Player> {
        self.bucket_mut(position).pop()
    }

    /// Substitute from the outfield buckets in Defender -> Midfielder ->
    /// Forward priority, skipping `except`.
    fn take_outfield_substitute(&mut self, except: Option<Position>) -> Option<Player> {
        Position::OUTFIELD
            .into_iter()
            .filter(|&pos| Some(pos) != except)
            .find_map(|pos| self.take(pos))
    }

    fn drain(&mut self) -> Vec<Player> {
        let mut rest = Vec::new();
        for position in Position::ALL {
            rest.append(self.bucket_mut(position));
        }
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkillLevel;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn squad(goalkeepers: usize, defenders: usize, midfielders: usize, forwards: usize) -> Vec<Player> {
        let mut players = Vec::new();
        let mut add = |count: usize, position: Position, tag: &str| {
            for i in 0..count {
                players.push(Player::new(
                    format!("{tag}{i}"),
                    position,
                    SkillLevel::Intermediate,
                ));
            }
        };
        add(goalkeepers, Position::Goalkeeper, "gk");
        add(defenders, Position::Defender, "df");
        add(midfielders, Position::Midfielder, "mf");
        add(forwards, Position::Forward, "fw");
        players
    }

    #[test]
    fn test_every_player_assigned_once() {
        let players = squad(2, 8, 6, 6);
        let mut rng = StdRng::seed_from_u64(3);
        let teams = build_with_formation(&players, 2, &Formation::new(4, 3, 3), &mut rng);

        let total: usize = teams.iter().map(Team::size).sum();
        assert_eq!(total, players.len());

        let mut names: Vec<&str> = teams
            .iter()
            .flat_map(|t| t.players.iter().map(|p| p.name.as_str()))
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), players.len());
    }

    #[test]
    fn test_each_team_gets_one_goalkeeper() {
        let players = squad(3, 9, 6, 6);
        let mut rng = StdRng::seed_from_u64(11);
        let teams = build_with_formation(&players, 3, &Formation::new(3, 2, 2), &mut rng);

        for team in &teams {
            assert_eq!(team.position_count(Position::Goalkeeper), 1);
        }
    }

    #[test]
    fn test_missing_goalkeeper_substituted_from_outfield() {
        // no goalkeepers at all: teams still get built, nobody is dropped
        let players = squad(0, 4, 4, 4);
        let mut rng = StdRng::seed_from_u64(5);
        let teams = build_with_formation(&players, 2, &Formation::new(2, 2, 1), &mut rng);

        let total: usize = teams.iter().map(Team::size).sum();
        assert_eq!(total, players.len());
        assert!(teams.iter().all(|t| !t.is_empty()));
    }

    #[test]
    fn test_repair_steals_spare_goalkeeper() {
        let mut teams = vec![
            Team::with_players(vec![
                Player::new("gk0", Position::Goalkeeper, SkillLevel::Beginner),
                Player::new("gk1", Position::Goalkeeper, SkillLevel::Beginner),
            ]),
            Team::with_players(vec![Player::new(
                "df0",
                Position::Defender,
                SkillLevel::Beginner,
            )]),
        ];
        repair_goalkeepers(&mut teams);

        assert_eq!(teams[0].position_count(Position::Goalkeeper), 1);
        assert_eq!(teams[1].position_count(Position::Goalkeeper), 1);
    }

    #[test]
    fn test_repair_without_spare_is_best_effort() {
        let mut teams = vec![
            Team::with_players(vec![Player::new(
                "gk0",
                Position::Goalkeeper,
                SkillLevel::Beginner,
            )]),
            Team::with_players(vec![Player::new(
                "df0",
                Position::Defender,
                SkillLevel::Beginner,
            )]),
        ];
        repair_goalkeepers(&mut teams);

        // the only keeper stays put
        assert_eq!(teams[0].position_count(Position::Goalkeeper), 1);
        assert_eq!(teams[1].position_count(Position::Goalkeeper), 0);
    }

    #[test]
    fn test_leftovers_balance_team_sizes() {
        let players = squad(2, 10, 2, 2);
        let mut rng = StdRng::seed_from_u64(17);
        let teams = build_with_formation(&players, 2, &Formation::new(2, 1, 1), &mut rng);

        let sizes: Vec<usize> = teams.iter().map(Team::size).collect();
        assert_eq!(sizes.iter().sum::<usize>(), players.len());
        assert!(sizes.iter().max().unwrap() - sizes.iter().min().unwrap() <= 1);
    }
}
