//! Team splitting — fitness-guided stochastic search with a
//! formation-constrained greedy fallback.

mod builder;
mod fitness;
mod optimizer;

pub use builder::build_with_formation;
pub use fitness::partition_fitness;
pub use optimizer::{assign_captains, split, DEFAULT_TRIALS};

use rand::Rng;

use crate::models::{Formation, Player, Team};

/// Split a roster and assign captains, falling back to the formation
/// builder when the optimizer cannot satisfy the request.
///
/// An explicit formation always routes to the builder (strict
/// conformance); otherwise the builder only steps in when the optimizer
/// leaves more teams empty than the roster forces.
pub fn build_teams<R: Rng + ?Sized>(
    players: &[Player],
    team_count: usize,
    formation: Option<&Formation>,
    trials: usize,
    rng: &mut R,
) -> Vec<Team> {
    let mut teams = match formation {
        Some(formation) => build_with_formation(players, team_count, formation, rng),
        None => {
            let teams = split(players, team_count, trials, rng);
            let non_empty = teams.iter().filter(|t| !t.is_empty()).count();
            let achievable = team_count.min(players.len());
            if non_empty < achievable {
                tracing::warn!(
                    non_empty,
                    requested = team_count,
                    "optimizer under-filled teams, falling back to formation builder"
                );
                let per_team = players.len() / team_count.max(1);
                build_with_formation(
                    players,
                    team_count,
                    &Formation::even_split(per_team),
                    rng,
                )
            } else {
                teams
            }
        }
    };

    assign_captains(&mut teams);
    teams
}
