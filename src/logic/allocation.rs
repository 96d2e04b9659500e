//! Game allocation: splitting a player pool into games of at most four.
//!
//! Two partitioning rules:
//! - round-robin over a shuffled pool (free play, near-equal game sizes);
//! - contiguous blocks over an ordered pool (Swiss rounds, similar standings share a game).

use crate::models::{Game, PlayerId, Tournament, TournamentError, SEATS_PER_GAME};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Number of games needed to seat `players` players.
pub fn games_needed(players: usize) -> usize {
    players.div_ceil(SEATS_PER_GAME)
}

/// Shuffle `items`, then deal them one by one across `ceil(n / 4)` games.
///
/// Game sizes differ by at most one, but a game can end up with fewer than four
/// even when a 4/4/2 split would be possible (10 players give 4/3/3).
pub fn round_robin_partition<T, R: Rng + ?Sized>(mut items: Vec<T>, rng: &mut R) -> Vec<Vec<T>> {
    let num_games = games_needed(items.len());
    let mut games: Vec<Vec<T>> = (0..num_games).map(|_| Vec::new()).collect();
    items.shuffle(rng);
    for (k, item) in items.into_iter().enumerate() {
        games[k % num_games].push(item);
    }
    games
}

/// Cut `items` into consecutive blocks of four, keeping their order. The last block may be short.
pub fn block_partition<T>(items: Vec<T>) -> Vec<Vec<T>> {
    let mut games = Vec::with_capacity(games_needed(items.len()));
    let mut items = items.into_iter().peekable();
    while items.peek().is_some() {
        games.push(items.by_ref().take(SEATS_PER_GAME).collect());
    }
    games
}

/// Replace all games with one new game per group and seat each group's players in it.
fn install_partition(tournament: &mut Tournament, groups: Vec<Vec<PlayerId>>, round_number: Option<u32>) {
    tournament.clear_all_games();
    for (i, group) in groups.into_iter().enumerate() {
        let game = Game::new(Game::label(i + 1, round_number), round_number);
        for pid in group {
            if let Some(p) = tournament.get_player_mut(pid) {
                p.assign(game.id);
            }
        }
        tournament.games.push(game);
    }
    tournament.rebuild_projection();
}

/// Reset all assignments and deal every registered player into fresh games at random.
///
/// Returns the number of games created (0 when nobody is registered).
pub fn auto_assign<R: Rng + ?Sized>(tournament: &mut Tournament, rng: &mut R) -> usize {
    let ids: Vec<PlayerId> = tournament.players.iter().map(|p| p.id).collect();
    let groups = round_robin_partition(ids, rng);
    let created = groups.len();
    install_partition(tournament, groups, None);
    log::debug!("Auto-assigned {} players into {} games", tournament.total_players(), created);
    created
}

/// Reset all assignments and seat `ordered` players in contiguous blocks of four.
///
/// Every listed id must be registered and appear once; players not listed stay
/// unassigned. With a round number, games are labelled "Round {r} - Game {i}" and
/// tagged with that round.
pub fn block_assign(
    tournament: &mut Tournament,
    ordered: &[PlayerId],
    round_number: Option<u32>,
) -> Result<usize, TournamentError> {
    if let Some(&missing) = ordered.iter().find(|&&id| tournament.player(id).is_none()) {
        return Err(TournamentError::PlayerNotFound(missing));
    }
    let mut seen = HashSet::with_capacity(ordered.len());
    if let Some(&repeated) = ordered.iter().find(|&&id| !seen.insert(id)) {
        return Err(TournamentError::DuplicatePlayerInOrder(repeated));
    }
    let groups = block_partition(ordered.to_vec());
    let created = groups.len();
    install_partition(tournament, groups, round_number);
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn ten_players_round_robin_is_four_three_three() {
        let mut rng = StdRng::seed_from_u64(7);
        let games = round_robin_partition((0..10).collect::<Vec<_>>(), &mut rng);
        let sizes: Vec<usize> = games.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
    }

    #[test]
    fn empty_pool_makes_no_games() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(round_robin_partition(Vec::<u8>::new(), &mut rng).is_empty());
        assert!(block_partition(Vec::<u8>::new()).is_empty());
    }

    #[test]
    fn block_partition_keeps_order() {
        let games = block_partition((0..10).collect::<Vec<_>>());
        assert_eq!(games, vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7], vec![8, 9]]);
    }

    #[test]
    fn block_assign_rejects_unknown_player() {
        let mut t = Tournament::new();
        t.register_player("A").unwrap();
        let ghost = uuid::Uuid::new_v4();
        let ids = vec![t.players[0].id, ghost];
        assert_eq!(
            block_assign(&mut t, &ids, Some(1)),
            Err(TournamentError::PlayerNotFound(ghost))
        );
        assert_eq!(t.total_games(), 0);
    }

    #[test]
    fn block_assign_rejects_repeated_player() {
        let mut t = Tournament::new();
        for name in ["A", "B", "C", "D"] {
            t.register_player(name).unwrap();
        }
        let ids: Vec<PlayerId> = t.players.iter().map(|p| p.id).collect();
        let order = vec![ids[0], ids[0], ids[1], ids[2], ids[3]];
        assert_eq!(
            block_assign(&mut t, &order, Some(2)),
            Err(TournamentError::DuplicatePlayerInOrder(ids[0]))
        );
        assert_eq!(t.total_games(), 0);
        assert_eq!(t.unassigned_count(), 4);
    }
}
