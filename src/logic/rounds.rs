//! Round and phase progression: pairing each new round, the cut to the finals, and reset.

use crate::logic::allocation::block_assign;
use crate::logic::standings::compute_standings;
use crate::models::{Phase, PlacementPoints, PlayerId, Tournament, TournamentError, TournamentState};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Minimum players needed to pair a round (one full game).
pub const MIN_PLAYERS_PER_ROUND: usize = 4;

/// Size of the finals field kept by the cut.
pub const FINALS_FIELD_SIZE: usize = 32;

/// Qualification consumes rounds 1-3; the finals start at round 4.
pub const FINALS_START_ROUND: u32 = 4;

/// Pair the next round and advance the round counter.
///
/// Round 1 (or any round with no scored games yet) seats every registered player in
/// random order. Later rounds seat only players with at least one scored game, in
/// standings order, so similarly placed players share a game. Players are cut into
/// blocks of four in that order.
///
/// Returns the number of the round that was paired.
pub fn start_new_round<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    points: &PlacementPoints,
    rng: &mut R,
) -> Result<u32, TournamentError> {
    let available = tournament.players.len();
    if available < MIN_PLAYERS_PER_ROUND {
        return Err(TournamentError::InsufficientPlayers {
            required: MIN_PLAYERS_PER_ROUND,
            available,
        });
    }

    let round = tournament.state.current_round;
    let standings = compute_standings(&tournament.players, &tournament.scorecards, points);

    let order: Vec<PlayerId> = if round == 1 || standings.is_empty() {
        let mut ids: Vec<PlayerId> = tournament.players.iter().map(|p| p.id).collect();
        ids.shuffle(rng);
        ids
    } else {
        if standings.len() < MIN_PLAYERS_PER_ROUND {
            return Err(TournamentError::InsufficientRankedPlayers {
                required: MIN_PLAYERS_PER_ROUND,
                available: standings.len(),
            });
        }
        standings.iter().map(|s| s.player_id).collect()
    };

    let games = block_assign(tournament, &order, Some(round))?;
    tournament.state.current_round += 1;
    log::info!(
        "Paired round {} ({} players in {} games)",
        round,
        order.len(),
        games
    );
    Ok(round)
}

/// Back to round 1 of qualification: no games, no assignments, no scorecards. Players stay.
pub fn reset_tournament(tournament: &mut Tournament) {
    tournament.state = TournamentState::default();
    tournament.clear_all_games();
    tournament.clear_scorecards();
    log::info!("Tournament reset");
}

/// Cut to the finals: keep the top 32 of the standings, drop everyone else from the
/// registry, wipe games and scorecards, and move to phase 2 at round 4.
pub fn advance_to_phase_two(
    tournament: &mut Tournament,
    points: &PlacementPoints,
) -> Result<(), TournamentError> {
    if tournament.state.current_phase == Phase::Finals {
        return Err(TournamentError::AlreadyInFinals);
    }
    let standings = compute_standings(&tournament.players, &tournament.scorecards, points);
    if standings.len() < FINALS_FIELD_SIZE {
        return Err(TournamentError::InsufficientFieldSize {
            required: FINALS_FIELD_SIZE,
            available: standings.len(),
        });
    }

    let finalists: HashSet<PlayerId> = standings
        .iter()
        .take(FINALS_FIELD_SIZE)
        .map(|s| s.player_id)
        .collect();
    let before = tournament.players.len();
    tournament.players.retain(|p| finalists.contains(&p.id));
    tournament.clear_all_games();
    tournament.clear_scorecards();
    tournament.state = TournamentState {
        current_round: FINALS_START_ROUND,
        current_phase: Phase::Finals,
    };
    log::info!(
        "Advanced to finals with {} players ({} dropped)",
        tournament.players.len(),
        before - tournament.players.len()
    );
    Ok(())
}
