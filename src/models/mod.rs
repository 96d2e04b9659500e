//! Data structures for the tournament: players, games, scorecards, tournament state.

mod game;
mod player;
mod scorecard;
mod tournament;

pub use game::{Game, GameId, SEATS_PER_GAME};
pub use player::{Player, PlayerId};
pub use scorecard::{PlacementPoints, PlayerResult, Scorecard};
pub use tournament::{Phase, Tournament, TournamentError, TournamentState};
