//! Game: one table of (up to) four players.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a game.
pub type GameId = Uuid;

/// Number of seats at a game.
pub const SEATS_PER_GAME: usize = 4;

/// A single game.
///
/// `players` is a projection of `Player::game_id` and is only ever written by
/// `Tournament::rebuild_projection`. It is written out with the game but ignored
/// on load, where the projection is rebuilt from the players.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    /// Display label, e.g. "Game 2" or "Round 3 - Game 1".
    pub name: String,
    /// Set when the game was created by the round controller.
    #[serde(default)]
    pub round_number: Option<u32>,
    #[serde(default, skip_deserializing)]
    pub players: Vec<PlayerId>,
}

impl Game {
    pub fn new(name: impl Into<String>, round_number: Option<u32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            round_number,
            players: Vec::new(),
        }
    }

    /// Label for the `index`-th (1-based) game, tagged with the round when there is one.
    pub fn label(index: usize, round_number: Option<u32>) -> String {
        match round_number {
            Some(round) => format!("Round {round} - Game {index}"),
            None => format!("Game {index}"),
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
