//! Player data structure.

use crate::models::game::GameId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in games, scorecards and lookups).
pub type PlayerId = Uuid;

/// A registered player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Game this player is currently seated in. The only authoritative record of the assignment.
    #[serde(default)]
    pub game_id: Option<GameId>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a new, unassigned player. The name is stored trimmed.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            game_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.game_id.is_some()
    }

    /// Seat the player in a game (replaces any previous assignment).
    pub fn assign(&mut self, game_id: GameId) {
        self.game_id = Some(game_id);
    }

    pub fn unassign(&mut self) {
        self.game_id = None;
    }
}
