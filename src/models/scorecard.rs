//! Scorecard: the recorded outcome of one game.

use crate::models::game::GameId;
use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One player's line on a scorecard.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerResult {
    /// When present, standings resolve the player by id instead of by name.
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    pub name: String,
    /// Total game score.
    #[serde(default)]
    pub total: i64,
    /// Finishing position within the game (1 = winner).
    #[serde(default)]
    pub placement: Option<u32>,
    /// Older scorecards record the finishing position here instead of `placement`.
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub placement_points: Option<u32>,
    /// Per-category scores, in scoresheet order.
    #[serde(default)]
    pub scores: Vec<i64>,
}

impl PlayerResult {
    pub fn new(name: impl Into<String>, total: i64) -> Self {
        Self {
            name: name.into(),
            total,
            ..Self::default()
        }
    }

    /// Finishing position: explicit `placement` wins over the legacy `rank`.
    pub fn effective_placement(&self) -> Option<u32> {
        self.placement.or(self.rank)
    }
}

/// Result record for one game. At most one per game; saving again replaces it.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    /// Required when saving.
    #[serde(default)]
    pub game_id: Option<GameId>,
    #[serde(default)]
    pub round_number: Option<u32>,
    #[serde(default)]
    pub players: Vec<PlayerResult>,
}

impl Scorecard {
    pub fn new(game_id: GameId, round_number: Option<u32>, players: Vec<PlayerResult>) -> Self {
        Self {
            game_id: Some(game_id),
            round_number,
            players,
        }
    }

    /// True if at least one line already carries a finishing position.
    pub fn has_placements(&self) -> bool {
        self.players.iter().any(|p| p.effective_placement().is_some())
    }
}

/// Points awarded per placement. Placements not in the map score 0.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlacementPoints(BTreeMap<u32, u32>);

impl Default for PlacementPoints {
    fn default() -> Self {
        Self::from_ordered(&[5, 3, 2, 1])
    }
}

impl PlacementPoints {
    /// Build from points for placements 1, 2, 3, ... in order.
    pub fn from_ordered(points: &[u32]) -> Self {
        Self(
            points
                .iter()
                .enumerate()
                .map(|(i, &p)| (i as u32 + 1, p))
                .collect(),
        )
    }

    pub fn points_for(&self, placement: Option<u32>) -> u32 {
        placement
            .and_then(|p| self.0.get(&p).copied())
            .unwrap_or(0)
    }
}
