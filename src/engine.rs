//! Engine: owns one tournament, applies commands to it and persists the snapshot
//! after every command that changes stored state.
//!
//! Commands take `&mut self`, so callers sharing an engine must serialize access
//! (the web server keeps it behind a `tokio::sync::Mutex`). Precondition errors are
//! returned before anything is changed or saved. A failed save is logged and
//! returned, but the in-memory change stands until the next successful save.

use crate::config::Config;
use crate::logic::{self, RankingRow, StandingsEntry};
use crate::models::{
    Game, GameId, PlacementPoints, Player, PlayerId, Scorecard, Tournament, TournamentError,
    TournamentState,
};
use crate::storage::{Snapshot, Storage, StorageError};
use rand::rngs::StdRng;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Tournament(#[from] TournamentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Read-only view of the whole tournament (for API responses).
#[derive(Serialize)]
pub struct TournamentView<'a> {
    pub state: TournamentState,
    pub players: &'a [Player],
    pub games: &'a [Game],
    pub scorecards: &'a [Scorecard],
    pub total_players: usize,
    pub total_games: usize,
    pub unassigned_count: usize,
}

pub struct TournamentEngine {
    tournament: Tournament,
    storage: Box<dyn Storage>,
    points: PlacementPoints,
    rng: StdRng,
}

impl TournamentEngine {
    /// Engine over an empty tournament. Call [`refresh`](Self::refresh) to load stored state.
    pub fn new(storage: Box<dyn Storage>, points: PlacementPoints, rng: StdRng) -> Self {
        Self {
            tournament: Tournament::new(),
            storage,
            points,
            rng,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.build_storage(),
            config.placement_points.clone(),
            config.build_rng(),
        )
    }

    // ---- views ----

    pub fn tournament(&self) -> &Tournament {
        &self.tournament
    }

    pub fn view(&self) -> TournamentView<'_> {
        let t = &self.tournament;
        TournamentView {
            state: t.state,
            players: &t.players,
            games: &t.games,
            scorecards: &t.scorecards,
            total_players: t.total_players(),
            total_games: t.total_games(),
            unassigned_count: t.unassigned_count(),
        }
    }

    pub fn unassigned_players(&self) -> Vec<&Player> {
        self.tournament.unassigned_players()
    }

    pub fn swiss_standings(&self) -> Vec<StandingsEntry> {
        logic::swiss_standings(&self.tournament, &self.points)
    }

    pub fn rankings(&self) -> Vec<RankingRow> {
        logic::rankings(&self.tournament)
    }

    // ---- persistence ----

    /// Replace in-memory state with the stored snapshot. On failure nothing changes.
    pub async fn refresh(&mut self) -> Result<(), EngineError> {
        let snapshot = self.storage.load().await.map_err(|e| {
            log::error!("Error loading tournament: {}", e);
            e
        })?;
        self.tournament = Tournament::from(snapshot);
        log::info!(
            "Loaded tournament: {} players, {} games, {} scorecards",
            self.tournament.total_players(),
            self.tournament.total_games(),
            self.tournament.scorecards.len()
        );
        Ok(())
    }

    async fn persist(&self) -> Result<(), EngineError> {
        let snapshot = Snapshot::from(&self.tournament);
        self.storage.save(&snapshot).await.map_err(|e| {
            log::error!("Error saving tournament: {}", e);
            EngineError::from(e)
        })
    }

    // ---- registry ----

    pub async fn register_player(&mut self, name: &str) -> Result<PlayerId, EngineError> {
        let id = self.tournament.register_player(name)?;
        log::info!("Registered player {:?}", name.trim());
        self.persist().await?;
        Ok(id)
    }

    pub async fn delete_player(&mut self, player_id: PlayerId) -> Result<(), EngineError> {
        self.tournament.delete_player(player_id)?;
        self.persist().await
    }

    pub async fn clear_all_players(&mut self) -> Result<(), EngineError> {
        self.tournament.clear_all_players();
        self.persist().await
    }

    // ---- games ----

    pub async fn add_game(&mut self) -> Result<GameId, EngineError> {
        let id = self.tournament.add_game();
        self.persist().await?;
        Ok(id)
    }

    pub async fn delete_game(&mut self, game_id: GameId) -> Result<(), EngineError> {
        self.tournament.delete_game(game_id)?;
        self.persist().await
    }

    pub async fn assign_player(&mut self, player_id: PlayerId, game_id: GameId) -> Result<(), EngineError> {
        self.tournament.assign_player(player_id, game_id)?;
        self.persist().await
    }

    pub async fn unassign_player(&mut self, player_id: PlayerId) -> Result<(), EngineError> {
        self.tournament.unassign_player(player_id)?;
        self.persist().await
    }

    /// Deal every registered player into fresh games at random. Returns the number of games.
    pub async fn auto_assign(&mut self) -> Result<usize, EngineError> {
        let games = logic::auto_assign(&mut self.tournament, &mut self.rng);
        self.persist().await?;
        Ok(games)
    }

    pub async fn clear_all_games(&mut self) -> Result<(), EngineError> {
        self.tournament.clear_all_games();
        self.persist().await
    }

    // ---- scorecards ----

    /// Save a game's scorecard, replacing any earlier one for that game.
    ///
    /// When no line carries a placement, placements are worked out from the totals.
    pub async fn save_scorecard(&mut self, mut scorecard: Scorecard) -> Result<(), EngineError> {
        if scorecard.game_id.is_none() {
            return Err(TournamentError::MissingGameId.into());
        }
        if !scorecard.has_placements() {
            logic::calculate_placements(&mut scorecard.players, &self.points);
        }
        self.tournament.save_scorecard(scorecard)?;
        self.persist().await
    }

    // ---- rounds and phases ----

    /// Pair the next round. Returns the round number that was paired.
    pub async fn start_new_round(&mut self) -> Result<u32, EngineError> {
        let round = logic::start_new_round(&mut self.tournament, &self.points, &mut self.rng)?;
        self.persist().await?;
        Ok(round)
    }

    pub async fn reset_tournament(&mut self) -> Result<(), EngineError> {
        logic::reset_tournament(&mut self.tournament);
        self.persist().await
    }

    pub async fn advance_to_phase_two(&mut self) -> Result<(), EngineError> {
        logic::advance_to_phase_two(&mut self.tournament, &self.points)?;
        self.persist().await
    }
}
