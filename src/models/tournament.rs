//! Tournament, TournamentState and the operations that only touch stored state:
//! player registry, game catalog / assignment projection, and the scorecard store.

use crate::models::game::{Game, GameId};
use crate::models::player::{Player, PlayerId};
use crate::models::scorecard::Scorecard;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during tournament operations.
///
/// All of these are raised before any state is changed.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    #[error("Player name must not be empty")]
    EmptyPlayerName,
    /// Names are unique (case-insensitive) because scorecards identify players by name.
    #[error("A player with this name already exists")]
    DuplicatePlayerName,
    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),
    #[error("Game {0} not found")]
    GameNotFound(GameId),
    #[error("Player {0} is listed more than once")]
    DuplicatePlayerInOrder(PlayerId),
    #[error("Scorecard must reference a game")]
    MissingGameId,
    #[error("Need at least {required} players to start a round (have {available})")]
    InsufficientPlayers { required: usize, available: usize },
    #[error("Need at least {required} ranked players for Swiss pairing (have {available})")]
    InsufficientRankedPlayers { required: usize, available: usize },
    #[error("Need at least {required} ranked players to advance to the finals (have {available})")]
    InsufficientFieldSize { required: usize, available: usize },
    #[error("Tournament is already in the finals")]
    AlreadyInFinals,
}

/// Tournament phase.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Phase 1: random first round, then Swiss rounds.
    #[default]
    Qualification,
    /// Phase 2: the top of the qualification standings, scored from a clean slate.
    Finals,
}

impl Phase {
    /// 1 for qualification, 2 for finals.
    pub fn number(self) -> u8 {
        match self {
            Phase::Qualification => 1,
            Phase::Finals => 2,
        }
    }
}

/// Round/phase position of the tournament.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentState {
    /// Round that the next `start_new_round` will create. Starts at 1.
    pub current_round: u32,
    pub current_phase: Phase,
}

impl Default for TournamentState {
    fn default() -> Self {
        Self {
            current_round: 1,
            current_phase: Phase::Qualification,
        }
    }
}

/// Full tournament: players, games, scorecards and round/phase state.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub players: Vec<Player>,
    /// Game catalog. Each game's `players` list is a projection rebuilt from `Player::game_id`.
    pub games: Vec<Game>,
    pub scorecards: Vec<Scorecard>,
    pub state: TournamentState,
}

impl Tournament {
    /// Create an empty tournament at round 1 of qualification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tournament from its stored parts and reconcile the games projection.
    pub fn from_parts(
        players: Vec<Player>,
        games: Vec<Game>,
        scorecards: Vec<Scorecard>,
        state: TournamentState,
    ) -> Self {
        let mut tournament = Self {
            players,
            games,
            scorecards,
            state,
        };
        tournament.rebuild_projection();
        tournament
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    /// Players without a game.
    pub fn unassigned_players(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| !p.is_assigned()).collect()
    }

    pub fn total_players(&self) -> usize {
        self.players.len()
    }

    pub fn total_games(&self) -> usize {
        self.games.len()
    }

    pub fn unassigned_count(&self) -> usize {
        self.players.iter().filter(|p| !p.is_assigned()).count()
    }

    // ---- player registry ----

    /// Register a player. The name is trimmed; empty and duplicate (case-insensitive) names are rejected.
    pub fn register_player(&mut self, name: &str) -> Result<PlayerId, TournamentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyPlayerName);
        }
        if self.players.iter().any(|p| p.name.eq_ignore_ascii_case(name)) {
            return Err(TournamentError::DuplicatePlayerName);
        }
        let player = Player::new(name);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Remove a player by id.
    pub fn delete_player(&mut self, player_id: PlayerId) -> Result<(), TournamentError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?;
        let removed = self.players.remove(idx);
        if removed.is_assigned() {
            self.rebuild_projection();
        }
        Ok(())
    }

    /// Remove every player and every game. Scorecards are kept.
    pub fn clear_all_players(&mut self) {
        self.players.clear();
        self.games.clear();
    }

    // ---- games and assignments ----

    /// Recompute every game's player list from player assignments.
    ///
    /// A player may point at a game that is not in the catalog (snapshots that only
    /// store players and scorecards); such a game is recreated, taking its round
    /// number from its scorecard when one exists.
    pub fn rebuild_projection(&mut self) {
        let referenced: Vec<GameId> = self.players.iter().filter_map(|p| p.game_id).collect();
        for game_id in referenced {
            if self.games.iter().any(|g| g.id == game_id) {
                continue;
            }
            let round_number = self
                .scorecards
                .iter()
                .find(|s| s.game_id == Some(game_id))
                .and_then(|s| s.round_number);
            let mut game = Game::new(Game::label(self.games.len() + 1, round_number), round_number);
            game.id = game_id;
            self.games.push(game);
        }

        let players = &self.players;
        for game in &mut self.games {
            game.players = players
                .iter()
                .filter(|p| p.game_id == Some(game.id))
                .map(|p| p.id)
                .collect();
        }
    }

    /// True if every assignment points at a cataloged game and every game's
    /// player list matches the assignments exactly.
    pub fn projection_is_consistent(&self) -> bool {
        let assignments_resolve = self
            .players
            .iter()
            .filter_map(|p| p.game_id)
            .all(|gid| self.games.iter().any(|g| g.id == gid));
        let projections_match = self.games.iter().all(|g| {
            let expected: Vec<PlayerId> = self
                .players
                .iter()
                .filter(|p| p.game_id == Some(g.id))
                .map(|p| p.id)
                .collect();
            g.players == expected
        });
        assignments_resolve && projections_match
    }

    /// Append an empty, unnumbered game.
    pub fn add_game(&mut self) -> GameId {
        let game = Game::new(Game::label(self.games.len() + 1, None), None);
        let id = game.id;
        self.games.push(game);
        id
    }

    /// Delete a game, unassigning anyone seated in it.
    pub fn delete_game(&mut self, game_id: GameId) -> Result<(), TournamentError> {
        if self.game(game_id).is_none() {
            return Err(TournamentError::GameNotFound(game_id));
        }
        for p in self.players.iter_mut().filter(|p| p.game_id == Some(game_id)) {
            p.unassign();
        }
        self.games.retain(|g| g.id != game_id);
        self.rebuild_projection();
        Ok(())
    }

    /// Seat a player in a game, moving them out of any previous game.
    pub fn assign_player(&mut self, player_id: PlayerId, game_id: GameId) -> Result<(), TournamentError> {
        if self.game(game_id).is_none() {
            return Err(TournamentError::GameNotFound(game_id));
        }
        self.get_player_mut(player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?
            .assign(game_id);
        self.rebuild_projection();
        Ok(())
    }

    pub fn unassign_player(&mut self, player_id: PlayerId) -> Result<(), TournamentError> {
        self.get_player_mut(player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?
            .unassign();
        self.rebuild_projection();
        Ok(())
    }

    /// Unassign every player and drop every game.
    pub fn clear_all_games(&mut self) {
        for p in &mut self.players {
            p.unassign();
        }
        self.games.clear();
    }

    // ---- scorecards ----

    /// Store a scorecard, replacing any existing one for the same game.
    ///
    /// A missing round number is taken from the game.
    pub fn save_scorecard(&mut self, mut scorecard: Scorecard) -> Result<(), TournamentError> {
        let game_id = scorecard.game_id.ok_or(TournamentError::MissingGameId)?;
        if scorecard.round_number.is_none() {
            scorecard.round_number = self.game(game_id).and_then(|g| g.round_number);
        }
        match self
            .scorecards
            .iter_mut()
            .find(|s| s.game_id == Some(game_id))
        {
            Some(existing) => *existing = scorecard,
            None => self.scorecards.push(scorecard),
        }
        Ok(())
    }

    pub fn clear_scorecards(&mut self) {
        self.scorecards.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scorecard::PlayerResult;

    fn tournament_with(names: &[&str]) -> Tournament {
        let mut t = Tournament::new();
        for name in names {
            t.register_player(name).unwrap();
        }
        t
    }

    #[test]
    fn register_trims_and_rejects_empty_or_duplicate_names() {
        let mut t = Tournament::new();
        let id = t.register_player("  Ada  ").unwrap();
        assert_eq!(t.player(id).unwrap().name, "Ada");
        assert_eq!(t.player(id).unwrap().game_id, None);
        assert_eq!(t.register_player("   "), Err(TournamentError::EmptyPlayerName));
        assert_eq!(t.register_player("ada"), Err(TournamentError::DuplicatePlayerName));
        assert_eq!(t.total_players(), 1);
    }

    #[test]
    fn delete_assigned_player_rebuilds_projection() {
        let mut t = tournament_with(&["A", "B"]);
        let game = t.add_game();
        let a = t.players[0].id;
        t.assign_player(a, game).unwrap();
        assert_eq!(t.game(game).unwrap().players, vec![a]);

        t.delete_player(a).unwrap();
        assert!(t.game(game).unwrap().is_empty());
        assert!(t.projection_is_consistent());
        assert_eq!(t.delete_player(a), Err(TournamentError::PlayerNotFound(a)));
    }

    #[test]
    fn clear_all_players_keeps_scorecards() {
        let mut t = tournament_with(&["A", "B"]);
        let game = t.add_game();
        t.save_scorecard(Scorecard::new(game, None, vec![PlayerResult::new("A", 10)]))
            .unwrap();
        t.clear_all_players();
        assert_eq!(t.total_players(), 0);
        assert_eq!(t.total_games(), 0);
        assert_eq!(t.scorecards.len(), 1);
    }

    #[test]
    fn delete_game_unassigns_its_players() {
        let mut t = tournament_with(&["A", "B", "C"]);
        let g1 = t.add_game();
        let g2 = t.add_game();
        let (a, b, c) = (t.players[0].id, t.players[1].id, t.players[2].id);
        t.assign_player(a, g1).unwrap();
        t.assign_player(b, g1).unwrap();
        t.assign_player(c, g2).unwrap();

        t.delete_game(g1).unwrap();
        assert_eq!(t.total_games(), 1);
        assert_eq!(t.unassigned_count(), 2);
        assert_eq!(t.game(g2).unwrap().players, vec![c]);
        assert!(t.projection_is_consistent());
        assert_eq!(t.delete_game(g1), Err(TournamentError::GameNotFound(g1)));
    }

    #[test]
    fn reassigning_moves_player_between_games() {
        let mut t = tournament_with(&["A"]);
        let g1 = t.add_game();
        let g2 = t.add_game();
        let a = t.players[0].id;
        t.assign_player(a, g1).unwrap();
        t.assign_player(a, g2).unwrap();
        assert!(t.game(g1).unwrap().is_empty());
        assert_eq!(t.game(g2).unwrap().players, vec![a]);

        t.unassign_player(a).unwrap();
        assert!(t.game(g2).unwrap().is_empty());
        assert_eq!(t.unassigned_players().len(), 1);
    }

    #[test]
    fn rebuild_recreates_games_missing_from_catalog() {
        let mut t = tournament_with(&["A", "B"]);
        let orphan = uuid::Uuid::new_v4();
        t.players[0].game_id = Some(orphan);
        t.players[1].game_id = Some(orphan);
        t.scorecards.push(Scorecard::new(orphan, Some(3), Vec::new()));

        let t = Tournament::from_parts(t.players, Vec::new(), t.scorecards, t.state);
        let game = t.game(orphan).unwrap();
        assert_eq!(game.name, "Round 3 - Game 1");
        assert_eq!(game.round_number, Some(3));
        assert_eq!(game.len(), 2);
        assert!(t.projection_is_consistent());
    }

    #[test]
    fn save_scorecard_replaces_by_game_and_fills_round() {
        let mut t = tournament_with(&["A"]);
        let game = t.add_game();
        t.games[0].round_number = Some(2);

        let first = Scorecard::new(game, None, vec![PlayerResult::new("A", 10)]);
        t.save_scorecard(first).unwrap();
        assert_eq!(t.scorecards[0].round_number, Some(2));

        let second = Scorecard::new(game, Some(2), vec![PlayerResult::new("A", 99)]);
        t.save_scorecard(second.clone()).unwrap();
        assert_eq!(t.scorecards, vec![second]);

        assert_eq!(
            t.save_scorecard(Scorecard::default()),
            Err(TournamentError::MissingGameId)
        );
    }
}
