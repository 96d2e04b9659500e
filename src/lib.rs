//! Swiss tournament: library with models, pairing/standings logic, storage and the engine.

pub mod config;
pub mod engine;
pub mod logic;
pub mod models;
pub mod storage;

pub use config::{Config, ConfigError, StorageBackend};
pub use engine::{EngineError, TournamentEngine, TournamentView};
pub use logic::{
    advance_to_phase_two, auto_assign, block_assign, block_partition, calculate_placements,
    compute_standings, games_needed, rankings, reset_tournament, round_robin_partition,
    start_new_round, swiss_standings, write_standings_csv, RankingRow, RoundResult,
    StandingsEntry, FINALS_FIELD_SIZE, FINALS_START_ROUND, MIN_PLAYERS_PER_ROUND,
};
pub use models::{
    Game, GameId, Phase, PlacementPoints, Player, PlayerId, PlayerResult, Scorecard, Tournament,
    TournamentError, TournamentState, SEATS_PER_GAME,
};
pub use storage::{JsonBinStorage, JsonFileStorage, MemoryStorage, Snapshot, Storage, StorageError};
