//! Tournament business logic: allocation, placements, standings, rounds.

mod allocation;
mod placements;
mod rounds;
mod standings;

pub use allocation::{
    auto_assign, block_assign, block_partition, games_needed, round_robin_partition,
};
pub use placements::calculate_placements;
pub use rounds::{
    advance_to_phase_two, reset_tournament, start_new_round, FINALS_FIELD_SIZE,
    FINALS_START_ROUND, MIN_PLAYERS_PER_ROUND,
};
pub use standings::{
    compute_standings, rankings, swiss_standings, write_standings_csv, RankingRow, RoundResult,
    StandingsEntry,
};
