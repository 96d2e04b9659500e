//! Cross-round standings and the flat rankings view.

use crate::models::{GameId, PlacementPoints, Player, PlayerId, Scorecard, Tournament};
use serde::Serialize;
use std::io;

/// One scored game in a player's history.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoundResult {
    pub round_number: Option<u32>,
    pub game_id: Option<GameId>,
    pub placement: Option<u32>,
    pub placement_points: u32,
    pub game_score: i64,
}

/// A player's cumulative standing. Derived, never stored.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StandingsEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub placement_points: u32,
    pub total_game_score: i64,
    pub rounds: Vec<RoundResult>,
    /// 1-based. Unique even when points and score tie.
    pub rank: usize,
}

impl StandingsEntry {
    fn new(player: &Player) -> Self {
        Self {
            player_id: player.id,
            name: player.name.clone(),
            placement_points: 0,
            total_game_score: 0,
            rounds: Vec::new(),
            rank: 0,
        }
    }

    pub fn rounds_played(&self) -> usize {
        self.rounds.len()
    }
}

/// Fold every scorecard into per-player standings.
///
/// Result lines are matched to registered players by `player_id` when present,
/// otherwise by exact name; unmatched lines are ignored. Players with no scored
/// game are left out. Sums saturate at the integer bounds. Order: placement
/// points, then total game score, both descending; remaining ties keep
/// registration order.
pub fn compute_standings(
    players: &[Player],
    scorecards: &[Scorecard],
    points: &PlacementPoints,
) -> Vec<StandingsEntry> {
    let mut entries: Vec<StandingsEntry> = players.iter().map(StandingsEntry::new).collect();

    for card in scorecards {
        for line in &card.players {
            let slot = match line.player_id {
                Some(id) => entries.iter_mut().find(|e| e.player_id == id),
                None => entries.iter_mut().find(|e| e.name == line.name),
            };
            let Some(entry) = slot else {
                log::debug!("Ignoring scorecard line for unknown player {:?}", line.name);
                continue;
            };
            let placement = line.effective_placement();
            let placement_points = points.points_for(placement);
            entry.placement_points = entry.placement_points.saturating_add(placement_points);
            entry.total_game_score = entry.total_game_score.saturating_add(line.total);
            entry.rounds.push(RoundResult {
                round_number: card.round_number,
                game_id: card.game_id,
                placement,
                placement_points,
                game_score: line.total,
            });
        }
    }

    entries.retain(|e| !e.rounds.is_empty());
    entries.sort_by(|a, b| {
        b.placement_points
            .cmp(&a.placement_points)
            .then_with(|| b.total_game_score.cmp(&a.total_game_score))
    });
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
    entries
}

/// Standings for the tournament's current players and scorecards.
pub fn swiss_standings(tournament: &Tournament, points: &PlacementPoints) -> Vec<StandingsEntry> {
    compute_standings(&tournament.players, &tournament.scorecards, points)
}

/// One scorecard line with the name of the game it was played in.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RankingRow {
    pub name: String,
    pub game: String,
    pub total: i64,
    pub placement: Option<u32>,
    pub scores: Vec<i64>,
}

/// Every named scorecard line across all games, highest total first.
pub fn rankings(tournament: &Tournament) -> Vec<RankingRow> {
    let mut rows: Vec<RankingRow> = tournament
        .scorecards
        .iter()
        .flat_map(|card| {
            let game = card
                .game_id
                .and_then(|id| tournament.game(id))
                .map_or_else(|| "Unknown Game".to_string(), |g| g.name.clone());
            card.players
                .iter()
                .filter(|line| !line.name.is_empty())
                .map(move |line| RankingRow {
                    name: line.name.clone(),
                    game: game.clone(),
                    total: line.total,
                    placement: line.effective_placement(),
                    scores: line.scores.clone(),
                })
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

#[derive(Serialize)]
struct StandingsCsvRow<'a> {
    rank: usize,
    name: &'a str,
    placement_points: u32,
    total_game_score: i64,
    rounds_played: usize,
}

/// Write standings as CSV (header row included).
pub fn write_standings_csv<W: io::Write>(entries: &[StandingsEntry], writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for e in entries {
        wtr.serialize(StandingsCsvRow {
            rank: e.rank,
            name: &e.name,
            placement_points: e.placement_points,
            total_game_score: e.total_game_score,
            rounds_played: e.rounds_played(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerResult;
    use uuid::Uuid;

    fn placed(name: &str, total: i64, placement: u32) -> PlayerResult {
        PlayerResult {
            placement: Some(placement),
            ..PlayerResult::new(name, total)
        }
    }

    #[test]
    fn lines_with_player_id_match_by_id() {
        let players = vec![Player::new("Ada"), Player::new("Bob")];
        let line = PlayerResult {
            player_id: Some(players[1].id),
            ..placed("Someone Else", 20, 1)
        };
        let cards = vec![Scorecard::new(Uuid::new_v4(), Some(1), vec![line])];
        let standings = compute_standings(&players, &cards, &PlacementPoints::default());
        assert_eq!(standings.len(), 1);
        assert_eq!(standings[0].name, "Bob");
        assert_eq!(standings[0].placement_points, 5);
    }

    #[test]
    fn huge_totals_saturate_instead_of_overflowing() {
        let players = vec![Player::new("Ada"), Player::new("Bob")];
        let cards = vec![
            Scorecard::new(Uuid::new_v4(), Some(1), vec![placed("Ada", i64::MAX, 1), placed("Bob", 10, 2)]),
            Scorecard::new(Uuid::new_v4(), Some(2), vec![placed("Ada", i64::MAX, 2), placed("Bob", i64::MIN, 1)]),
        ];
        let standings = compute_standings(&players, &cards, &PlacementPoints::default());
        assert_eq!(standings[0].name, "Ada");
        assert_eq!(standings[0].total_game_score, i64::MAX);
        assert_eq!(standings[1].total_game_score, i64::MIN + 10);
        assert_eq!(standings[0].rounds.len(), 2);
    }

    #[test]
    fn unknown_names_and_unscored_players_are_dropped() {
        let players = vec![Player::new("Ada"), Player::new("Bob")];
        let cards = vec![Scorecard::new(
            Uuid::new_v4(),
            Some(1),
            vec![placed("Ada", 20, 1), placed("Ghost", 30, 2)],
        )];
        let standings = compute_standings(&players, &cards, &PlacementPoints::default());
        assert_eq!(standings.len(), 1);
        assert_eq!(standings[0].name, "Ada");
        assert_eq!(standings[0].rank, 1);
    }

    #[test]
    fn rankings_use_game_names_and_sort_by_total() {
        let mut t = Tournament::new();
        let game = t.add_game();
        t.save_scorecard(Scorecard::new(
            game,
            None,
            vec![PlayerResult::new("Ada", 10), PlayerResult::new("Bob", 30), PlayerResult::new("", 99)],
        ))
        .unwrap();
        t.scorecards.push(Scorecard::new(Uuid::new_v4(), None, vec![PlayerResult::new("Cy", 20)]));

        let rows = rankings(&t);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Cy", "Ada"]);
        assert_eq!(rows[0].game, "Game 1");
        assert_eq!(rows[1].game, "Unknown Game");
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let players = vec![Player::new("Ada")];
        let cards = vec![Scorecard::new(Uuid::new_v4(), Some(1), vec![placed("Ada", 42, 2)])];
        let standings = compute_standings(&players, &cards, &PlacementPoints::default());

        let mut out = Vec::new();
        write_standings_csv(&standings, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("rank,name,placement_points,total_game_score,rounds_played")
        );
        assert_eq!(lines.next(), Some("1,Ada,3,42,1"));
        assert_eq!(lines.next(), None);
    }
}
