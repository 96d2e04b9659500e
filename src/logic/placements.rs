//! Placements within a single game.

use crate::models::{PlacementPoints, PlayerResult};

/// Order a game's results by total score (highest first) and assign placements 1..n
/// with their placement points.
///
/// The sort is stable: equal totals keep their entry order and still get distinct
/// placements, so the first-entered of two tied players places higher.
pub fn calculate_placements(results: &mut [PlayerResult], points: &PlacementPoints) {
    results.sort_by(|a, b| b.total.cmp(&a.total));
    for (i, result) in results.iter_mut().enumerate() {
        let placement = i as u32 + 1;
        result.placement = Some(placement);
        result.placement_points = Some(points.points_for(Some(placement)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_break_by_entry_order() {
        let mut results = vec![
            PlayerResult::new("A", 50),
            PlayerResult::new("B", 30),
            PlayerResult::new("C", 30),
            PlayerResult::new("D", 10),
        ];
        calculate_placements(&mut results, &PlacementPoints::default());

        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        let placements: Vec<u32> = results.iter().filter_map(|r| r.placement).collect();
        let points: Vec<u32> = results.iter().filter_map(|r| r.placement_points).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
        assert_eq!(placements, vec![1, 2, 3, 4]);
        assert_eq!(points, vec![5, 3, 2, 1]);
    }

    #[test]
    fn sorts_unordered_input() {
        let mut results = vec![
            PlayerResult::new("low", 3),
            PlayerResult::new("high", 90),
            PlayerResult::new("mid", 40),
        ];
        calculate_placements(&mut results, &PlacementPoints::default());
        assert_eq!(results[0].name, "high");
        assert_eq!(results[2].name, "low");
        assert_eq!(results[2].placement, Some(3));
        assert_eq!(results[2].placement_points, Some(2));
    }

    #[test]
    fn fifth_seat_scores_nothing() {
        let mut results: Vec<PlayerResult> = (0..5)
            .map(|i| PlayerResult::new(format!("P{i}"), 100 - i))
            .collect();
        calculate_placements(&mut results, &PlacementPoints::default());
        assert_eq!(results[4].placement, Some(5));
        assert_eq!(results[4].placement_points, Some(0));
    }
}
