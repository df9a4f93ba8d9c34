//! Backlog filtering - pure functions, no I/O.

use crate::models::{BacklogEntry, SteamGame};

pub const DEFAULT_THRESHOLD_HOURS: f64 = 2.0;

/// Keep games played for less than `threshold_hours`. Playtime is converted
/// from minutes to hours and rounded to 2 decimals before the comparison, so
/// a game sitting exactly on the threshold is excluded. The result is sorted
/// ascending by hours; the sort is stable, equal-hours games keep their
/// library order.
pub fn filter_backlog(games: &[SteamGame], threshold_hours: f64) -> Vec<BacklogEntry> {
    let mut entries: Vec<BacklogEntry> = games
        .iter()
        .filter_map(|game| {
            let hours = round_hours(game.playtime_forever);
            if hours < threshold_hours {
                Some(BacklogEntry {
                    appid: game.appid,
                    name: game.name.clone(),
                    hours,
                })
            } else {
                None
            }
        })
        .collect();

    entries.sort_by(|a, b| a.hours.partial_cmp(&b.hours).unwrap_or(std::cmp::Ordering::Equal));
    entries
}

/// Minutes to hours, rounded to 2 decimal places.
fn round_hours(minutes: u64) -> f64 {
    (minutes as f64 / 60.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(appid: u64, name: &str, minutes: u64) -> SteamGame {
        SteamGame {
            appid,
            name: name.to_string(),
            playtime_forever: minutes,
        }
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        // 100 min = 1.6666... hrs
        let out = filter_backlog(&[game(1, "A", 100)], 2.0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].hours, 1.67);
    }

    #[test]
    fn test_threshold_boundary_excluded() {
        // Exactly 2.0 hrs is not backlog; one minute less is
        let out = filter_backlog(&[game(1, "A", 120), game(2, "B", 119)], 2.0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].appid, 2);
        assert_eq!(out[0].hours, 1.98);
    }

    #[test]
    fn test_sorted_ascending_by_hours() {
        let out = filter_backlog(
            &[game(1, "A", 90), game(2, "B", 10), game(3, "C", 60)],
            2.0,
        );
        let hours: Vec<f64> = out.iter().map(|e| e.hours).collect();
        assert_eq!(hours, vec![0.17, 1.0, 1.5]);
    }

    #[test]
    fn test_stable_for_equal_hours() {
        let out = filter_backlog(
            &[game(3, "C", 30), game(1, "A", 30), game(2, "B", 0)],
            2.0,
        );
        let appids: Vec<u64> = out.iter().map(|e| e.appid).collect();
        // B first (0.0 hrs), then C and A keep their input order at 0.5 hrs
        assert_eq!(appids, vec![2, 3, 1]);
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_backlog(&[], 2.0).is_empty());
        assert!(filter_backlog(&[], 0.0).is_empty());
    }

    #[test]
    fn test_unplayed_game_kept_played_game_dropped() {
        let out = filter_backlog(&[game(1, "A", 0), game(2, "B", 180)], 2.0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].appid, 1);
        assert_eq!(out[0].name, "A");
        assert_eq!(out[0].hours, 0.0);
    }
}
