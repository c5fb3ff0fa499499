//! Pure ranked top-N view over a room's players.

use quizrally_protocol::LeaderboardEntry;

use crate::room::Player;

/// How many players a leaderboard shows.
pub const LEADERBOARD_SIZE: usize = 5;

/// Ranks players by score, descending, and returns the top
/// [`LEADERBOARD_SIZE`] with contiguous 1-based ranks.
///
/// The sort is stable, so players with equal scores keep their original
/// join order. That makes the output deterministic and testable; it is
/// the documented tie-break.
pub fn top_standings(players: &[Player]) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<&Player> = players.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .enumerate()
        .map(|(i, p)| LeaderboardEntry {
            nickname: p.nickname.clone(),
            score: p.score,
            rank: (i + 1) as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizrally_protocol::PlayerId;

    fn player(nickname: &str, score: u32) -> Player {
        let mut p = Player::new(
            PlayerId::new(nickname.to_lowercase()),
            nickname.to_string(),
            None,
        );
        p.score = score;
        p
    }

    #[test]
    fn test_top_standings_sorts_descending_by_score() {
        let players =
            vec![player("Low", 100), player("High", 900), player("Mid", 500)];

        let board = top_standings(&players);

        let names: Vec<&str> =
            board.iter().map(|e| e.nickname.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Low"]);
    }

    #[test]
    fn test_top_standings_caps_at_five_entries() {
        let players: Vec<Player> =
            (0..8).map(|i| player(&format!("P{i}"), i * 10)).collect();

        let board = top_standings(&players);

        assert_eq!(board.len(), LEADERBOARD_SIZE);
    }

    #[test]
    fn test_top_standings_ranks_are_contiguous_from_one() {
        let players: Vec<Player> =
            (0..4).map(|i| player(&format!("P{i}"), i * 10)).collect();

        let board = top_standings(&players);

        let ranks: Vec<u32> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_top_standings_ties_keep_join_order() {
        // Stable sort: equal scores stay in insertion order.
        let players = vec![
            player("First", 500),
            player("Second", 500),
            player("Third", 500),
        ];

        let board = top_standings(&players);

        let names: Vec<&str> =
            board.iter().map(|e| e.nickname.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_top_standings_empty_room_is_empty() {
        assert!(top_standings(&[]).is_empty());
    }
}
