//! Leaderboard ranking
//!
//! Ranks are strictly positional: users with equal points get consecutive
//! ranks in the order they appear in the input snapshot.

use common::models::LeaderboardEntry;

#[derive(Debug, Default, Clone, Copy)]
pub struct LeaderboardRanker;

impl LeaderboardRanker {
    pub fn new() -> Self {
        Self
    }

    /// Rank every user by descending points
    pub fn rank(&self, all_users: &[(String, i64)]) -> Vec<LeaderboardEntry> {
        let mut sorted: Vec<&(String, i64)> = all_users.iter().collect();
        // sort_by is stable, so ties keep snapshot order
        sorted.sort_by(|a, b| b.1.cmp(&a.1));

        sorted
            .into_iter()
            .enumerate()
            .map(|(idx, (user_id, points))| LeaderboardEntry {
                rank: (idx + 1) as i32,
                user_id: user_id.clone(),
                points: *points,
            })
            .collect()
    }

    /// A user's 1-based rank, `None` if the user is not in the snapshot
    pub fn rank_of(&self, user_id: &str, all_users: &[(String, i64)]) -> Option<i32> {
        let position = all_users.iter().position(|(id, _)| id == user_id)?;
        let points = all_users[position].1;

        // Everyone strictly ahead, plus equal-point users listed earlier
        let ahead = all_users
            .iter()
            .enumerate()
            .filter(|(idx, (_, p))| *p > points || (*p == points && *idx < position))
            .count();
        Some(ahead as i32 + 1)
    }

    pub fn top(&self, all_users: &[(String, i64)], n: usize) -> Vec<LeaderboardEntry> {
        let mut ranked = self.rank(all_users);
        ranked.truncate(n);
        ranked
    }
}
