//! Points leaderboard across every stored profile.

use serde::{Deserialize, Serialize};

use crate::account::display_name;
use crate::error::Result;
use crate::storage::ProfileStore;

/// Rows kept for display.
pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub tag: String,
    pub name: String,
    pub points: u64,
    pub tasks: u64,
    pub streak: u32,
    pub is_you: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    /// 1-based rank of the current user among all profiles.
    pub your_rank: Option<usize>,
    pub total_users: usize,
}

impl Leaderboard {
    /// Rank every stored profile by points, highest first. Ties are broken
    /// by tag so the order is stable.
    pub fn build<S: ProfileStore + ?Sized>(store: &S, current_user: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for tag in store.users()? {
            let Some(profile) = store.get(&tag)? else {
                continue;
            };
            rows.push(LeaderboardEntry {
                rank: 0,
                name: display_name(&tag).to_string(),
                points: profile.points,
                tasks: profile.completed_tasks_count,
                streak: profile.streak,
                is_you: tag == current_user,
                tag,
            });
        }

        rows.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.tag.cmp(&b.tag)));
        for (i, row) in rows.iter_mut().enumerate() {
            row.rank = i + 1;
        }

        let your_rank = rows.iter().find(|r| r.is_you).map(|r| r.rank);
        let total_users = rows.len();
        rows.truncate(LEADERBOARD_SIZE);

        Ok(Self {
            entries: rows,
            your_rank,
            total_users,
        })
    }
}
