//! Win persistence boundary
//!
//! The room only needs two operations: record a win and read the top of the table.
//! [`MemoryWinStore`] keeps them in process; a database-backed store implements the same
//! trait.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Leaderboard size published after each win
pub const LEADERBOARD_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub wins: u32,
}

pub trait WinStore: Send + Sync {
    /// Add one win, returning the new total
    fn increment_wins(&self, username: &str) -> Result<u32>;

    /// Top `limit` players by wins, ties by name
    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>>;
}

#[derive(Debug, Default)]
pub struct MemoryWinStore {
    wins: Mutex<HashMap<String, u32>>,
}

impl MemoryWinStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WinStore for MemoryWinStore {
    fn increment_wins(&self, username: &str) -> Result<u32> {
        let mut wins = self
            .wins
            .lock()
            .map_err(|_| anyhow!("win store lock poisoned"))?;
        let total = wins.entry(username.to_string()).or_insert(0);
        *total += 1;
        Ok(*total)
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let wins = self
            .wins
            .lock()
            .map_err(|_| anyhow!("win store lock poisoned"))?;
        let mut entries: Vec<LeaderboardEntry> = wins
            .iter()
            .map(|(username, &wins)| LeaderboardEntry {
                username: username.clone(),
                wins,
            })
            .collect();
        entries.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.username.cmp(&b.username)));
        entries.truncate(limit);
        Ok(entries)
    }
}
