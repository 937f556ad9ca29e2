use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Domain;
use crate::session::result::SessionResult;

pub const SCHEMA_VERSION: u32 = 1;

/// One leaderboard row. Records are append-only; the same player may appear
/// many times.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub elapsed_seconds: u64,
    pub date: DateTime<Utc>,
    pub difficulty: u8,
    pub domain: Domain,
    #[serde(default)]
    pub completed: bool,
}

impl LeaderboardEntry {
    /// `player_name` must already be normalized.
    pub fn from_result(player_name: String, result: &SessionResult) -> Self {
        Self {
            player_name,
            elapsed_seconds: result.elapsed_seconds(),
            date: result.timestamp,
            difficulty: result.difficulty,
            domain: result.domain,
            completed: result.completed,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeaderboardData {
    pub schema_version: u32,
    pub entries: Vec<LeaderboardEntry>,
}

impl Default for LeaderboardData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            entries: Vec::new(),
        }
    }
}

impl LeaderboardData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}
