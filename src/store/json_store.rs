use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::catalog::Domain;
use crate::error::LeaderboardError;
use crate::store::leaderboard::LeaderboardStore;
use crate::store::schema::{LeaderboardData, LeaderboardEntry};

const LEADERBOARD_FILE: &str = "leaderboard.json";

/// Leaderboard kept in a JSON file in the local data directory.
pub struct JsonStore {
    base_dir: PathBuf,
    // Serializes read-modify-write cycles between worker threads.
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new() -> Result<Self, LeaderboardError> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("genequiz");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, LeaderboardError> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            write_lock: Mutex::new(()),
        })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load(&self) -> Result<LeaderboardData, LeaderboardError> {
        let path = self.file_path(LEADERBOARD_FILE);
        if !path.exists() {
            return Ok(LeaderboardData::default());
        }
        let content = fs::read_to_string(&path)?;
        let data: LeaderboardData = serde_json::from_str(&content)?;
        if data.needs_reset() {
            tracing::warn!(
                found = data.schema_version,
                path = %path.display(),
                "leaderboard schema version changed, starting fresh"
            );
            return Ok(LeaderboardData::default());
        }
        Ok(data)
    }

    fn save(&self, data: &LeaderboardData) -> Result<(), LeaderboardError> {
        let path = self.file_path(LEADERBOARD_FILE);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

impl LeaderboardStore for JsonStore {
    fn append(&self, entry: &LeaderboardEntry) -> Result<(), LeaderboardError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut data = self.load()?;
        data.entries.push(entry.clone());
        self.save(&data)?;
        tracing::info!(
            domain = %entry.domain,
            elapsed_seconds = entry.elapsed_seconds,
            total = data.entries.len(),
            "leaderboard entry saved"
        );
        Ok(())
    }

    fn query(&self, domain: Domain) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let data = self.load()?;
        Ok(data
            .entries
            .into_iter()
            .filter(|e| e.domain == domain)
            .collect())
    }
}
