use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::catalog::Domain;

pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "pt-BR"];
const MAX_COUNTDOWN_SECS: u32 = 10;
const MIN_DELAY_MS: u64 = 200;
const MAX_DELAY_MS: u64 = 10_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardBackend {
    #[default]
    Local,
    Remote,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub player_name: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_difficulty")]
    pub default_difficulty: u8,
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u32,
    #[serde(default = "default_correct_delay_ms")]
    pub correct_delay_ms: u64,
    #[serde(default = "default_incorrect_delay_ms")]
    pub incorrect_delay_ms: u64,
    #[serde(default)]
    pub leaderboard_backend: LeaderboardBackend,
    #[serde(default)]
    pub leaderboard_url: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_locale() -> String {
    "pt-BR".to_string()
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_difficulty() -> u8 {
    1
}
fn default_countdown_secs() -> u32 {
    3
}
fn default_correct_delay_ms() -> u64 {
    1000
}
fn default_incorrect_delay_ms() -> u64 {
    2500
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            locale: default_locale(),
            theme: default_theme(),
            default_difficulty: default_difficulty(),
            countdown_secs: default_countdown_secs(),
            correct_delay_ms: default_correct_delay_ms(),
            incorrect_delay_ms: default_incorrect_delay_ms(),
            leaderboard_backend: LeaderboardBackend::default(),
            leaderboard_url: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("genequiz")
            .join("config.toml")
    }

    /// Clamp out-of-range values and reset unknown ones to defaults.
    /// Call after deserialization and after applying CLI overrides.
    pub fn validate(&mut self) {
        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            self.locale = default_locale();
        }
        // Classification has the widest range; per-domain clamping happens
        // when a session starts.
        self.default_difficulty = self
            .default_difficulty
            .clamp(1, Domain::Classification.max_difficulty());
        self.countdown_secs = self.countdown_secs.min(MAX_COUNTDOWN_SECS);
        self.correct_delay_ms = self.correct_delay_ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS);
        self.incorrect_delay_ms = self.incorrect_delay_ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS);
        if self
            .leaderboard_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            self.leaderboard_url = None;
        }
        if self.log_level.trim().is_empty() {
            self.log_level = default_log_level();
        }
    }
}
