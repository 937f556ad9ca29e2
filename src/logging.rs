//! File logging via `tracing`.
//!
//! The terminal belongs to the TUI, so events go to
//! `<data dir>/genequiz/genequiz.log`. `RUST_LOG` overrides the level.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("genequiz")
        .join("genequiz.log")
}

/// Install the global subscriber. Call once, before the terminal is set up.
pub fn init_logging(level: &str) -> Result<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_env_filter(level))
        .with(layer)
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(path)
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.trim().to_lowercase();
        // Dependencies stay at warn.
        EnvFilter::try_new(format!("warn,genequiz={level}"))
            .unwrap_or_else(|_| EnvFilter::new("warn,genequiz=info"))
    })
}
