pub mod json_store;
pub mod leaderboard;
#[cfg(feature = "network")]
pub mod remote;
pub mod schema;

use std::sync::Arc;

use crate::config::{Config, LeaderboardBackend};
use crate::error::LeaderboardError;

pub use json_store::JsonStore;
pub use leaderboard::{LeaderboardStore, normalize_player_name, rank_entries};
pub use schema::LeaderboardEntry;

/// Open the backend selected in the config.
pub fn open_store(config: &Config) -> Result<Arc<dyn LeaderboardStore>, LeaderboardError> {
    match config.leaderboard_backend {
        LeaderboardBackend::Local => Ok(Arc::new(JsonStore::new()?)),
        #[cfg(feature = "network")]
        LeaderboardBackend::Remote => {
            let url = config
                .leaderboard_url
                .as_deref()
                .ok_or(LeaderboardError::NotConfigured)?;
            Ok(Arc::new(remote::RemoteStore::new(url)?))
        }
        #[cfg(not(feature = "network"))]
        LeaderboardBackend::Remote => {
            tracing::warn!("built without the network feature, using the local leaderboard");
            Ok(Arc::new(JsonStore::new()?))
        }
    }
}
