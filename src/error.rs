use thiserror::Error;

use crate::catalog::Domain;

/// Problems with the bundled item catalogs. These indicate a broken build
/// rather than a runtime condition, but are still reported instead of panicking.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("bundled catalog file {0} is missing")]
    MissingAsset(String),

    #[error("catalog file {0} is not valid UTF-8")]
    Encoding(String),

    #[error("failed to parse catalog {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("catalog declares domain {found}, expected {expected}")]
    DomainMismatch { expected: Domain, found: Domain },

    #[error("item {id} does not have the shape of a {domain} item")]
    ItemShape { id: String, domain: Domain },

    #[error("duplicate item id {id} in the {domain} catalog")]
    DuplicateId { id: String, domain: Domain },

    #[error("the {0} catalog has no items")]
    Empty(Domain),
}

/// Failures of leaderboard reads and writes. Always recoverable: the UI shows
/// the message and keeps the action retryable.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("player name is empty")]
    EmptyName,

    #[error("leaderboard I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("leaderboard data is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "network")]
    #[error("leaderboard request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("leaderboard server responded with status {0}")]
    Status(u16),

    #[error("remote leaderboard URL is not configured")]
    NotConfigured,
}
