use std::time::Duration;

use reqwest::blocking::Client;

use crate::catalog::Domain;
use crate::error::LeaderboardError;
use crate::store::leaderboard::LeaderboardStore;
use crate::store::schema::LeaderboardEntry;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Leaderboard kept by an HTTP document store.
///
/// `POST {base}/entries` appends one JSON entry; `GET {base}/entries?domain=`
/// returns a JSON array of entries.
pub struct RemoteStore {
    client: Client,
    base_url: String,
}

impl RemoteStore {
    pub fn new(base_url: &str) -> Result<Self, LeaderboardError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(LeaderboardError::NotConfigured);
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    fn entries_url(&self) -> String {
        format!("{}/entries", self.base_url)
    }
}

impl LeaderboardStore for RemoteStore {
    fn append(&self, entry: &LeaderboardEntry) -> Result<(), LeaderboardError> {
        let response = self.client.post(self.entries_url()).json(entry).send()?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "leaderboard POST rejected");
            return Err(LeaderboardError::Status(status.as_u16()));
        }
        tracing::info!(domain = %entry.domain, "leaderboard entry posted");
        Ok(())
    }

    fn query(&self, domain: Domain) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let response = self
            .client
            .get(self.entries_url())
            .query(&[("domain", domain.as_str())])
            .send()?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "leaderboard GET rejected");
            return Err(LeaderboardError::Status(status.as_u16()));
        }
        let entries: Vec<LeaderboardEntry> = response.json()?;
        // Servers may ignore the filter.
        Ok(entries.into_iter().filter(|e| e.domain == domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_url_is_not_configured() {
        assert!(matches!(
            RemoteStore::new("  "),
            Err(LeaderboardError::NotConfigured)
        ));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let store = RemoteStore::new("http://localhost:8080/api/").unwrap();
        assert_eq!(store.entries_url(), "http://localhost:8080/api/entries");
    }
}
