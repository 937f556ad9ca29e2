use std::cmp::Ordering;

use icu_normalizer::ComposingNormalizerBorrowed;

use crate::catalog::Domain;
use crate::error::LeaderboardError;
use crate::store::schema::LeaderboardEntry;

pub const MAX_NAME_CHARS: usize = 20;

/// Persistent, append-only collection of leaderboard entries.
pub trait LeaderboardStore: Send + Sync {
    fn append(&self, entry: &LeaderboardEntry) -> Result<(), LeaderboardError>;

    /// Entries for one domain, in storage order.
    fn query(&self, domain: Domain) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;

    /// Entries for one domain, best first.
    fn standings(&self, domain: Domain) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let mut entries = self.query(domain)?;
        rank_entries(&mut entries);
        Ok(entries)
    }
}

/// Completed runs first, then fastest first.
pub fn rank_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(compare_entries);
}

fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.completed
        .cmp(&a.completed)
        .then(a.elapsed_seconds.cmp(&b.elapsed_seconds))
        .then(a.date.cmp(&b.date))
}

/// NFC-normalize, trim and truncate a player name. Names that are empty
/// after trimming are rejected.
pub fn normalize_player_name(raw: &str) -> Result<String, LeaderboardError> {
    let normalizer = ComposingNormalizerBorrowed::new_nfc();
    let normalized = normalizer.normalize(raw.trim());
    let name: String = normalized
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_NAME_CHARS)
        .collect();
    let name = name.trim_end().to_string();
    if name.is_empty() {
        return Err(LeaderboardError::EmptyName);
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn entry(name: &str, secs: u64, completed: bool, day: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            player_name: name.to_string(),
            elapsed_seconds: secs,
            date: Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap(),
            difficulty: 1,
            domain: Domain::Classification,
            completed,
        }
    }

    #[test]
    fn test_rank_completed_first_then_fastest() {
        let mut entries = vec![
            entry("slow", 300, true, 1),
            entry("quit", 10, false, 2),
            entry("fast", 120, true, 3),
            entry("also-fast", 120, true, 1),
        ];
        rank_entries(&mut entries);
        let names: Vec<&str> = entries.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["also-fast", "fast", "slow", "quit"]);
    }

    #[test]
    fn test_name_is_trimmed_and_truncated() {
        assert_eq!(normalize_player_name("  Ana  ").unwrap(), "Ana");
        let long = "abcdefghijklmnopqrstuvwxyz";
        assert_eq!(normalize_player_name(long).unwrap().chars().count(), 20);
    }

    #[test]
    fn test_name_is_nfc_normalized() {
        // "e" followed by a combining acute accent composes to "é".
        let decomposed = "Jose\u{301}";
        assert_eq!(normalize_player_name(decomposed).unwrap(), "José");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            normalize_player_name("   "),
            Err(LeaderboardError::EmptyName)
        ));
        assert!(normalize_player_name("").is_err());
    }
}
