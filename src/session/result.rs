use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Domain;
use crate::session::state::SessionState;

/// Summary of a finished or abandoned session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub domain: Domain,
    pub difficulty: u8,
    pub completed: bool,
    pub elapsed_secs: f64,
    pub attempts: u32,
    pub correct: u32,
    pub mastered: usize,
    pub total_items: usize,
    pub timestamp: DateTime<Utc>,
}

impl SessionResult {
    pub fn from_state(state: &SessionState, now: Instant) -> Self {
        Self {
            domain: state.domain,
            difficulty: state.difficulty.level(),
            completed: state.is_completed() || state.cards.all_mastered(),
            elapsed_secs: state.elapsed_secs(now),
            attempts: state.attempts,
            correct: state.correct,
            mastered: state.cards.mastered_count(),
            total_items: state.cards.len(),
            timestamp: Utc::now(),
        }
    }

    /// Whole seconds, as stored on the leaderboard.
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_secs.max(0.0).floor() as u64
    }

    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            return 100.0;
        }
        (self.correct as f64 / self.attempts as f64 * 100.0).clamp(0.0, 100.0)
    }

    pub fn completion_percent(&self) -> f64 {
        if self.total_items == 0 {
            return 0.0;
        }
        (self.mastered as f64 / self.total_items as f64 * 100.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(attempts: u32, correct: u32, mastered: usize) -> SessionResult {
        SessionResult {
            domain: Domain::Classification,
            difficulty: 1,
            completed: false,
            elapsed_secs: 61.9,
            attempts,
            correct,
            mastered,
            total_items: 4,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_elapsed_seconds_truncates() {
        assert_eq!(result(0, 0, 0).elapsed_seconds(), 61);
    }

    #[test]
    fn test_accuracy_and_completion() {
        let r = result(8, 6, 1);
        assert!((r.accuracy() - 75.0).abs() < 1e-9);
        assert!((r.completion_percent() - 25.0).abs() < 1e-9);
        assert_eq!(result(0, 0, 0).accuracy(), 100.0);
    }
}
