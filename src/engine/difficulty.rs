use std::fmt;

use crate::catalog::Domain;

/// Difficulty level, validated against the domain's range.
///
/// | level | pool                   | classification labels |
/// |-------|------------------------|-----------------------|
/// | 1     | chunks of 3            | fixed order           |
/// | 2     | chunks of 6            | shuffled              |
/// | 3     | every unmastered item  | fixed order           |
/// | 4     | every unmastered item  | shuffled              |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;

    pub fn new(domain: Domain, level: u8) -> Option<Self> {
        (Self::MIN..=domain.max_difficulty())
            .contains(&level)
            .then_some(Self(level))
    }

    pub fn clamped(domain: Domain, level: u8) -> Self {
        Self(level.clamp(Self::MIN, domain.max_difficulty()))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Window size for sequential unlocking, or `None` in full random mode.
    pub fn chunk_size(self) -> Option<usize> {
        match self.0 {
            1 => Some(3),
            2 => Some(6),
            _ => None,
        }
    }

    pub fn shuffles_labels(self) -> bool {
        self.0 % 2 == 0
    }

    pub fn next(self, domain: Domain) -> Self {
        Self::clamped(domain, self.0.saturating_add(1))
    }

    pub fn prev(self, domain: Domain) -> Self {
        Self::clamped(domain, self.0.saturating_sub(1))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
