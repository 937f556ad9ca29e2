use std::time::Instant;

use crate::catalog::{Catalog, CatalogItem, Classification, Domain, ItemId};
use crate::engine::{CardDeck, Difficulty};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    CountingDown { remaining: u32 },
    Active,
    Completed,
}

/// An answer button, and the answer submitted by pressing it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Choice {
    Classification(Classification),
    Item(ItemId),
}

impl Choice {
    /// Whether this choice answers `item` correctly. `None` when the choice
    /// has the wrong shape for the item's domain.
    pub fn answers(&self, item: &CatalogItem) -> Option<bool> {
        match (self, item) {
            (Choice::Classification(chosen), CatalogItem::Classification(it)) => {
                Some(*chosen == it.classification)
            }
            (Choice::Item(chosen), CatalogItem::Identification(_) | CatalogItem::Concept(_)) => {
                Some(chosen == item.id())
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    /// Set only for wrong answers.
    pub correct_answer_label: Option<String>,
}

/// Everything one session owns. Replaced wholesale when a new session starts.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub domain: Domain,
    pub difficulty: Difficulty,
    pub cards: CardDeck,
    pub current_item: Option<ItemId>,
    pub current_options: Vec<Choice>,
    pub feedback: Option<Feedback>,
    pub phase: Phase,
    pub generation: u64,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
    pub attempts: u32,
    pub correct: u32,
}

impl SessionState {
    pub fn new(catalog: &Catalog, difficulty: Difficulty) -> Self {
        Self {
            domain: catalog.domain(),
            difficulty,
            cards: CardDeck::from_catalog(catalog),
            current_item: None,
            current_options: Vec::new(),
            feedback: None,
            phase: Phase::Idle,
            generation: 0,
            started_at: None,
            finished_at: None,
            attempts: 0,
            correct: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs_f64(),
            (Some(start), None) => now.saturating_duration_since(start).as_secs_f64(),
            _ => 0.0,
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            return 100.0;
        }
        (self.correct as f64 / self.attempts as f64 * 100.0).clamp(0.0, 100.0)
    }

    pub fn current_streak(&self) -> u32 {
        self.current_item
            .as_ref()
            .and_then(|id| self.cards.get(id))
            .map_or(0, |c| c.streak)
    }
}
