use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, ItemId};

/// Consecutive correct answers needed to master an item.
pub const REQUIRED_STREAK: u32 = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardState {
    pub item_id: ItemId,
    pub streak: u32,
    pub is_mastered: bool,
}

impl CardState {
    pub fn new(item_id: ItemId) -> Self {
        Self {
            item_id,
            streak: 0,
            is_mastered: false,
        }
    }

    /// Mastery is permanent: once the streak threshold is reached, later
    /// answers leave the card untouched.
    fn apply(&mut self, is_correct: bool) {
        if self.is_mastered {
            return;
        }
        if is_correct {
            self.streak = (self.streak + 1).min(REQUIRED_STREAK);
            self.is_mastered = self.streak >= REQUIRED_STREAK;
        } else {
            self.streak = 0;
        }
    }
}

/// Card states for one session, kept in catalog order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardDeck {
    cards: Vec<CardState>,
}

impl CardDeck {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            cards: catalog
                .items()
                .iter()
                .map(|item| CardState::new(item.id().clone()))
                .collect(),
        }
    }

    pub fn from_ids(ids: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            cards: ids.into_iter().map(CardState::new).collect(),
        }
    }

    pub fn cards(&self) -> &[CardState] {
        &self.cards
    }

    pub fn get(&self, id: &ItemId) -> Option<&CardState> {
        self.cards.iter().find(|c| &c.item_id == id)
    }

    pub fn record_answer(&mut self, id: &ItemId, is_correct: bool) -> Option<&CardState> {
        let card = self.cards.iter_mut().find(|c| &c.item_id == id)?;
        card.apply(is_correct);
        Some(card)
    }

    pub fn reset(&mut self) {
        for card in &mut self.cards {
            card.streak = 0;
            card.is_mastered = false;
        }
    }

    pub fn mastered_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_mastered).count()
    }

    pub fn all_mastered(&self) -> bool {
        self.cards.iter().all(|c| c.is_mastered)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn progress(&self) -> f64 {
        if self.cards.is_empty() {
            return 0.0;
        }
        self.mastered_count() as f64 / self.cards.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(n: usize) -> CardDeck {
        CardDeck::from_ids((1..=n).map(|i| ItemId::new(i.to_string())))
    }

    fn assert_invariant(deck: &CardDeck) {
        for card in deck.cards() {
            assert_eq!(card.is_mastered, card.streak >= REQUIRED_STREAK);
            assert!(card.streak <= REQUIRED_STREAK);
        }
    }

    #[test]
    fn test_correct_answers_build_streak_to_mastery() {
        let mut deck = deck(2);
        let id = ItemId::new("1");
        for expected in 1..=REQUIRED_STREAK {
            let card = deck.record_answer(&id, true).unwrap();
            assert_eq!(card.streak, expected);
            assert_invariant(&deck);
        }
        assert!(deck.get(&id).unwrap().is_mastered);
        assert_eq!(deck.mastered_count(), 1);
        assert!(!deck.all_mastered());
    }

    #[test]
    fn test_incorrect_answer_resets_streak() {
        let mut deck = deck(1);
        let id = ItemId::new("1");
        deck.record_answer(&id, true);
        deck.record_answer(&id, true);
        let card = deck.record_answer(&id, false).unwrap();
        assert_eq!(card.streak, 0);
        assert!(!card.is_mastered);
        assert_invariant(&deck);
    }

    #[test]
    fn test_mastery_is_permanent() {
        let mut deck = deck(1);
        let id = ItemId::new("1");
        for _ in 0..REQUIRED_STREAK {
            deck.record_answer(&id, true);
        }
        deck.record_answer(&id, false);
        deck.record_answer(&id, true);
        let card = deck.get(&id).unwrap();
        assert!(card.is_mastered);
        assert_eq!(card.streak, REQUIRED_STREAK);
        assert_invariant(&deck);
    }

    #[test]
    fn test_invariant_holds_over_mixed_sequence() {
        let mut deck = deck(3);
        let answers = [
            ("1", true),
            ("2", false),
            ("1", true),
            ("3", true),
            ("1", false),
            ("2", true),
            ("2", true),
            ("2", true),
            ("2", false),
            ("3", true),
        ];
        for (id, correct) in answers {
            let before = deck.get(&ItemId::new(id)).unwrap().streak;
            let after = deck.record_answer(&ItemId::new(id), correct).unwrap().streak;
            if correct {
                assert!(after >= before);
            }
            assert_invariant(&deck);
        }
    }

    #[test]
    fn test_unknown_id_changes_nothing() {
        let mut deck = deck(2);
        let before = deck.clone();
        assert!(deck.record_answer(&ItemId::new("missing"), true).is_none());
        assert_eq!(deck, before);
    }

    #[test]
    fn test_reset_clears_progress() {
        let mut deck = deck(2);
        let id = ItemId::new("2");
        for _ in 0..REQUIRED_STREAK {
            deck.record_answer(&id, true);
        }
        deck.reset();
        assert_eq!(deck.mastered_count(), 0);
        assert!(deck.cards().iter().all(|c| c.streak == 0));
        assert_eq!(deck.progress(), 0.0);
    }
}
