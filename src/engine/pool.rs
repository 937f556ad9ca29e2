use crate::engine::difficulty::Difficulty;
use crate::engine::mastery::{CardDeck, CardState};

/// Position of the unlocked window when the pool is chunked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkInfo {
    pub index: usize,
    pub count: usize,
}

/// Cards eligible to be shown next.
///
/// In chunked mode only the first catalog-order window that still holds an
/// unmastered card is eligible, so window N+1 opens only once windows 1..=N
/// are fully mastered. An empty result means every card is mastered.
pub fn active_pool(deck: &CardDeck, difficulty: Difficulty) -> Vec<&CardState> {
    let cards = deck.cards();
    match difficulty.chunk_size() {
        None => cards.iter().filter(|c| !c.is_mastered).collect(),
        Some(size) => cards
            .chunks(size)
            .find(|window| window.iter().any(|c| !c.is_mastered))
            .map(|window| window.iter().filter(|c| !c.is_mastered).collect())
            .unwrap_or_default(),
    }
}

pub fn current_chunk(deck: &CardDeck, difficulty: Difficulty) -> Option<ChunkInfo> {
    let size = difficulty.chunk_size()?;
    let cards = deck.cards();
    let count = cards.len().div_ceil(size);
    cards
        .chunks(size)
        .position(|window| window.iter().any(|c| !c.is_mastered))
        .map(|index| ChunkInfo { index, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Domain, ItemId};
    use crate::engine::mastery::REQUIRED_STREAK;

    fn deck(n: usize) -> CardDeck {
        CardDeck::from_ids((1..=n).map(|i| ItemId::new(i.to_string())))
    }

    fn master(deck: &mut CardDeck, id: usize) {
        for _ in 0..REQUIRED_STREAK {
            deck.record_answer(&ItemId::new(id.to_string()), true);
        }
    }

    fn ids(pool: &[&CardState]) -> Vec<String> {
        pool.iter().map(|c| c.item_id.to_string()).collect()
    }

    fn level(l: u8) -> Difficulty {
        Difficulty::clamped(Domain::Classification, l)
    }

    #[test]
    fn test_full_random_returns_all_unmastered() {
        let mut deck = deck(5);
        master(&mut deck, 2);
        master(&mut deck, 5);
        assert_eq!(ids(&active_pool(&deck, level(3))), ["1", "3", "4"]);
        assert_eq!(ids(&active_pool(&deck, level(4))), ["1", "3", "4"]);
        assert_eq!(current_chunk(&deck, level(3)), None);
    }

    #[test]
    fn test_chunk_of_three_unlocks_sequentially() {
        let mut deck = deck(7);
        assert_eq!(ids(&active_pool(&deck, level(1))), ["1", "2", "3"]);

        master(&mut deck, 1);
        master(&mut deck, 3);
        assert_eq!(ids(&active_pool(&deck, level(1))), ["2"]);

        // Progress outside the window does not open it early.
        master(&mut deck, 5);
        assert_eq!(ids(&active_pool(&deck, level(1))), ["2"]);

        master(&mut deck, 2);
        assert_eq!(ids(&active_pool(&deck, level(1))), ["4", "6"]);
        assert_eq!(
            current_chunk(&deck, level(1)),
            Some(ChunkInfo { index: 1, count: 3 })
        );

        master(&mut deck, 4);
        master(&mut deck, 6);
        assert_eq!(ids(&active_pool(&deck, level(1))), ["7"]);
    }

    #[test]
    fn test_chunk_of_six() {
        let mut deck = deck(8);
        assert_eq!(ids(&active_pool(&deck, level(2))), ["1", "2", "3", "4", "5", "6"]);
        for id in 1..=6 {
            master(&mut deck, id);
        }
        assert_eq!(ids(&active_pool(&deck, level(2))), ["7", "8"]);
    }

    #[test]
    fn test_all_mastered_gives_empty_pool() {
        let mut deck = deck(4);
        for id in 1..=4 {
            master(&mut deck, id);
        }
        for l in 1..=4 {
            assert!(active_pool(&deck, level(l)).is_empty());
        }
        assert_eq!(current_chunk(&deck, level(1)), None);
    }
}
