use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::{Catalog, CatalogItem, Classification, ItemId};
use crate::engine::difficulty::Difficulty;
use crate::engine::mastery::CardState;

/// Number of answer buttons shown for every prompt.
pub const OPTION_COUNT: usize = 4;

/// Uniform pick from the pool, never repeating `previous` when another
/// candidate exists. Only the single most recent item is excluded.
pub fn pick_next<R: Rng + ?Sized>(
    pool: &[&CardState],
    previous: Option<&ItemId>,
    rng: &mut R,
) -> Option<ItemId> {
    let candidates: Vec<&CardState> = match previous {
        Some(prev) if pool.len() > 1 => pool
            .iter()
            .copied()
            .filter(|c| &c.item_id != prev)
            .collect(),
        _ => pool.to_vec(),
    };
    candidates.choose(rng).map(|c| c.item_id.clone())
}

/// The correct item plus up to three distractors sampled without
/// replacement from the whole catalog, in shuffled order.
pub fn generate_options<R: Rng + ?Sized>(
    correct: &CatalogItem,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<ItemId> {
    let others: Vec<&ItemId> = catalog
        .items()
        .iter()
        .map(CatalogItem::id)
        .filter(|id| *id != correct.id())
        .collect();

    let mut options: Vec<ItemId> = others
        .choose_multiple(rng, OPTION_COUNT - 1)
        .map(|id| (*id).clone())
        .collect();
    options.push(correct.id().clone());
    options.shuffle(rng);
    options
}

/// The four classification labels, shuffled on even difficulty levels.
pub fn classification_options<R: Rng + ?Sized>(
    difficulty: Difficulty,
    rng: &mut R,
) -> [Classification; OPTION_COUNT] {
    let mut labels = Classification::ALL;
    if difficulty.shuffles_labels() {
        labels.shuffle(rng);
    }
    labels
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::catalog::{Domain, IdentificationItem};
    use crate::engine::mastery::{CardDeck, REQUIRED_STREAK};

    fn cards(n: usize) -> Vec<CardState> {
        (1..=n)
            .map(|i| CardState::new(ItemId::new(i.to_string())))
            .collect()
    }

    fn syndrome_catalog(n: usize) -> Catalog {
        let items = (1..=n)
            .map(|i| {
                CatalogItem::Identification(IdentificationItem {
                    id: ItemId::new(format!("s{i}")),
                    display_name: format!("Syndrome {i}"),
                    feature_lines: vec![format!("feature {i}")],
                })
            })
            .collect();
        Catalog::new(Domain::Identification, items).unwrap()
    }

    #[test]
    fn test_pick_from_empty_pool_is_none() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(pick_next(&[], None, &mut rng), None);
    }

    #[test]
    fn test_pick_never_repeats_previous() {
        let mut rng = SmallRng::seed_from_u64(7);
        let all = cards(3);
        let pool: Vec<&CardState> = all.iter().collect();
        let mut previous = pick_next(&pool, None, &mut rng);
        for _ in 0..500 {
            let next = pick_next(&pool, previous.as_ref(), &mut rng);
            assert!(next.is_some());
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn test_single_card_pool_repeats() {
        let mut rng = SmallRng::seed_from_u64(3);
        let all = cards(1);
        let pool: Vec<&CardState> = all.iter().collect();
        let only = ItemId::new("1");
        assert_eq!(pick_next(&pool, Some(&only), &mut rng), Some(only));
    }

    #[test]
    fn test_pick_reaches_every_candidate() {
        let mut rng = SmallRng::seed_from_u64(11);
        let all = cards(4);
        let pool: Vec<&CardState> = all.iter().collect();
        let seen: HashSet<ItemId> = (0..200)
            .filter_map(|_| pick_next(&pool, None, &mut rng))
            .collect();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_options_are_four_distinct_with_correct_once() {
        let catalog = syndrome_catalog(12);
        let mut rng = SmallRng::seed_from_u64(42);
        for item in catalog.items() {
            for _ in 0..20 {
                let options = generate_options(item, &catalog, &mut rng);
                assert_eq!(options.len(), OPTION_COUNT);
                let unique: HashSet<&ItemId> = options.iter().collect();
                assert_eq!(unique.len(), OPTION_COUNT);
                assert_eq!(options.iter().filter(|id| *id == item.id()).count(), 1);
                assert!(options.iter().all(|id| catalog.get(id).is_some()));
            }
        }
    }

    #[test]
    fn test_mastered_items_still_serve_as_distractors() {
        let catalog = syndrome_catalog(4);
        let mut deck = CardDeck::from_catalog(&catalog);
        for id in ["s2", "s3", "s4"] {
            for _ in 0..REQUIRED_STREAK {
                deck.record_answer(&ItemId::new(id), true);
            }
        }
        assert_eq!(deck.mastered_count(), 3);

        // Only s1 is left to practice, yet its options draw on the whole catalog.
        let current = &catalog.items()[0];
        let mut rng = SmallRng::seed_from_u64(13);
        let options = generate_options(current, &catalog, &mut rng);
        assert_eq!(options.len(), OPTION_COUNT);
        for id in ["s2", "s3", "s4"] {
            let id = ItemId::new(id);
            assert!(deck.get(&id).unwrap().is_mastered);
            assert!(options.contains(&id));
        }
    }

    #[test]
    fn test_correct_option_position_varies() {
        let catalog = syndrome_catalog(6);
        let item = &catalog.items()[0];
        let mut rng = SmallRng::seed_from_u64(5);
        let positions: HashSet<usize> = (0..100)
            .filter_map(|_| {
                generate_options(item, &catalog, &mut rng)
                    .iter()
                    .position(|id| id == item.id())
            })
            .collect();
        assert_eq!(positions.len(), OPTION_COUNT);
    }

    #[test]
    fn test_small_catalog_uses_every_item() {
        let catalog = syndrome_catalog(3);
        let mut rng = SmallRng::seed_from_u64(9);
        let options = generate_options(&catalog.items()[1], &catalog, &mut rng);
        assert_eq!(options.len(), 3);
        let unique: HashSet<&ItemId> = options.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_classification_labels_fixed_on_odd_levels() {
        let mut rng = SmallRng::seed_from_u64(0);
        for level in [1, 3] {
            let difficulty = Difficulty::clamped(Domain::Classification, level);
            for _ in 0..10 {
                assert_eq!(
                    classification_options(difficulty, &mut rng),
                    Classification::ALL
                );
            }
        }
    }

    #[test]
    fn test_classification_labels_shuffled_on_even_levels() {
        let mut rng = SmallRng::seed_from_u64(0);
        let difficulty = Difficulty::clamped(Domain::Classification, 4);
        let orders: HashSet<[Classification; 4]> = (0..50)
            .map(|_| classification_options(difficulty, &mut rng))
            .collect();
        assert!(orders.len() > 1);
        for order in orders {
            let unique: HashSet<Classification> = order.into_iter().collect();
            assert_eq!(unique.len(), 4);
        }
    }
}
