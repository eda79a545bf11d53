/// Property-based tests for card generation and win verification
///
/// These tests verify the shuffle and verifier invariants across a wide
/// range of randomly generated seeds and draw sequences.
use proptest::prelude::*;
use std::collections::BTreeSet;

use bingo_hall::{
    NumberPool,
    constants::{CARD_NUMBERS, FREE_NUMBER, FREE_SLOT_INDEX, GRID_SIZE, MAX_NUMBER},
    entities::{Card, CardSeed, shuffled_layout},
    rules::{is_winner, winning_line},
};

// Strategy to generate a full-width 256-bit seed
fn seed_strategy() -> impl Strategy<Value = CardSeed> {
    any::<[u8; 32]>().prop_map(CardSeed::from)
}

// Strategy to generate a draw sequence of unique numbers in 1..=99
fn draw_sequence_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::btree_set(1u8..=MAX_NUMBER, 0..=MAX_NUMBER as usize)
        .prop_map(|set| set.into_iter().collect::<Vec<u8>>())
        .prop_shuffle()
}

fn pool_with(numbers: &[u8]) -> NumberPool {
    let mut pool = NumberPool::new();
    for n in numbers {
        pool.mark_used(*n).unwrap();
    }
    pool
}

proptest! {
    #[test]
    fn test_layout_always_has_24_distinct_values(seed in seed_strategy()) {
        let layout = shuffled_layout(&seed);
        let values: BTreeSet<u8> = layout
            .iter()
            .copied()
            .filter(|n| *n != FREE_NUMBER)
            .collect();

        prop_assert_eq!(values.len(), CARD_NUMBERS);
        for n in values {
            prop_assert!(n >= 1 && n <= MAX_NUMBER);
        }
        prop_assert_eq!(layout[FREE_SLOT_INDEX], FREE_NUMBER);
    }

    #[test]
    fn test_layout_is_pure_function_of_seed(seed in seed_strategy()) {
        prop_assert_eq!(shuffled_layout(&seed), shuffled_layout(&seed));
    }

    #[test]
    fn test_pool_never_double_marks(draws in draw_sequence_strategy()) {
        let mut pool = NumberPool::new();
        for n in &draws {
            pool.mark_used(*n).unwrap();
            prop_assert_eq!(
                pool.mark_used(*n),
                Err(bingo_hall::game::PoolError::AlreadyDrawn)
            );
        }
        prop_assert_eq!(pool.remaining(), MAX_NUMBER as usize - draws.len());
    }

    #[test]
    fn test_verifier_agrees_with_exhaustive_line_check(
        seed in seed_strategy(),
        draws in draw_sequence_strategy(),
    ) {
        let layout = shuffled_layout(&seed);
        let pool = pool_with(&draws);

        // Brute-force reference: enumerate all 12 lines directly.
        let mut lines: Vec<Vec<u8>> = Vec::new();
        for row in 0..GRID_SIZE {
            lines.push((0..GRID_SIZE).map(|c| layout[row * GRID_SIZE + c]).collect());
        }
        for col in 0..GRID_SIZE {
            lines.push((0..GRID_SIZE).map(|r| layout[r * GRID_SIZE + col]).collect());
        }
        lines.push((0..GRID_SIZE).map(|i| layout[i * GRID_SIZE + i]).collect());
        lines.push(
            (0..GRID_SIZE)
                .map(|i| layout[i * GRID_SIZE + (GRID_SIZE - 1 - i)])
                .collect(),
        );
        let expected = lines.iter().any(|line| {
            line.iter()
                .all(|n| *n == FREE_NUMBER || draws.contains(n))
        });

        prop_assert_eq!(winning_line(&layout, &pool).is_some(), expected);
    }

    #[test]
    fn test_full_pool_wins_every_card(seed in seed_strategy()) {
        let card = Card::from_seed("anyone".into(), &seed);
        let all: Vec<u8> = (1..=MAX_NUMBER).collect();
        let pool = pool_with(&all);
        prop_assert!(is_winner(&card, &pool));
    }

    #[test]
    fn test_empty_pool_never_wins(seed in seed_strategy()) {
        let card = Card::from_seed("anyone".into(), &seed);
        prop_assert!(!is_winner(&card, &NumberPool::new()));
    }
}
