//! Property tests for preprocessing, lookup and scoring.

use proptest::prelude::*;
use stadtland_core::preprocess::preprocess;
use stadtland_core::scoring::score;
use stadtland_core::{lookup, Round, VerdictGrid};

const CATEGORIES: [&str; 4] = ["Stadt", "Land", "Fluss", "Tier"];

fn answer() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("Bonn".to_string()),
        Just(" bonn".to_string()),
        Just("BERLIN".to_string()),
        Just("Bode".to_string()),
        "[A-Za-z ]{0,6}",
    ]
}

/// 1..=5 players with distinct names, each answering every category.
fn round_without_block() -> impl Strategy<Value = Round> {
    (1usize..=4, 1usize..=5).prop_flat_map(|(width, players)| {
        proptest::collection::vec(proptest::collection::vec(answer(), width), players).prop_map(
            move |rows| {
                Round::new(
                    "B",
                    CATEGORIES[..width].iter().map(|c| c.to_string()).collect(),
                    rows.into_iter()
                        .enumerate()
                        .map(|(i, row)| (format!("P{}", i), row)),
                )
            },
        )
    })
}

fn grid_for(round: &Round, mask: &[bool]) -> VerdictGrid {
    let mut grid = VerdictGrid::empty();
    let mut bits = mask.iter().cycle();
    for row in round.answers.rows() {
        for category in &round.categories {
            grid.set(&row.player, category, *bits.next().unwrap_or(&false));
        }
    }
    grid
}

proptest! {
    #[test]
    fn preprocess_without_block_is_identity(round in round_without_block()) {
        let round = round.validated().unwrap();
        let sanitized = preprocess(&round);
        prop_assert_eq!(&sanitized.categories, &round.categories);
        for (row, raw) in sanitized.rows.iter().zip(round.answers.rows()) {
            prop_assert_eq!(&row.player, &raw.player);
            prop_assert_eq!(&row.answers, &raw.answers);
            prop_assert!(row.block_word.is_empty());
        }
    }

    #[test]
    fn scoring_is_deterministic(
        round in round_without_block(),
        mask in proptest::collection::vec(any::<bool>(), 1..16),
    ) {
        let round = round.validated().unwrap();
        let sanitized = preprocess(&round);
        let grid = grid_for(&round, &mask);
        let first = score(&sanitized, &grid);
        for _ in 0..3 {
            prop_assert_eq!(&score(&sanitized, &grid), &first);
        }
    }

    #[test]
    fn scores_are_from_the_points_table(
        round in round_without_block(),
        mask in proptest::collection::vec(any::<bool>(), 1..16),
    ) {
        let round = round.validated().unwrap();
        let sanitized = preprocess(&round);
        let grid = grid_for(&round, &mask);
        for (row, scored) in sanitized.rows.iter().zip(score(&sanitized, &grid)) {
            prop_assert_eq!(scored.scores.len(), sanitized.categories.len());
            for (column, points) in scored.scores.iter().enumerate() {
                prop_assert!([0, 5, 10, 20].contains(points));
                if row.answers[column].trim().is_empty() {
                    prop_assert_eq!(*points, 0);
                }
            }
        }
    }

    #[test]
    fn lookup_never_panics(player in ".{0,8}", category in ".{0,8}") {
        let grid = VerdictGrid::empty();
        prop_assert!(!lookup(&grid, &player, &category));
    }

    #[test]
    fn vetoed_words_never_score(
        round in round_without_block(),
        veto in prop_oneof![Just("Bonn"), Just("berlin"), Just("bode")],
    ) {
        let mut categories = round.categories.clone();
        categories.push("Block".to_string());
        let rows: Vec<(String, Vec<String>)> = round
            .answers
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut answers = row.answers.clone();
                answers.push(if i == 0 { veto.to_string() } else { String::new() });
                (row.player.clone(), answers)
            })
            .collect();
        let blocked = Round::new("B", categories, rows).validated().unwrap();
        let sanitized = preprocess(&blocked);

        let veto = veto.to_lowercase();
        for row in &sanitized.rows {
            for cell in &row.answers {
                prop_assert_ne!(cell.trim().to_lowercase(), veto.clone());
            }
        }
    }
}
