//! Block-column extraction and veto blanking.
//!
//! The veto set is the union of every player's normalized block word. Any
//! remaining cell, in any category and by any player (the block word's
//! owner included), whose normalized text is in the set becomes empty.

use std::collections::HashSet;

use tracing::debug;

use crate::types::{is_block_category, normalize, Round, SanitizedRound, SanitizedRow};

/// Index of the block column, if the round has one.
pub fn block_index(categories: &[String]) -> Option<usize> {
    categories.iter().position(|c| is_block_category(c))
}

/// Normalized, non-empty block words of all players.
pub fn veto_set<'a>(block_words: impl IntoIterator<Item = &'a str>) -> HashSet<String> {
    block_words
        .into_iter()
        .map(normalize)
        .filter(|word| !word.is_empty())
        .collect()
}

/// Remove the block column and blank vetoed cells.
///
/// Expects a validated round (rows as wide as `categories`); a round without
/// a block column passes through unchanged.
pub fn preprocess(round: &Round) -> SanitizedRound {
    let rows = round.answers.rows();
    let Some(block) = block_index(&round.categories) else {
        return SanitizedRound {
            letter: round.letter.clone(),
            categories: round.categories.clone(),
            rows: rows
                .iter()
                .map(|row| SanitizedRow {
                    player: row.player.clone(),
                    answers: row.answers.clone(),
                    block_word: String::new(),
                })
                .collect(),
        };
    };

    let block_words: Vec<&str> = rows
        .iter()
        .map(|row| row.answers.get(block).map(String::as_str).unwrap_or(""))
        .collect();
    let vetoes = veto_set(block_words.iter().copied());
    debug!(block_index = block, vetoes = vetoes.len(), "built veto set");

    let categories = round
        .categories
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != block)
        .map(|(_, c)| c.clone())
        .collect();

    let rows = rows
        .iter()
        .zip(block_words)
        .map(|(row, block_word)| SanitizedRow {
            player: row.player.clone(),
            answers: row
                .answers
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != block)
                .map(|(_, cell)| {
                    if vetoes.contains(&normalize(cell)) {
                        String::new()
                    } else {
                        cell.clone()
                    }
                })
                .collect(),
            block_word: block_word.to_string(),
        })
        .collect();

    SanitizedRound {
        letter: round.letter.clone(),
        categories,
        rows,
    }
}
