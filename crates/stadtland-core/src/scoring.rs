//! Per-category, tie-aware scoring.
//!
//! A cell is a candidate when it is non-empty and the judge accepted it.
//! Candidates are grouped by normalized text; with `g` the group size and
//! `P` the number of players in the round:
//!
//! | group                | points |
//! |----------------------|--------|
//! | `g == 1`             | 20     |
//! | `g == P`, `P > 1`    | 5      |
//! | otherwise            | 10     |
//!
//! Non-candidates score 0.

use std::collections::HashMap;

use crate::types::{normalize, SanitizedRound};
use crate::verdict::{lookup, VerdictGrid};

pub const UNIQUE_POINTS: u32 = 20;
pub const SHARED_POINTS: u32 = 10;
pub const CONSENSUS_POINTS: u32 = 5;

/// Scores of one player, aligned with the sanitized categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerScores {
    pub player: String,
    pub scores: Vec<u32>,
}

/// Points for a candidate whose group has `group` members among `players`.
pub fn points_for(group: usize, players: usize) -> u32 {
    if group == 1 {
        UNIQUE_POINTS
    } else if group == players && players > 1 {
        CONSENSUS_POINTS
    } else {
        SHARED_POINTS
    }
}

/// Score every player in every sanitized category, in round order.
pub fn score(round: &SanitizedRound, grid: &VerdictGrid) -> Vec<PlayerScores> {
    let players = round.player_count();
    let mut table: Vec<PlayerScores> = round
        .rows
        .iter()
        .map(|row| PlayerScores {
            player: row.player.clone(),
            scores: vec![0; round.categories.len()],
        })
        .collect();

    for (column, category) in round.categories.iter().enumerate() {
        let candidates: Vec<Option<String>> = round
            .rows
            .iter()
            .map(|row| {
                let cell = normalize(row.answers.get(column).map(String::as_str).unwrap_or(""));
                (!cell.is_empty() && lookup(grid, &row.player, category)).then_some(cell)
            })
            .collect();

        let mut groups: HashMap<&str, usize> = HashMap::new();
        for cell in candidates.iter().flatten() {
            *groups.entry(cell.as_str()).or_default() += 1;
        }

        for (entry, cell) in table.iter_mut().zip(&candidates) {
            if let Some(cell) = cell {
                entry.scores[column] = points_for(groups[cell.as_str()], players);
            }
        }
    }

    table
}
