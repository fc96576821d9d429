//! Result table assembly.

use crate::scoring::PlayerScores;
use crate::types::{SanitizedRound, ScoreRow};

/// Merge sanitized answers, scores and block words, in round player order.
///
/// `scores` must come from [`crate::scoring::score`] on the same round.
pub fn assemble(round: SanitizedRound, scores: Vec<PlayerScores>) -> Vec<ScoreRow> {
    debug_assert_eq!(round.rows.len(), scores.len());
    round
        .rows
        .into_iter()
        .zip(scores)
        .map(|(row, scored)| {
            debug_assert_eq!(row.player, scored.player);
            ScoreRow {
                player: row.player,
                answers: row.answers,
                scores: scored.scores,
                block_word: row.block_word,
            }
        })
        .collect()
}
