//! Round evaluation pipeline: validate, preprocess, judge, score, assemble.

use tracing::{debug, info, info_span, Instrument};

use crate::assemble::assemble;
use crate::error::RoundResult;
use crate::oracle::Oracle;
use crate::preprocess::preprocess;
use crate::scoring::score;
use crate::types::{Round, ScoreRow};

/// Stateless evaluator; one instance serves any number of concurrent rounds.
#[derive(Clone)]
pub struct RoundEngine {
    oracle: Oracle,
}

impl RoundEngine {
    pub fn new(oracle: Oracle) -> Self {
        Self { oracle }
    }

    pub fn oracle(&self) -> &Oracle {
        &self.oracle
    }

    /// Evaluate one round. Any stage failure aborts; there is no partial table.
    pub async fn evaluate(&self, round: Round) -> RoundResult<Vec<ScoreRow>> {
        let span = info_span!(
            "round.evaluate",
            letter = %round.letter,
            players = round.answers.len(),
            categories = round.categories.len(),
            judge = self.oracle.provider_name(),
        );
        self.evaluate_inner(round).instrument(span).await
    }

    async fn evaluate_inner(&self, round: Round) -> RoundResult<Vec<ScoreRow>> {
        let round = round.validated()?;
        let sanitized = preprocess(&round);
        debug!(
            categories = sanitized.categories.len(),
            "block column removed and vetoes applied"
        );

        let grid = self.oracle.judge(&sanitized).await?;

        let scores = score(&sanitized, &grid);
        let table = assemble(sanitized, scores);
        info!(
            players = table.len(),
            total = table.iter().flat_map(|r| &r.scores).sum::<u32>(),
            "round evaluated"
        );
        Ok(table)
    }
}
