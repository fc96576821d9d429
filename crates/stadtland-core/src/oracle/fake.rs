use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{JudgeBackend, JudgeRequest};
use crate::error::JudgeCallError;
use crate::types::normalize;

/// Offline judge for development and tests: an answer is valid when it is
/// non-empty and starts with the round letter. Category membership is not checked.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeJudge;

#[async_trait]
impl JudgeBackend for FakeJudge {
    async fn complete(&self, request: JudgeRequest<'_>) -> Result<String, JudgeCallError> {
        let round = request.round;
        let letter = normalize(&round.letter);

        let mut players = Map::new();
        for row in &round.rows {
            let cells = round
                .categories
                .iter()
                .zip(&row.answers)
                .map(|(category, answer)| {
                    let answer = normalize(answer);
                    let valid = !answer.is_empty() && answer.starts_with(&letter);
                    (category.clone(), Value::Bool(valid))
                })
                .collect();
            players.insert(row.player.clone(), Value::Object(cells));
        }
        Ok(Value::Object(players).to_string())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
