//! Boundary to the external semantic judge.
//!
//! Responsibility split:
//! - mod.rs: attempt policy (timeout, single retry) and error classification
//! - prompt.rs: arbitration instruction
//! - parse.rs: reply text → verdict grid
//! - gemini.rs / openai.rs / fake.rs: providers

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{JudgeCallError, RoundError, RoundResult};
use crate::types::SanitizedRound;
use crate::verdict::VerdictGrid;

pub mod fake;
pub mod gemini;
pub mod openai;
mod parse;
pub mod prompt;

pub use fake::FakeJudge;
pub use gemini::GeminiJudge;
pub use openai::OpenAiJudge;
pub use parse::parse_verdict_grid;

pub(crate) const USER_AGENT_VALUE: &str = concat!("stadtland/", env!("CARGO_PKG_VERSION"));

/// What a provider receives: the instruction text plus the structured round.
#[derive(Debug, Clone, Copy)]
pub struct JudgeRequest<'a> {
    pub instruction: &'a str,
    pub round: &'a SanitizedRound,
}

/// A semantic judge. Returns the verdict text with any provider envelope removed.
#[async_trait]
pub trait JudgeBackend: Send + Sync {
    async fn complete(&self, request: JudgeRequest<'_>) -> Result<String, JudgeCallError>;

    fn provider_name(&self) -> &'static str;
}

/// Timeout per attempt and pause before the single retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptPolicy {
    pub timeout: Duration,
    pub retry_delay: Duration,
}

impl Default for AttemptPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Judge adapter: one call, at most one retry, typed failures.
#[derive(Clone)]
pub struct Oracle {
    backend: Arc<dyn JudgeBackend>,
    policy: AttemptPolicy,
}

impl Oracle {
    pub fn new(backend: Arc<dyn JudgeBackend>, policy: AttemptPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn provider_name(&self) -> &'static str {
        self.backend.provider_name()
    }

    pub fn policy(&self) -> AttemptPolicy {
        self.policy
    }

    /// Ask the judge about every cell of the sanitized round.
    pub async fn judge(&self, round: &SanitizedRound) -> RoundResult<VerdictGrid> {
        let instruction = prompt::build_instruction(round);
        let request = JudgeRequest {
            instruction: &instruction,
            round,
        };
        let text = self.call_with_retry(request).await?;
        parse_verdict_grid(&text)
    }

    /// First attempt; on a retryable failure wait `retry_delay` and try once more.
    async fn call_with_retry(&self, request: JudgeRequest<'_>) -> RoundResult<String> {
        let first = match self.attempt(request).await {
            Ok(text) => return Ok(text),
            Err(e) if !e.is_retryable() => return Err(classify(e, 1)),
            Err(e) => e,
        };

        warn!(
            provider = self.provider_name(),
            error = %first,
            retry_delay_ms = self.policy.retry_delay.as_millis() as u64,
            "judge call failed, retrying once"
        );
        if !self.policy.retry_delay.is_zero() {
            tokio::time::sleep(self.policy.retry_delay).await;
        }

        self.attempt(request).await.map_err(|second| {
            if second.is_retryable() {
                RoundError::ExternalService {
                    attempts: 2,
                    message: format!("first: {}; retry: {}", first, second),
                }
            } else {
                classify(second, 2)
            }
        })
    }

    /// One bounded call. Dropping the returned future cancels the request and its timer.
    async fn attempt(&self, request: JudgeRequest<'_>) -> Result<String, JudgeCallError> {
        debug!(provider = self.provider_name(), "calling judge");
        tokio::time::timeout(self.policy.timeout, self.backend.complete(request))
            .await
            .map_err(|_| JudgeCallError::Timeout {
                after: self.policy.timeout,
            })?
    }
}

fn classify(err: JudgeCallError, attempts: u32) -> RoundError {
    match err {
        JudgeCallError::Envelope { message } => RoundError::ResponseFormat { message },
        other => RoundError::ExternalService {
            attempts,
            message: other.to_string(),
        },
    }
}
