//! Error types for round evaluation.

use std::time::Duration;

/// Round evaluation errors. Every variant aborts the whole pipeline; no
/// partial score table is ever produced.
#[derive(Debug, thiserror::Error)]
pub enum RoundError {
    /// Required round fields missing or malformed. Raised before any judge call.
    #[error("invalid round: {message}")]
    Validation { message: String },

    /// Judge unreachable, timed out or answered non-2xx on every attempt.
    #[error("judge unavailable after {attempts} attempt(s): {message}")]
    ExternalService { attempts: u32, message: String },

    /// Judge replied, but the payload is not a verdict grid.
    #[error("judge reply has unexpected format: {message}")]
    ResponseFormat { message: String },

    /// Judge provider cannot be constructed (unknown provider, missing key).
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl RoundError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn response_format(message: impl Into<String>) -> Self {
        Self::ResponseFormat {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => 1,
            Self::Config { .. } => 2,
            Self::ExternalService { .. } => 3,
            Self::ResponseFormat { .. } => 4,
        }
    }

    /// Whether the caller may retry the same round later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalService { .. })
    }
}

/// Result type for round operations.
pub type RoundResult<T> = Result<T, RoundError>;

/// Failure of a single judge attempt.
#[derive(Debug, thiserror::Error)]
pub enum JudgeCallError {
    #[error("judge call timed out after {}ms", after.as_millis())]
    Timeout { after: Duration },

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Provider answered 2xx but its envelope lacks the verdict text.
    #[error("provider envelope: {message}")]
    Envelope { message: String },
}

impl JudgeCallError {
    /// Timeout, transport and non-2xx failures get the one retry.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Envelope { .. })
    }
}

impl From<reqwest::Error> for JudgeCallError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }
}
