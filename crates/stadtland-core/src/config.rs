//! Judge configuration.
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `STADTLAND_JUDGE_PROVIDER` | `gemini` (default), `openai` or `fake` |
//! | `STADTLAND_JUDGE_MODEL` | Provider model id |
//! | `STADTLAND_JUDGE_URL` | Provider base URL override |
//! | `STADTLAND_JUDGE_TIMEOUT_MS` | Per-attempt timeout (default: 20000) |
//! | `STADTLAND_JUDGE_RETRY_DELAY_MS` | Pause before the retry (default: 1000) |
//! | `GEMINI_API_KEY` / `OPENAI_API_KEY` | Provider key |

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RoundError, RoundResult};
use crate::oracle::{
    gemini, openai, AttemptPolicy, FakeJudge, GeminiJudge, JudgeBackend, OpenAiJudge, Oracle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeProvider {
    #[default]
    Gemini,
    OpenAi,
    Fake,
}

impl JudgeProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Fake => "fake",
        }
    }

    /// Environment variable holding this provider's key.
    pub fn api_key_var(&self) -> Option<&'static str> {
        match self {
            Self::Gemini => Some("GEMINI_API_KEY"),
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Fake => None,
        }
    }
}

impl fmt::Display for JudgeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JudgeProvider {
    type Err = RoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            "fake" => Ok(Self::Fake),
            other => Err(RoundError::config(format!(
                "unknown judge provider '{}' (expected gemini, openai or fake)",
                other
            ))),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeConfig {
    #[serde(default)]
    pub provider: JudgeProvider,

    /// Model id; provider default when unset.
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL override (proxies, tests).
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            provider: JudgeProvider::default(),
            model: None,
            api_key: None,
            base_url: None,
            timeout_ms: default_timeout_ms(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

// The key never shows up in logs.
impl fmt::Debug for JudgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JudgeConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}

impl JudgeConfig {
    /// Create config from environment variables (see module docs).
    pub fn from_env() -> RoundResult<Self> {
        let provider = match std::env::var("STADTLAND_JUDGE_PROVIDER") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => JudgeProvider::default(),
        };
        let mut config = Self {
            provider,
            model: non_empty_var("STADTLAND_JUDGE_MODEL"),
            api_key: None,
            base_url: non_empty_var("STADTLAND_JUDGE_URL"),
            timeout_ms: parse_var("STADTLAND_JUDGE_TIMEOUT_MS").unwrap_or_else(default_timeout_ms),
            retry_delay_ms: parse_var("STADTLAND_JUDGE_RETRY_DELAY_MS")
                .unwrap_or_else(default_retry_delay_ms),
        };
        config.api_key = provider.api_key_var().and_then(non_empty_var);
        Ok(config)
    }

    /// Load config from a YAML file. Keys missing from the file fall back to
    /// the provider key in the environment.
    pub fn from_yaml_file(path: &Path) -> RoundResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            RoundError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut config: Self = serde_yaml::from_str(&text).map_err(|e| {
            RoundError::config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        if config.api_key.is_none() {
            config.api_key = config.provider.api_key_var().and_then(non_empty_var);
        }
        Ok(config)
    }

    pub fn with_provider(mut self, provider: JudgeProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn attempt_policy(&self) -> AttemptPolicy {
        AttemptPolicy {
            timeout: Duration::from_millis(self.timeout_ms),
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    /// Construct the configured provider. A missing key is a config error.
    pub fn build_backend(&self) -> RoundResult<Arc<dyn JudgeBackend>> {
        if self.timeout_ms == 0 {
            return Err(RoundError::config("judge timeout must be greater than zero"));
        }
        let backend: Arc<dyn JudgeBackend> = match self.provider {
            JudgeProvider::Fake => Arc::new(FakeJudge),
            JudgeProvider::Gemini => Arc::new(GeminiJudge::with_base_url(
                self.model.as_deref().unwrap_or(gemini::DEFAULT_MODEL),
                self.require_key()?,
                self.base_url.as_deref().unwrap_or(gemini::DEFAULT_BASE_URL),
            )?),
            JudgeProvider::OpenAi => Arc::new(OpenAiJudge::with_base_url(
                self.model.as_deref().unwrap_or(openai::DEFAULT_MODEL),
                self.require_key()?,
                self.base_url.as_deref().unwrap_or(openai::DEFAULT_BASE_URL),
            )?),
        };
        Ok(backend)
    }

    pub fn build_oracle(&self) -> RoundResult<Oracle> {
        Ok(Oracle::new(self.build_backend()?, self.attempt_policy()))
    }

    fn require_key(&self) -> RoundResult<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                RoundError::config(format!(
                    "{} judge requires an API key (set {})",
                    self.provider,
                    self.provider.api_key_var().unwrap_or("api_key")
                ))
            })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
