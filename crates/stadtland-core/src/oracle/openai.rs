use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::json;
use tracing::debug;

use super::{JudgeBackend, JudgeRequest, USER_AGENT_VALUE};
use crate::error::{JudgeCallError, RoundError, RoundResult};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI chat completions judge in JSON object mode.
pub struct OpenAiJudge {
    pub model: String,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiJudge {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> RoundResult<Self> {
        Self::with_base_url(model, api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> RoundResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|e| RoundError::config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl JudgeBackend for OpenAiJudge {
    async fn complete(&self, request: JudgeRequest<'_>) -> Result<String, JudgeCallError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, model = %self.model, "openai chat completion");

        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": request.instruction }],
            "temperature": 0.0,
            "response_format": { "type": "json_object" }
        });

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(JudgeCallError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: serde_json::Value = resp.json().await.map_err(|e| {
            if e.is_decode() {
                JudgeCallError::Envelope {
                    message: format!("openai body is not JSON: {}", e),
                }
            } else {
                JudgeCallError::from(e)
            }
        })?;

        envelope
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| JudgeCallError::Envelope {
                message: "openai response missing choices[0].message.content".into(),
            })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
