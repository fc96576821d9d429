use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::json;
use tracing::debug;

use super::{JudgeBackend, JudgeRequest, USER_AGENT_VALUE};
use crate::error::{JudgeCallError, RoundError, RoundResult};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Google Gemini `generateContent` judge with JSON response mode.
pub struct GeminiJudge {
    pub model: String,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiJudge {
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

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl JudgeBackend for GeminiJudge {
    async fn complete(&self, request: JudgeRequest<'_>) -> Result<String, JudgeCallError> {
        let url = self.endpoint();
        debug!(url = %url, model = %self.model, "gemini generateContent");

        let body = json!({
            "contents": [{ "parts": [{ "text": request.instruction }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
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
                    message: format!("gemini body is not JSON: {}", e),
                }
            } else {
                JudgeCallError::from(e)
            }
        })?;

        envelope
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| JudgeCallError::Envelope {
                message: "gemini response missing candidates[0].content.parts[0].text".into(),
            })
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
