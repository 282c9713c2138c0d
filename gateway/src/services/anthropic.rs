//! Anthropic messages API client

use std::time::Duration;

use async_trait::async_trait;

use crate::traits::TextGenerator;
use crate::types::Completion;
use shared::{TokenUsage, UpstreamFailure};

pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-opus-20240229";

// Fixed model parameters: bounded output length, fixed sampling
// temperature.
const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.7;

// An interactive caller is waiting on every item; a hung upstream call is
// bounded and reported as an ordinary per-item failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Real upstream client for the Anthropic messages API.
pub struct AnthropicClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl AnthropicClient {
    pub fn new() -> Self {
        Self::with_base_url(ANTHROPIC_API_URL)
    }

    /// Point the client at a different host, used by tests to target a
    /// local mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to construct HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Default for AnthropicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn complete(
        &self,
        api_key: &str,
        system_instructions: &str,
        user_message: &str,
    ) -> Result<Completion, UpstreamFailure> {
        let request_body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
            "system": system_instructions,
            "messages": [
                {
                    "role": "user",
                    "content": user_message
                }
            ]
        });

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("Content-Type", "application/json")
            .header("anthropic-version", "2023-06-01")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamFailure::Timeout
                } else {
                    UpstreamFailure::NetworkError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return match response.status().as_u16() {
                401 => Err(UpstreamFailure::AuthenticationFailed),
                429 => Err(UpstreamFailure::RateLimitExceeded),
                503 => Err(UpstreamFailure::ServiceUnavailable),
                _ => Err(UpstreamFailure::ServerError(response.status().to_string())),
            };
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| UpstreamFailure::InvalidResponse(format!("failed to parse response: {e}")))?;

        let text = response_json
            .get("content")
            .and_then(|content| content.get(0))
            .and_then(|item| item.get("text"))
            .and_then(|text| text.as_str())
            .ok_or_else(|| UpstreamFailure::InvalidResponse("no content in response".to_string()))?;

        let usage = response_json.get("usage");
        let input_tokens = usage
            .and_then(|u| u.get("input_tokens"))
            .and_then(|t| t.as_u64())
            .unwrap_or(0) as u32;
        let output_tokens = usage
            .and_then(|u| u.get("output_tokens"))
            .and_then(|t| t.as_u64())
            .unwrap_or(0) as u32;

        let model = response_json
            .get("model")
            .and_then(|m| m.as_str())
            .unwrap_or(&self.model)
            .to_string();

        Ok(Completion {
            text: text.to_string(),
            usage: TokenUsage {
                input_tokens,
                output_tokens,
            },
            model,
        })
    }
}
