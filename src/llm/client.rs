use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::error::TravelError;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const MAX_RETRIES: usize = 3;

/// Abstract capability the orchestration engine depends on: a single
/// chat-completion call. The concrete provider (OpenAI, OpenRouter, a local
/// model server, a test double) is a detail the rest of the crate never
/// sees.
#[async_trait]
pub trait LlmService: Send + Sync {
    async fn chat(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<String, TravelError>;
}

/// HTTP-backed [`LlmService`] speaking the OpenAI-compatible chat-completions
/// wire format (OpenRouter by default), with retry/backoff on rate limits
/// and transient server errors.
#[derive(Clone, Debug)]
pub struct OpenAiChatService {
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiChatService {
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn chat_url(&self) -> String {
        let trimmed = self.base_url.trim_end_matches('/');
        if trimmed.ends_with("/chat/completions") {
            trimmed.to_string()
        } else {
            format!("{}/chat/completions", trimmed)
        }
    }
}

#[async_trait]
impl LlmService for OpenAiChatService {
    async fn chat(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<String, TravelError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TravelError::ProviderFailure {
                provider: "llm",
                message: format!("failed to build HTTP client: {err}"),
            })?;

        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt},
            ],
            "temperature": temperature,
            "max_tokens": max_tokens,
        });

        let mut attempt = 0;
        let mut backoff = Duration::from_millis(250);

        loop {
            let response = client
                .post(self.chat_url())
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await
                .map_err(|err| TravelError::ProviderFailure {
                    provider: "llm",
                    message: format!("request failed: {err}"),
                })?;

            let status = response.status();
            let headers = response.headers().clone();
            let text = response.text().await.map_err(|err| TravelError::ProviderFailure {
                provider: "llm",
                message: format!("failed to read response: {err}"),
            })?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = headers
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(backoff);

                if attempt < MAX_RETRIES {
                    tokio::time::sleep(retry_after).await;
                    attempt += 1;
                    backoff *= 2;
                    continue;
                }
                return Err(TravelError::ProviderFailure {
                    provider: "llm",
                    message: "rate limited".to_string(),
                });
            }

            if status.is_server_error() && attempt < MAX_RETRIES {
                tokio::time::sleep(backoff).await;
                attempt += 1;
                backoff *= 2;
                continue;
            }

            let parsed: Value = serde_json::from_str(&text).map_err(|err| TravelError::ProviderFailure {
                provider: "llm",
                message: format!("invalid JSON response: {err}"),
            })?;

            if !status.is_success() {
                let message = parsed
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(&text)
                    .to_string();
                return Err(TravelError::ProviderFailure {
                    provider: "llm",
                    message: format!("HTTP {status}: {message}"),
                });
            }

            let content = parsed
                .get("choices")
                .and_then(|c| c.as_array())
                .and_then(|arr| arr.first())
                .and_then(|choice| choice.get("message"))
                .and_then(|m| m.get("content"))
                .and_then(|c| c.as_str())
                .ok_or_else(|| TravelError::ProviderFailure {
                    provider: "llm",
                    message: "response missing message content".to_string(),
                })?;

            return Ok(content.to_string());
        }
    }
}
