pub mod client;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::error::TravelError;
use crate::schemas::{validation::validate_structured_payload, CompletionSchema};
pub use client::LlmService;

const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_MAX_TOKENS: u32 = 400;

/// Thin wrapper around an [`LlmService`] (C4). All estimator agents call
/// through this rather than the raw service: it owns the inflight semaphore
/// (`MAX_LLM_INFLIGHT`) and the fault-tolerant JSON extraction policy.
///
/// Callers must treat `extract_json` returning `None` as "use the
/// deterministic fallback" — this layer never retries on its own; retry
/// policy belongs to the caller.
pub struct LlmAdvisor {
    service: Arc<dyn LlmService>,
    inflight: Arc<Semaphore>,
    call_timeout: Duration,
}

impl LlmAdvisor {
    pub fn new(service: Arc<dyn LlmService>, max_inflight: usize, call_timeout: Duration) -> Self {
        Self {
            service,
            inflight: Arc::new(Semaphore::new(max_inflight.max(1))),
            call_timeout,
        }
    }

    /// `LLMService.generate(prompt, system, temperature, max_tokens) -> text`
    pub async fn generate(
        &self,
        system: &str,
        prompt: &str,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> Result<String, TravelError> {
        let _permit = self.inflight.acquire().await.map_err(|_| TravelError::ProviderFailure {
            provider: "llm",
            message: "inflight semaphore closed".to_string(),
        })?;

        tokio::time::timeout(
            self.call_timeout,
            self.service.chat(
                system,
                prompt,
                temperature.unwrap_or(DEFAULT_TEMPERATURE),
                max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
                self.call_timeout,
            ),
        )
        .await
        .map_err(|_| TravelError::Timeout(self.call_timeout))?
    }

    /// Ask the LLM to answer as JSON and parse it, tolerating fenced code
    /// blocks, leading prose and trailing commas. Returns `None` rather than
    /// an error on any irrecoverable parse failure — callers fall back.
    pub async fn generate_json(
        &self,
        system: &str,
        prompt: &str,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> Option<serde_json::Value> {
        let text = match self.generate(system, prompt, temperature, max_tokens).await {
            Ok(text) => text,
            Err(err) => {
                warn!(target: "travelcraft::llm", error = %err, "generate failed");
                return None;
            }
        };
        extract_json(&text)
    }

    /// Like [`generate_json`](Self::generate_json) but additionally
    /// validates and deserializes into `T`, whose JSON schema is produced by
    /// `#[completion_schema]`. Returns `None` on parse or validation failure.
    pub async fn generate_structured<T: CompletionSchema>(
        &self,
        system: &str,
        prompt: &str,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> Option<T> {
        let value = self.generate_json(system, prompt, temperature, max_tokens).await?;

        if let Err(err) = validate_structured_payload(T::schema(), &value) {
            debug!(target: "travelcraft::llm", error = %err, "structured response failed validation");
            return None;
        }

        serde_json::from_value(value)
            .map_err(|err| {
                debug!(target: "travelcraft::llm", error = %err, "structured response failed to deserialize");
            })
            .ok()
    }
}

/// Extract a JSON value from LLM free text: strips ```json fences, skips
/// leading prose up to the first `{` or `[`, and drops trailing commas
/// before a closing brace/bracket. Returns `None` if nothing parses.
pub fn extract_json(text: &str) -> Option<serde_json::Value> {
    let candidate = strip_code_fence(text.trim());

    let start = candidate.find(['{', '['])?;
    let slice = &candidate[start..];
    let end = matching_close(slice)?;
    let trimmed = &slice[..=end];

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    let repaired = drop_trailing_commas(trimmed);
    serde_json::from_str(&repaired).ok()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest).trim_start();
    match rest.rfind("```") {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// Find the index (within `slice`) of the brace/bracket that closes the one
/// at position 0, honoring string literals and escapes.
fn matching_close(slice: &str) -> Option<usize> {
    let bytes = slice.as_bytes();
    let open = bytes[0] as char;
    let close = if open == '{' { '}' } else { ']' };

    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in slice.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }

    None
}

fn drop_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch == ',' {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if matches!(chars.get(j), Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(ch);
    }

    out
}
