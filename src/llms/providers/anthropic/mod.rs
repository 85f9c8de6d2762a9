//! Anthropic Messages API provider.
//!
//! Sends one user message per call and concatenates the `text` blocks of the
//! reply. Unlike a general-purpose agent client there is no retry loop, no
//! tool use and no streaming: the feedback path treats any failure as a
//! signal to fall back, so a single bounded attempt is all it needs.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::llms::base_llm::{Completion, CompletionClient, TokenUsage};
use crate::utilities::errors::LlmError;

/// Default model for feedback generation.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Default Anthropic API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Anthropic completion client.
///
/// # Example
///
/// ```ignore
/// let client = AnthropicCompletion::new(DEFAULT_MODEL, std::env::var("ANTHROPIC_API_KEY").ok(), None);
/// let reply = client.complete("Hello", 256).await?;
/// ```
#[derive(Debug, Clone)]
pub struct AnthropicCompletion {
    model: String,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl AnthropicCompletion {
    /// Create a client. An empty or whitespace-only key counts as missing.
    pub fn new(model: impl Into<String>, api_key: Option<String>, base_url: Option<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url,
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the API base URL.
    pub fn api_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    /// Build the request body for the Messages API.
    pub fn build_request_body(&self, prompt: &str, max_tokens: u32) -> Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": max_tokens,
            "messages": [
                {
                    "role": "user",
                    "content": prompt,
                }
            ],
        })
    }

    /// Extract the text completion from a Messages API response.
    ///
    /// All `text` blocks are concatenated. A response with no text block is
    /// malformed.
    pub fn parse_response(response: &Value) -> Result<Completion, LlmError> {
        if response.get("type").and_then(|t| t.as_str()) == Some("error") {
            let message = response
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown Anthropic API error");
            return Err(LlmError::MalformedResponse(format!(
                "Anthropic API error: {}",
                message
            )));
        }

        let content = response
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                LlmError::MalformedResponse("No content array in Anthropic response".to_string())
            })?;

        let texts: Vec<&str> = content
            .iter()
            .filter(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
            .filter_map(|block| block.get("text").and_then(|t| t.as_str()))
            .collect();

        if texts.is_empty() {
            return Err(LlmError::MalformedResponse(
                "No text block in Anthropic response".to_string(),
            ));
        }

        Ok(Completion {
            text: texts.concat(),
            usage: Self::extract_token_usage(response),
        })
    }

    /// Read `usage.input_tokens` / `usage.output_tokens`, defaulting to zero.
    fn extract_token_usage(response: &Value) -> TokenUsage {
        let usage = match response.get("usage") {
            Some(u) => u,
            None => return TokenUsage::default(),
        };
        let read = |key: &str| usage.get(key).and_then(|v| v.as_i64()).unwrap_or(0);
        TokenUsage {
            input_tokens: read("input_tokens"),
            output_tokens: read("output_tokens"),
        }
    }
}

#[async_trait]
impl CompletionClient for AnthropicCompletion {
    fn provider(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::MissingCredential {
                provider: "anthropic".to_string(),
            })?;

        let endpoint = format!("{}/v1/messages", self.api_base_url());
        let body = self.build_request_body(prompt, max_tokens);

        log::debug!(
            "AnthropicCompletion.complete: model={}, prompt_chars={}, max_tokens={}",
            self.model,
            prompt.len(),
            max_tokens
        );

        let response = self
            .client
            .post(&endpoint)
            .timeout(self.timeout)
            .header("content-type", "application/json")
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(500).collect(),
            });
        }

        let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
            LlmError::MalformedResponse(format!(
                "Failed to parse Anthropic response: {} - Body: {}",
                e,
                response_text.chars().take(500).collect::<String>()
            ))
        })?;

        let completion = Self::parse_response(&response_json)?;
        log::debug!(
            "Anthropic token usage: input={}, output={}, total={}",
            completion.usage.input_tokens,
            completion.usage.output_tokens,
            completion.usage.total()
        );
        Ok(completion)
    }
}
