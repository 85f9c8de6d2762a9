//! Best-effort feedback generation.
//!
//! [`FeedbackGenerator::generate`] always returns feedback. When no client is
//! configured, or the call fails for any reason, the user gets placeholder
//! feedback; the [`FeedbackSource`] on the outcome and a `warn!` log line are
//! the only places the difference shows.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::StatementCatalog;
use crate::llms::CompletionClient;
use crate::scoring::DimensionScores;
use crate::types::{Answer, Feedback, UserInfo};
use crate::utilities::errors::LlmError;

use super::parser::{missing_sections, parse_feedback};
use super::prompt::build_feedback_prompt;

/// Response token budget for a feedback call.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Upper bound on a single feedback call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a piece of feedback came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackSource {
    /// Parsed from a model reply.
    Generated,
    /// Placeholder substituted after a missing credential or failed call.
    Fallback,
}

/// Feedback plus the operator-facing source flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackOutcome {
    pub feedback: Feedback,
    pub source: FeedbackSource,
}

impl FeedbackOutcome {
    pub fn is_fallback(&self) -> bool {
        self.source == FeedbackSource::Fallback
    }
}

/// Builds prompts, calls the model and parses replies.
#[derive(Debug, Clone)]
pub struct FeedbackGenerator {
    client: Option<Arc<dyn CompletionClient>>,
    max_tokens: u32,
    call_timeout: Duration,
}

impl FeedbackGenerator {
    pub fn new(client: Option<Arc<dyn CompletionClient>>) -> Self {
        Self {
            client,
            max_tokens: DEFAULT_MAX_TOKENS,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// A generator that always returns placeholder feedback.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Whether a credentialed client is configured.
    pub fn is_enabled(&self) -> bool {
        self.client.as_ref().is_some_and(|c| c.has_credentials())
    }

    /// Generate feedback for a finished session. Never fails.
    pub async fn generate(
        &self,
        user_info: &UserInfo,
        answers: &[Answer],
        scores: &DimensionScores,
        catalog: &StatementCatalog,
    ) -> FeedbackOutcome {
        match self.request(user_info, answers, scores, catalog).await {
            Ok(text) => {
                let missing = missing_sections(&text);
                if !missing.is_empty() {
                    tracing::debug!(?missing, "Feedback reply missing sections, using defaults");
                }
                tracing::info!(user = %user_info.display_name(), "Generated feedback");
                FeedbackOutcome {
                    feedback: parse_feedback(&text),
                    source: FeedbackSource::Generated,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Feedback generation failed, using placeholder");
                FeedbackOutcome {
                    feedback: Feedback::placeholder(user_info),
                    source: FeedbackSource::Fallback,
                }
            }
        }
    }

    async fn request(
        &self,
        user_info: &UserInfo,
        answers: &[Answer],
        scores: &DimensionScores,
        catalog: &StatementCatalog,
    ) -> Result<String, LlmError> {
        let client = match &self.client {
            Some(c) if c.has_credentials() => c,
            Some(c) => {
                return Err(LlmError::MissingCredential {
                    provider: c.provider().to_string(),
                })
            }
            None => {
                return Err(LlmError::MissingCredential {
                    provider: "none".to_string(),
                })
            }
        };

        let prompt = build_feedback_prompt(user_info, answers, scores, catalog);
        tracing::debug!(
            provider = client.provider(),
            model = client.model(),
            prompt_chars = prompt.len(),
            "Requesting feedback"
        );

        let completion = tokio::time::timeout(self.call_timeout, client.complete(&prompt, self.max_tokens))
            .await
            .map_err(|_| LlmError::Timeout {
                millis: self.call_timeout.as_millis(),
            })??;

        Ok(completion.text)
    }
}
