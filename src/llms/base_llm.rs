//! Completion client abstraction.
//!
//! The diagnostic service makes exactly one kind of model call: a single user
//! prompt in, a single freeform text completion out, under a fixed response
//! token budget. Providers implement [`CompletionClient`]; the feedback
//! generator only sees the trait, which keeps it testable without a network.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utilities::errors::LlmError;

/// Token counters reported by the provider for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: i64,
    pub output_tokens: i64,
}

impl TokenUsage {
    pub fn total(&self) -> i64 {
        self.input_tokens + self.output_tokens
    }
}

/// Text returned by a successful completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
}

impl Completion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: TokenUsage::default(),
        }
    }
}

/// A text-generation endpoint.
///
/// Implementations must not retry internally; callers treat each call as a
/// single bounded attempt.
#[async_trait]
pub trait CompletionClient: Send + Sync + fmt::Debug {
    /// Provider name, for logs.
    fn provider(&self) -> &str;

    /// Model identifier.
    fn model(&self) -> &str;

    /// Whether a credential is configured. Calls without one fail fast.
    fn has_credentials(&self) -> bool {
        true
    }

    /// Send `prompt` as a single user message and return the text reply.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion, LlmError>;
}
