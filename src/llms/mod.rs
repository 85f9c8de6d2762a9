//! Language-model clients.
//!
//! - [`base_llm`] - The [`CompletionClient`] trait shared by all providers
//! - [`providers`] - Concrete provider implementations (Anthropic)

pub mod base_llm;
pub mod providers;

pub use base_llm::{Completion, CompletionClient, TokenUsage};
