//! LLM provider implementations.
//!
//! Each provider implements [`CompletionClient`](crate::llms::base_llm::CompletionClient)
//! and handles authentication, request formatting and response parsing for
//! its API.
//!
//! | Provider | Module |
//! |----------|--------|
//! | Anthropic | [`anthropic`] |

pub mod anthropic;
