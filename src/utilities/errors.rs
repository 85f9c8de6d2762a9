//! Error types for the diagnostic service.
//!
//! Each failure domain gets its own enum. The feedback path never surfaces
//! `LlmError` to callers; it is logged and replaced by placeholder feedback.

use thiserror::Error;

/// Errors raised while loading or validating the statement catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// YAML parsing failed.
    #[error("Catalog YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Catalog file could not be read.
    #[error("Catalog IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Two statements share an id.
    #[error("Duplicate statement id: {0}")]
    DuplicateId(u32),

    /// A statement is internally inconsistent.
    #[error("Invalid statement {id}: {message}")]
    InvalidStatement { id: u32, message: String },

    /// The catalog has no statements at all.
    #[error("Catalog contains no statements")]
    Empty,
}

/// Errors from the submission store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing document failed.
    #[error("Submission store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document is not a valid submission list.
    #[error("Submission store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from a completion provider call.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API credential configured.
    #[error("API key not set for provider '{provider}'")]
    MissingCredential { provider: String },

    /// Transport-level failure, including timeouts.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// No reply within the call budget.
    #[error("No reply within {millis} ms")]
    Timeout { millis: u128 },

    /// The response body could not be interpreted.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Errors from reading environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}
