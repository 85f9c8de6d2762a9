//! Service configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PORT` | `8080` |
//! | `BIND_HOST` | `0.0.0.0` |
//! | `DIAGNOSTIC_DATA_FILE` | `data/submissions.json` |
//! | `DIAGNOSTIC_CATALOG` | embedded catalog |
//! | `ANTHROPIC_API_KEY` | unset (placeholder feedback only) |
//! | `ANTHROPIC_BASE_URL` | `https://api.anthropic.com` |
//! | `DIAGNOSTIC_MODEL` | `claude-3-5-sonnet-20241022` |
//! | `DIAGNOSTIC_MAX_TOKENS` | `1024` |
//! | `DIAGNOSTIC_LLM_TIMEOUT_SECS` | `30` |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::feedback::generator::{DEFAULT_CALL_TIMEOUT, DEFAULT_MAX_TOKENS};
use crate::llms::providers::anthropic::DEFAULT_MODEL;
use crate::store::DEFAULT_DATA_FILE;
use crate::utilities::errors::ConfigError;

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
    pub catalog_path: Option<PathBuf>,
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub llm_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            catalog_path: None,
            api_key: None,
            api_base_url: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            llm_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            host: get("BIND_HOST").unwrap_or(defaults.host),
            port: parse_or(get("PORT"), "PORT", defaults.port)?,
            data_file: get("DIAGNOSTIC_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            catalog_path: get("DIAGNOSTIC_CATALOG").map(PathBuf::from),
            api_key: get("ANTHROPIC_API_KEY"),
            api_base_url: get("ANTHROPIC_BASE_URL"),
            model: get("DIAGNOSTIC_MODEL").unwrap_or(defaults.model),
            max_tokens: parse_or(get("DIAGNOSTIC_MAX_TOKENS"), "DIAGNOSTIC_MAX_TOKENS", defaults.max_tokens)?,
            llm_timeout: Duration::from_secs(parse_or(
                get("DIAGNOSTIC_LLM_TIMEOUT_SECS"),
                "DIAGNOSTIC_LLM_TIMEOUT_SECS",
                defaults.llm_timeout.as_secs(),
            )?),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
    }
}
