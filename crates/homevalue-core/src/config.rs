//! Runtime configuration for the valuation path.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `HOMEVALUE_MODEL_URL` (or `ML_API_URL`) | `http://localhost:8000` | model base URL |
//! | `HOMEVALUE_CONNECT_TIMEOUT_MS` | `5000` | connection establishment bound |
//! | `HOMEVALUE_RESPONSE_TIMEOUT_MS` | `30000` | end-to-end response bound |
//! | `HOMEVALUE_MAX_RETRIES` | `3` | retries after the first attempt |
//! | `HOMEVALUE_RETRY_BASE_MS` | `1000` | first backoff delay, doubled per retry |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::{RetryConfig, ValidationError};

pub const DEFAULT_MODEL_URL: &str = "http://localhost:8000";

const MODEL_URL: &str = "HOMEVALUE_MODEL_URL";
const LEGACY_MODEL_URL: &str = "ML_API_URL";
const CONNECT_TIMEOUT_MS: &str = "HOMEVALUE_CONNECT_TIMEOUT_MS";
const RESPONSE_TIMEOUT_MS: &str = "HOMEVALUE_RESPONSE_TIMEOUT_MS";
const MAX_RETRIES: &str = "HOMEVALUE_MAX_RETRIES";
const RETRY_BASE_MS: &str = "HOMEVALUE_RETRY_BASE_MS";

/// Settings shared by the gateway and the retrying client.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub model_base_url: String,
    pub connect_timeout: Duration,
    pub response_timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_base_url: String::from(DEFAULT_MODEL_URL),
            connect_timeout: Duration::from_secs(5),
            response_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Unset variables
    /// keep their defaults, set but unparseable ones are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(MODEL_URL).or_else(|| lookup(LEGACY_MODEL_URL)) {
            config = config.with_model_url(url)?;
        }
        if let Some(ms) = parse::<u64, _>(&lookup, CONNECT_TIMEOUT_MS)? {
            config.connect_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse::<u64, _>(&lookup, RESPONSE_TIMEOUT_MS)? {
            config.response_timeout = Duration::from_millis(ms);
        }

        let max_retries = parse::<u32, _>(&lookup, MAX_RETRIES)?.unwrap_or(config.retry.max_retries);
        let base = parse::<u64, _>(&lookup, RETRY_BASE_MS)?
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_secs(1));
        config.retry = RetryConfig::exponential(base, max_retries);

        Ok(config)
    }

    /// Sets the model base URL, dropping any trailing slash.
    pub fn with_model_url(mut self, url: impl Into<String>) -> Result<Self, ValidationError> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ValidationError::InvalidConfig {
                key: String::from(MODEL_URL),
                value: url,
            });
        }
        self.model_base_url = trimmed.to_owned();
        Ok(self)
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ValidationError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ValidationError::InvalidConfig {
                key: key.to_owned(),
                value: raw,
            }),
    }
}
