//! Configuration loading for the assistant core.
//!
//! All knobs come from `ANIKI_*` environment variables with defaults for
//! everything except the two credentials. Validation is fatal at startup:
//! a missing bot token or API key is a [`Configuration`] error before any
//! request is served, never a per-request failure.
//!
//! [`Configuration`]: crate::AnikiError::Configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::{AnikiError, Result};

/// Default primary model when `ANIKI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";

/// Placeholder values that count as "not configured".
const PLACEHOLDER_VALUES: &[&str] = &[
    "your_bot_token_here",
    "your_api_key_here",
];

/// Assistant configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Messaging transport credential. Consumed by the transport layer;
    /// validated here so a misconfigured deployment fails at startup.
    pub bot_token: String,
    /// Model endpoint API key.
    pub api_key: String,
    /// Primary model identifier.
    pub model: String,
    /// Cache entry time-to-live, in hours.
    pub cache_ttl_hours: u64,
    /// Directory holding the cache file.
    pub cache_dir: PathBuf,
    /// Attempts per candidate model (including the initial request).
    pub max_retries: u32,
    /// Base delay for exponential backoff.
    pub retry_base_delay: Duration,
    /// Hard cap on reply length, in bytes.
    pub max_reply_len: usize,
    /// Per-call network timeout for model requests.
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            cache_ttl_hours: 24,
            cache_dir: default_cache_dir(),
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            max_reply_len: 4096,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Default cache directory: `~/.aniki/cache`.
fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".aniki")
        .join("cache")
}

impl Config {
    /// Load configuration from `ANIKI_*` environment variables.
    ///
    /// Unset optional variables fall back to defaults; malformed numeric
    /// values are a configuration error rather than a silent default.
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();
        Ok(Self {
            bot_token: env::var("ANIKI_BOT_TOKEN").unwrap_or_default(),
            api_key: env::var("ANIKI_API_KEY").unwrap_or_default(),
            model: env::var("ANIKI_MODEL").unwrap_or(defaults.model),
            cache_ttl_hours: parse_var("ANIKI_CACHE_TTL_HOURS", defaults.cache_ttl_hours)?,
            cache_dir: env::var("ANIKI_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            max_retries: parse_var("ANIKI_MAX_RETRIES", defaults.max_retries)?,
            retry_base_delay: Duration::from_secs(parse_var(
                "ANIKI_RETRY_DELAY_SECS",
                defaults.retry_base_delay.as_secs(),
            )?),
            max_reply_len: parse_var("ANIKI_MAX_REPLY_LEN", defaults.max_reply_len)?,
            request_timeout: Duration::from_secs(parse_var(
                "ANIKI_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
        })
    }

    /// Check that required credentials are present and not placeholders.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if !credential_set(&self.bot_token) {
            missing.push("ANIKI_BOT_TOKEN");
        }
        if !credential_set(&self.api_key) {
            missing.push("ANIKI_API_KEY");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AnikiError::Configuration(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )))
        }
    }
}

fn credential_set(value: &str) -> bool {
    !value.is_empty() && !PLACEHOLDER_VALUES.contains(&value)
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| {
            AnikiError::Configuration(format!("invalid value for {name}: {raw:?}"))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = Config::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.cache_ttl_hours, 24);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_base_delay, Duration::from_secs(1));
        assert_eq!(config.max_reply_len, 4096);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn validate_rejects_missing_credentials() {
        let config = Config::default();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("ANIKI_BOT_TOKEN"));
        assert!(err.contains("ANIKI_API_KEY"));
    }

    #[test]
    fn validate_rejects_placeholder_credentials() {
        let config = Config {
            bot_token: "your_bot_token_here".into(),
            api_key: "your_api_key_here".into(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepts_real_credentials() {
        let config = Config {
            bot_token: "123456:abcdef".into(),
            api_key: "sk-or-test".into(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
