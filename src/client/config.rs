//! Client configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::{Error, ErrorContext, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Connection and retry settings shared by the blocking and async clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Per-request timeout; also bounds WebSocket connection setup.
    pub timeout: Duration,
    /// Retries after the first attempt, so `max_retries + 1` requests at most.
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub cache: CacheConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            cache: CacheConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Load from `MCP_SERVER_URL`, `MCP_API_KEY`, `MCP_HTTP_TIMEOUT_SECS`,
    /// `MCP_MAX_RETRIES` and `MCP_RETRY_DELAY_MS`. Unset variables keep
    /// their defaults; unparsable ones are a configuration error.
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var("MCP_SERVER_URL") {
            Ok(url) => Self::new(url),
            Err(_) => Self::default(),
        };
        if let Ok(key) = env::var("MCP_API_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        if let Some(secs) = parse_env::<u64>("MCP_HTTP_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_env::<u32>("MCP_MAX_RETRIES")? {
            config.max_retries = retries;
        }
        if let Some(ms) = parse_env::<u64>("MCP_RETRY_DELAY_MS")? {
            config.retry_delay = Duration::from_millis(ms);
        }
        Ok(config)
    }
}

fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid value '{}'", raw),
                ErrorContext::new()
                    .with_field_path(name)
                    .with_details(e.to_string())
                    .with_source("ClientConfig::from_env"),
            )
        }),
        Err(_) => Ok(None),
    }
}

/// Per-call cache behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOptions {
    pub use_cache: bool,
    /// Overrides the cache's default TTL for the stored response.
    pub ttl: Option<Duration>,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            ttl: None,
        }
    }
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always go to the server and do not store the response.
    pub fn no_cache() -> Self {
        Self {
            use_cache: false,
            ttl: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(1));
        assert_eq!(config.cache.max_size, 100);
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let config = ClientConfig::new("http://host:1/")
            .with_api_key("k")
            .with_max_retries(0)
            .with_retry_delay(Duration::from_millis(5));
        assert_eq!(config.base_url, "http://host:1");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_parse_env_reports_variable() {
        // Unique name so parallel tests never race on it.
        env::set_var("MCP_TEST_PARSE_ENV_BAD", "soon");
        let err = parse_env::<u64>("MCP_TEST_PARSE_ENV_BAD").unwrap_err();
        assert_eq!(
            err.context().unwrap().field_path.as_deref(),
            Some("MCP_TEST_PARSE_ENV_BAD")
        );
        env::remove_var("MCP_TEST_PARSE_ENV_BAD");

        assert_eq!(parse_env::<u64>("MCP_TEST_PARSE_ENV_UNSET").unwrap(), None);
    }

    #[test]
    fn test_call_options() {
        assert!(CallOptions::default().use_cache);
        let opts = CallOptions::no_cache();
        assert!(!opts.use_cache);
        let opts = CallOptions::new().with_ttl(Duration::from_secs(5));
        assert_eq!(opts.ttl, Some(Duration::from_secs(5)));
    }
}
