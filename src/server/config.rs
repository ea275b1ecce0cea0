use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_API_KEYS: &str = "test-key=test-user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub bind_port: u16,
    /// API key to caller identity.
    pub api_keys: HashMap<String, String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("MCP_BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("MCP_API_KEYS entry '{0}' must look like key=identity")]
    InvalidApiKey(String),
    #[error("MCP_API_KEYS must contain at least one key")]
    NoApiKeys,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl ServerConfig {
    /// Load from `MCP_BIND_ADDR`, `MCP_BIND_PORT` and `MCP_API_KEYS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("MCP_BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_port = lookup("MCP_BIND_PORT")
            .map(|value| value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8000);
        let api_keys = parse_api_keys(
            &lookup("MCP_API_KEYS").unwrap_or_else(|| DEFAULT_API_KEYS.to_string()),
        )?;

        let config = Self {
            bind_addr,
            bind_port,
            api_keys,
        };
        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

/// Parse `key=identity` pairs separated by commas.
pub fn parse_api_keys(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut keys = HashMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (key, identity) = entry
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .ok_or_else(|| ConfigError::InvalidApiKey(entry.to_string()))?;
        keys.insert(key.to_string(), identity.to_string());
    }
    if keys.is_empty() {
        return Err(ConfigError::NoApiKeys);
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn parse_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).expect("config should parse");
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.bind_port, 8000);
        assert_eq!(config.api_keys.get("test-key").map(String::as_str), Some("test-user"));
    }

    #[test]
    fn parse_api_key_list() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("MCP_API_KEYS", "k1=alice, k2=bob,"),
            ("MCP_BIND_PORT", "9001"),
        ]))
        .expect("config should parse");
        assert_eq!(config.api_keys.len(), 2);
        assert_eq!(config.api_keys["k2"], "bob");
        assert_eq!(config.bind_port, 9001);
    }

    #[test]
    fn invalid_values_fail() {
        let err = ServerConfig::from_lookup(lookup(&[("MCP_BIND_PORT", "http")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort);

        let err = ServerConfig::from_lookup(lookup(&[("MCP_API_KEYS", "nokey")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidApiKey("nokey".into()));

        let err = ServerConfig::from_lookup(lookup(&[("MCP_API_KEYS", " , ")])).unwrap_err();
        assert_eq!(err, ConfigError::NoApiKeys);

        let err = ServerConfig::from_lookup(lookup(&[("MCP_BIND_ADDR", "not an addr")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidSocket);
    }
}
