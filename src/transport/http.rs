use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Proxy;
use std::env;
use std::time::Duration;
use url::Url;

use super::{routes, TransportError};

/// Header carrying the caller's API key (`X-API-Key`).
pub const API_KEY_HEADER: &str = "x-api-key";

/// Default headers sent with every request: JSON content type and, when
/// configured, the API key.
pub fn default_headers(api_key: Option<&str>) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(key) = api_key {
        let value = HeaderValue::from_str(key)
            .map_err(|_| TransportError::Other("API key is not a valid header value".into()))?;
        headers.insert(API_KEY_HEADER, value);
    }
    Ok(headers)
}

fn pool_max_idle_per_host() -> usize {
    env::var("MCP_HTTP_POOL_MAX_IDLE_PER_HOST")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(32)
}

fn pool_idle_timeout() -> Duration {
    Duration::from_secs(
        env::var("MCP_HTTP_POOL_IDLE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(90),
    )
}

fn proxy() -> Option<Proxy> {
    env::var("MCP_PROXY_URL")
        .ok()
        .and_then(|url| Proxy::all(&url).ok())
}

/// Build the async client with a per-request timeout.
pub fn build_async_client(
    timeout: Duration,
    api_key: Option<&str>,
) -> Result<reqwest::Client, TransportError> {
    let mut builder = reqwest::Client::builder()
        .timeout(timeout)
        .default_headers(default_headers(api_key)?)
        .pool_max_idle_per_host(pool_max_idle_per_host())
        .pool_idle_timeout(Some(pool_idle_timeout()));

    if let Some(proxy) = proxy() {
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| TransportError::Other(e.to_string()))
}

/// Build the blocking client with a per-request timeout.
///
/// Must not be created or dropped from inside an async task; the client owns
/// its own runtime.
pub fn build_blocking_client(
    timeout: Duration,
    api_key: Option<&str>,
) -> Result<reqwest::blocking::Client, TransportError> {
    let mut builder = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .default_headers(default_headers(api_key)?)
        .pool_max_idle_per_host(pool_max_idle_per_host())
        .pool_idle_timeout(Some(pool_idle_timeout()));

    if let Some(proxy) = proxy() {
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| TransportError::Other(e.to_string()))
}

/// Join a base URL and a route path without doubling the slash.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// URL of a single function definition. The name is pushed as one
/// percent-encoded path segment, so `/`, `?` and `#` stay part of it.
pub fn function_endpoint(base_url: &str, name: &str) -> Result<String, TransportError> {
    let mut url = Url::parse(&endpoint(base_url, routes::FUNCTIONS))?;
    url.path_segments_mut()
        .map_err(|_| TransportError::InvalidUrl(format!("{} cannot be a base URL", base_url)))?
        .push(name);
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers() {
        let headers = default_headers(Some("test-key")).unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[API_KEY_HEADER], "test-key");

        let headers = default_headers(None).unwrap();
        assert!(headers.get(API_KEY_HEADER).is_none());
    }

    #[test]
    fn test_invalid_api_key_is_rejected() {
        assert!(matches!(
            default_headers(Some("bad\nkey")),
            Err(TransportError::Other(_))
        ));
    }

    #[test]
    fn test_endpoint_join() {
        assert_eq!(endpoint("http://h:8000/", "/api/functions"), "http://h:8000/api/functions");
        assert_eq!(endpoint("http://h:8000", "/api/functions"), "http://h:8000/api/functions");
    }

    #[test]
    fn test_function_endpoint_encodes_name() {
        assert_eq!(
            function_endpoint("http://h:8000/", "calculator").unwrap(),
            "http://h:8000/api/functions/calculator"
        );
        assert_eq!(
            function_endpoint("http://h:8000", "a/b").unwrap(),
            "http://h:8000/api/functions/a%2Fb"
        );
        assert_eq!(
            function_endpoint("http://h:8000", "what?").unwrap(),
            "http://h:8000/api/functions/what%3F"
        );
        assert!(matches!(
            function_endpoint("not a url", "x"),
            Err(TransportError::InvalidUrl(_))
        ));
    }
}
