//! WebSocket connection setup for streaming calls.

use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use super::http::API_KEY_HEADER;
use super::TransportError;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Derive the WebSocket URL of `path` on an HTTP base URL.
///
/// `http` maps to `ws` and `https` to `wss`; `ws`/`wss` bases are kept.
pub fn websocket_url(base_url: &str, path: &str) -> Result<Url, TransportError> {
    let mut url = Url::parse(&super::http::endpoint(base_url, path))?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(TransportError::InvalidUrl(format!(
                "unsupported scheme '{}' in {}",
                other, base_url
            )))
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| TransportError::InvalidUrl(base_url.to_string()))?;
    Ok(url)
}

/// Open a WebSocket, sending the API key header, within `timeout`.
pub async fn connect(
    url: &Url,
    api_key: Option<&str>,
    timeout: Duration,
) -> Result<WsStream, TransportError> {
    let mut request = url.as_str().into_client_request()?;
    if let Some(key) = api_key {
        let value = HeaderValue::from_str(key)
            .map_err(|_| TransportError::Other("API key is not a valid header value".into()))?;
        request.headers_mut().insert(API_KEY_HEADER, value);
    }

    match tokio::time::timeout(timeout, tokio_tungstenite::connect_async(request)).await {
        Ok(Ok((stream, _response))) => Ok(stream),
        Ok(Err(e)) => Err(TransportError::WebSocket(e)),
        Err(_) => Err(TransportError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_url_schemes() {
        assert_eq!(
            websocket_url("http://localhost:8000", "/api/functions/stream").unwrap().as_str(),
            "ws://localhost:8000/api/functions/stream"
        );
        assert_eq!(
            websocket_url("https://mcp.example.com/", "/api/tools/stream").unwrap().as_str(),
            "wss://mcp.example.com/api/tools/stream"
        );
        assert_eq!(
            websocket_url("ws://127.0.0.1:9", "/x").unwrap().as_str(),
            "ws://127.0.0.1:9/x"
        );
    }

    #[test]
    fn test_websocket_url_rejects_other_schemes() {
        assert!(matches!(
            websocket_url("ftp://host", "/x"),
            Err(TransportError::InvalidUrl(_))
        ));
        assert!(matches!(
            websocket_url("not a url", "/x"),
            Err(TransportError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_refused_is_retryable() {
        // Bind then drop to get a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = websocket_url(&format!("http://127.0.0.1:{}", port), "/ws").unwrap();
        let err = connect(&url, Some("k"), Duration::from_secs(2)).await.unwrap_err();
        assert!(err.is_retryable(), "{err}");
    }
}
