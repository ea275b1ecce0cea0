//! 传输层 — HTTP 客户端构建与 WebSocket 连接
//!
//! Transport: construction of the HTTP clients used by the remote clients
//! and the WebSocket connector used by streaming calls. Every failure at this
//! layer is a [`TransportError`]; whether it is retried is decided by
//! [`TransportError::is_retryable`].

pub mod http;
pub mod websocket;

use std::time::Duration;

/// Route paths shared by the server and the remote clients.
pub mod routes {
    pub const FUNCTIONS: &str = "/api/functions";
    pub const FUNCTION_CALL: &str = "/api/functions/call";
    pub const TOOL_CALL: &str = "/api/tools/call";
    pub const EXECUTE: &str = "/api/execute";
    pub const FUNCTION_STREAM: &str = "/api/functions/stream";
    pub const TOOL_STREAM: &str = "/api/tools/stream";
}

/// Connection, timeout, status, or socket failure.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Connect errors, timeouts, non-2xx statuses and socket failures are
    /// retryable. Malformed URLs and local setup errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Http(e) => !e.is_builder(),
            TransportError::Status { .. }
            | TransportError::WebSocket(_)
            | TransportError::Timeout(_) => true,
            TransportError::InvalidUrl(_) | TransportError::Other(_) => false,
        }
    }

    /// HTTP status code, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<url::ParseError> for TransportError {
    fn from(e: url::ParseError) -> Self {
        TransportError::InvalidUrl(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_classification() {
        assert!(TransportError::Status { status: 500, body: String::new() }.is_retryable());
        assert!(TransportError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!TransportError::InvalidUrl("nope".into()).is_retryable());
        assert!(!TransportError::Other("bad header".into()).is_retryable());
    }

    #[test]
    fn test_status_accessor() {
        let err = TransportError::Status { status: 404, body: "missing".into() };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "HTTP status 404: missing");
        assert_eq!(TransportError::Other("x".into()).status(), None);
    }
}
