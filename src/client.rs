//! Remote clients for a runtime served over HTTP/WebSocket.
//!
//! [`McpClient`] is blocking and [`AsyncMcpClient`] runs on tokio; both list,
//! fetch and call functions and tools with fixed-delay retries and an optional
//! response cache. Only the async client streams.
//! Implementation details are split into submodules under `src/client/`.

mod async_client;
mod blocking;
pub mod config;
mod policy;
mod stream;

pub use async_client::AsyncMcpClient;
pub use blocking::McpClient;
pub use config::{CallOptions, ClientConfig};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::transport::TransportError;
use crate::types::{FunctionCall, Parameters, ToolCallRequest};
use crate::Result;

/// Body of a successful (or explicitly accepted) HTTP exchange.
#[derive(Debug)]
pub(crate) struct Reply {
    pub status: u16,
    pub body: String,
}

/// Turn a status and body into a [`Reply`], or a retryable status error.
///
/// Statuses listed in `accept` are returned as-is so the caller can map them
/// (for example 404 to "not found") without going through the retry loop.
pub(crate) fn check_status(status: u16, body: String, accept: &[u16]) -> Result<Reply> {
    if (200..300).contains(&status) || accept.contains(&status) {
        Ok(Reply { status, body })
    } else {
        Err(TransportError::Status { status, body }.into())
    }
}

/// Decode a JSON body. Decode failures are not retried.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

#[derive(Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

pub(crate) fn function_call_body(name: &str, parameters: &Parameters) -> Result<Value> {
    Ok(serde_json::to_value(FunctionCall::new(name, parameters.clone()))?)
}

pub(crate) fn tool_call_body(
    name: &str,
    parameters: &Parameters,
    call_id: Option<&str>,
) -> Result<Value> {
    let request = ToolCallRequest::new(call_id.map(str::to_string), name, parameters.clone());
    Ok(serde_json::to_value(request)?)
}

pub(crate) fn text_body(text: &str) -> Result<Value> {
    Ok(serde_json::to_value(TextRequest { text })?)
}
