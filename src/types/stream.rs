//! Streaming chunks exchanged over the WebSocket endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::function::ResponseStatus;
use super::tool::generate_call_id;

/// One increment of a streamed call result.
///
/// Exactly one chunk per stream carries `is_final = true`, and it is the last one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingChunk {
    pub chunk_id: String,
    pub call_id: String,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status: ResponseStatus,
}

impl StreamingChunk {
    /// A non-final content chunk.
    pub fn partial(call_id: impl Into<String>, content: Value) -> Self {
        Self {
            chunk_id: generate_call_id(),
            call_id: call_id.into(),
            content,
            is_final: false,
            error: None,
            status: ResponseStatus::Success,
        }
    }

    /// The terminating success chunk.
    pub fn final_success(call_id: impl Into<String>, content: Value) -> Self {
        Self {
            is_final: true,
            ..Self::partial(call_id, content)
        }
    }

    /// The terminating error chunk.
    pub fn final_error(call_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            chunk_id: generate_call_id(),
            call_id: call_id.into(),
            content: Value::Null,
            is_final: true,
            error: Some(error.into()),
            status: ResponseStatus::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == ResponseStatus::Error
    }
}
