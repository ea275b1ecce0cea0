//! Tool wrappers that correlate calls and responses by id.

use serde::{Deserialize, Serialize};

use super::function::{FunctionCall, FunctionDefinition, FunctionResponse, Parameters};

/// A tool exposed to a model; wraps one function definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub function: FunctionDefinition,
}

/// A tool call request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub function: FunctionCall,
}

impl ToolCall {
    /// Create a tool call, generating a UUID v4 id when none is supplied.
    pub fn new(id: Option<String>, function: FunctionCall) -> Self {
        Self {
            id: id.unwrap_or_else(generate_call_id),
            function,
        }
    }
}

/// Wire form of a tool call where the id may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub function: FunctionCall,
}

impl ToolCallRequest {
    pub fn new(id: Option<String>, name: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            id,
            function: FunctionCall::new(name, parameters),
        }
    }

    pub fn into_tool_call(self) -> ToolCall {
        ToolCall::new(self.id, self.function)
    }
}

/// Response from a tool call; `id` matches the originating [`ToolCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub id: String,
    pub function: FunctionResponse,
}

pub(crate) fn generate_call_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
