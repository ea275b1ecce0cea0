//! 执行器 — 在注册表之上编排单次、批量、工具包装与文本提取执行
//!
//! Executor: orchestration over a [`ToolRegistry`].
//!
//! | Operation | Input | Output |
//! |-----------|-------|--------|
//! | [`ToolExecutor::execute_function`] | `FunctionCall` or raw JSON | `FunctionResponse` |
//! | [`ToolExecutor::execute_tool_call`] | `ToolCall` | `ToolResponse` (same id) |
//! | [`ToolExecutor::execute_from_text`] | free text | `Option<FunctionResponse>` |
//! | [`ToolExecutor::execute_batch`] | calls | responses, in order |
//! | [`ToolExecutor::execute_tool_batch`] | tool calls | tool responses, in order |
//!
//! Batches run sequentially and never abort early: a failing call produces
//! an error response at its position and the remaining calls still run.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::registry::ToolRegistry;
use crate::types::{FunctionCall, FunctionResponse, Parameters, ToolCall, ToolResponse};
use crate::validation::extract_function_call_from_text;

/// Anything that can be turned into a [`FunctionCall`].
///
/// Raw JSON values are parsed as `{name, parameters}`; a value that does not
/// have that shape yields the parse error message.
pub trait IntoFunctionCall {
    fn into_function_call(self) -> Result<FunctionCall, String>;
}

impl IntoFunctionCall for FunctionCall {
    fn into_function_call(self) -> Result<FunctionCall, String> {
        Ok(self)
    }
}

impl IntoFunctionCall for &FunctionCall {
    fn into_function_call(self) -> Result<FunctionCall, String> {
        Ok(self.clone())
    }
}

impl IntoFunctionCall for Value {
    fn into_function_call(self) -> Result<FunctionCall, String> {
        serde_json::from_value(self).map_err(|e| e.to_string())
    }
}

/// Executes calls against a shared registry.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Execute a single call.
    pub fn execute_function(&self, call: impl IntoFunctionCall) -> FunctionResponse {
        match call.into_function_call() {
            Ok(call) => self.registry.execute(&call),
            Err(e) => FunctionResponse::error(format!("Invalid function call: {}", e)),
        }
    }

    /// Execute a tool call; the response carries the call's id.
    pub fn execute_tool_call(&self, call: &ToolCall) -> ToolResponse {
        ToolResponse {
            id: call.id.clone(),
            function: self.registry.execute(&call.function),
        }
    }

    /// Extract a call from free text and execute it.
    ///
    /// Returns `None` when the text contains nothing call-shaped.
    pub fn execute_from_text(&self, text: &str) -> Option<FunctionResponse> {
        let extracted = extract_function_call_from_text(text)?;
        debug!("Extracted function call from text");
        Some(self.execute_function(extracted))
    }

    pub fn execute_batch<I>(&self, calls: I) -> Vec<FunctionResponse>
    where
        I: IntoIterator,
        I::Item: IntoFunctionCall,
    {
        calls
            .into_iter()
            .map(|call| self.execute_function(call))
            .collect()
    }

    pub fn execute_tool_batch<'a, I>(&self, calls: I) -> Vec<ToolResponse>
    where
        I: IntoIterator<Item = &'a ToolCall>,
    {
        calls
            .into_iter()
            .map(|call| self.execute_tool_call(call))
            .collect()
    }

    /// Build a tool call, generating a UUID v4 id when `id` is `None`.
    pub fn create_tool_call(
        name: impl Into<String>,
        parameters: Parameters,
        id: Option<String>,
    ) -> ToolCall {
        ToolCall::new(id, FunctionCall::new(name, parameters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FunctionDefinition, ParameterSchema, PropertySchema};
    use serde_json::json;

    fn executor() -> ToolExecutor {
        let registry = ToolRegistry::new();
        registry
            .register(
                FunctionDefinition::new(
                    "add",
                    "Add two numbers",
                    ParameterSchema::new()
                        .required_property("a", PropertySchema::number("First operand"))
                        .required_property("b", PropertySchema::number("Second operand")),
                ),
                |p: &Parameters| -> Result<Value, String> {
                    Ok(json!(p["a"].as_f64().unwrap_or(0.0) + p["b"].as_f64().unwrap_or(0.0)))
                },
            )
            .unwrap();
        ToolExecutor::new(Arc::new(registry))
    }

    #[test]
    fn test_execute_raw_json() {
        let exec = executor();
        let response = exec.execute_function(json!({"name": "add", "parameters": {"a": 1, "b": 2}}));
        assert_eq!(response.result, json!(3.0));

        let response = exec.execute_function(json!({"parameters": {}}));
        assert!(response.error.unwrap().starts_with("Invalid function call: "));
    }

    #[test]
    fn test_tool_call_keeps_id() {
        let exec = executor();
        let params = json!({"a": 1, "b": 1}).as_object().cloned().unwrap();
        let call = ToolExecutor::create_tool_call("add", params, Some("call-7".into()));
        let response = exec.execute_tool_call(&call);
        assert_eq!(response.id, "call-7");
        assert!(response.function.is_success());
    }

    #[test]
    fn test_create_tool_call_generates_id() {
        let call = ToolExecutor::create_tool_call("add", Parameters::new(), None);
        assert_eq!(call.id.len(), 36);
        assert_eq!(call.function.name, "add");
    }

    #[test]
    fn test_batch_isolation() {
        let exec = executor();
        let responses = exec.execute_batch(vec![
            FunctionCall::from_json("add", json!({"a": 1, "b": 2})),
            FunctionCall::from_json("missing", json!({})),
            FunctionCall::from_json("add", json!({"a": 1})),
            FunctionCall::from_json("add", json!({"a": 5, "b": 5})),
        ]);
        assert_eq!(responses.len(), 4);
        assert_eq!(responses[0].result, json!(3.0));
        assert_eq!(responses[1].error.as_deref(), Some("Function 'missing' not found"));
        assert!(responses[2].is_error());
        assert_eq!(responses[3].result, json!(10.0));
    }

    #[test]
    fn test_tool_batch_preserves_order_and_ids() {
        let exec = executor();
        let calls = vec![
            ToolExecutor::create_tool_call("add", Parameters::new(), Some("x".into())),
            ToolExecutor::create_tool_call(
                "add",
                json!({"a": 2, "b": 2}).as_object().cloned().unwrap(),
                Some("y".into()),
            ),
        ];
        let responses = exec.execute_tool_batch(&calls);
        assert_eq!(responses[0].id, "x");
        assert!(responses[0].function.is_error());
        assert_eq!(responses[1].id, "y");
        assert_eq!(responses[1].function.result, json!(4.0));
    }

    #[test]
    fn test_execute_from_text() {
        let exec = executor();
        let text = "Sure:\n```json\n{\"name\": \"add\", \"parameters\": {\"a\": 2, \"b\": 3}}\n```";
        assert_eq!(exec.execute_from_text(text).unwrap().result, json!(5.0));

        assert!(exec.execute_from_text("nothing to run here").is_none());

        let malformed = "{\"name\": \"add\", \"parameters\": [1, 2]}";
        let response = exec.execute_from_text(malformed).unwrap();
        assert!(response.error.unwrap().starts_with("Invalid function call: "));
    }
}
