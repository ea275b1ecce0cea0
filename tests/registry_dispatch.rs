//! End-to-end dispatch through the registry and executor.

use std::sync::Arc;

use mcp_runtime::executor::ToolExecutor;
use mcp_runtime::registry::{HandlerError, ToolRegistry};
use mcp_runtime::types::{
    FunctionCall, FunctionDefinition, ParameterSchema, Parameters, PropertySchema, ResponseStatus,
};
use mcp_runtime::Error;
use serde_json::{json, Value};

fn add_definition() -> FunctionDefinition {
    FunctionDefinition::new(
        "add",
        "Add two numbers",
        ParameterSchema::new()
            .required_property("a", PropertySchema::number("First operand"))
            .required_property("b", PropertySchema::number("Second operand")),
    )
}

fn add(params: &Parameters) -> Result<Value, HandlerError> {
    let a = params["a"].as_f64().unwrap_or_default();
    let b = params["b"].as_f64().unwrap_or_default();
    Ok(json!(a + b))
}

fn executor() -> ToolExecutor {
    let registry = Arc::new(ToolRegistry::new());
    registry.register(add_definition(), add).unwrap();
    registry
        .register(
            FunctionDefinition::new(
                "fail",
                "Always fails",
                ParameterSchema::new().property("reason", PropertySchema::string("Why")),
            ),
            |_: &Parameters| -> Result<Value, String> { Err("boom".to_string()) },
        )
        .unwrap();
    ToolExecutor::new(registry)
}

#[test]
fn add_succeeds() {
    let response = executor().execute_function(FunctionCall::from_json("add", json!({"a": 2, "b": 3})));
    assert_eq!(response.status, ResponseStatus::Success);
    assert_eq!(response.result, json!(5.0));
    assert!(response.error.is_none());
}

#[test]
fn missing_parameter_is_named() {
    let response = executor().execute_function(FunctionCall::from_json("add", json!({"a": 2})));
    assert_eq!(response.status, ResponseStatus::Error);
    assert!(response.error.unwrap().contains("\"b\""));
}

#[test]
fn wrong_type_is_rejected() {
    let response =
        executor().execute_function(FunctionCall::from_json("add", json!({"a": "x", "b": 1})));
    assert!(response.is_error());
}

#[test]
fn unknown_function() {
    let response = executor().execute_function(FunctionCall::from_json("missing", json!({})));
    assert_eq!(response.error.as_deref(), Some("Function 'missing' not found"));
}

#[test]
fn duplicate_registration_keeps_first() {
    let registry = ToolRegistry::new();
    registry.register(add_definition(), add).unwrap();

    let mut replacement = add_definition();
    replacement.description = "Something else".to_string();
    let err = registry.register(replacement, add).unwrap_err();
    assert!(matches!(err, Error::NameConflict(ref name) if name == "add"));
    assert_eq!(
        registry.get_function_definition("add").unwrap().description,
        "Add two numbers"
    );
}

#[test]
fn malformed_definition_is_refused() {
    let registry = ToolRegistry::new();
    let bad = FunctionDefinition::new(
        "",
        "No name",
        ParameterSchema::new().property("a", PropertySchema::number("A")),
    );
    assert!(matches!(registry.register(bad, add), Err(Error::Definition { .. })));
    assert!(registry.is_empty());
}

#[test]
fn batch_results_are_isolated() {
    let calls = vec![
        FunctionCall::from_json("add", json!({"a": 1, "b": 1})),
        FunctionCall::from_json("fail", json!({})),
        FunctionCall::from_json("missing", json!({})),
        FunctionCall::from_json("add", json!({"a": 2, "b": 2})),
    ];
    let responses = executor().execute_batch(calls);

    assert_eq!(responses.len(), 4);
    assert_eq!(responses[0].result, json!(2.0));
    assert_eq!(responses[1].error.as_deref(), Some("boom"));
    assert!(responses[2].is_error());
    assert_eq!(responses[3].result, json!(4.0));
}

#[test]
fn tool_call_keeps_its_id() {
    let executor = executor();
    let params = json!({"a": 1, "b": 2}).as_object().cloned().unwrap();
    let call = ToolExecutor::create_tool_call("add", params, Some("call-7".into()));
    let response = executor.execute_tool_call(&call);
    assert_eq!(response.id, "call-7");
    assert_eq!(response.function.result, json!(3.0));
}

#[test]
fn call_found_in_text_is_executed() {
    let text = "Sure, here you go:\n```json\n{\"name\": \"add\", \"parameters\": {\"a\": 4, \"b\": 5}}\n```";
    let response = executor().execute_from_text(text).unwrap();
    assert_eq!(response.result, json!(9.0));

    assert!(executor().execute_from_text("nothing to run here").is_none());
}

#[test]
fn built_in_tools_dispatch() {
    let registry = Arc::new(ToolRegistry::new());
    mcp_runtime::tools::register_all(&registry).unwrap();
    let executor = ToolExecutor::new(registry);

    let response = executor.execute_function(FunctionCall::from_json(
        "text_processor",
        json!({"operation": "to_upper", "text": "mcp"}),
    ));
    assert_eq!(response.result, json!("MCP"));

    let response = executor.execute_function(FunctionCall::from_json(
        "calculator",
        json!({"operation": "divide", "a": 1, "b": 0}),
    ));
    assert_eq!(response.error.as_deref(), Some("Division by zero is not allowed"));
}
