//! 校验模块：函数定义校验、调用参数的 JSON Schema 校验以及文本中调用的提取。
//!
//! # Validation Module
//!
//! - [`validate_function_definition`]: structural checks run at registration time
//! - [`validate_function_call`]: JSON Schema validation of a call's parameters
//! - [`validate_function_response`]: shape check for responses received from elsewhere
//! - [`extract_function_call_from_text`]: best-effort call extraction from free text
//!
//! # Examples
//!
//! ```
//! use mcp_runtime::types::{FunctionCall, FunctionDefinition, ParameterSchema, PropertySchema};
//! use mcp_runtime::validation::validate_function_call;
//! use serde_json::json;
//!
//! let def = FunctionDefinition::new(
//!     "add",
//!     "Add two numbers",
//!     ParameterSchema::new()
//!         .required_property("a", PropertySchema::number("First operand"))
//!         .property("b", PropertySchema::number("Second operand")),
//! );
//!
//! let ok = FunctionCall::from_json("add", json!({"a": 2}));
//! assert!(validate_function_call(&ok, &def).is_ok());
//!
//! let missing = FunctionCall::from_json("add", json!({}));
//! assert!(validate_function_call(&missing, &def).is_err());
//! ```

pub mod error;
pub mod extract;
pub mod schema;
pub mod validator;

pub use error::ValidationError;
pub use extract::extract_function_call_from_text;
pub use schema::{
    function_definition_to_json_schema, parameter_schema_for, parameter_schema_to_json_schema,
    property_schema_to_json_schema,
};
pub use validator::{validate_function_call, validate_function_definition, validate_function_response};
