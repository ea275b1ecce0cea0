//! 类型系统模块：定义 MCP 调度运行时的核心数据类型。
//!
//! # Types Module
//!
//! Strongly-typed representations of the MCP wire shapes shared by the
//! registry, the executor, the server and the remote client.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`FunctionDefinition`] | Name, description and parameter schema of a function |
//! | [`FunctionCall`] | A (name, parameters) invocation request |
//! | [`FunctionResponse`] | Success/error outcome of a call |
//! | [`ToolCall`] / [`ToolResponse`] | Id-correlated wrappers around calls and responses |
//! | [`StreamingChunk`] | One increment of a streamed result |
//!
//! ## Example
//!
//! ```rust
//! use mcp_runtime::types::{FunctionDefinition, ParameterSchema, PropertySchema};
//!
//! let add = FunctionDefinition::new(
//!     "add",
//!     "Add two numbers",
//!     ParameterSchema::new()
//!         .required_property("a", PropertySchema::number("First operand"))
//!         .required_property("b", PropertySchema::number("Second operand")),
//! );
//! assert_eq!(add.parameters.properties.len(), 2);
//! ```

pub mod function;
pub mod stream;
pub mod tool;

pub use function::{
    FunctionCall, FunctionDefinition, FunctionList, FunctionResponse, ParameterSchema, Parameters,
    PropertyMap, PropertySchema, ResponseStatus,
};
pub use stream::StreamingChunk;
pub use tool::{Tool, ToolCall, ToolCallRequest, ToolResponse};
