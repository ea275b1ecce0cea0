//! # mcp-runtime
//!
//! MCP 调度运行时：工具注册表、基于 JSON Schema 的调用校验、执行器、响应缓存，
//! 以及访问远程运行时的 HTTP/WebSocket 客户端。
//!
//! Dispatch runtime for the Model Context Protocol: a registry of callable
//! functions ("tools"), schema validation of calls, an executor, a response
//! cache, and clients that call functions on a remote runtime.
//!
//! ## Overview
//!
//! A function is described by a [`FunctionDefinition`](types::FunctionDefinition)
//! and bound to a [`ToolHandler`](registry::ToolHandler) in a
//! [`ToolRegistry`](registry::ToolRegistry). Every call is validated against
//! the declared parameter schema before the handler runs, and every outcome
//! (unknown function, invalid parameters, handler failure) comes back as a
//! [`FunctionResponse`](types::FunctionResponse). `Result` errors are kept for
//! registration mistakes and infrastructure failures.
//!
//! ## Quick Start
//!
//! ```rust
//! use mcp_runtime::executor::ToolExecutor;
//! use mcp_runtime::registry::ToolRegistry;
//! use mcp_runtime::types::{FunctionCall, FunctionDefinition, ParameterSchema, Parameters, PropertySchema};
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ToolRegistry::new());
//! registry.register(
//!     FunctionDefinition::new(
//!         "add",
//!         "Add two numbers",
//!         ParameterSchema::new()
//!             .required_property("a", PropertySchema::number("First operand"))
//!             .required_property("b", PropertySchema::number("Second operand")),
//!     ),
//!     |p: &Parameters| -> Result<Value, String> {
//!         Ok(json!(p["a"].as_f64().unwrap_or(0.0) + p["b"].as_f64().unwrap_or(0.0)))
//!     },
//! )?;
//!
//! let executor = ToolExecutor::new(registry);
//! let response = executor.execute_function(FunctionCall::from_json("add", json!({"a": 2, "b": 3})));
//! assert_eq!(response.result, json!(5.0));
//! # Ok::<(), mcp_runtime::Error>(())
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Definitions, calls, responses, tool wrappers, streaming chunks |
//! | [`validation`] | Definition checks, JSON Schema call validation, text extraction |
//! | [`registry`] | Name → (definition, handler) mapping and dispatch |
//! | [`executor`] | Single, batched, tool-wrapped and from-text execution |
//! | [`cache`] | TTL + LRU cache of call responses |
//! | [`client`] | Blocking and async remote clients with retry and streaming |
//! | [`transport`] | HTTP client construction, WebSocket connect, routes |
//! | [`tools`] | Built-in calculator, text processor and proxy |
//! | `server` | axum HTTP/WebSocket server (feature `server`) |

pub mod cache;
pub mod client;
pub mod executor;
pub mod registry;
pub mod tools;
pub mod transport;
pub mod types;
pub mod validation;

#[cfg(feature = "server")]
pub mod server;

pub use cache::{CacheConfig, ToolCache};
pub use client::{AsyncMcpClient, CallOptions, ClientConfig, McpClient};
pub use executor::ToolExecutor;
pub use registry::{HandlerError, ToolHandler, ToolRegistry};
pub use types::{
    FunctionCall, FunctionDefinition, FunctionResponse, ParameterSchema, Parameters,
    PropertySchema, StreamingChunk, ToolCall, ToolResponse,
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A pinned, boxed stream of `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
