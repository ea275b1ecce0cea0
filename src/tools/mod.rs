//! 内置工具：计算器、文本处理与远程代理。
//!
//! # Built-in Tools
//!
//! | Tool | Description |
//! |------|-------------|
//! | [`calculator`] | Basic arithmetic (`add` … `log`) |
//! | [`text`] | Word/char counts, case changes, reversal |
//! | [`proxy`] | Forwards a call to a remote runtime |
//!
//! ```rust
//! use mcp_runtime::registry::ToolRegistry;
//! use mcp_runtime::types::FunctionCall;
//! use serde_json::json;
//!
//! let registry = ToolRegistry::new();
//! mcp_runtime::tools::register_all(&registry).unwrap();
//!
//! let call = FunctionCall::from_json("calculator", json!({"operation": "multiply", "a": 6, "b": 7}));
//! assert_eq!(registry.execute(&call).result, json!(42.0));
//! ```

pub mod calculator;
pub mod proxy;
pub mod text;

use crate::registry::ToolRegistry;
use crate::Result;

/// Register every built-in tool.
pub fn register_all(registry: &ToolRegistry) -> Result<()> {
    calculator::register(registry)?;
    text::register(registry)?;
    proxy::register(registry)?;
    Ok(())
}
