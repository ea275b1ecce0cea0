//! 响应缓存模块：按（函数名, 规范化参数）缓存调用结果，带 TTL 与 LRU 淘汰。
//!
//! # Call Response Cache
//!
//! Bounded in-memory cache used by the remote clients to avoid repeating
//! identical calls.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ToolCache`] | TTL + LRU cache of `FunctionResponse`s |
//! | [`CacheConfig`] | Capacity, default TTL, on/off switch |
//! | [`CacheStats`] | Hit/miss/set/eviction/expiration counters |
//! | [`CacheKey`] | SHA-256 of the function name and canonical parameters |
//!
//! ## Example
//!
//! ```rust
//! use mcp_runtime::cache::{CacheConfig, ToolCache};
//! use mcp_runtime::types::{FunctionResponse, Parameters};
//! use serde_json::json;
//! use std::time::Duration;
//!
//! let cache = ToolCache::new(CacheConfig::new().with_max_size(10).with_ttl(Duration::from_secs(60)));
//! let params: Parameters = json!({"a": 2, "b": 3}).as_object().cloned().unwrap();
//!
//! cache.set("add", &params, FunctionResponse::success(json!(5)), None);
//! assert!(cache.get("add", &params).is_some());
//! ```

mod key;
mod manager;

pub use key::{canonical_json, CacheKey};
pub use manager::{CacheConfig, CacheStats, ToolCache};
