//! HTTP/WebSocket 服务端 — 通过 axum 暴露注册表
//!
//! Serves a [`ToolRegistry`](crate::registry::ToolRegistry) over HTTP and
//! WebSocket.
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | GET | `/api/functions` | public |
//! | GET | `/api/functions/{name}` | public |
//! | POST | `/api/functions/call` | `X-API-Key` |
//! | POST | `/api/tools/call` | `X-API-Key` |
//! | POST | `/api/execute` | `X-API-Key` |
//! | WS | `/api/functions/stream` | `X-API-Key` |
//! | WS | `/api/tools/stream` | `X-API-Key` |
//!
//! Calls are dispatched on the blocking thread pool.

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod websocket;

pub use config::{ConfigError, ServerConfig};

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::executor::ToolExecutor;
use crate::registry::ToolRegistry;
use crate::transport::routes;

#[derive(Clone)]
pub struct AppState {
    pub executor: ToolExecutor,
    pub api_keys: Arc<HashMap<String, String>>,
}

impl AppState {
    pub fn new(registry: Arc<ToolRegistry>, api_keys: HashMap<String, String>) -> Self {
        Self {
            executor: ToolExecutor::new(registry),
            api_keys: Arc::new(api_keys),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(routes::FUNCTION_CALL, post(handlers::call_function))
        .route(routes::TOOL_CALL, post(handlers::call_tool))
        .route(routes::EXECUTE, post(handlers::execute))
        .route(routes::FUNCTION_STREAM, get(websocket::stream_function))
        .route(routes::TOOL_STREAM, get(websocket::stream_tool))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route(routes::FUNCTIONS, get(handlers::list_functions))
        .route("/api/functions/{name}", get(handlers::get_function))
        .merge(protected)
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
