//! mcp-server — 以 HTTP/WebSocket 方式提供内置工具
//!
//! Environment:
//!   MCP_BIND_ADDR   listen address (default 127.0.0.1)
//!   MCP_BIND_PORT   listen port (default 8000)
//!   MCP_API_KEYS    comma-separated key=identity pairs
//!   RUST_LOG        log filter (default info)

use std::sync::Arc;

use anyhow::Context;
use mcp_runtime::registry::ToolRegistry;
use mcp_runtime::server::{self, logging, AppState, ServerConfig};
use mcp_runtime::tools;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    let addr = config.bind_socket()?;

    let registry = Arc::new(ToolRegistry::new());
    tools::register_all(&registry).context("failed to register built-in tools")?;

    let app = server::router(AppState::new(registry.clone(), config.api_keys));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(
        %addr,
        functions = registry.len(),
        "MCP server listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
