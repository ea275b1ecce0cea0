use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::config::{CallOptions, ClientConfig};
use super::policy::{Decision, RetryPolicy};
use super::stream::{self, StreamRequest};
use super::{check_status, decode, function_call_body, text_body, tool_call_body, Reply};
use crate::cache::{CacheStats, ToolCache};
use crate::transport::{http, routes, websocket, TransportError};
use crate::types::{
    tool::generate_call_id, FunctionDefinition, FunctionList, FunctionResponse, Parameters,
    StreamingChunk, ToolResponse,
};
use crate::{BoxStream, Result};

/// Async client for a remote runtime.
///
/// Cheap to share behind an `Arc`; concurrent calls share one connection pool
/// and one cache.
pub struct AsyncMcpClient {
    config: ClientConfig,
    http: reqwest::Client,
    cache: Arc<ToolCache>,
    policy: RetryPolicy,
}

impl AsyncMcpClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let cache = Arc::new(ToolCache::new(config.cache.clone()));
        Self::with_cache(config, cache)
    }

    /// Build a client that shares `cache` with other clients.
    pub fn with_cache(config: ClientConfig, cache: Arc<ToolCache>) -> Result<Self> {
        let http = http::build_async_client(config.timeout, config.api_key.as_deref())?;
        let policy = RetryPolicy::new(config.max_retries, config.retry_delay);
        Ok(Self {
            config,
            http,
            cache,
            policy,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ToolCache> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub async fn list_functions(&self) -> Result<Vec<FunctionDefinition>> {
        let reply = self.request(Method::GET, &self.endpoint(routes::FUNCTIONS), None, &[]).await?;
        let list: FunctionList = decode(&reply.body)?;
        Ok(list.functions)
    }

    /// Fetch one definition; `None` when the server answers 404.
    pub async fn get_function(&self, name: &str) -> Result<Option<FunctionDefinition>> {
        let url = http::function_endpoint(&self.config.base_url, name)?;
        let reply = self.request(Method::GET, &url, None, &[404]).await?;
        if reply.status == 404 {
            return Ok(None);
        }
        decode(&reply.body).map(Some)
    }

    pub async fn call_function(
        &self,
        name: &str,
        parameters: &Parameters,
        options: CallOptions,
    ) -> Result<FunctionResponse> {
        if options.use_cache {
            if let Some(cached) = self.cache.get(name, parameters) {
                return Ok(cached);
            }
        }

        let body = function_call_body(name, parameters)?;
        let reply = self
            .request(Method::POST, &self.endpoint(routes::FUNCTION_CALL), Some(&body), &[])
            .await?;
        let response: FunctionResponse = decode(&reply.body)?;

        if options.use_cache && response.is_success() {
            self.cache.set(name, parameters, response.clone(), options.ttl);
        }
        Ok(response)
    }

    /// Call a function as a tool. A cached response is re-stamped with the
    /// requested id (or a fresh one).
    pub async fn call_tool(
        &self,
        name: &str,
        parameters: &Parameters,
        call_id: Option<&str>,
        options: CallOptions,
    ) -> Result<ToolResponse> {
        if options.use_cache {
            if let Some(cached) = self.cache.get(name, parameters) {
                return Ok(ToolResponse {
                    id: call_id.map(str::to_string).unwrap_or_else(generate_call_id),
                    function: cached,
                });
            }
        }

        let body = tool_call_body(name, parameters, call_id)?;
        let reply = self
            .request(Method::POST, &self.endpoint(routes::TOOL_CALL), Some(&body), &[])
            .await?;
        let response: ToolResponse = decode(&reply.body)?;

        if options.use_cache && response.function.is_success() {
            self.cache
                .set(name, parameters, response.function.clone(), options.ttl);
        }
        Ok(response)
    }

    /// Let the server extract and run a call from free text; `None` when the
    /// server finds no call in it.
    pub async fn execute_from_text(&self, text: &str) -> Result<Option<FunctionResponse>> {
        let body = text_body(text)?;
        let reply = self
            .request(Method::POST, &self.endpoint(routes::EXECUTE), Some(&body), &[400])
            .await?;
        if reply.status == 400 {
            return Ok(None);
        }
        decode(&reply.body).map(Some)
    }

    /// Stream a function call over WebSocket.
    ///
    /// The stream ends after the chunk with `is_final = true`. Connection
    /// setup is retried like any request; failures after that are yielded
    /// as the last item.
    pub async fn stream_function(
        &self,
        name: &str,
        parameters: &Parameters,
    ) -> Result<BoxStream<'static, StreamingChunk>> {
        let payload = function_call_body(name, parameters)?;
        self.open_stream(routes::FUNCTION_STREAM, payload).await
    }

    /// Stream a tool call over WebSocket; chunks carry the tool call id.
    pub async fn stream_tool(
        &self,
        name: &str,
        parameters: &Parameters,
        call_id: Option<&str>,
    ) -> Result<BoxStream<'static, StreamingChunk>> {
        let payload = tool_call_body(name, parameters, call_id)?;
        self.open_stream(routes::TOOL_STREAM, payload).await
    }

    pub fn invalidate_cache_entry(&self, name: &str, parameters: &Parameters) -> bool {
        self.cache.invalidate(name, parameters)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Release the connection pool.
    pub fn close(self) {}

    async fn open_stream(
        &self,
        path: &str,
        payload: Value,
    ) -> Result<BoxStream<'static, StreamingChunk>> {
        let url = websocket::websocket_url(&self.config.base_url, path)?;
        stream::open(StreamRequest {
            url,
            api_key: self.config.api_key.as_deref(),
            timeout: self.config.timeout,
            policy: self.policy,
            payload,
        })
        .await
    }

    fn endpoint(&self, path: &str) -> String {
        http::endpoint(&self.config.base_url, path)
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        accept: &[u16],
    ) -> Result<Reply> {
        let mut attempt = 0u32;
        loop {
            match self.send_once(method.clone(), url, body, accept).await {
                Ok(reply) => return Ok(reply),
                Err(e) => match self.policy.decide(attempt, &e) {
                    Decision::Retry { delay } => {
                        attempt += 1;
                        warn!(
                            %url,
                            attempt,
                            max_retries = self.policy.max_retries,
                            error = %e,
                            "Request failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    Decision::Fail => {
                        error!(%url, attempts = attempt + 1, error = %e, "Request failed");
                        return Err(e);
                    }
                },
            }
        }
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        accept: &[u16],
    ) -> Result<Reply> {
        debug!(%method, %url, "Sending request");
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(TransportError::from)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(TransportError::from)?;
        check_status(status, text, accept)
    }
}

impl std::fmt::Debug for AsyncMcpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncMcpClient")
            .field("base_url", &self.config.base_url)
            .field("max_retries", &self.config.max_retries)
            .finish()
    }
}
