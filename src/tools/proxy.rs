//! Forward a call to a function on a remote runtime.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{error, info};

use crate::cache::CacheConfig;
use crate::client::{CallOptions, ClientConfig, McpClient};
use crate::registry::{HandlerError, HandlerResult, ToolHandler, ToolRegistry};
use crate::types::{FunctionDefinition, ParameterSchema, Parameters, PropertySchema};
use crate::Result;

pub const NAME: &str = "proxy";

const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

#[derive(Debug, Deserialize)]
struct ProxyArgs {
    server_url: String,
    function_name: String,
    parameters: Parameters,
    api_key: Option<String>,
    timeout: Option<f64>,
}

pub fn definition() -> FunctionDefinition {
    FunctionDefinition::new(
        NAME,
        "Call a function on a remote MCP server",
        ParameterSchema::new()
            .required_property("server_url", PropertySchema::string("URL of the remote MCP server"))
            .required_property(
                "function_name",
                PropertySchema::string("Name of the function to call on the remote server"),
            )
            .required_property(
                "parameters",
                PropertySchema::object("Parameters to pass to the remote function"),
            )
            .property("api_key", PropertySchema::string("Optional API key for authentication"))
            .property(
                "timeout",
                PropertySchema::number("Request timeout in seconds").with_default(DEFAULT_TIMEOUT_SECS),
            ),
    )
}

/// Handler that forwards calls with the blocking client.
///
/// Each server's function listing is fetched once and kept, so repeated
/// calls to a known function cost a single request.
#[derive(Debug, Default)]
pub struct ProxyTool {
    listings: Mutex<HashMap<String, HashMap<String, FunctionDefinition>>>,
}

impl ProxyTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Functions known on `server_url`, sorted by name.
    pub fn known_functions(&self, server_url: &str) -> Vec<String> {
        let listings = self.listings.lock().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = listings
            .get(server_url)
            .map(|fns| fns.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    fn forward(&self, args: ProxyArgs) -> std::result::Result<Value, String> {
        info!(function = %args.function_name, server = %args.server_url, "Proxying call");

        let timeout = Duration::try_from_secs_f64(args.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
            .map_err(|e| format!("Invalid timeout: {}", e))?;
        let mut config = ClientConfig::new(args.server_url.as_str())
            .with_timeout(timeout)
            .with_cache(CacheConfig::new().with_enabled(false));
        if let Some(key) = args.api_key {
            config = config.with_api_key(key);
        }
        let client = McpClient::new(config).map_err(|e| e.to_string())?;

        self.ensure_known(&client, &args.server_url, &args.function_name)?;

        let response = client
            .call_function(&args.function_name, &args.parameters, CallOptions::no_cache())
            .map_err(|e| e.to_string())?;
        response
            .into_result()
            .map_err(|e| format!("Remote function call failed: {}", e))
    }

    fn ensure_known(
        &self,
        client: &McpClient,
        server_url: &str,
        function_name: &str,
    ) -> std::result::Result<(), String> {
        let listed = self
            .listings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(server_url);
        if !listed {
            let functions = client.list_functions().map_err(|e| e.to_string())?;
            let by_name = functions.into_iter().map(|f| (f.name.clone(), f)).collect();
            self.listings
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(server_url.to_string(), by_name);
        }

        let known = self
            .listings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(server_url)
            .is_some_and(|fns| fns.contains_key(function_name));
        if known {
            return Ok(());
        }

        match client.get_function(function_name).map_err(|e| e.to_string())? {
            Some(definition) => {
                self.listings
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .entry(server_url.to_string())
                    .or_default()
                    .insert(function_name.to_string(), definition);
                Ok(())
            }
            None => Err(format!("Function '{}' not found on server", function_name)),
        }
    }
}

impl ToolHandler for ProxyTool {
    fn invoke(&self, parameters: &Parameters) -> HandlerResult {
        let args: ProxyArgs = serde_json::from_value(Value::Object(parameters.clone()))
            .map_err(|e| HandlerError::new(format!("Invalid arguments: {}", e)))?;
        self.forward(args).map_err(|e| {
            error!(error = %e, "Proxy call failed");
            HandlerError::new(format!("Proxy call failed: {}", e))
        })
    }
}

pub fn register(registry: &ToolRegistry) -> Result<()> {
    registry.register(definition(), ProxyTool::new())
}
