//! 工具注册表 — 名称到（函数定义, 处理器）的内存映射
//!
//! Tool registry: an in-memory mapping from function name to its definition
//! and handler. Registration validates the definition and rejects duplicate
//! names; execution is total and always yields a [`FunctionResponse`].
//!
//! The maps sit behind a single `RwLock`. Register and unregister take the
//! write lock; lookups and executes hold the read lock only long enough to
//! clone the entry, so handlers run with no lock held. There is no timeout
//! on handler execution: a handler that never returns blocks its caller.

mod handler;

pub use handler::{HandlerError, HandlerResult, ToolHandler};

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

use crate::types::{FunctionCall, FunctionDefinition, FunctionResponse, Parameters, Tool};
use crate::validation::{self, schema};
use crate::{Error, Result};

#[derive(Clone)]
struct RegistryEntry {
    definition: Arc<FunctionDefinition>,
    handler: Arc<dyn ToolHandler>,
}

/// Registry of callable tools.
pub struct ToolRegistry {
    entries: RwLock<HashMap<String, RegistryEntry>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Process-wide default registry.
    ///
    /// Constructed empty on first access; nothing is registered into it
    /// implicitly. Prefer passing an explicit registry where possible.
    pub fn global() -> &'static ToolRegistry {
        &GLOBAL_REGISTRY
    }

    /// Register a function definition with its handler.
    ///
    /// Fails with [`Error::Definition`] if the definition is malformed and
    /// with [`Error::NameConflict`] if the name is taken.
    pub fn register<H>(&self, definition: FunctionDefinition, handler: H) -> Result<()>
    where
        H: ToolHandler + 'static,
    {
        self.register_arc(definition, Arc::new(handler))
    }

    /// Register with an already shared handler.
    pub fn register_arc(
        &self,
        definition: FunctionDefinition,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<()> {
        validation::validate_function_definition(&definition)?;

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(&definition.name) {
            return Err(Error::NameConflict(definition.name));
        }

        let name = definition.name.clone();
        entries.insert(
            name.clone(),
            RegistryEntry {
                definition: Arc::new(definition),
                handler,
            },
        );
        info!(function = %name, "Registered tool");
        Ok(())
    }

    /// Register a typed function, deriving its definition from `Args`.
    ///
    /// Property types come from the argument type's JSON Schema; a field is
    /// required unless it has a default. When `description` is empty the
    /// doc comment of `Args` is used.
    ///
    /// ```
    /// use mcp_runtime::registry::ToolRegistry;
    /// use schemars::JsonSchema;
    /// use serde::Deserialize;
    /// use serde_json::json;
    ///
    /// #[derive(Deserialize, JsonSchema)]
    /// struct AddArgs {
    ///     a: f64,
    ///     b: f64,
    /// }
    ///
    /// let registry = ToolRegistry::new();
    /// registry
    ///     .register_from_function("add", "Add two numbers", |args: AddArgs| {
    ///         Ok::<_, String>(json!(args.a + args.b))
    ///     })
    ///     .unwrap();
    /// assert!(registry.get_function_definition("add").is_some());
    /// ```
    pub fn register_from_function<A, F, E>(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        func: F,
    ) -> Result<()>
    where
        A: DeserializeOwned + JsonSchema,
        F: Fn(A) -> std::result::Result<Value, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        let mut description = description.into();
        if description.trim().is_empty() {
            description = schema::type_description_for::<A>().unwrap_or_default();
        }
        let definition =
            FunctionDefinition::new(name, description, schema::parameter_schema_for::<A>());

        let handler = move |params: &Parameters| -> HandlerResult {
            let args: A = serde_json::from_value(Value::Object(params.clone()))
                .map_err(|e| HandlerError::new(format!("Invalid arguments: {}", e)))?;
            func(args).map_err(|e| HandlerError::new(e.to_string()))
        };
        self.register(definition, handler)
    }

    /// Remove a function. Returns `false` if it was not registered.
    pub fn unregister(&self, name: &str) -> bool {
        let removed = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .is_some();
        if removed {
            info!(function = %name, "Unregistered tool");
        } else {
            warn!(function = %name, "Cannot unregister: tool not found");
        }
        removed
    }

    pub fn get_tool(&self, name: &str) -> Option<Tool> {
        self.get_function_definition(name)
            .map(|definition| Tool { function: definition })
    }

    pub fn get_function_definition(&self, name: &str) -> Option<FunctionDefinition> {
        self.entry(name).map(|e| e.definition.as_ref().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All registered tools, sorted by name.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.list_function_definitions()
            .into_iter()
            .map(|function| Tool { function })
            .collect()
    }

    /// All registered definitions, sorted by name.
    pub fn list_function_definitions(&self) -> Vec<FunctionDefinition> {
        let mut defs: Vec<FunctionDefinition> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|e| e.definition.as_ref().clone())
            .collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Execute a call. Never fails: lookup, validation and handler failures
    /// all come back as an error response.
    pub fn execute(&self, call: &FunctionCall) -> FunctionResponse {
        let Some(entry) = self.entry(&call.name) else {
            warn!(function = %call.name, "Function not found in registry");
            return FunctionResponse::error(format!("Function '{}' not found", call.name));
        };

        if let Err(e) = validation::validate_function_call(call, &entry.definition) {
            warn!(function = %call.name, error = %e, "Call validation failed");
            return FunctionResponse::error(e.message);
        }

        debug!(function = %call.name, "Executing function");
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| entry.handler.invoke(&call.parameters)));
        match outcome {
            Ok(Ok(result)) => FunctionResponse::success(result),
            Ok(Err(e)) => {
                warn!(function = %call.name, error = %e, "Handler failed");
                FunctionResponse::error(e.to_string())
            }
            Err(payload) => {
                let message = handler::panic_message(payload.as_ref());
                warn!(function = %call.name, panic = %message, "Handler panicked");
                FunctionResponse::error(format!("Handler panicked: {}", message))
            }
        }
    }

    fn entry(&self, name: &str) -> Option<RegistryEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .list_function_definitions()
            .into_iter()
            .map(|d| d.name)
            .collect();
        f.debug_struct("ToolRegistry").field("functions", &names).finish()
    }
}

static GLOBAL_REGISTRY: once_cell::sync::Lazy<ToolRegistry> =
    once_cell::sync::Lazy::new(ToolRegistry::new);
