use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path that caused the error (e.g., "parameters.properties.a", "chunk.call_id")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, raw frame)
    pub details: Option<String>,
    /// Source of the error (e.g., "registry", "stream_function")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the runtime.
///
/// Only failures that happen *before* a call reaches dispatch surface here.
/// Everything after that point is reported as a
/// [`FunctionResponse`](crate::types::FunctionResponse) with `status = error`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid function definition: {message}{}", format_context(.context))]
    Definition {
        message: String,
        context: ErrorContext,
    },

    #[error("Tool with name '{0}' is already registered")]
    NameConflict(String),

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Stream protocol error: {message}{}", format_context(.context))]
    StreamProtocol {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a definition error with structured context
    pub fn definition_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Definition {
            message: msg.into(),
            context,
        }
    }

    /// Create a stream protocol error with structured context
    pub fn stream_protocol_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::StreamProtocol {
            message: msg.into(),
            context,
        }
    }

    /// Create a configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Whether the retry loop may attempt the operation again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Definition { context, .. }
            | Error::StreamProtocol { context, .. }
            | Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}
