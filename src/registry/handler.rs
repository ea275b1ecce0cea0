//! Handler abstraction bound to a registered function.

use serde_json::Value;
use std::fmt;

use crate::types::Parameters;

/// Failure raised by a handler. Converted into an error response by the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    pub message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type returned by handlers.
pub type HandlerResult = std::result::Result<Value, HandlerError>;

/// Callable behavior behind a registered function.
///
/// Parameters have already been validated against the function's schema when
/// `invoke` runs. Any closure `Fn(&Parameters) -> Result<Value, E>` with a
/// displayable `E` is a handler.
pub trait ToolHandler: Send + Sync {
    fn invoke(&self, parameters: &Parameters) -> HandlerResult;
}

impl<F, E> ToolHandler for F
where
    F: Fn(&Parameters) -> std::result::Result<Value, E> + Send + Sync,
    E: fmt::Display,
{
    fn invoke(&self, parameters: &Parameters) -> HandlerResult {
        self(parameters).map_err(|e| HandlerError::new(e.to_string()))
    }
}

/// Extract a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_closure_is_handler() {
        let handler = |params: &Parameters| -> Result<Value, String> {
            params
                .get("x")
                .cloned()
                .ok_or_else(|| "x is missing".to_string())
        };
        let params = json!({"x": 1}).as_object().cloned().unwrap();
        assert_eq!(handler.invoke(&params), Ok(json!(1)));
        assert_eq!(
            handler.invoke(&Parameters::new()),
            Err(HandlerError::new("x is missing"))
        );
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn std::any::Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
