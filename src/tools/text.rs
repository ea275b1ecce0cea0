//! Text processing.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::registry::ToolRegistry;
use crate::Result;

pub const NAME: &str = "text_processor";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TextOperation {
    CountWords,
    CountChars,
    ToUpper,
    ToLower,
    Reverse,
}

/// Process text with simple operations
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TextArgs {
    /// The text operation to perform
    pub operation: TextOperation,
    /// The input text
    pub text: String,
}

pub fn process(args: TextArgs) -> std::result::Result<Value, String> {
    let text = args.text;
    Ok(match args.operation {
        TextOperation::CountWords => json!(text.split_whitespace().count()),
        TextOperation::CountChars => json!(text.chars().count()),
        TextOperation::ToUpper => json!(text.to_uppercase()),
        TextOperation::ToLower => json!(text.to_lowercase()),
        TextOperation::Reverse => json!(text.chars().rev().collect::<String>()),
    })
}

pub fn register(registry: &ToolRegistry) -> Result<()> {
    registry.register_from_function(NAME, "Process text with simple operations", process)
}
