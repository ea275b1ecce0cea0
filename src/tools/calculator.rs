//! Arithmetic calculator.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::registry::ToolRegistry;
use crate::Result;

pub const NAME: &str = "calculator";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Sqrt,
    Log,
}

/// Perform basic arithmetic calculations
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CalculatorArgs {
    /// The operation to perform
    pub operation: Operation,
    /// First operand
    pub a: f64,
    /// Second operand (required for all operations except sqrt; the base for log)
    pub b: Option<f64>,
}

pub fn calculate(args: CalculatorArgs) -> std::result::Result<Value, String> {
    let CalculatorArgs { operation, a, b } = args;
    let second = || {
        b.ok_or_else(|| {
            format!(
                "Second operand is required for operation '{}'",
                operation.as_str()
            )
        })
    };

    let result = match operation {
        Operation::Add => a + second()?,
        Operation::Subtract => a - second()?,
        Operation::Multiply => a * second()?,
        Operation::Divide => {
            let b = second()?;
            if b == 0.0 {
                return Err("Division by zero is not allowed".into());
            }
            a / b
        }
        Operation::Power => a.powf(second()?),
        Operation::Sqrt => {
            if a < 0.0 {
                return Err("Cannot calculate square root of a negative number".into());
            }
            a.sqrt()
        }
        Operation::Log => {
            if a <= 0.0 {
                return Err("Cannot calculate logarithm of a non-positive number".into());
            }
            match b {
                Some(base) if base > 0.0 && base != 1.0 => a.log(base),
                _ => return Err("Base must be a positive number other than 1".into()),
            }
        }
    };

    if !result.is_finite() {
        return Err(format!("Result of '{}' is not a finite number", operation.as_str()));
    }
    Ok(json!(result))
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Power => "power",
            Operation::Sqrt => "sqrt",
            Operation::Log => "log",
        }
    }
}

pub fn register(registry: &ToolRegistry) -> Result<()> {
    registry.register_from_function(NAME, "Perform basic arithmetic calculations", calculate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FunctionCall;

    fn run(params: Value) -> crate::types::FunctionResponse {
        let registry = ToolRegistry::new();
        register(&registry).unwrap();
        registry.execute(&FunctionCall::from_json(NAME, params))
    }

    #[test]
    fn test_definition_is_derived() {
        let registry = ToolRegistry::new();
        register(&registry).unwrap();
        let def = registry.get_function_definition(NAME).unwrap();
        assert_eq!(def.parameters.required, Some(vec!["operation".into(), "a".into()]));
        let op = def.parameters.get("operation").unwrap();
        assert_eq!(op.enum_values.as_ref().map(Vec::len), Some(7));
        assert_eq!(def.parameters.get("a").unwrap().description, "First operand");
    }

    #[test]
    fn test_operations() {
        assert_eq!(run(json!({"operation": "add", "a": 2, "b": 3})).result, json!(5.0));
        assert_eq!(run(json!({"operation": "divide", "a": 9, "b": 3})).result, json!(3.0));
        assert_eq!(run(json!({"operation": "power", "a": 2, "b": 10})).result, json!(1024.0));
        assert_eq!(run(json!({"operation": "sqrt", "a": 16})).result, json!(4.0));
        assert_eq!(run(json!({"operation": "log", "a": 8, "b": 2})).result, json!(3.0));
    }

    #[test]
    fn test_operation_errors() {
        let err = |p: Value| run(p).error.unwrap();
        assert_eq!(
            err(json!({"operation": "divide", "a": 1, "b": 0})),
            "Division by zero is not allowed"
        );
        assert_eq!(
            err(json!({"operation": "add", "a": 1})),
            "Second operand is required for operation 'add'"
        );
        assert_eq!(
            err(json!({"operation": "sqrt", "a": -4})),
            "Cannot calculate square root of a negative number"
        );
        assert!(err(json!({"operation": "log", "a": 8, "b": 1})).starts_with("Base must be"));
        assert!(err(json!({"operation": "modulo", "a": 1, "b": 2})).starts_with("Invalid function parameters"));
    }
}
