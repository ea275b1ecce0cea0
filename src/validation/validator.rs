//! Definition and call validation.
//!
//! Definitions are checked structurally at registration time. Calls are
//! checked by translating the definition's parameters to JSON Schema and
//! running them through the `jsonschema` crate (Draft 7).

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use super::error::ValidationError;
use super::schema::{function_definition_to_json_schema, PROPERTY_TYPES};
use crate::error::{Error, ErrorContext};
use crate::types::{FunctionCall, FunctionDefinition, FunctionResponse, PropertyMap, ResponseStatus};

const SOURCE: &str = "validate_function_definition";

/// Validate a function definition.
///
/// Fails with [`Error::Definition`] when the name or description is empty,
/// when there are no parameters, or when the parameter schema is malformed.
pub fn validate_function_definition(definition: &FunctionDefinition) -> crate::Result<()> {
    let ctx = || ErrorContext::new().with_source(SOURCE);

    if definition.name.trim().is_empty() {
        return Err(Error::definition_with_context(
            "Function name must not be empty",
            ctx().with_field_path("name"),
        ));
    }
    if definition.description.trim().is_empty() {
        return Err(Error::definition_with_context(
            "Function description must not be empty",
            ctx().with_field_path("description"),
        ));
    }
    if definition.parameters.properties.is_empty() {
        return Err(Error::definition_with_context(
            "Function must have at least one parameter",
            ctx().with_field_path("parameters.properties"),
        ));
    }
    if definition.parameters.schema_type != "object" {
        return Err(Error::definition_with_context(
            format!(
                "Parameters type must be 'object', got '{}'",
                definition.parameters.schema_type
            ),
            ctx().with_field_path("parameters.type"),
        ));
    }

    check_properties(
        &definition.parameters.properties,
        definition.parameters.required.as_deref(),
        "parameters",
    )?;

    // The translated schema must compile, or every call would fail later.
    let schema = function_definition_to_json_schema(definition);
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .map_err(|e| {
            Error::definition_with_context(
                "Parameter schema is not valid JSON Schema",
                ctx().with_details(e.to_string()),
            )
        })?;

    Ok(())
}

fn check_properties(
    properties: &PropertyMap,
    required: Option<&[String]>,
    path: &str,
) -> crate::Result<()> {
    for name in required.unwrap_or_default() {
        if !properties.contains_key(name) {
            return Err(Error::definition_with_context(
                format!("Required property '{}' is not declared", name),
                ErrorContext::new()
                    .with_field_path(format!("{}.required", path))
                    .with_source(SOURCE),
            ));
        }
    }

    for (name, property) in properties.iter() {
        let field = format!("{}.properties.{}", path, name);
        if !PROPERTY_TYPES.contains(&property.property_type.as_str()) {
            return Err(Error::definition_with_context(
                format!("Unsupported property type '{}'", property.property_type),
                ErrorContext::new()
                    .with_field_path(format!("{}.type", field))
                    .with_source(SOURCE),
            ));
        }
        if let Some(ref nested) = property.properties {
            check_properties(nested, property.required.as_deref(), &field)?;
        }
    }
    Ok(())
}

/// Validate a function call against its definition.
///
/// Reports the first violation with its instance and schema paths.
pub fn validate_function_call(
    call: &FunctionCall,
    definition: &FunctionDefinition,
) -> Result<(), ValidationError> {
    if call.name != definition.name {
        return Err(ValidationError::without_path(format!(
            "Function name mismatch: expected '{}', got '{}'",
            definition.name, call.name
        )));
    }

    let schema = function_definition_to_json_schema(definition);
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .map_err(|e| ValidationError::without_path(format!("Invalid parameter schema: {}", e)))?;

    let instance = Value::Object(call.parameters.clone());
    let violation = match compiled.validate(&instance) {
        Ok(()) => None,
        Err(mut errors) => errors.next().map(|e| {
            ValidationError::new(
                format!("Invalid function parameters: {}", e),
                Some(e.instance_path.to_string()),
                Some(e.schema_path.to_string()),
            )
        }),
    };

    match violation {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Validate that a JSON value is a well-formed [`FunctionResponse`].
pub fn validate_function_response(response: &Value) -> Result<FunctionResponse, ValidationError> {
    let parsed: FunctionResponse = serde_json::from_value(response.clone())
        .map_err(|e| ValidationError::without_path(format!("Invalid function response: {}", e)))?;

    match (parsed.status, parsed.error.as_ref()) {
        (ResponseStatus::Error, None) => Err(ValidationError::new(
            "Invalid function response: error status without error message",
            Some("/error".into()),
            None,
        )),
        (ResponseStatus::Success, Some(_)) => Err(ValidationError::new(
            "Invalid function response: success status with error message",
            Some("/error".into()),
            None,
        )),
        _ => Ok(parsed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ParameterSchema, PropertySchema};
    use serde_json::json;

    fn add_definition() -> FunctionDefinition {
        FunctionDefinition::new(
            "add",
            "Add two numbers",
            ParameterSchema::new()
                .required_property("a", PropertySchema::number("First operand"))
                .property("b", PropertySchema::number("Second operand")),
        )
    }

    fn call(params: Value) -> FunctionCall {
        FunctionCall::from_json("add", params)
    }

    #[test]
    fn test_valid_definition() {
        assert!(validate_function_definition(&add_definition()).is_ok());
    }

    #[test]
    fn test_malformed_definitions_are_rejected() {
        let mut empty_name = add_definition();
        empty_name.name = String::new();

        let mut empty_description = add_definition();
        empty_description.description = "  ".into();

        let mut no_params = add_definition();
        no_params.parameters = ParameterSchema::new();

        for def in [empty_name, empty_description, no_params] {
            let err = validate_function_definition(&def).unwrap_err();
            assert!(matches!(err, Error::Definition { .. }), "{err}");
        }
    }

    #[test]
    fn test_required_must_be_declared() {
        let mut def = add_definition();
        def.parameters.required = Some(vec!["a".into(), "c".into()]);
        let err = validate_function_definition(&def).unwrap_err();
        assert!(err.to_string().contains("'c' is not declared"));
    }

    #[test]
    fn test_unknown_property_type_is_rejected() {
        let def = FunctionDefinition::new(
            "f",
            "desc",
            ParameterSchema::new().property(
                "p",
                PropertySchema::object("nested").with_property("q", PropertySchema::new("date", "when")),
            ),
        );
        let err = validate_function_definition(&def).unwrap_err();
        assert_eq!(
            err.context().unwrap().field_path.as_deref(),
            Some("parameters.properties.p.properties.q.type")
        );
    }

    #[test]
    fn test_call_with_required_only_is_valid() {
        assert!(validate_function_call(&call(json!({"a": 2})), &add_definition()).is_ok());
        assert!(validate_function_call(&call(json!({"a": 2, "b": 3.5})), &add_definition()).is_ok());
    }

    #[test]
    fn test_missing_required_property_is_reported() {
        let err = validate_function_call(&call(json!({})), &add_definition()).unwrap_err();
        assert!(err.message.contains("\"a\""), "{}", err.message);
        assert!(err.message.contains("required"), "{}", err.message);
        assert_eq!(err.schema_path.as_deref(), Some("/required"));
    }

    #[test]
    fn test_type_violation_is_reported_with_paths() {
        let err = validate_function_call(&call(json!({"a": "x"})), &add_definition()).unwrap_err();
        assert!(err.message.contains("not of type"), "{}", err.message);
        assert_eq!(err.path.as_deref(), Some("/a"));
        assert_eq!(err.schema_path.as_deref(), Some("/properties/a/type"));
        assert_eq!(err.path_segments(), vec!["a"]);
    }

    #[test]
    fn test_enum_membership() {
        let def = FunctionDefinition::new(
            "calc",
            "Calculator",
            ParameterSchema::new().required_property(
                "operation",
                PropertySchema::string("Operation").with_enum(["add", "subtract"]),
            ),
        );
        let ok = FunctionCall::from_json("calc", json!({"operation": "add"}));
        assert!(validate_function_call(&ok, &def).is_ok());

        let bad = FunctionCall::from_json("calc", json!({"operation": "modulo"}));
        let err = validate_function_call(&bad, &def).unwrap_err();
        assert_eq!(err.schema_path.as_deref(), Some("/properties/operation/enum"));
    }

    #[test]
    fn test_name_mismatch() {
        let other = FunctionCall::from_json("sub", json!({"a": 1}));
        let err = validate_function_call(&other, &add_definition()).unwrap_err();
        assert_eq!(
            err.message,
            "Function name mismatch: expected 'add', got 'sub'"
        );
    }

    #[test]
    fn test_nested_object_required() {
        let def = FunctionDefinition::new(
            "locate",
            "Locate",
            ParameterSchema::new().required_property(
                "place",
                PropertySchema::object("Place")
                    .with_property("city", PropertySchema::string("City"))
                    .with_required(["city"]),
            ),
        );
        let bad = FunctionCall::from_json("locate", json!({"place": {}}));
        let err = validate_function_call(&bad, &def).unwrap_err();
        assert_eq!(err.path.as_deref(), Some("/place"));
        assert!(err.message.contains("\"city\""));
    }

    #[test]
    fn test_validate_function_response() {
        assert!(validate_function_response(&json!({"result": 5, "status": "success"})).is_ok());
        assert!(validate_function_response(&json!({"result": null, "error": "x", "status": "error"})).is_ok());
        assert!(validate_function_response(&json!({"result": null, "status": "error"})).is_err());
        assert!(validate_function_response(&json!({"result": 1, "error": "x", "status": "success"})).is_err());
        assert!(validate_function_response(&json!({"status": "pending"})).is_err());
    }
}
