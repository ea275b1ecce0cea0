//! Translation between the parameter schema model and JSON Schema.

use schemars::schema::{InstanceType, RootSchema, Schema, SchemaObject, SingleOrVec};
use schemars::JsonSchema;
use serde_json::{json, Map, Value};

use crate::types::{FunctionDefinition, ParameterSchema, PropertySchema};

/// Property type tags accepted in a [`PropertySchema`].
pub const PROPERTY_TYPES: [&str; 6] = ["string", "number", "integer", "boolean", "array", "object"];

/// Convert a [`PropertySchema`] into a JSON Schema object.
pub fn property_schema_to_json_schema(schema: &PropertySchema) -> Value {
    let mut map = Map::new();
    map.insert("type".into(), json!(schema.property_type));
    map.insert("description".into(), json!(schema.description));

    if let Some(ref values) = schema.enum_values {
        map.insert("enum".into(), Value::Array(values.clone()));
    }
    if let Some(ref format) = schema.format {
        map.insert("format".into(), json!(format));
    }
    if let Some(ref default) = schema.default {
        map.insert("default".into(), default.clone());
    }
    if schema.property_type == "array" {
        if let Some(ref items) = schema.items {
            map.insert("items".into(), items.clone());
        }
    }
    if schema.property_type == "object" {
        if let Some(ref properties) = schema.properties {
            let nested: Map<String, Value> = properties
                .iter()
                .map(|(name, prop)| (name.clone(), property_schema_to_json_schema(prop)))
                .collect();
            map.insert("properties".into(), Value::Object(nested));
            if let Some(ref required) = schema.required {
                if !required.is_empty() {
                    map.insert("required".into(), json!(required));
                }
            }
        }
    }

    Value::Object(map)
}

/// Convert a [`ParameterSchema`] into a JSON Schema object.
pub fn parameter_schema_to_json_schema(schema: &ParameterSchema) -> Value {
    let properties: Map<String, Value> = schema
        .properties
        .iter()
        .map(|(name, prop)| (name.clone(), property_schema_to_json_schema(prop)))
        .collect();

    let mut map = Map::new();
    map.insert("type".into(), json!(schema.schema_type));
    map.insert("properties".into(), Value::Object(properties));
    if let Some(ref required) = schema.required {
        if !required.is_empty() {
            map.insert("required".into(), json!(required));
        }
    }
    Value::Object(map)
}

/// JSON Schema of a function's parameters.
pub fn function_definition_to_json_schema(definition: &FunctionDefinition) -> Value {
    parameter_schema_to_json_schema(&definition.parameters)
}

/// Map a schemars instance type onto a property type tag.
///
/// `null` has no property counterpart and falls back to "string".
pub fn json_type_for(instance_type: &InstanceType) -> &'static str {
    match instance_type {
        InstanceType::String => "string",
        InstanceType::Integer => "integer",
        InstanceType::Number => "number",
        InstanceType::Boolean => "boolean",
        InstanceType::Array => "array",
        InstanceType::Object => "object",
        InstanceType::Null => "string",
    }
}

/// Derive a [`ParameterSchema`] from a Rust argument type.
///
/// Every field becomes a property whose type comes from [`json_type_for`];
/// anything that cannot be mapped is described as "string". A field is
/// required when it has no default (not an `Option`, no `#[serde(default)]`).
pub fn parameter_schema_for<T: JsonSchema>() -> ParameterSchema {
    let root = schemars::schema_for!(T);
    parameter_schema_from_root(&root)
}

/// Doc comment of the argument type, if any.
pub fn type_description_for<T: JsonSchema>() -> Option<String> {
    let root = schemars::schema_for!(T);
    root.schema
        .metadata
        .as_ref()
        .and_then(|m| m.description.clone())
}

fn parameter_schema_from_root(root: &RootSchema) -> ParameterSchema {
    let mut params = ParameterSchema::new();
    let Some(object) = root.schema.object.as_ref() else {
        return params;
    };

    for (name, schema) in &object.properties {
        let property = match schema {
            Schema::Object(obj) => property_from_schema_object(name, obj, root),
            Schema::Bool(_) => PropertySchema::string(format!("Parameter: {}", name)),
        };
        params = if object.required.contains(name) {
            params.required_property(name.clone(), property)
        } else {
            params.property(name.clone(), property)
        };
    }
    params
}

fn property_from_schema_object(name: &str, obj: &SchemaObject, root: &RootSchema) -> PropertySchema {
    let resolved = resolve(obj, root);
    let property_type = instance_type_of(resolved, root).unwrap_or("string");

    let description = obj
        .metadata
        .as_ref()
        .and_then(|m| m.description.clone())
        .or_else(|| resolved.metadata.as_ref().and_then(|m| m.description.clone()))
        .unwrap_or_else(|| format!("Parameter: {}", name));

    let mut property = PropertySchema::new(property_type, description);
    if let Some(ref values) = resolved.enum_values {
        property = property.with_enum(values.iter().filter(|v| !v.is_null()).cloned());
    }
    if let Some(ref format) = resolved.format {
        property = property.with_format(format.clone());
    }
    if let Some(default) = obj.metadata.as_ref().and_then(|m| m.default.clone()) {
        property = property.with_default(default);
    }
    if property_type == "array" {
        let item_type = resolved
            .array
            .as_ref()
            .and_then(|a| a.items.as_ref())
            .and_then(|items| match items {
                SingleOrVec::Single(schema) => Some(schema.as_ref()),
                SingleOrVec::Vec(schemas) => schemas.first(),
            })
            .and_then(|schema| match schema {
                Schema::Object(o) => instance_type_of(resolve(o, root), root),
                Schema::Bool(_) => None,
            });
        if let Some(item_type) = item_type {
            property.items = Some(json!({ "type": item_type }));
        }
    }
    property
}

/// Follow a `$ref` into the root's definitions, one level deep.
///
/// A documented field referencing another type comes through as
/// `allOf: [{$ref}]` next to its description.
fn resolve<'a>(obj: &'a SchemaObject, root: &'a RootSchema) -> &'a SchemaObject {
    let single_all_of = obj
        .subschemas
        .as_ref()
        .and_then(|s| s.all_of.as_ref())
        .filter(|all_of| all_of.len() == 1)
        .and_then(|all_of| match &all_of[0] {
            Schema::Object(inner) => inner.reference.as_deref(),
            Schema::Bool(_) => None,
        });
    let target = obj
        .reference
        .as_deref()
        .or(single_all_of)
        .and_then(|r| r.rsplit('/').next())
        .and_then(|name| root.definitions.get(name));
    match target {
        Some(Schema::Object(def)) => def,
        _ => obj,
    }
}

fn instance_type_of(obj: &SchemaObject, root: &RootSchema) -> Option<&'static str> {
    if let Some(ref types) = obj.instance_type {
        let first = match types {
            SingleOrVec::Single(t) => Some(t.as_ref()),
            SingleOrVec::Vec(ts) => ts.iter().find(|t| **t != InstanceType::Null),
        };
        return first.map(json_type_for);
    }

    // Option<Struct> and friends come through as anyOf [ref, null].
    let any_of = obj.subschemas.as_ref().and_then(|s| s.any_of.as_ref())?;
    any_of.iter().find_map(|schema| match schema {
        Schema::Object(o) => {
            let resolved = resolve(o, root);
            match resolved.instance_type {
                Some(SingleOrVec::Single(ref t)) if **t == InstanceType::Null => None,
                _ => instance_type_of(resolved, root),
            }
        }
        Schema::Bool(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[test]
    fn test_property_schema_translation() {
        let prop = PropertySchema::string("Unit")
            .with_enum(["celsius", "fahrenheit"])
            .with_default("celsius")
            .with_format("unit");
        let schema = property_schema_to_json_schema(&prop);
        assert_eq!(
            schema,
            json!({
                "type": "string",
                "description": "Unit",
                "enum": ["celsius", "fahrenheit"],
                "format": "unit",
                "default": "celsius"
            })
        );
    }

    #[test]
    fn test_nested_object_translation() {
        let prop = PropertySchema::object("Point")
            .with_property("x", PropertySchema::number("X"))
            .with_property("y", PropertySchema::number("Y"))
            .with_required(["x"]);
        let schema = property_schema_to_json_schema(&prop);
        assert_eq!(schema["properties"]["x"]["type"], "number");
        assert_eq!(schema["required"], json!(["x"]));
    }

    #[test]
    fn test_items_only_kept_for_arrays() {
        let mut prop = PropertySchema::string("Not an array");
        prop.items = Some(json!({"type": "number"}));
        let schema = property_schema_to_json_schema(&prop);
        assert!(schema.get("items").is_none());

        let prop = PropertySchema::array("Numbers", json!({"type": "number"}));
        let schema = property_schema_to_json_schema(&prop);
        assert_eq!(schema["items"], json!({"type": "number"}));
    }

    #[test]
    fn test_parameter_schema_omits_empty_required() {
        let mut params = ParameterSchema::new().property("a", PropertySchema::number("A"));
        params.required = Some(vec![]);
        let schema = parameter_schema_to_json_schema(&params);
        assert_eq!(schema["type"], "object");
        assert!(schema.get("required").is_none());
    }

    /// Arguments of a test function.
    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct SampleArgs {
        /// Name to greet
        name: String,
        count: i64,
        ratio: f64,
        loud: bool,
        tags: Vec<String>,
        extra: HashMap<String, String>,
        nickname: Option<String>,
        #[serde(default)]
        retries: u32,
    }

    #[test]
    fn test_parameter_schema_for_type_mapping() {
        let params = parameter_schema_for::<SampleArgs>();
        let ty = |n: &str| params.get(n).unwrap().property_type.clone();

        assert_eq!(ty("name"), "string");
        assert_eq!(ty("count"), "integer");
        assert_eq!(ty("ratio"), "number");
        assert_eq!(ty("loud"), "boolean");
        assert_eq!(ty("tags"), "array");
        assert_eq!(ty("extra"), "object");
        assert_eq!(ty("nickname"), "string");
        assert_eq!(ty("retries"), "integer");

        assert_eq!(params.get("name").unwrap().description, "Name to greet");
        assert_eq!(params.get("count").unwrap().description, "Parameter: count");
        assert_eq!(params.get("tags").unwrap().items, Some(json!({"type": "string"})));

        assert!(params.is_required("name"));
        assert!(params.is_required("count"));
        assert!(!params.is_required("nickname"));
        assert!(!params.is_required("retries"));

        assert_eq!(
            type_description_for::<SampleArgs>().as_deref(),
            Some("Arguments of a test function.")
        );
    }

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    #[serde(rename_all = "lowercase")]
    enum Mode {
        Fast,
        Slow,
    }

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct ModeArgs {
        mode: Mode,
    }

    #[test]
    fn test_parameter_schema_for_resolves_enum_references() {
        let params = parameter_schema_for::<ModeArgs>();
        let mode = params.get("mode").unwrap();
        assert_eq!(mode.property_type, "string");
        assert_eq!(mode.enum_values, Some(vec![json!("fast"), json!("slow")]));
    }

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct DocumentedModeArgs {
        /// How fast to go
        mode: Mode,
    }

    #[test]
    fn test_parameter_schema_for_resolves_documented_references() {
        let params = parameter_schema_for::<DocumentedModeArgs>();
        let mode = params.get("mode").unwrap();
        assert_eq!(mode.description, "How fast to go");
        assert_eq!(mode.enum_values, Some(vec![json!("fast"), json!("slow")]));
        assert!(params.is_required("mode"));
    }
}
