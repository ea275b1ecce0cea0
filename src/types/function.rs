//! Function definitions, calls and responses.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Untyped parameter bag of a call. Validated against a [`FunctionDefinition`]
/// before it reaches a handler.
pub type Parameters = Map<String, Value>;

/// Insertion-ordered mapping of property name to schema.
///
/// Re-inserting a name replaces its schema and keeps its position.
pub type PropertyMap = IndexMap<String, PropertySchema>;

/// Schema for a single property of a function's parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// One of "string", "number", "integer", "boolean", "array", "object".
    #[serde(rename = "type")]
    pub property_type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Raw JSON Schema for array items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl PropertySchema {
    pub fn new(property_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            property_type: property_type.into(),
            description: description.into(),
            enum_values: None,
            format: None,
            default: None,
            items: None,
            properties: None,
            required: None,
        }
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::new("string", description)
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::new("number", description)
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self::new("integer", description)
    }

    pub fn boolean(description: impl Into<String>) -> Self {
        Self::new("boolean", description)
    }

    pub fn array(description: impl Into<String>, items: Value) -> Self {
        let mut schema = Self::new("array", description);
        schema.items = Some(items);
        schema
    }

    pub fn object(description: impl Into<String>) -> Self {
        Self::new("object", description)
    }

    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Add a nested property. Only meaningful for `object` schemas.
    pub fn with_property(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        self.properties
            .get_or_insert_with(PropertyMap::new)
            .insert(name.into(), schema);
        self
    }

    pub fn with_required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

fn object_type() -> String {
    "object".to_string()
}

/// Schema for a function's parameter object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(rename = "type", default = "object_type")]
    pub schema_type: String,
    pub properties: PropertyMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self {
            schema_type: object_type(),
            properties: PropertyMap::new(),
            required: None,
        }
    }

    /// Add a property. Re-adding an existing name replaces it in place.
    pub fn property(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Add a property and mark it required.
    pub fn required_property(self, name: impl Into<String>, schema: PropertySchema) -> Self {
        let name = name.into();
        let mut this = self.property(name.clone(), schema);
        let required = this.required.get_or_insert_with(Vec::new);
        if !required.contains(&name) {
            required.push(name);
        }
        this
    }

    pub fn get(&self, name: &str) -> Option<&PropertySchema> {
        self.properties.get(name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required
            .as_ref()
            .map(|r| r.iter().any(|n| n == name))
            .unwrap_or(false)
    }
}

impl Default for ParameterSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Definition of a function that can be called by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
}

impl FunctionDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ParameterSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A request to invoke a function by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub parameters: Parameters,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// Build a call from a JSON value; non-object values yield empty parameters.
    pub fn from_json(name: impl Into<String>, parameters: Value) -> Self {
        let parameters = match parameters {
            Value::Object(map) => map,
            _ => Parameters::new(),
        };
        Self::new(name, parameters)
    }
}

/// Outcome tag of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    #[default]
    Success,
    Error,
}

/// Response from a function call.
///
/// Build through [`FunctionResponse::success`] / [`FunctionResponse::error`]
/// so that `status` and `error` stay consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status: ResponseStatus,
}

impl FunctionResponse {
    pub fn success(result: Value) -> Self {
        Self {
            result,
            error: None,
            status: ResponseStatus::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            result: Value::Null,
            error: Some(message.into()),
            status: ResponseStatus::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == ResponseStatus::Error
    }

    /// Convert into a `Result`, taking the value on success or the message on error.
    pub fn into_result(self) -> std::result::Result<Value, String> {
        match self.status {
            ResponseStatus::Success => Ok(self.result),
            ResponseStatus::Error => Err(self.error.unwrap_or_default()),
        }
    }
}

/// `{ "functions": [...] }` envelope returned by function listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionList {
    pub functions: Vec<FunctionDefinition>,
}
