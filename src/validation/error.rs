//! Error type for call validation.

use std::fmt;

/// Validation error with location information.
///
/// Carries where in the parameters the violation happened and which schema
/// keyword rejected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error message describing what went wrong
    pub message: String,
    /// JSON pointer to the offending value inside the parameters (e.g., "/a", "/items/0")
    pub path: Option<String>,
    /// JSON pointer to the schema keyword that failed (e.g., "/required", "/properties/a/type")
    pub schema_path: Option<String>,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(
        message: impl Into<String>,
        path: Option<String>,
        schema_path: Option<String>,
    ) -> Self {
        Self {
            message: message.into(),
            path,
            schema_path,
        }
    }

    /// Create an error without location.
    pub fn without_path(message: impl Into<String>) -> Self {
        Self::new(message, None, None)
    }

    /// Instance path split into segments, for programmatic inspection.
    pub fn path_segments(&self) -> Vec<String> {
        split_pointer(self.path.as_deref())
    }

    /// Schema path split into segments.
    pub fn schema_path_segments(&self) -> Vec<String> {
        split_pointer(self.schema_path.as_deref())
    }
}

fn split_pointer(pointer: Option<&str>) -> Vec<String> {
    pointer
        .unwrap_or_default()
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect()
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path.as_deref() {
            Some(path) if !path.is_empty() => write!(f, "{} (at {})", self.message, path),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_and_without_path() {
        let error = ValidationError::new(
            "Invalid function parameters: \"x\" is not of type \"number\"",
            Some("/a".into()),
            Some("/properties/a/type".into()),
        );
        assert_eq!(
            error.to_string(),
            "Invalid function parameters: \"x\" is not of type \"number\" (at /a)"
        );

        let root = ValidationError::new("missing", Some(String::new()), Some("/required".into()));
        assert_eq!(root.to_string(), "missing");
    }

    #[test]
    fn test_pointer_segments() {
        let error = ValidationError::new(
            "bad",
            Some("/items/0/a~1b".into()),
            Some("/properties/items/items/type".into()),
        );
        assert_eq!(error.path_segments(), vec!["items", "0", "a/b"]);
        assert_eq!(
            error.schema_path_segments(),
            vec!["properties", "items", "items", "type"]
        );
        assert!(ValidationError::without_path("x").path_segments().is_empty());
    }
}
