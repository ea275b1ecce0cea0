//! Cache key derivation.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::types::Parameters;

/// Key of a cached call: SHA-256 hex digest of `name:canonical-parameters`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a call. Parameter key order does not matter.
    pub fn for_call(name: &str, parameters: &Parameters) -> Self {
        let canonical = canonical_json(&Value::Object(parameters.clone()));
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update(b":");
        hasher.update(canonical.as_bytes());
        let hash: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialize with object keys sorted at every depth.
pub fn canonical_json(value: &Value) -> String {
    sorted(value).to_string()
}

// `Map` keeps insertion order, so rebuild objects from sorted keys.
fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let rebuilt: Map<String, Value> = keys
                .into_iter()
                .map(|k| (k.clone(), sorted(&map[k.as_str()])))
                .collect();
            Value::Object(rebuilt)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}
