// Copyright 2025 Cowboy AI, LLC.

//! Objects - the software entities of a codebase category

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::kinds::ObjectKind;

/// Open mapping from string keys to arbitrary JSON values
///
/// Used for provenance (source file, line) and to drive heuristics
/// ("bases", "is_exported", "package").
pub type Metadata = serde_json::Map<String, Value>;

/// An object in a codebase category (file, module, type, function, package)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Object {
    /// Unique identifier within the owning category
    pub id: String,

    /// Kind of entity
    #[serde(rename = "type")]
    pub kind: ObjectKind,

    /// Display name, not required to be unique
    pub name: String,

    /// Provenance and heuristic inputs
    #[serde(default)]
    pub metadata: Metadata,
}

impl Object {
    /// Create an object with empty metadata
    pub fn new(id: impl Into<String>, kind: impl Into<ObjectKind>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            name: name.into(),
            metadata: Metadata::new(),
        }
    }

    /// Attach one metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Read a string field; a missing key or non-string value yields `None`
pub fn metadata_str<'a>(metadata: &'a Metadata, key: &str) -> Option<&'a str> {
    metadata.get(key).and_then(Value::as_str)
}

/// Read a boolean field; a missing key or non-bool value yields `None`
pub fn metadata_bool(metadata: &Metadata, key: &str) -> Option<bool> {
    metadata.get(key).and_then(Value::as_bool)
}

/// Read a list of strings; `None` unless the value is an array of strings only
pub fn metadata_str_list<'a>(metadata: &'a Metadata, key: &str) -> Option<Vec<&'a str>> {
    metadata
        .get(key)?
        .as_array()?
        .iter()
        .map(Value::as_str)
        .collect()
}

/// Append a string to an existing list field
///
/// Returns `false` and leaves the metadata untouched when the field is absent
/// or is not an array.
pub fn append_to_list(metadata: &mut Metadata, key: &str, item: &str) -> bool {
    match metadata.get_mut(key) {
        Some(Value::Array(items)) => {
            items.push(Value::String(item.to_string()));
            true
        }
        _ => false,
    }
}
