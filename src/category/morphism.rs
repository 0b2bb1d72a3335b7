// Copyright 2025 Cowboy AI, LLC.

//! Morphisms - typed, directed relationships between objects
//!
//! Endpoints are plain object IDs. Constructing a morphism never checks that
//! they resolve; only `Category::add_morphism` enforces referential integrity.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::kinds::MorphismKind;
use super::object::Metadata;

/// Prefix of the synthesized identity morphism ID
pub const IDENTITY_PREFIX: &str = "id_";

/// A morphism `source → target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Morphism {
    /// Unique identifier within the owning category
    pub id: String,

    /// Source object ID (domain)
    pub source: String,

    /// Target object ID (codomain)
    pub target: String,

    /// Kind of relationship
    #[serde(rename = "type")]
    pub kind: MorphismKind,

    /// Provenance and aggregation data
    #[serde(default)]
    pub metadata: Metadata,
}

impl Morphism {
    /// Create a morphism with empty metadata
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        kind: impl Into<MorphismKind>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind: kind.into(),
            metadata: Metadata::new(),
        }
    }

    /// The identity morphism `id_A : A → A`
    pub fn identity(object_id: &str) -> Self {
        Self::new(
            format!("{IDENTITY_PREFIX}{object_id}"),
            object_id,
            object_id,
            MorphismKind::Identity,
        )
        .with_metadata("is_identity", true)
    }

    /// Attach one metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether this is an identity-typed morphism
    pub fn is_identity(&self) -> bool {
        self.kind == MorphismKind::Identity
    }

    /// Whether source and target coincide
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// `self` then `other` is defined when `target(self) == source(other)`
    pub fn is_composable_with(&self, other: &Morphism) -> bool {
        self.target == other.source
    }

    /// Whether two morphisms span the same `(source, target)` pair
    ///
    /// Law checks compare morphisms at this level only.
    pub fn same_endpoints(&self, other: &Morphism) -> bool {
        self.source == other.source && self.target == other.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_morphism_composability() {
        let f = Morphism::new("f", "A", "B", "dependency");
        let g = Morphism::new("g", "B", "C", "dependency");

        assert!(f.is_composable_with(&g));
        assert!(!g.is_composable_with(&f));
    }

    #[test]
    fn identity_shape() {
        let id = Morphism::identity("A");
        assert_eq!(id.id, "id_A");
        assert!(id.is_identity());
        assert!(id.is_self_loop());
        assert_eq!(id.metadata.get("is_identity"), Some(&Value::Bool(true)));
    }

    #[test]
    fn self_loop_is_not_identity() {
        let recursion = Morphism::new("rec", "A", "A", MorphismKind::FunctionCall);
        assert!(recursion.is_self_loop());
        assert!(!recursion.is_identity());
    }
}
