// Copyright 2025 Cowboy AI, LLC.

//! Codebase categories - representing a codebase as a category
//!
//! - Objects are software entities (files, types, functions, packages)
//! - Morphisms are relationships (imports, calls, inheritance, type references)
//! - Composition is relationship chaining
//! - Identity is the trivial self-relationship every object owns

use std::collections::HashMap;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use super::kinds::MorphismKind;
use super::morphism::Morphism;
use super::object::{Metadata, Object};
use crate::config::VerificationConfig;
use crate::errors::{CategoryError, CategoryResult, Law};

/// A codebase modeled as a category
///
/// Storage preserves insertion order, so every iteration (and therefore
/// every sampled law check and every serialization) is deterministic for a
/// given sequence of insertions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Category {
    name: String,

    #[serde(default)]
    objects: IndexMap<String, Object>,

    /// All morphisms, identities included
    #[serde(default)]
    morphisms: IndexMap<String, Morphism>,

    /// Object ID → its identity morphism (an index into `morphisms`)
    #[serde(default)]
    identities: IndexMap<String, Morphism>,
}

/// Object and morphism counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryStats {
    /// Number of objects
    pub objects: usize,
    /// Number of non-identity morphisms
    pub morphisms: usize,
    /// Number of identity morphisms
    pub identities: usize,
}

impl Category {
    /// Create an empty category
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Name of the category
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add an object together with its identity morphism `id_<ID>`
    ///
    /// Both insertions happen or neither does.
    pub fn add_object(&mut self, object: Object) -> CategoryResult<()> {
        if self.objects.contains_key(&object.id) {
            return Err(CategoryError::AlreadyExists {
                kind: "object",
                id: object.id,
            });
        }

        let identity = Morphism::identity(&object.id);
        if self.morphisms.contains_key(&identity.id) {
            return Err(CategoryError::AlreadyExists {
                kind: "morphism",
                id: identity.id,
            });
        }

        debug!(object = %object.id, kind = %object.kind, "adding object");
        self.identities.insert(object.id.clone(), identity.clone());
        self.morphisms.insert(identity.id.clone(), identity);
        self.objects.insert(object.id.clone(), object);

        Ok(())
    }

    /// Add a morphism whose endpoints are already registered objects
    ///
    /// Identity-typed morphisms are rejected; they only exist alongside
    /// their object. On failure the category is left unchanged.
    pub fn add_morphism(&mut self, morphism: Morphism) -> CategoryResult<()> {
        if morphism.is_identity() {
            return Err(CategoryError::StandaloneIdentity(morphism.id));
        }
        if !self.objects.contains_key(&morphism.source) {
            return Err(CategoryError::DanglingEndpoint {
                morphism: morphism.id,
                endpoint: "source",
                object: morphism.source,
            });
        }
        if !self.objects.contains_key(&morphism.target) {
            return Err(CategoryError::DanglingEndpoint {
                morphism: morphism.id,
                endpoint: "target",
                object: morphism.target,
            });
        }
        if self.morphisms.contains_key(&morphism.id) {
            return Err(CategoryError::AlreadyExists {
                kind: "morphism",
                id: morphism.id,
            });
        }

        debug!(
            morphism = %morphism.id,
            source = %morphism.source,
            target = %morphism.target,
            "adding morphism"
        );
        self.morphisms.insert(morphism.id.clone(), morphism);
        Ok(())
    }

    /// Look up an object
    pub fn object(&self, id: &str) -> Option<&Object> {
        self.objects.get(id)
    }

    /// Look up a morphism (identities included)
    pub fn morphism(&self, id: &str) -> Option<&Morphism> {
        self.morphisms.get(id)
    }

    /// Identity morphism of an object
    pub fn identity(&self, object_id: &str) -> Option<&Morphism> {
        self.identities.get(object_id)
    }

    /// Whether an object ID is registered
    pub fn contains_object(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    /// All objects in insertion order
    pub fn objects(&self) -> impl Iterator<Item = &Object> + '_ {
        self.objects.values()
    }

    /// All morphisms in insertion order, identities included
    pub fn morphisms(&self) -> impl Iterator<Item = &Morphism> + '_ {
        self.morphisms.values()
    }

    /// All morphisms except identity-typed ones
    pub fn non_identity_morphisms(&self) -> impl Iterator<Item = &Morphism> + '_ {
        self.morphisms.values().filter(|m| !m.is_identity())
    }

    /// Object ID → identity morphism
    pub fn identities(&self) -> &IndexMap<String, Morphism> {
        &self.identities
    }

    /// Number of objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub(crate) fn object_metadata_mut(&mut self, id: &str) -> Option<&mut Metadata> {
        self.objects.get_mut(id).map(|o| &mut o.metadata)
    }

    pub(crate) fn morphism_metadata_mut(&mut self, id: &str) -> Option<&mut Metadata> {
        self.morphisms
            .get_mut(id)
            .filter(|m| !m.is_identity())
            .map(|m| &mut m.metadata)
    }

    /// Compose `f: A → B` with `g: B → C`, giving `g ∘ f : A → C`
    ///
    /// The result is a new morphism; the category is not modified.
    pub fn compose(&self, f: &Morphism, g: &Morphism) -> CategoryResult<Morphism> {
        if !f.is_composable_with(g) {
            return Err(CategoryError::NotComposable {
                first: f.id.clone(),
                second: g.id.clone(),
                first_target: f.target.clone(),
                second_source: g.source.clone(),
            });
        }

        Ok(Morphism::new(
            format!("{}∘{}", g.id, f.id),
            f.source.clone(),
            g.target.clone(),
            MorphismKind::Composed,
        )
        .with_metadata("composed_from", json!([f.id, g.id])))
    }

    /// Verify the identity and (sampled) associativity laws with default caps
    pub fn verify_axioms(&self) -> CategoryResult<()> {
        self.verify_axioms_with(&VerificationConfig::default())
    }

    /// Verify category axioms
    ///
    /// Identity laws are checked for every non-identity morphism. Associativity
    /// is checked on at most `max_associativity_checks` composable triples, so
    /// a pass is not a proof for the triples beyond the sample. Equality is
    /// endpoint equality.
    pub fn verify_axioms_with(&self, config: &VerificationConfig) -> CategoryResult<()> {
        for m in self.non_identity_morphisms() {
            if let Some(id_target) = self.identities.get(&m.target) {
                let composed = self.compose(m, id_target).map_err(|e| {
                    CategoryError::law(Law::LeftIdentity, format!("{}: {}", m.id, e))
                })?;
                if !composed.same_endpoints(m) {
                    return Err(CategoryError::law(Law::LeftIdentity, m.id.clone()));
                }
            }

            if let Some(id_source) = self.identities.get(&m.source) {
                let composed = self.compose(id_source, m).map_err(|e| {
                    CategoryError::law(Law::RightIdentity, format!("{}: {}", m.id, e))
                })?;
                if !composed.same_endpoints(m) {
                    return Err(CategoryError::law(Law::RightIdentity, m.id.clone()));
                }
            }
        }

        let checked = self.verify_associativity(config.max_associativity_checks)?;
        info!(
            category = %self.name,
            sampled_triples = checked,
            "category axioms verified"
        );
        Ok(())
    }

    fn verify_associativity(&self, max_checks: usize) -> CategoryResult<usize> {
        let mut by_source: HashMap<&str, Vec<&Morphism>> = HashMap::new();
        for m in self.morphisms.values() {
            by_source.entry(m.source.as_str()).or_default().push(m);
        }

        let mut checked = 0;
        for f in self.morphisms.values() {
            for g in by_source.get(f.target.as_str()).into_iter().flatten() {
                for h in by_source.get(g.target.as_str()).into_iter().flatten() {
                    if checked >= max_checks {
                        return Ok(checked);
                    }

                    // (h ∘ g) ∘ f
                    let left = self.compose(f, &self.compose(g, h)?)?;
                    // h ∘ (g ∘ f)
                    let right = self.compose(&self.compose(f, g)?, h)?;

                    if !left.same_endpoints(&right) {
                        return Err(CategoryError::law(
                            Law::Associativity,
                            format!(
                                "({}∘{})∘{} != {}∘({}∘{})",
                                h.id, g.id, f.id, h.id, g.id, f.id
                            ),
                        ));
                    }
                    checked += 1;
                }
            }
        }
        Ok(checked)
    }

    /// Counts of objects, non-identity morphisms and identities
    pub fn stats(&self) -> CategoryStats {
        CategoryStats {
            objects: self.objects.len(),
            morphisms: self.non_identity_morphisms().count(),
            identities: self.identities.len(),
        }
    }

    /// Rebuild the object → identity index from the stored morphisms
    ///
    /// Models written by extractors list identities only among the morphisms.
    /// Each object adopts its `id_<ID>` morphism when that is an identity on
    /// the object; a missing one is synthesized. An `id_<ID>` morphism of any
    /// other shape is left alone, so `check_integrity` still reports it.
    pub fn rebuild_identities(&mut self) {
        let mut identities = IndexMap::with_capacity(self.objects.len());
        let mut synthesized = 0;

        for object_id in self.objects.keys() {
            let expected = Morphism::identity(object_id);
            match self.morphisms.get(&expected.id) {
                Some(existing) => {
                    if existing.is_identity()
                        && existing.is_self_loop()
                        && existing.source == *object_id
                    {
                        identities.insert(object_id.clone(), existing.clone());
                    }
                }
                None => {
                    self.morphisms.insert(expected.id.clone(), expected.clone());
                    identities.insert(object_id.clone(), expected);
                    synthesized += 1;
                }
            }
        }

        debug!(
            category = %self.name,
            identities = identities.len(),
            synthesized,
            "identity index rebuilt"
        );
        self.identities = identities;
    }

    /// Check the identity invariant on a category that did not come from
    /// `add_object` (for example one deserialized from disk)
    ///
    /// Non-identity morphisms with unresolved endpoints are tolerated.
    pub fn check_integrity(&self) -> CategoryResult<()> {
        for (object_id, identity) in &self.identities {
            if !self.objects.contains_key(object_id) {
                return Err(CategoryError::InvariantViolation(format!(
                    "identity registered for unknown object {object_id}"
                )));
            }
            if identity.source != *object_id || identity.target != *object_id {
                return Err(CategoryError::InvariantViolation(format!(
                    "identity {} has wrong source/target for {}",
                    identity.id, object_id
                )));
            }
            if !self.morphisms.contains_key(&identity.id) {
                return Err(CategoryError::InvariantViolation(format!(
                    "identity {} missing from morphisms",
                    identity.id
                )));
            }
        }

        if let Some(orphan) = self
            .objects
            .keys()
            .find(|id| !self.identities.contains_key(*id))
        {
            return Err(CategoryError::InvariantViolation(format!(
                "object {orphan} has no identity morphism"
            )));
        }

        Ok(())
    }
}
