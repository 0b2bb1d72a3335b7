// Copyright 2025 Cowboy AI, LLC.

//! Afferent/efferent coupling, instability and abstractness

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::category::object::metadata_bool;
use crate::category::{Category, Morphism, Object, ObjectKind};

/// Coupling record of one object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CouplingMetrics {
    /// Object the record describes
    pub object_id: String,
    /// Ca: incoming relationships
    pub afferent_coupling: usize,
    /// Ce: outgoing relationships
    pub efferent_coupling: usize,
    /// `Ce / (Ca + Ce)`, 0 when the object has no relationships
    pub instability: f64,
    /// Heuristic 0–1 score, see [`abstractness`]
    pub abstractness: f64,
}

impl CouplingMetrics {
    fn empty(object: &Object) -> Self {
        Self {
            object_id: object.id.clone(),
            afferent_coupling: 0,
            efferent_coupling: 0,
            instability: 0.0,
            abstractness: abstractness(object),
        }
    }

    /// `Ca + Ce`
    pub fn total_coupling(&self) -> usize {
        self.afferent_coupling + self.efferent_coupling
    }
}

/// Object ID → coupling record, in object insertion order
pub type CouplingMap = IndexMap<String, CouplingMetrics>;

/// Instability `I = Ce / (Ca + Ce)`
pub fn instability(afferent: usize, efferent: usize) -> f64 {
    let total = afferent + efferent;
    if total == 0 {
        return 0.0;
    }
    efferent as f64 / total as f64
}

/// How interface-like an object is
///
/// interface 1.0, struct 0.1, exported function 0.5, other function 0.2,
/// package 0.3, anything else 0.0. A non-boolean `is_exported` counts as
/// not exported.
pub fn abstractness(object: &Object) -> f64 {
    match object.kind {
        ObjectKind::Interface => 1.0,
        ObjectKind::Struct => 0.1,
        ObjectKind::Function => {
            if metadata_bool(&object.metadata, "is_exported") == Some(true) {
                0.5
            } else {
                0.2
            }
        }
        ObjectKind::Package => 0.3,
        _ => 0.0,
    }
}

/// Count coupling for every object, ignoring morphisms for which `skip` holds
///
/// Counting is per endpoint: an endpoint that is not a registered object is
/// ignored while the other endpoint still counts.
pub fn compute_coupling_excluding<P>(category: &Category, skip: P) -> CouplingMap
where
    P: Fn(&Morphism) -> bool,
{
    let mut metrics: CouplingMap = category
        .objects()
        .map(|object| (object.id.clone(), CouplingMetrics::empty(object)))
        .collect();

    for morphism in category.morphisms() {
        if skip(morphism) {
            continue;
        }
        if let Some(source) = metrics.get_mut(&morphism.source) {
            source.efferent_coupling += 1;
        }
        if let Some(target) = metrics.get_mut(&morphism.target) {
            target.afferent_coupling += 1;
        }
    }

    for record in metrics.values_mut() {
        record.instability = instability(record.afferent_coupling, record.efferent_coupling);
    }
    metrics
}

/// Coupling over all non-identity morphisms
pub fn compute_coupling(category: &Category) -> CouplingMap {
    compute_coupling_excluding(category, Morphism::is_identity)
}
