// Copyright 2025 Cowboy AI, LLC.

//! Layered dependency graph derived from a category
//!
//! Every object becomes a node carrying its coupling metrics and one of four
//! architectural layers. Every morphism except self-loops becomes an edge.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::coupling::{compute_coupling_excluding, CouplingMetrics};
use crate::category::{Category, Metadata, Morphism, Object, ObjectKind};

/// Number of architectural layers
pub const LAYER_COUNT: usize = 4;

/// Layer of stable, depended-upon nodes
pub const FOUNDATIONS: usize = 0;
/// Layer of nodes with very high efferent coupling
pub const CORE: usize = 1;
/// Default layer
pub const SUPPORT: usize = 2;
/// Layer of entry points
pub const APPLICATIONS: usize = 3;

/// Efferent coupling above which a node is placed in [`CORE`]
pub const CORE_EFFERENT_THRESHOLD: usize = 40;

/// Edge type given to edges whose endpoints sit in different layers
pub const CROSS_LAYER: &str = "cross_layer";

/// Edge type used when a morphism has an empty type
pub const DEFAULT_EDGE_TYPE: &str = "dependency";

const LAYER_NAMES: [&str; LAYER_COUNT] = ["Foundations", "Core", "Support", "Applications"];

const LAYER_DESCRIPTIONS: [&str; LAYER_COUNT] = [
    "Stable imports and external dependencies (I=0)",
    "Framework core with high efferent coupling",
    "Supporting modules and utilities",
    "Application code (I=1.0)",
];

/// A graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Node {
    /// Object ID
    pub id: String,
    /// Text after the last `/` of the ID
    pub label: String,
    /// Object kind
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    /// Assigned layer, 0–3
    pub layer: usize,
    /// Incoming edges
    pub afferent: usize,
    /// Outgoing edges
    pub efferent: usize,
    /// `efferent / (afferent + efferent)`
    pub instability: f64,
    /// Heuristic abstractness
    pub abstractness: f64,
    /// Object metadata, passed through
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Node {
    fn from_object(object: &Object, coupling: Option<&CouplingMetrics>) -> Self {
        let (afferent, efferent, instability, abstractness) = coupling.map_or(
            (0, 0, 0.0, 0.0),
            |m| (m.afferent_coupling, m.efferent_coupling, m.instability, m.abstractness),
        );
        let label = label_of(&object.id).to_string();
        let layer = assign_layer(afferent, efferent, instability, &object.kind, &label);

        Self {
            id: object.id.clone(),
            label,
            kind: object.kind.clone(),
            layer,
            afferent,
            efferent,
            instability,
            abstractness,
            metadata: object.metadata.clone(),
        }
    }

    /// `afferent + efferent`
    pub fn total_coupling(&self) -> usize {
        self.afferent + self.efferent
    }
}

/// A directed graph edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Edge {
    /// Source node ID
    pub source: String,
    /// Target node ID
    pub target: String,
    /// Morphism type, or [`CROSS_LAYER`]
    #[serde(rename = "type")]
    pub kind: String,
    /// Coupling strength
    pub weight: u32,
}

/// One architectural layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Layer {
    /// Layer index, 0–3
    pub id: usize,
    /// Display name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Member nodes, highest total coupling first
    pub node_ids: Vec<String>,
}

/// Summary statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GraphStats {
    /// Number of nodes
    pub total_nodes: usize,
    /// Number of edges
    pub total_edges: usize,
    /// Mean total coupling per node
    pub avg_coupling: f64,
    /// Highest total coupling of any node
    pub max_coupling: usize,
    /// Node count per layer
    pub layer_counts: [usize; LAYER_COUNT],
}

/// Attributes of one adjacency entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyEntry {
    /// Edge type
    #[serde(rename = "type")]
    pub kind: String,
    /// Edge weight
    pub weight: u32,
}

/// Source → target → edge attributes
pub type Adjacency = IndexMap<String, IndexMap<String, AdjacencyEntry>>;

/// Renderer-ready dependency graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Graph {
    /// Name of the source category
    pub name: String,
    /// Nodes by ID, in object insertion order
    pub nodes: IndexMap<String, Node>,
    /// Edges in morphism insertion order
    pub edges: Vec<Edge>,
    /// Exactly [`LAYER_COUNT`] layers
    pub layers: Vec<Layer>,
    /// Summary statistics
    pub stats: GraphStats,
    /// Whether the edge set was acyclic when the graph was built
    pub is_dag: bool,
}

/// Node selection criteria, all AND-combined
///
/// Zero minimums and empty lists mean "no constraint"; `max_nodes == 0`
/// means unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Minimum afferent coupling
    pub min_afferent: usize,
    /// Minimum efferent coupling
    pub min_efferent: usize,
    /// Minimum total coupling
    pub min_total_coupling: usize,
    /// Keep at most this many nodes, highest coupling first
    pub max_nodes: usize,
    /// Allowed layers
    pub layers: Vec<usize>,
    /// Allowed node types
    pub types: Vec<String>,
}

impl FilterOptions {
    fn admits(&self, node: &Node) -> bool {
        let total = node.total_coupling();
        (self.min_afferent == 0 || node.afferent >= self.min_afferent)
            && (self.min_efferent == 0 || node.efferent >= self.min_efferent)
            && (self.min_total_coupling == 0 || total >= self.min_total_coupling)
            && (self.layers.is_empty() || self.layers.contains(&node.layer))
            && (self.types.is_empty() || self.types.iter().any(|t| t == node.kind.as_str()))
    }
}

/// Text after the last `/` of an ID, or the whole ID
pub fn label_of(id: &str) -> &str {
    id.rsplit_once('/').map_or(id, |(_, tail)| tail)
}

/// Heuristic layer of a node; first matching rule wins
///
/// 1. [`FOUNDATIONS`] when nothing is depended on (`I == 0`) and `Ca > 0`
/// 2. [`APPLICATIONS`] when `I == 1`, `Ce > 0`, `Ca == 0` and the label is
///    `main.go` or the type is `example`
/// 3. [`CORE`] when `Ce > 40`
/// 4. [`SUPPORT`] otherwise
pub fn assign_layer(
    afferent: usize,
    efferent: usize,
    instability: f64,
    kind: &ObjectKind,
    label: &str,
) -> usize {
    if instability == 0.0 && afferent > 0 {
        return FOUNDATIONS;
    }
    if instability == 1.0
        && efferent > 0
        && afferent == 0
        && (label == "main.go" || *kind == ObjectKind::Example)
    {
        return APPLICATIONS;
    }
    if efferent > CORE_EFFERENT_THRESHOLD {
        return CORE;
    }
    SUPPORT
}

fn empty_layers() -> Vec<Layer> {
    (0..LAYER_COUNT)
        .map(|id| Layer {
            id,
            name: LAYER_NAMES[id].to_string(),
            description: LAYER_DESCRIPTIONS[id].to_string(),
            node_ids: Vec::new(),
        })
        .collect()
}

/// Builds a [`Graph`] from a category
pub struct GraphBuilder<'a> {
    category: &'a Category,
}

impl<'a> GraphBuilder<'a> {
    /// Create a builder borrowing `category`
    pub fn new(category: &'a Category) -> Self {
        Self { category }
    }

    /// Build the graph
    pub fn build(&self) -> Graph {
        let coupling = compute_coupling_excluding(self.category, Morphism::is_self_loop);

        let nodes: IndexMap<String, Node> = self
            .category
            .objects()
            .map(|object| {
                let node = Node::from_object(object, coupling.get(&object.id));
                (node.id.clone(), node)
            })
            .collect();

        let mut layers = empty_layers();
        for node in nodes.values() {
            layers[node.layer].node_ids.push(node.id.clone());
        }
        for layer in &mut layers {
            layer
                .node_ids
                .sort_by_key(|id| Reverse(nodes.get(id).map_or(0, Node::total_coupling)));
        }

        let edges = self
            .category
            .morphisms()
            .filter(|m| !m.is_self_loop())
            .map(|m| classify_edge(m, &nodes))
            .collect();

        let mut graph = Graph {
            name: self.category.name().to_string(),
            nodes,
            edges,
            layers,
            stats: GraphStats::default(),
            is_dag: true,
        };
        graph.refresh_stats();
        graph.is_dag = graph.compute_is_dag();

        debug!(
            graph = %graph.name,
            nodes = graph.stats.total_nodes,
            edges = graph.stats.total_edges,
            is_dag = graph.is_dag,
            "graph built"
        );
        graph
    }
}

fn classify_edge(morphism: &Morphism, nodes: &IndexMap<String, Node>) -> Edge {
    let mut kind = match morphism.kind.as_str() {
        "" => DEFAULT_EDGE_TYPE.to_string(),
        other => other.to_string(),
    };
    if let (Some(source), Some(target)) = (nodes.get(&morphism.source), nodes.get(&morphism.target)) {
        if source.layer != target.layer {
            kind = CROSS_LAYER.to_string();
        }
    }

    Edge {
        source: morphism.source.clone(),
        target: morphism.target.clone(),
        kind,
        weight: 1,
    }
}

impl Graph {
    /// Recompute node/edge counts, coupling aggregates and layer counts
    pub fn refresh_stats(&mut self) {
        let mut stats = GraphStats {
            total_nodes: self.nodes.len(),
            total_edges: self.edges.len(),
            ..GraphStats::default()
        };

        let mut total = 0;
        for node in self.nodes.values() {
            let coupling = node.total_coupling();
            total += coupling;
            stats.max_coupling = stats.max_coupling.max(coupling);
            if let Some(count) = stats.layer_counts.get_mut(node.layer) {
                *count += 1;
            }
        }
        if stats.total_nodes > 0 {
            stats.avg_coupling = total as f64 / stats.total_nodes as f64;
        }
        self.stats = stats;
    }

    /// Whether the current edge set is acyclic
    ///
    /// `is_dag` is fixed at build time; derived graphs call this to get an
    /// up-to-date answer.
    pub fn compute_is_dag(&self) -> bool {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &self.edges {
            adjacency
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut on_stack: HashSet<&str> = HashSet::new();
        for root in self.nodes.keys() {
            if visited.contains(root.as_str()) {
                continue;
            }

            // (node, index of the next outgoing edge to follow)
            let mut frames: Vec<(&str, usize)> = vec![(root.as_str(), 0)];
            visited.insert(root.as_str());
            on_stack.insert(root.as_str());

            while let Some(frame) = frames.last_mut() {
                let (node, next) = *frame;
                let Some(&target) = adjacency.get(node).and_then(|targets| targets.get(next)) else {
                    frames.pop();
                    on_stack.remove(node);
                    continue;
                };
                frame.1 += 1;

                if on_stack.contains(target) {
                    return false;
                }
                if visited.insert(target) {
                    on_stack.insert(target);
                    frames.push((target, 0));
                }
            }
        }
        true
    }

    /// Subgraph of the nodes admitted by `options`
    ///
    /// Survivors are ranked by total coupling (stable, highest first) before
    /// the `max_nodes` cap applies. Edges survive when both endpoints do.
    /// `is_dag` is carried over from `self`.
    pub fn filter(&self, options: &FilterOptions) -> Graph {
        let mut candidates: Vec<&Node> = self.nodes.values().filter(|n| options.admits(n)).collect();
        candidates.sort_by_key(|n| Reverse(n.total_coupling()));
        if options.max_nodes > 0 {
            candidates.truncate(options.max_nodes);
        }

        let mut layers = empty_layers();
        let mut nodes = IndexMap::with_capacity(candidates.len());
        for node in candidates {
            if let Some(layer) = layers.get_mut(node.layer) {
                layer.node_ids.push(node.id.clone());
            }
            nodes.insert(node.id.clone(), node.clone());
        }

        let edges = self
            .edges
            .iter()
            .filter(|e| nodes.contains_key(&e.source) && nodes.contains_key(&e.target))
            .cloned()
            .collect();

        let mut filtered = Graph {
            name: self.name.clone(),
            nodes,
            edges,
            layers,
            stats: GraphStats::default(),
            is_dag: self.is_dag,
        };
        filtered.refresh_stats();
        filtered
    }

    /// Subgraph of one layer plus the targets of its outgoing edges
    ///
    /// Context nodes keep their own layer. Out-of-range layers return an
    /// unchanged copy. `is_dag` is carried over from `self`.
    pub fn extract_layer(&self, layer: usize) -> Graph {
        if layer >= LAYER_COUNT || layer >= self.layers.len() {
            return self.clone();
        }

        let mut layers = empty_layers();
        let mut nodes: IndexMap<String, Node> = IndexMap::new();
        for id in &self.layers[layer].node_ids {
            if let Some(node) = self.nodes.get(id) {
                nodes.insert(id.clone(), node.clone());
                layers[layer].node_ids.push(id.clone());
            }
        }

        let mut edges = Vec::new();
        for edge in &self.edges {
            let (Some(source), Some(target)) = (self.nodes.get(&edge.source), self.nodes.get(&edge.target)) else {
                continue;
            };
            if source.layer != layer {
                continue;
            }
            if !nodes.contains_key(&target.id) {
                nodes.insert(target.id.clone(), target.clone());
                if let Some(context_layer) = layers.get_mut(target.layer) {
                    context_layer.node_ids.push(target.id.clone());
                }
            }
            edges.push(edge.clone());
        }

        let mut subgraph = Graph {
            name: format!("{}_layer{}", self.name, layer),
            nodes,
            edges,
            layers,
            stats: GraphStats::default(),
            is_dag: self.is_dag,
        };
        subgraph.refresh_stats();
        subgraph
    }

    /// Adjacency list view of the edges
    ///
    /// A later parallel edge overwrites an earlier one.
    pub fn to_adjacency(&self) -> Adjacency {
        let mut adjacency = Adjacency::new();
        for edge in &self.edges {
            adjacency.entry(edge.source.clone()).or_default().insert(
                edge.target.clone(),
                AdjacencyEntry {
                    kind: edge.kind.clone(),
                    weight: edge.weight,
                },
            );
        }
        adjacency
    }

    /// Node lookup
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }
}
