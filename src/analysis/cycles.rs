// Copyright 2025 Cowboy AI, LLC.

//! Dependency cycle detection

use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// One detected dependency cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Cycle {
    /// Object IDs along the cycle, starting at the re-entered object
    pub objects: Vec<String>,
    /// Number of objects in the cycle
    pub length: usize,
}

/// Finds cycles among non-identity morphisms by depth-first search
///
/// Each back edge found during the search yields one record, so graphs with
/// shared sub-cycles produce overlapping records. They are not deduplicated.
pub struct CycleAnalyzer<'a> {
    category: &'a Category,
}

struct Search<'a> {
    adjacency: HashMap<&'a str, Vec<&'a str>>,
    visited: HashSet<&'a str>,
    on_stack: HashSet<&'a str>,
    path: Vec<&'a str>,
    cycles: Vec<Cycle>,
}

impl<'a> CycleAnalyzer<'a> {
    /// Create an analyzer borrowing `category`
    pub fn new(category: &'a Category) -> Self {
        Self { category }
    }

    /// All cycle records, in discovery order
    pub fn find_cycles(&self) -> Vec<Cycle> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for m in self.category.non_identity_morphisms() {
            adjacency
                .entry(m.source.as_str())
                .or_default()
                .push(m.target.as_str());
        }

        let mut search = Search {
            adjacency,
            visited: HashSet::new(),
            on_stack: HashSet::new(),
            path: Vec::new(),
            cycles: Vec::new(),
        };

        for object in self.category.objects() {
            if !search.visited.contains(object.id.as_str()) {
                self.visit(&mut search, &object.id);
            }
        }
        search.cycles
    }

    /// Whether at least one cycle exists
    pub fn has_cycles(&self) -> bool {
        !self.find_cycles().is_empty()
    }

    /// Depth-first search from `start` with an explicit frame stack
    ///
    /// Each frame is a node and the index of its next neighbor to examine, so
    /// path depth is bounded by memory rather than by the thread stack.
    fn visit(&self, search: &mut Search<'a>, start: &'a str) {
        let mut frames: Vec<(&'a str, usize)> = vec![(start, 0)];
        search.enter(start);

        while let Some(frame) = frames.last_mut() {
            let (node, next) = *frame;
            let neighbor = search
                .adjacency
                .get(node)
                .and_then(|targets| targets.get(next))
                .copied();

            let Some(neighbor) = neighbor else {
                frames.pop();
                search.path.pop();
                search.on_stack.remove(node);
                continue;
            };
            frame.1 += 1;

            if !self.category.contains_object(neighbor) {
                continue;
            }
            if !search.visited.contains(neighbor) {
                search.enter(neighbor);
                frames.push((neighbor, 0));
            } else if search.on_stack.contains(neighbor) {
                search.record_cycle(neighbor);
            }
        }
    }
}

impl<'a> Search<'a> {
    fn enter(&mut self, node: &'a str) {
        self.visited.insert(node);
        self.on_stack.insert(node);
        self.path.push(node);
    }

    fn record_cycle(&mut self, reentered: &str) {
        if let Some(start) = self.path.iter().position(|n| *n == reentered) {
            let objects: Vec<String> = self.path[start..].iter().map(|n| n.to_string()).collect();
            self.cycles.push(Cycle {
                length: objects.len(),
                objects,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Morphism, Object};

    fn category(ids: &[&str], edges: &[(&str, &str)]) -> Category {
        let mut category = Category::new("cycles");
        for id in ids {
            category.add_object(Object::new(*id, "module", *id)).unwrap();
        }
        for (i, (source, target)) in edges.iter().enumerate() {
            category
                .add_morphism(Morphism::new(format!("m{i}"), *source, *target, "import"))
                .unwrap();
        }
        category
    }

    #[test]
    fn test_three_cycle() {
        let category = category(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
        let cycles = CycleAnalyzer::new(&category).find_cycles();

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].objects, vec!["A", "B", "C"]);
        assert_eq!(cycles[0].length, 3);
    }

    #[test]
    fn acyclic_chain_has_no_cycles() {
        let category = category(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        assert!(!CycleAnalyzer::new(&category).has_cycles());
    }

    #[test]
    fn identities_are_not_cycles() {
        let category = category(&["A"], &[]);
        assert!(CycleAnalyzer::new(&category).find_cycles().is_empty());
    }

    #[test]
    fn self_loop_is_a_cycle_of_one() {
        let category = category(&["A"], &[("A", "A")]);
        let cycles = CycleAnalyzer::new(&category).find_cycles();
        assert_eq!(cycles, vec![Cycle { objects: vec!["A".to_string()], length: 1 }]);
    }

    #[test]
    fn shared_sub_cycles_are_reported_separately() {
        // A→B→A and A→B→C→A share the A→B edge
        let category = category(
            &["A", "B", "C"],
            &[("A", "B"), ("B", "A"), ("B", "C"), ("C", "A")],
        );
        let cycles = CycleAnalyzer::new(&category).find_cycles();
        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles[0].objects, vec!["A", "B"]);
        assert_eq!(cycles[1].objects, vec!["A", "B", "C"]);
    }
}
