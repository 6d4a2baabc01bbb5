//! Circular prerequisite detection.
//!
//! Depth-first search over prerequisite edges with an on-stack set. When a
//! node already on the stack is reached again, every node on the stack from
//! its first occurrence onward is part of a cycle. Prerequisites naming
//! paths outside the graph are dead ends; reporting them is the structural
//! validator's job.

use std::collections::HashSet;

use petgraph::algo::toposort;
use serde::{Deserialize, Serialize};

use crate::RelationshipGraph;

/// Outcome of a cycle search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    /// Whether any cycle was found.
    #[serde(rename = "hasCircularDependencies")]
    pub has_cycles: bool,
    /// Every path on a discovered cycle, in discovery order, without repeats.
    pub circular_paths: Vec<String>,
}

impl CycleReport {
    fn from_paths(circular_paths: Vec<String>) -> Self {
        Self {
            has_cycles: !circular_paths.is_empty(),
            circular_paths,
        }
    }
}

/// Find every path that lies on a prerequisite cycle anywhere in the graph.
///
/// Roots are taken in graph order and each cycle reachable from them is
/// unioned into the report.
pub fn detect_cycles(graph: &RelationshipGraph) -> CycleReport {
    let (digraph, _) = graph.prerequisite_digraph();
    if toposort(&digraph, None).is_ok() {
        return CycleReport::default();
    }

    let mut search = CycleSearch::new(graph);
    for id in graph.ids() {
        if !search.visited.contains(id) {
            search.visit(id);
        }
    }

    log::debug!("Detected {} path(s) on prerequisite cycles", search.found.len());
    CycleReport::from_paths(search.found)
}

/// Find prerequisite cycles reachable from `path_id`.
///
/// Returns an empty report when `path_id` is not in the graph.
pub fn detect_cycles_from(graph: &RelationshipGraph, path_id: &str) -> CycleReport {
    if !graph.contains(path_id) {
        return CycleReport::default();
    }

    let mut search = CycleSearch::new(graph);
    search.visit(path_id);
    CycleReport::from_paths(search.found)
}

struct CycleSearch<'g> {
    graph: &'g RelationshipGraph,
    visited: HashSet<&'g str>,
    on_stack: HashSet<&'g str>,
    stack: Vec<&'g str>,
    found: Vec<String>,
    found_set: HashSet<&'g str>,
}

impl<'g> CycleSearch<'g> {
    fn new(graph: &'g RelationshipGraph) -> Self {
        Self {
            graph,
            visited: HashSet::new(),
            on_stack: HashSet::new(),
            stack: Vec::new(),
            found: Vec::new(),
            found_set: HashSet::new(),
        }
    }

    fn visit(&mut self, id: &'g str) {
        if self.on_stack.contains(id) {
            self.record_cycle(id);
            return;
        }
        if !self.visited.insert(id) {
            return;
        }

        let graph = self.graph;
        let Some(descriptor) = graph.get(id) else {
            return;
        };

        self.on_stack.insert(id);
        self.stack.push(id);

        for prereq in &descriptor.prerequisites {
            self.visit(prereq.as_str());
        }

        self.stack.pop();
        self.on_stack.remove(id);
    }

    fn record_cycle(&mut self, id: &'g str) {
        let Some(start) = self.stack.iter().position(|p| *p == id) else {
            return;
        };
        for &member in &self.stack[start..] {
            if self.found_set.insert(member) {
                self.found.push(member.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PathDescriptor;
    use crate::test_utils::{cyclic_catalog, sample_catalog};
    use pathway_core::Level;

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    // ------------------------------------------------------------------------
    // Whole graph
    // ------------------------------------------------------------------------

    #[test]
    fn test_acyclic_catalog() {
        let report = detect_cycles(&sample_catalog());
        assert!(!report.has_cycles);
        assert!(report.circular_paths.is_empty());
    }

    #[test]
    fn test_three_node_cycle() {
        let report = detect_cycles(&cyclic_catalog());
        assert!(report.has_cycles);
        assert_eq!(sorted(report.circular_paths), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_self_loop() {
        let mut graph = RelationshipGraph::new();
        graph.insert("a", PathDescriptor::new("a", Level::Beginner).with_prerequisites(["a"]));
        let report = detect_cycles(&graph);
        assert!(report.has_cycles);
        assert_eq!(report.circular_paths, vec!["a"]);
    }

    #[test]
    fn test_tail_into_cycle_is_not_reported() {
        let mut graph = cyclic_catalog();
        graph.insert("d", PathDescriptor::new("d", Level::Advanced).with_prerequisites(["a"]));

        let report = detect_cycles(&graph);
        assert!(!report.circular_paths.contains(&"d".to_string()));
        assert_eq!(report.circular_paths.len(), 3);
    }

    #[test]
    fn test_two_disjoint_cycles_are_unioned() {
        let mut graph = cyclic_catalog();
        graph.insert("x", PathDescriptor::new("x", Level::Beginner).with_prerequisites(["y"]));
        graph.insert("y", PathDescriptor::new("y", Level::Beginner).with_prerequisites(["x"]));

        let report = detect_cycles(&graph);
        assert_eq!(sorted(report.circular_paths), vec!["a", "b", "c", "x", "y"]);
    }

    #[test]
    fn test_missing_prerequisite_is_dead_end() {
        let mut graph = RelationshipGraph::new();
        graph.insert("a", PathDescriptor::new("a", Level::Beginner).with_prerequisites(["ghost"]));
        assert!(!detect_cycles(&graph).has_cycles);
    }

    // ------------------------------------------------------------------------
    // Single path
    // ------------------------------------------------------------------------

    #[test]
    fn test_detect_from_path_on_cycle() {
        let report = detect_cycles_from(&cyclic_catalog(), "b");
        assert!(report.has_cycles);
        assert_eq!(sorted(report.circular_paths), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_detect_from_path_leading_into_cycle() {
        let mut graph = cyclic_catalog();
        graph.insert("d", PathDescriptor::new("d", Level::Advanced).with_prerequisites(["a"]));

        let report = detect_cycles_from(&graph, "d");
        assert!(report.has_cycles);
        assert!(!report.circular_paths.contains(&"d".to_string()));
    }

    #[test]
    fn test_detect_from_unaffected_path() {
        let mut graph = cyclic_catalog();
        graph.insert("solo", PathDescriptor::new("solo", Level::Beginner));

        assert!(!detect_cycles_from(&graph, "solo").has_cycles);
        assert!(!detect_cycles_from(&graph, "unknown").has_cycles);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = detect_cycles(&cyclic_catalog());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["hasCircularDependencies"], true);
        assert!(json["circularPaths"].is_array());
    }
}
