//! Catalog statistics, grouping lookups, and dependency graph export.
//!
//! Provides functions for analysing catalog composition, including level
//! and category breakdowns and the most-required prerequisite.

use std::collections::BTreeMap;

use pathway_core::Level;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::RelationshipGraph;

const UNCATEGORIZED: &str = "uncategorized";

// ============================================================================
// Types
// ============================================================================

/// Summary statistics for a catalog.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of paths.
    pub path_count: usize,
    /// Prerequisite references between existing paths.
    pub prerequisite_edge_count: usize,
    /// Related-path references (including dangling ones).
    pub related_edge_count: usize,
    /// Explicit conflict references (including dangling ones).
    pub conflict_edge_count: usize,
    /// Auto-selectable items across all paths, without repeats.
    pub unique_item_count: usize,
    /// Paths per level name; missing levels count as Beginner.
    pub level_distribution: BTreeMap<String, usize>,
    /// Paths per category; missing categories are `uncategorized`.
    pub category_distribution: BTreeMap<String, usize>,
    /// Paths with no prerequisites inside the catalog.
    pub roots: Vec<String>,
    /// Path required directly by the most other paths.
    pub most_required: Option<String>,
    /// How many paths require `most_required`.
    pub max_dependents: usize,
    /// Mean estimated time over paths that declare one, in minutes.
    pub avg_estimated_time: Option<f64>,
}

/// Kind of edge in an exported dependency graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// `from` is a prerequisite of `to`.
    Prerequisite,
    /// `from` lists `to` as related.
    Related,
}

/// Node of an exported dependency graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyNode {
    /// Path id.
    pub id: String,
    /// Numeric level.
    pub level: u8,
    /// Category, if any.
    pub category: Option<String>,
}

/// Edge of an exported dependency graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Source path.
    pub from: String,
    /// Target path.
    pub to: String,
    /// Edge kind.
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

/// Node and edge lists describing the whole catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// One node per path, in catalog order.
    pub nodes: Vec<DependencyNode>,
    /// Prerequisite and related edges, per path in catalog order.
    pub edges: Vec<DependencyEdge>,
}

// ============================================================================
// Functions
// ============================================================================

/// Compute summary statistics for a catalog.
pub fn compute_stats(graph: &RelationshipGraph) -> GraphStats {
    let (digraph, indices) = graph.prerequisite_digraph();

    let mut level_distribution = BTreeMap::new();
    let mut category_distribution = BTreeMap::new();
    let mut items = std::collections::HashSet::new();
    let mut related_edge_count = 0;
    let mut conflict_edge_count = 0;
    let mut timed = Vec::new();

    for (_, descriptor) in graph.iter() {
        let level = descriptor.level.unwrap_or_default().to_string();
        *level_distribution.entry(level).or_insert(0) += 1;

        let category = descriptor
            .category
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        *category_distribution.entry(category).or_insert(0) += 1;

        related_edge_count += descriptor.related_paths.len();
        conflict_edge_count += descriptor.conflicts.len();
        items.extend(descriptor.auto_select_items.iter().map(String::as_str));
        if let Some(minutes) = descriptor.estimated_total_time {
            timed.push(f64::from(minutes));
        }
    }

    let mut roots = Vec::new();
    let mut most_required = None;
    let mut max_dependents = 0;

    for id in graph.ids() {
        let idx = indices[id];
        if digraph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
            .is_none()
        {
            roots.push(id.to_string());
        }

        let dependents = digraph.neighbors_directed(idx, Direction::Outgoing).count();
        if dependents > max_dependents {
            max_dependents = dependents;
            most_required = Some(id.to_string());
        }
    }

    let avg_estimated_time = if timed.is_empty() {
        None
    } else {
        Some(timed.iter().sum::<f64>() / timed.len() as f64)
    };

    GraphStats {
        path_count: graph.len(),
        prerequisite_edge_count: digraph.edge_count(),
        related_edge_count,
        conflict_edge_count,
        unique_item_count: items.len(),
        level_distribution,
        category_distribution,
        roots,
        most_required,
        max_dependents,
        avg_estimated_time,
    }
}

/// Path ids in `category`, in catalog order.
///
/// Paths without a category belong to `uncategorized`.
pub fn paths_by_category(graph: &RelationshipGraph, category: &str) -> Vec<String> {
    graph
        .iter()
        .filter(|(_, d)| d.category.as_deref().unwrap_or(UNCATEGORIZED) == category)
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Path ids at `level`, in catalog order.
///
/// Paths without a level count as Beginner.
pub fn paths_by_level(graph: &RelationshipGraph, level: Level) -> Vec<String> {
    graph
        .iter()
        .filter(|(_, d)| d.level.unwrap_or_default() == level)
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Export the catalog as node and edge lists.
///
/// Prerequisite edges point from the prerequisite to the path that needs
/// it; related edges point from a path to what it lists.
pub fn build_dependency_graph(graph: &RelationshipGraph) -> DependencyGraph {
    let nodes = graph
        .iter()
        .map(|(id, d)| DependencyNode {
            id: id.to_string(),
            level: d.level_value(),
            category: d.category.clone(),
        })
        .collect();

    let mut edges = Vec::new();
    for (id, d) in graph.iter() {
        edges.extend(d.prerequisites.iter().map(|prereq| DependencyEdge {
            from: prereq.clone(),
            to: id.to_string(),
            kind: EdgeKind::Prerequisite,
        }));
        edges.extend(d.related_paths.iter().map(|related| DependencyEdge {
            from: id.to_string(),
            to: related.clone(),
            kind: EdgeKind::Related,
        }));
    }

    DependencyGraph { nodes, edges }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PathDescriptor;
    use crate::test_utils::*;

    // ------------------------------------------------------------------------
    // Stats
    // ------------------------------------------------------------------------

    #[test]
    fn test_stats_sample_catalog() {
        let stats = compute_stats(&sample_catalog());

        assert_eq!(stats.path_count, 5);
        assert_eq!(stats.prerequisite_edge_count, 3);
        assert_eq!(stats.related_edge_count, 7);
        assert_eq!(stats.conflict_edge_count, 2);
        assert_eq!(stats.unique_item_count, 20);
        assert_eq!(stats.level_distribution["Advanced"], 2);
        assert_eq!(stats.category_distribution["intermediate"], 2);
        assert_eq!(stats.roots, ids(&[FOUNDATION, INFRA, DEVOPS]));
        assert_eq!(stats.most_required.as_deref(), Some(INFRA));
        assert_eq!(stats.max_dependents, 1);
        assert_eq!(stats.avg_estimated_time, Some(245.0));
    }

    #[test]
    fn test_stats_empty_graph() {
        let stats = compute_stats(&RelationshipGraph::new());
        assert_eq!(stats.path_count, 0);
        assert!(stats.most_required.is_none());
        assert!(stats.avg_estimated_time.is_none());
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    #[test]
    fn test_paths_by_category() {
        let mut graph = sample_catalog();
        graph.insert("loose", PathDescriptor::new("loose", Level::Beginner));

        assert_eq!(paths_by_category(&graph, "expert"), ids(&[ENTERPRISE, ANALYTICS]));
        assert_eq!(paths_by_category(&graph, "uncategorized"), ids(&["loose"]));
        assert!(paths_by_category(&graph, "nothing").is_empty());
    }

    #[test]
    fn test_paths_by_level_missing_counts_as_beginner() {
        let mut graph = sample_catalog();
        graph.insert("levelless", PathDescriptor::default());

        assert_eq!(paths_by_level(&graph, Level::Beginner), ids(&[FOUNDATION, "levelless"]));
        assert_eq!(paths_by_level(&graph, Level::Intermediate), ids(&[INFRA, DEVOPS]));
    }

    // ------------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------------

    #[test]
    fn test_build_dependency_graph() {
        let exported = build_dependency_graph(&sample_catalog());

        assert_eq!(exported.nodes.len(), 5);
        assert_eq!(exported.nodes[3].level, 2);

        let prereqs: Vec<_> = exported
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Prerequisite)
            .map(|e| (e.from.as_str(), e.to.as_str()))
            .collect();
        assert_eq!(
            prereqs,
            vec![(INFRA, ENTERPRISE), (DEVOPS, ENTERPRISE), (ENTERPRISE, ANALYTICS)]
        );
        assert_eq!(
            exported.edges.iter().filter(|e| e.kind == EdgeKind::Related).count(),
            7
        );
    }

    #[test]
    fn test_dependency_edge_serializes_type() {
        let edge = DependencyEdge {
            from: "a".into(),
            to: "b".into(),
            kind: EdgeKind::Related,
        };
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["type"], "related");
    }
}
