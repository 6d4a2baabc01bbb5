//! Dependency chains, diamond convergence, and best-effort ordering.

use std::collections::HashSet;

use pathway_core::dedup_ordered;
use serde::{Deserialize, Serialize};

use crate::RelationshipGraph;

/// Result of [`resolve_diamond_dependencies`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiamondResolution {
    /// Union of the direct prerequisites of every input path.
    pub required_paths: Vec<String>,
    /// First path, in graph order, whose dependency chain contains every input.
    pub convergence_path: Option<String>,
}

/// Transitive prerequisite closure of `path_id`, including itself.
///
/// Sorted by level ascending, then by priority ascending. Ties keep
/// discovery order. Prerequisites missing from the graph are skipped, as
/// is `path_id` itself when unknown.
pub fn build_dependency_chain(graph: &RelationshipGraph, path_id: &str) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut chain = Vec::new();
    collect(graph, path_id, &mut visited, &mut chain);

    chain.sort_by_key(|id| {
        graph
            .get(id)
            .map_or((0, 0), |d| (d.level_value(), d.effective_priority()))
    });
    chain
}

fn collect<'g>(
    graph: &'g RelationshipGraph,
    path_id: &'g str,
    visited: &mut HashSet<&'g str>,
    chain: &mut Vec<String>,
) {
    if !visited.insert(path_id) {
        return;
    }
    let Some(descriptor) = graph.get(path_id) else {
        return;
    };
    chain.push(path_id.to_string());
    for prereq in &descriptor.prerequisites {
        collect(graph, prereq, visited, chain);
    }
}

/// Find the shared prerequisites of `path_ids` and a path they all feed into.
///
/// The convergence search walks the whole graph and keeps the first match,
/// so with several candidates the result depends on catalog order. An empty
/// input has no convergence path.
pub fn resolve_diamond_dependencies(
    graph: &RelationshipGraph,
    path_ids: &[String],
) -> DiamondResolution {
    let required_paths = dedup_ordered(
        path_ids
            .iter()
            .filter_map(|id| graph.get(id))
            .flat_map(|d| d.prerequisites.iter().cloned()),
    );

    let convergence_path = if path_ids.is_empty() {
        None
    } else {
        graph
            .ids()
            .find(|candidate| {
                let chain = build_dependency_chain(graph, candidate);
                path_ids.iter().all(|input| chain.contains(input))
            })
            .map(String::from)
    };

    DiamondResolution {
        required_paths,
        convergence_path,
    }
}

/// Order `path_ids` so prerequisites come before the paths that need them.
///
/// Kahn-style layering restricted to the input set: each round emits every
/// remaining path whose in-set prerequisites have all been emitted.
/// Prerequisites outside the input set are ignored. If a round makes no
/// progress (a cycle among the inputs) the remainder is appended as given.
/// This is a heuristic, not a proof of topological order.
pub fn optimize_path_order(graph: &RelationshipGraph, path_ids: &[String]) -> Vec<String> {
    let input: HashSet<&str> = path_ids.iter().map(String::as_str).collect();
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut ordered: Vec<String> = Vec::with_capacity(path_ids.len());
    let mut remaining: Vec<&str> = path_ids.iter().map(String::as_str).collect();

    while !remaining.is_empty() {
        let (ready, blocked): (Vec<&str>, Vec<&str>) = remaining.into_iter().partition(|id| {
            graph.get(id).is_none_or(|d| {
                d.prerequisites
                    .iter()
                    .all(|p| emitted.contains(p.as_str()) || !input.contains(p.as_str()))
            })
        });

        if ready.is_empty() {
            log::debug!(
                "Path ordering stalled with {} path(s) left; appending as given",
                blocked.len()
            );
            ordered.extend(blocked.into_iter().map(String::from));
            break;
        }

        for id in ready {
            emitted.insert(id);
            ordered.push(id.to_string());
        }
        remaining = blocked;
    }

    ordered
}
