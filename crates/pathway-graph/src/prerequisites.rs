//! Prerequisite satisfaction against a progress snapshot.
//!
//! A prerequisite path counts as satisfied once any one of its
//! auto-selectable items is completed. That rule lives in
//! [`is_prerequisite_satisfied`] and every caller goes through it.

use pathway_core::ProgressSnapshot;
use serde::{Deserialize, Serialize};

use crate::RelationshipGraph;

// ============================================================================
// Types
// ============================================================================

/// Result of [`validate_prerequisites`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisiteValidation {
    /// True when nothing is missing.
    pub is_valid: bool,
    /// Prerequisite paths that are unknown or unsatisfied.
    pub missing_prerequisites: Vec<String>,
    /// Dependency items that are not completed.
    pub missing_dependencies: Vec<String>,
    /// Messages for input ids that are not in the graph.
    pub warnings: Vec<String>,
}

impl Default for PrerequisiteValidation {
    fn default() -> Self {
        Self {
            is_valid: true,
            missing_prerequisites: Vec::new(),
            missing_dependencies: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Result of [`validate_and_update_prerequisites`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisiteUnlock {
    /// True when no path is blocked.
    pub can_proceed: bool,
    /// Paths whose prerequisites and dependencies are met.
    pub unlocked_paths: Vec<String>,
    /// Paths with something missing.
    pub blocked_paths: Vec<String>,
}

// ============================================================================
// Functions
// ============================================================================

/// Whether the prerequisite path has at least one completed item.
///
/// Unknown prerequisite paths are never satisfied.
pub fn is_prerequisite_satisfied(
    graph: &RelationshipGraph,
    prerequisite: &str,
    progress: &ProgressSnapshot,
) -> bool {
    graph.get(prerequisite).is_some_and(|d| {
        d.auto_select_items
            .iter()
            .any(|item| progress.is_completed(item))
    })
}

/// Unsatisfied prerequisites of `path_id`, in declaration order.
pub fn missing_prerequisites(
    graph: &RelationshipGraph,
    path_id: &str,
    progress: &ProgressSnapshot,
) -> Vec<String> {
    graph
        .get(path_id)
        .map(|d| {
            d.prerequisites
                .iter()
                .filter(|p| !is_prerequisite_satisfied(graph, p, progress))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Check prerequisite paths and dependency items for several paths at once.
pub fn validate_prerequisites(
    graph: &RelationshipGraph,
    path_ids: &[String],
    progress: &ProgressSnapshot,
) -> PrerequisiteValidation {
    let mut result = PrerequisiteValidation::default();

    for path_id in path_ids {
        let Some(descriptor) = graph.get(path_id) else {
            result.warnings.push(format!("Unknown path: {path_id}"));
            continue;
        };

        for prereq in &descriptor.prerequisites {
            if !is_prerequisite_satisfied(graph, prereq, progress) {
                result.missing_prerequisites.push(prereq.clone());
                result.is_valid = false;
            }
        }

        for item in &descriptor.dependencies {
            if !progress.is_completed(item) {
                result.missing_dependencies.push(item.clone());
                result.is_valid = false;
            }
        }
    }

    result
}

/// Split paths into unlocked and blocked by validating each on its own.
pub fn validate_and_update_prerequisites(
    graph: &RelationshipGraph,
    path_ids: &[String],
    progress: &ProgressSnapshot,
) -> PrerequisiteUnlock {
    let mut result = PrerequisiteUnlock {
        can_proceed: true,
        unlocked_paths: Vec::new(),
        blocked_paths: Vec::new(),
    };

    for path_id in path_ids {
        let single = std::slice::from_ref(path_id);
        if validate_prerequisites(graph, single, progress).is_valid {
            result.unlocked_paths.push(path_id.clone());
        } else {
            result.blocked_paths.push(path_id.clone());
            result.can_proceed = false;
        }
    }

    result
}
