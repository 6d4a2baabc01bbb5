//! Pairwise conflict detection and level-keyed resolution.
//!
//! Two selected paths conflict when either names the other in its
//! `conflicts` list, or when one is Beginner and the other Advanced. The
//! level rule ignores the learner's level; it is isolated in
//! [`is_level_conflict`] so that can change in one place.
//!
//! Resolution is a policy, not an optimisation: it keeps or drops whole
//! category groups (`foundation`, `skill`, `expert`) depending on the
//! learner's level and suggests prerequisites for what remains.

use std::fmt;

use pathway_core::{Level, ProgressSnapshot, dedup_ordered};
use serde::{Deserialize, Serialize};

use crate::prerequisites::is_prerequisite_satisfied;
use crate::{PathDescriptor, RelationshipGraph};

// ============================================================================
// Types
// ============================================================================

/// Kind of conflict record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Every detected conflict currently carries this kind, whether it came
    /// from an explicit list or the level rule.
    LevelConflict,
}

/// A conflict between two selected paths.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// Conflict kind.
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    /// Human-readable description.
    pub message: String,
    /// The two paths, in selection order.
    pub conflicting_paths: Vec<String>,
}

/// How a conflict resolution should be acted on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// Apply the kept/removed split as is.
    #[default]
    AutoResolve,
    /// Prerequisites should be offered before proceeding.
    SuggestPrerequisite,
    /// None of the paths fall into a known category group.
    ManualRequired,
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResolutionStrategy::AutoResolve => "auto_resolve",
            ResolutionStrategy::SuggestPrerequisite => "suggest_prerequisite",
            ResolutionStrategy::ManualRequired => "manual_required",
        })
    }
}

/// Outcome of [`resolve_conflicts`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResolution {
    /// Paths to keep.
    pub resolved_paths: Vec<String>,
    /// Paths to drop.
    pub removed_paths: Vec<String>,
    /// Prerequisite paths to offer, without repeats.
    pub suggestions: Vec<String>,
    /// Why the split was made.
    pub reason: String,
    /// What to do with the result.
    pub resolution: ResolutionStrategy,
}

// ============================================================================
// Detection
// ============================================================================

/// The fixed level rule: Beginner and Advanced never mix.
///
/// `_user_level` is accepted so a level-sensitive rule can replace this
/// without touching callers.
pub fn is_level_conflict(a: Option<Level>, b: Option<Level>, _user_level: Level) -> bool {
    matches!(
        (a, b),
        (Some(Level::Beginner), Some(Level::Advanced)) | (Some(Level::Advanced), Some(Level::Beginner))
    )
}

/// Whether either path lists the other as a conflict.
pub fn has_explicit_conflict(
    a_id: &str,
    a: &PathDescriptor,
    b_id: &str,
    b: &PathDescriptor,
) -> bool {
    a.conflicts.iter().any(|c| c == b_id) || b.conflicts.iter().any(|c| c == a_id)
}

/// Detect conflicts between every unordered pair of `selected` paths.
///
/// Unknown ids and pairs of a path with itself are skipped.
pub fn detect_conflicts(
    graph: &RelationshipGraph,
    selected: &[String],
    user_level: Level,
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for (i, a_id) in selected.iter().enumerate() {
        for b_id in &selected[i + 1..] {
            if a_id == b_id {
                continue;
            }
            let (Some(a), Some(b)) = (graph.get(a_id), graph.get(b_id)) else {
                continue;
            };

            if is_level_conflict(a.level, b.level, user_level)
                || has_explicit_conflict(a_id, a, b_id, b)
            {
                conflicts.push(Conflict {
                    kind: ConflictKind::LevelConflict,
                    message: format!(
                        "Path \"{a_id}\" ({}) conflicts with \"{b_id}\" ({})",
                        a.level_name(),
                        b.level_name()
                    ),
                    conflicting_paths: vec![a_id.clone(), b_id.clone()],
                });
            }
        }
    }

    conflicts
}

// ============================================================================
// Resolution
// ============================================================================

#[derive(Default)]
struct CategoryGroups {
    foundation: Vec<String>,
    skill: Vec<String>,
    expert: Vec<String>,
}

impl CategoryGroups {
    /// Missing categories count as `foundation`; other categories are ignored.
    fn new(graph: &RelationshipGraph, paths: &[String]) -> Self {
        let mut groups = Self::default();
        for id in paths {
            let Some(descriptor) = graph.get(id) else {
                continue;
            };
            match descriptor.category.as_deref().unwrap_or("foundation") {
                "foundation" => groups.foundation.push(id.clone()),
                "skill" => groups.skill.push(id.clone()),
                "expert" => groups.expert.push(id.clone()),
                _ => {}
            }
        }
        groups
    }
}

/// Resolve a set of conflicting paths for a learner at `user_level`.
///
/// - Beginner: keep `foundation`; drop `expert` and `skill` and suggest
///   their prerequisites.
/// - Intermediate: keep `foundation` and `skill`; drop `expert`; suggest
///   unsatisfied prerequisites of `skill` and `expert` paths.
/// - Advanced: keep `expert` and `skill`; drop `foundation`.
///
/// When no path lands in a known group the resolution is
/// [`ResolutionStrategy::ManualRequired`].
pub fn resolve_conflicts(
    graph: &RelationshipGraph,
    conflicting: &[String],
    user_level: Level,
    progress: &ProgressSnapshot,
) -> ConflictResolution {
    let groups = CategoryGroups::new(graph, conflicting);
    let mut resolution = ConflictResolution::default();

    match user_level {
        Level::Beginner => {
            resolution.resolved_paths = groups.foundation;
            resolution.removed_paths = [groups.expert, groups.skill].concat();

            resolution.suggestions = resolution
                .removed_paths
                .iter()
                .filter_map(|id| graph.get(id))
                .flat_map(|d| d.prerequisites.iter().cloned())
                .collect();

            if resolution.suggestions.is_empty() {
                resolution.reason =
                    "Beginner path takes precedence over advanced paths for user level: Beginner"
                        .to_string();
            } else {
                resolution.resolution = ResolutionStrategy::SuggestPrerequisite;
                resolution.reason =
                    "Advanced paths removed - prerequisites suggested for Beginner level".to_string();
            }
        }
        Level::Intermediate => {
            let to_check: Vec<&String> = groups.skill.iter().chain(&groups.expert).collect();
            for id in to_check {
                let Some(descriptor) = graph.get(id) else {
                    continue;
                };
                for prereq in &descriptor.prerequisites {
                    if graph.contains(prereq) && !is_prerequisite_satisfied(graph, prereq, progress) {
                        resolution.suggestions.push(prereq.clone());
                    }
                }
            }

            if !resolution.suggestions.is_empty() {
                resolution.resolution = ResolutionStrategy::SuggestPrerequisite;
                resolution.reason = "Missing prerequisites detected for selected paths".to_string();
            }

            resolution.resolved_paths = [groups.foundation, groups.skill].concat();
            resolution.removed_paths = groups.expert;
        }
        Level::Advanced => {
            resolution.resolved_paths = [groups.expert, groups.skill].concat();
            resolution.removed_paths = groups.foundation;
            resolution.reason = "Higher level paths preferred for Advanced users".to_string();
        }
    }

    resolution.suggestions = dedup_ordered(resolution.suggestions);

    if !conflicting.is_empty()
        && resolution.resolved_paths.is_empty()
        && resolution.removed_paths.is_empty()
    {
        resolution.resolution = ResolutionStrategy::ManualRequired;
        resolution.reason = "No category-based resolution available for the selected paths".to_string();
    }

    log::debug!(
        "Resolved {} conflicting path(s) for {user_level}: {}",
        conflicting.len(),
        resolution.resolution
    );

    resolution
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use pathway_core::ProgressEntry;

    // ------------------------------------------------------------------------
    // Detection
    // ------------------------------------------------------------------------

    #[test]
    fn test_level_rule_ignores_user_level() {
        for user in Level::ALL {
            assert!(is_level_conflict(Some(Level::Beginner), Some(Level::Advanced), user));
            assert!(is_level_conflict(Some(Level::Advanced), Some(Level::Beginner), user));
            assert!(!is_level_conflict(Some(Level::Beginner), Some(Level::Intermediate), user));
            assert!(!is_level_conflict(None, Some(Level::Advanced), user));
        }
    }

    #[test]
    fn test_beginner_and_advanced_is_one_conflict() {
        let graph = sample_catalog();
        let conflicts = detect_conflicts(&graph, &ids(&[FOUNDATION, ENTERPRISE]), Level::Beginner);

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::LevelConflict);
        assert_eq!(conflicts[0].conflicting_paths, ids(&[FOUNDATION, ENTERPRISE]));
        assert_eq!(
            conflicts[0].message,
            format!("Path \"{FOUNDATION}\" (Beginner) conflicts with \"{ENTERPRISE}\" (Advanced)")
        );
    }

    #[test]
    fn test_explicit_conflict_one_direction() {
        let mut graph = RelationshipGraph::new();
        graph.insert("a", PathDescriptor::new("a", Level::Intermediate).with_conflicts(["b"]));
        graph.insert("b", PathDescriptor::new("b", Level::Intermediate));

        assert_eq!(detect_conflicts(&graph, &ids(&["a", "b"]), Level::Beginner).len(), 1);
        assert_eq!(detect_conflicts(&graph, &ids(&["b", "a"]), Level::Beginner).len(), 1);
    }

    #[test]
    fn test_no_self_conflict() {
        let graph = sample_catalog();
        for id in graph.ids() {
            assert!(detect_conflicts(&graph, &ids(&[id]), Level::Advanced).is_empty());
            assert!(detect_conflicts(&graph, &ids(&[id, id]), Level::Advanced).is_empty());
        }
    }

    #[test]
    fn test_unknown_paths_skipped() {
        let graph = sample_catalog();
        assert!(detect_conflicts(&graph, &ids(&["ghost", FOUNDATION]), Level::Beginner).is_empty());
    }

    #[test]
    fn test_compatible_paths_do_not_conflict() {
        let graph = sample_catalog();
        let conflicts = detect_conflicts(&graph, &ids(&[FOUNDATION, INFRA, DEVOPS]), Level::Beginner);
        assert!(conflicts.is_empty());
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    #[test]
    fn test_resolve_beginner_suggests_prerequisites() {
        let graph = sample_catalog();
        let result = resolve_conflicts(
            &graph,
            &ids(&[FOUNDATION, ENTERPRISE]),
            Level::Beginner,
            &ProgressSnapshot::new(),
        );

        assert_eq!(result.resolved_paths, ids(&[FOUNDATION]));
        assert_eq!(result.removed_paths, ids(&[ENTERPRISE]));
        assert_eq!(result.suggestions, ids(&[INFRA, DEVOPS]));
        assert_eq!(result.resolution, ResolutionStrategy::SuggestPrerequisite);
        assert_eq!(
            result.reason,
            "Advanced paths removed - prerequisites suggested for Beginner level"
        );
    }

    #[test]
    fn test_resolve_beginner_without_prerequisites() {
        let mut graph = RelationshipGraph::new();
        graph.insert("f", PathDescriptor::new("f", Level::Beginner).with_category("foundation"));
        graph.insert("x", PathDescriptor::new("x", Level::Advanced).with_category("expert"));

        let result = resolve_conflicts(&graph, &ids(&["f", "x"]), Level::Beginner, &ProgressSnapshot::new());

        assert_eq!(result.resolution, ResolutionStrategy::AutoResolve);
        assert!(result.suggestions.is_empty());
        assert!(result.reason.starts_with("Beginner path takes precedence"));
    }

    #[test]
    fn test_resolve_intermediate_checks_progress() {
        let graph = sample_catalog();
        let progress = ProgressSnapshot::new()
            .with_entry("project-planning/01-basic-prompt-usage", ProgressEntry::completed());

        let result = resolve_conflicts(
            &graph,
            &ids(&[FOUNDATION, ENTERPRISE, ANALYTICS]),
            Level::Intermediate,
            &progress,
        );

        assert_eq!(result.resolved_paths, ids(&[FOUNDATION]));
        assert_eq!(result.removed_paths, ids(&[ENTERPRISE, ANALYTICS]));
        assert_eq!(result.suggestions, ids(&[DEVOPS, ENTERPRISE]));
        assert_eq!(result.resolution, ResolutionStrategy::SuggestPrerequisite);
    }

    #[test]
    fn test_resolve_advanced_prefers_higher_levels() {
        let graph = sample_catalog();
        let result = resolve_conflicts(
            &graph,
            &ids(&[FOUNDATION, ENTERPRISE]),
            Level::Advanced,
            &ProgressSnapshot::new(),
        );

        assert_eq!(result.resolved_paths, ids(&[ENTERPRISE]));
        assert_eq!(result.removed_paths, ids(&[FOUNDATION]));
        assert_eq!(result.resolution, ResolutionStrategy::AutoResolve);
        assert_eq!(result.reason, "Higher level paths preferred for Advanced users");
    }

    #[test]
    fn test_resolve_missing_category_counts_as_foundation() {
        let mut graph = RelationshipGraph::new();
        graph.insert("plain", PathDescriptor::new("plain", Level::Beginner));

        let result = resolve_conflicts(&graph, &ids(&["plain"]), Level::Advanced, &ProgressSnapshot::new());
        assert_eq!(result.removed_paths, ids(&["plain"]));
    }

    #[test]
    fn test_resolve_unknown_categories_need_manual_review() {
        let graph = sample_catalog();
        let result = resolve_conflicts(&graph, &ids(&[INFRA, DEVOPS]), Level::Advanced, &ProgressSnapshot::new());

        assert!(result.resolved_paths.is_empty());
        assert_eq!(result.resolution, ResolutionStrategy::ManualRequired);
    }

    #[test]
    fn test_resolution_serializes_snake_case_strategy() {
        let json = serde_json::to_value(ConflictResolution::default()).unwrap();
        assert_eq!(json["resolution"], "auto_resolve");
        assert!(json.get("resolvedPaths").is_some());
    }
}
