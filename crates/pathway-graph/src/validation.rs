//! Structural validation of the relationship graph.
//!
//! Checks every descriptor for references to paths that do not exist, for
//! missing required fields, and for an `id` that differs from its catalog
//! key. Reference problems are errors; the rest are warnings and never
//! affect validity. Cycle detection lives in
//! [`crate::cycles`] and is independent of these checks.

use std::collections::HashSet;
use std::sync::LazyLock;

use pathway_core::Level;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::RelationshipGraph;

static KATA_ID: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z-]+/\d{2}-[a-z-]+$").ok());

// ============================================================================
// Types
// ============================================================================

/// Kind of structural issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A prerequisite names a path that is not in the graph.
    InvalidPrerequisiteReference,
    /// A related path names a path that is not in the graph.
    InvalidRelatedPathReference,
    /// A conflict names a path that is not in the graph.
    InvalidConflictReference,
    /// The descriptor lacks `id` or `level`.
    MissingRequiredFields,
    /// The descriptor's `id` differs from its catalog key.
    IdMismatch,
}

impl IssueKind {
    /// Wire name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::InvalidPrerequisiteReference => "invalid_prerequisite_reference",
            IssueKind::InvalidRelatedPathReference => "invalid_related_path_reference",
            IssueKind::InvalidConflictReference => "invalid_conflict_reference",
            IssueKind::MissingRequiredFields => "missing_required_fields",
            IssueKind::IdMismatch => "id_mismatch",
        }
    }
}

/// A single structural finding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureIssue {
    /// Issue kind.
    #[serde(rename = "type")]
    pub kind: IssueKind,
    /// Path whose descriptor has the problem.
    pub path_id: String,
    /// The dangling reference, for reference issues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Absent fields, for missing-field issues.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
}

impl StructureIssue {
    fn reference(kind: IssueKind, path_id: &str, reference: &str) -> Self {
        Self {
            kind,
            path_id: path_id.to_string(),
            reference: Some(reference.to_string()),
            missing_fields: Vec::new(),
        }
    }

    fn id_mismatch(path_id: &str, declared: &str) -> Self {
        Self {
            kind: IssueKind::IdMismatch,
            path_id: path_id.to_string(),
            reference: Some(declared.to_string()),
            missing_fields: Vec::new(),
        }
    }

    fn missing(path_id: &str, fields: Vec<&'static str>) -> Self {
        Self {
            kind: IssueKind::MissingRequiredFields,
            path_id: path_id.to_string(),
            reference: None,
            missing_fields: fields.into_iter().map(String::from).collect(),
        }
    }
}

/// Result of structural validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureValidation {
    /// True when there are no errors.
    pub is_valid: bool,
    /// Dangling references.
    pub errors: Vec<StructureIssue>,
    /// Missing required fields and id mismatches.
    pub warnings: Vec<StructureIssue>,
}

impl StructureValidation {
    /// Create a new empty (valid) result.
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error (marks the graph invalid).
    pub fn add_error(&mut self, issue: StructureIssue) {
        self.is_valid = false;
        self.errors.push(issue);
    }

    /// Add a warning.
    pub fn add_warning(&mut self, issue: StructureIssue) {
        self.warnings.push(issue);
    }

    /// Total issue count (errors + warnings).
    pub fn total_issues(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }
}

impl Default for StructureValidation {
    fn default() -> Self {
        Self::new()
    }
}

/// A group of selected paths whose levels are too far apart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMismatch {
    /// Always `level_mismatch`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The Beginner and Advanced paths involved, in input order.
    pub paths: Vec<String>,
}

/// Result of [`validate_level_consistency`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConsistency {
    /// False when Beginner and Advanced paths are mixed.
    pub is_consistent: bool,
    /// Mismatch groups.
    pub conflicts: Vec<LevelMismatch>,
}

// ============================================================================
// Validation functions
// ============================================================================

/// Validate every descriptor in the graph.
///
/// Checks for:
/// - Prerequisites that name unknown paths
/// - Related paths that name unknown paths
/// - Conflicts that name unknown paths
/// - Missing `id` or `level`
/// - An `id` that differs from the catalog key
pub fn validate_path_structure(graph: &RelationshipGraph) -> StructureValidation {
    let mut result = StructureValidation::new();

    for (path_id, descriptor) in graph.iter() {
        check_references(
            graph,
            path_id,
            &descriptor.prerequisites,
            IssueKind::InvalidPrerequisiteReference,
            &mut result,
        );
        check_references(
            graph,
            path_id,
            &descriptor.related_paths,
            IssueKind::InvalidRelatedPathReference,
            &mut result,
        );
        check_references(
            graph,
            path_id,
            &descriptor.conflicts,
            IssueKind::InvalidConflictReference,
            &mut result,
        );

        let missing = descriptor.missing_required_fields();
        if !missing.is_empty() {
            result.add_warning(StructureIssue::missing(path_id, missing));
        }
        if let Some(declared) = descriptor.id.as_deref()
            && declared != path_id
        {
            result.add_warning(StructureIssue::id_mismatch(path_id, declared));
        }
    }

    if !result.is_valid {
        log::debug!(
            "Structure validation found {} error(s), {} warning(s)",
            result.errors.len(),
            result.warnings.len()
        );
    }

    result
}

/// Quick check if the graph has any structural errors.
pub fn is_valid(graph: &RelationshipGraph) -> bool {
    validate_path_structure(graph).is_valid
}

fn check_references(
    graph: &RelationshipGraph,
    path_id: &str,
    references: &[String],
    kind: IssueKind,
    result: &mut StructureValidation,
) {
    for reference in references {
        if !graph.contains(reference) {
            result.add_error(StructureIssue::reference(kind, path_id, reference));
        }
    }
}

/// Whether `kata_id` has the `category/NN-name` shape.
pub fn validate_kata_id(kata_id: &str) -> bool {
    KATA_ID.as_ref().is_some_and(|re| re.is_match(kata_id))
}

/// Check that the given paths do not mix Beginner and Advanced levels.
///
/// Unknown ids and paths without a level are ignored.
pub fn validate_level_consistency(graph: &RelationshipGraph, path_ids: &[String]) -> LevelConsistency {
    let levels: HashSet<Level> = path_ids
        .iter()
        .filter_map(|id| graph.get(id).and_then(|d| d.level))
        .collect();

    let mut result = LevelConsistency {
        is_consistent: true,
        conflicts: Vec::new(),
    };

    if levels.contains(&Level::Beginner) && levels.contains(&Level::Advanced) {
        result.is_consistent = false;
        let paths = path_ids
            .iter()
            .filter(|id| {
                graph
                    .get(id)
                    .is_some_and(|d| matches!(d.level, Some(Level::Beginner | Level::Advanced)))
            })
            .cloned()
            .collect();
        result.conflicts.push(LevelMismatch {
            kind: "level_mismatch".to_string(),
            paths,
        });
    }

    result
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PathDescriptor;
    use crate::test_utils::{ids, sample_catalog};

    // ------------------------------------------------------------------------
    // Full validation
    // ------------------------------------------------------------------------

    #[test]
    fn test_validate_sample_catalog() {
        let result = validate_path_structure(&sample_catalog());

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_empty_graph() {
        let result = validate_path_structure(&RelationshipGraph::new());
        assert!(result.is_valid);
        assert_eq!(result.total_issues(), 0);
    }

    #[test]
    fn test_is_valid_helper() {
        assert!(is_valid(&sample_catalog()));
    }

    // ------------------------------------------------------------------------
    // Dangling references
    // ------------------------------------------------------------------------

    #[test]
    fn test_invalid_prerequisite_reference() {
        let mut graph = sample_catalog();
        graph.insert(
            "broken",
            PathDescriptor::new("broken", Level::Intermediate).with_prerequisites(["ghost"]),
        );

        let result = validate_path_structure(&graph);

        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, IssueKind::InvalidPrerequisiteReference);
        assert_eq!(result.errors[0].path_id, "broken");
        assert_eq!(result.errors[0].reference.as_deref(), Some("ghost"));
    }

    #[test]
    fn test_invalid_related_and_conflict_references() {
        let mut graph = RelationshipGraph::new();
        graph.insert(
            "a",
            PathDescriptor::new("a", Level::Beginner)
                .with_related(["nowhere"])
                .with_conflicts(["nobody"]),
        );

        let result = validate_path_structure(&graph);

        assert!(!result.is_valid);
        let kinds: Vec<_> = result.errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::InvalidRelatedPathReference,
                IssueKind::InvalidConflictReference
            ]
        );
    }

    #[test]
    fn test_each_missing_reference_is_one_error() {
        let mut graph = RelationshipGraph::new();
        graph.insert(
            "a",
            PathDescriptor::new("a", Level::Beginner).with_prerequisites(["x", "y", "z"]),
        );
        assert_eq!(validate_path_structure(&graph).errors.len(), 3);
    }

    // ------------------------------------------------------------------------
    // Missing fields
    // ------------------------------------------------------------------------

    #[test]
    fn test_missing_fields_are_warnings() {
        let mut graph = RelationshipGraph::new();
        graph.insert("bare", PathDescriptor::default());

        let result = validate_path_structure(&graph);

        assert!(result.is_valid); // missing fields never invalidate
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, IssueKind::MissingRequiredFields);
        assert_eq!(result.warnings[0].missing_fields, vec!["id", "level"]);
    }

    #[test]
    fn test_id_differing_from_key_is_a_warning() {
        let mut graph = RelationshipGraph::new();
        graph.insert("kept", PathDescriptor::new("renamed", Level::Beginner));

        let result = validate_path_structure(&graph);

        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, IssueKind::IdMismatch);
        assert_eq!(result.warnings[0].path_id, "kept");
        assert_eq!(result.warnings[0].reference.as_deref(), Some("renamed"));
        assert_eq!(IssueKind::IdMismatch.as_str(), "id_mismatch");
    }

    #[test]
    fn test_issue_serializes_with_type_tag() {
        let issue = StructureIssue::reference(IssueKind::InvalidPrerequisiteReference, "a", "b");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "invalid_prerequisite_reference");
        assert_eq!(json["pathId"], "a");
        assert_eq!(json["reference"], "b");
        assert!(json.get("missingFields").is_none());
    }

    // ------------------------------------------------------------------------
    // Kata ids
    // ------------------------------------------------------------------------

    #[test]
    fn test_validate_kata_id() {
        assert!(validate_kata_id("ai-assisted-engineering/01-ai-development-fundamentals"));
        assert!(validate_kata_id("prompt-engineering/02-advanced-prompt-patterns"));
        assert!(!validate_kata_id("Prompt/01-x"));
        assert!(!validate_kata_id("prompt/1-x"));
        assert!(!validate_kata_id("training-labs/iot-edge/01-basic-setup"));
        assert!(!validate_kata_id(""));
    }

    // ------------------------------------------------------------------------
    // Level consistency
    // ------------------------------------------------------------------------

    #[test]
    fn test_level_consistency_beginner_and_advanced() {
        let graph = sample_catalog();
        let selected = ids(&[
            "foundation-ai-first-engineering",
            "intermediate-devops-excellence",
            "expert-enterprise-integration",
        ]);

        let result = validate_level_consistency(&graph, &selected);

        assert!(!result.is_consistent);
        assert_eq!(result.conflicts.len(), 1);
        assert_eq!(result.conflicts[0].kind, "level_mismatch");
        assert_eq!(
            result.conflicts[0].paths,
            ids(&["foundation-ai-first-engineering", "expert-enterprise-integration"])
        );
    }

    #[test]
    fn test_level_consistency_adjacent_levels() {
        let graph = sample_catalog();
        let selected = ids(&["foundation-ai-first-engineering", "intermediate-devops-excellence", "ghost"]);

        let result = validate_level_consistency(&graph, &selected);
        assert!(result.is_consistent);
        assert!(result.conflicts.is_empty());
    }
}
