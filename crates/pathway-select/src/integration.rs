//! Cross-component consistency checks.
//!
//! Compares what the engine auto-selected with what the checkbox layer
//! shows, and flags progress recorded for items no path knows about.

use std::collections::HashSet;

use pathway_core::ProgressSnapshot;
use pathway_graph::RelationshipGraph;
use serde::{Deserialize, Serialize};

/// Snapshot of the state held by each integrated component.
///
/// Absent parts are not compared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntegrationState {
    /// Items the engine auto-selected.
    pub auto_selection_state: Option<Vec<String>>,
    /// Items shown as checked.
    pub checkbox_state: Option<Vec<String>>,
    /// Recorded progress.
    pub progress_state: Option<ProgressSnapshot>,
}

/// One inconsistency between components.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mismatch {
    /// Auto-selected and checked items differ as sets.
    #[serde(rename_all = "camelCase")]
    StateMismatch {
        /// The two components compared.
        components: Vec<String>,
        /// Auto-selected items as given.
        auto_selection_items: Vec<String>,
        /// Checked items as given.
        checkbox_items: Vec<String>,
    },
    /// Progress exists for an item that no path auto-selects.
    #[serde(rename_all = "camelCase")]
    UnknownKata {
        /// The unknown item.
        kata_id: String,
        /// Where it was found.
        component: String,
    },
}

/// Result of [`validate_integration_consistency`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationConsistency {
    /// True when no mismatch was found.
    pub is_consistent: bool,
    /// Every mismatch found.
    pub mismatches: Vec<Mismatch>,
}

/// Check the components in `state` against each other and the catalog.
pub fn validate_integration_consistency(
    graph: &RelationshipGraph,
    state: &IntegrationState,
) -> IntegrationConsistency {
    let mut mismatches = Vec::new();

    if let (Some(auto), Some(checkbox)) = (&state.auto_selection_state, &state.checkbox_state) {
        let auto_set: HashSet<&str> = auto.iter().map(String::as_str).collect();
        let checkbox_set: HashSet<&str> = checkbox.iter().map(String::as_str).collect();
        if auto_set != checkbox_set {
            mismatches.push(Mismatch::StateMismatch {
                components: vec!["autoSelection".to_string(), "checkbox".to_string()],
                auto_selection_items: auto.clone(),
                checkbox_items: checkbox.clone(),
            });
        }
    }

    if let Some(progress) = &state.progress_state {
        let known: HashSet<&str> = graph
            .iter()
            .flat_map(|(_, d)| d.auto_select_items.iter().map(String::as_str))
            .collect();
        mismatches.extend(
            progress
                .item_ids()
                .filter(|id| !known.contains(id))
                .map(|id| Mismatch::UnknownKata {
                    kata_id: id.to_string(),
                    component: "progress".to_string(),
                }),
        );
    }

    if !mismatches.is_empty() {
        log::debug!("Integration check found {} mismatch(es)", mismatches.len());
    }

    IntegrationConsistency {
        is_consistent: mismatches.is_empty(),
        mismatches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathway_core::ProgressEntry;
    use pathway_graph::test_utils::*;

    fn items(values: &[&str]) -> Option<Vec<String>> {
        Some(ids(values))
    }

    #[test]
    fn test_consistent_when_sets_match() {
        let state = IntegrationState {
            auto_selection_state: items(&["a", "b", "a"]),
            checkbox_state: items(&["b", "a"]),
            progress_state: None,
        };
        let result = validate_integration_consistency(&sample_catalog(), &state);
        assert!(result.is_consistent);
        assert!(result.mismatches.is_empty());
    }

    #[test]
    fn test_state_mismatch() {
        let state = IntegrationState {
            auto_selection_state: items(&["a"]),
            checkbox_state: items(&["a", "b"]),
            progress_state: None,
        };
        let result = validate_integration_consistency(&sample_catalog(), &state);

        assert!(!result.is_consistent);
        let json = serde_json::to_value(&result.mismatches[0]).unwrap();
        assert_eq!(json["type"], "state_mismatch");
        assert_eq!(json["components"][0], "autoSelection");
        assert_eq!(json["checkboxItems"][1], "b");
    }

    #[test]
    fn test_unknown_kata_in_progress() {
        let progress = ProgressSnapshot::new()
            .with_entry("project-planning/01-basic-prompt-usage", ProgressEntry::completed())
            .with_entry("mystery/01-unknown", ProgressEntry::in_progress());
        let state = IntegrationState {
            progress_state: Some(progress),
            ..IntegrationState::default()
        };

        let result = validate_integration_consistency(&sample_catalog(), &state);
        assert_eq!(
            result.mismatches,
            vec![Mismatch::UnknownKata {
                kata_id: "mystery/01-unknown".to_string(),
                component: "progress".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_parts_are_not_compared() {
        let state = IntegrationState {
            auto_selection_state: items(&["a"]),
            ..IntegrationState::default()
        };
        assert!(validate_integration_consistency(&sample_catalog(), &state).is_consistent);
    }
}
