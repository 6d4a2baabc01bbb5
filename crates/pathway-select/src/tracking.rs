//! Follow-up helpers for selections as progress changes.

use pathway_core::ProgressSnapshot;
use serde::{Deserialize, Serialize};

use crate::ResolutionResult;

/// Items a learner currently has auto-selected, and those since completed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    /// Items still pending.
    pub auto_selected_items: Vec<String>,
    /// Suggested related paths, carried through unchanged.
    #[serde(default)]
    pub suggested_related: Vec<String>,
    /// Items moved out of `auto_selected_items` once completed.
    #[serde(default)]
    pub completed_items: Vec<String>,
}

impl From<&ResolutionResult> for SelectionState {
    fn from(result: &ResolutionResult) -> Self {
        Self {
            auto_selected_items: result.auto_selected_items.clone(),
            suggested_related: result.suggested_related.clone(),
            completed_items: Vec::new(),
        }
    }
}

/// Item ids bucketed by status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressCategories {
    /// Completed items.
    pub completed: Vec<String>,
    /// Started, not completed.
    pub in_progress: Vec<String>,
    /// Selected, not started.
    pub selected: Vec<String>,
}

/// Move every newly completed item from pending to completed.
///
/// Order within both lists is preserved; items already in
/// `completed_items` stay there.
pub fn update_selections_for_progress(
    current: &SelectionState,
    update: &ProgressSnapshot,
) -> SelectionState {
    let (done, pending): (Vec<String>, Vec<String>) = current
        .auto_selected_items
        .iter()
        .cloned()
        .partition(|item| update.is_completed(item));

    let mut completed_items = current.completed_items.clone();
    completed_items.extend(done);

    SelectionState {
        auto_selected_items: pending,
        suggested_related: current.suggested_related.clone(),
        completed_items,
    }
}

/// Bucket items by their strongest status.
///
/// An item lands in exactly one bucket: completed beats in progress, which
/// beats selected. Entries with no flag set are left out.
pub fn categorize_progress_items(progress: &ProgressSnapshot) -> ProgressCategories {
    let mut categories = ProgressCategories::default();
    for (item_id, entry) in progress.iter() {
        let bucket = if entry.completed {
            &mut categories.completed
        } else if entry.in_progress {
            &mut categories.in_progress
        } else if entry.selected {
            &mut categories.selected
        } else {
            continue;
        };
        bucket.push(item_id.to_string());
    }
    categories
}
