//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Default cap on auto-selected items per call. `0` means no cap.
pub const DEFAULT_MAX_AUTO_SELECTIONS: usize = 0;

/// Tunables for [`AutoSelectionEngine`](crate::AutoSelectionEngine).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cap on `auto_selected_items` after deduplication. `0` disables it.
    pub max_auto_selections: usize,

    /// Attach a conflict resolution to results that contain conflicts.
    pub enable_conflict_resolution: bool,

    /// Memoize related-path and dependency-chain lookups.
    pub cache_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_auto_selections: DEFAULT_MAX_AUTO_SELECTIONS,
            enable_conflict_resolution: true,
            cache_enabled: true,
        }
    }
}

impl EngineConfig {
    /// Apply the selection cap to `items`, returning how many were dropped.
    pub(crate) fn truncate(&self, items: &mut Vec<String>) -> usize {
        if self.max_auto_selections == 0 || items.len() <= self.max_auto_selections {
            return 0;
        }
        let dropped = items.len() - self.max_auto_selections;
        items.truncate(self.max_auto_selections);
        dropped
    }
}
