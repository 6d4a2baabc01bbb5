//! Collaborator traits for the selection engine.
//!
//! The engine never owns progress data or selection state. It reads progress
//! through a [`ProgressStore`], writes selections through a
//! [`SelectionSink`], and reports best-effort failures to an
//! [`ErrorRecorder`]. Applications implement these for their own storage.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Level, ProgressSnapshot, Result};

/// Source of learner progress and preferences.
///
/// Fetching progress may involve I/O, so it is async. The level and the
/// auto-selection switch are cheap reads.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use pathway_core::{Level, ProgressSnapshot, ProgressStore, Result};
///
/// struct Fixed;
///
/// #[async_trait]
/// impl ProgressStore for Fixed {
///     async fn kata_progress(&self) -> Result<ProgressSnapshot> {
///         Ok(ProgressSnapshot::new())
///     }
///
///     fn user_level(&self) -> Level {
///         Level::Intermediate
///     }
/// }
/// ```
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Fetch the current per-item progress.
    async fn kata_progress(&self) -> Result<ProgressSnapshot>;

    /// The learner's current level.
    fn user_level(&self) -> Level {
        Level::Beginner
    }

    /// Whether auto-selection of items is switched on.
    fn auto_selection_enabled(&self) -> bool {
        true
    }
}

/// Payload forwarded to a [`SelectionSink`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionUpdate {
    /// Items to mark selected.
    pub selected_items: Vec<String>,
    /// Related paths to surface as suggestions.
    pub suggested_related: Vec<String>,
    /// The path the selection originated from, if any.
    pub path_id: Option<String>,
}

/// Destination for computed selections.
pub trait SelectionSink: Send + Sync {
    /// Apply a selection update.
    fn apply_selections(&self, update: &SelectionUpdate) -> Result<()>;
}

/// Side channel for failures that must not abort processing.
pub trait ErrorRecorder: Send + Sync {
    /// Record an error under a context label.
    fn record_error(&self, context: &str, message: &str);
}

/// [`ErrorRecorder`] that writes to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogErrorRecorder;

impl ErrorRecorder for LogErrorRecorder {
    fn record_error(&self, context: &str, message: &str) {
        log::error!(target: "pathway", "{context}: {message}");
    }
}
