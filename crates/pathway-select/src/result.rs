//! Output records of the auto-selection engine.
//!
//! These types serialize to the camelCase JSON shape consumers of the
//! engine expect (`autoSelectedItems`, `suggestedRelated`, …), with the
//! record kind under a `type` key.

use std::fmt;
use std::str::FromStr;

use pathway_core::{Error, Result};
use pathway_graph::{Conflict, ConflictResolution};
use serde::{Deserialize, Serialize};

// ============================================================================
// Warnings
// ============================================================================

/// Kind of non-fatal finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A selected id is not in the catalog.
    InvalidPathId,
    /// A selected path lacks `id`, `title`, `level`, or `category`.
    IncompletePathData,
    /// A prerequisite path has no completed item.
    MissingPrerequisite,
    /// Auto-selected items were cut to the configured maximum.
    SelectionLimitReached,
}

/// A non-fatal finding. Processing of other paths continues.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionWarning {
    /// Warning kind.
    #[serde(rename = "type")]
    pub kind: WarningKind,
    /// The path the warning is about, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_id: Option<String>,
    /// Human-readable description.
    pub message: String,
    /// First unmet prerequisite, for `missing_prerequisite`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_prerequisite: Option<String>,
}

impl SelectionWarning {
    /// `invalid_path_id` for an unknown path.
    pub fn invalid_path_id(path_id: &str) -> Self {
        Self {
            kind: WarningKind::InvalidPathId,
            path_id: Some(path_id.to_string()),
            message: format!("Path \"{path_id}\" not found"),
            missing_prerequisite: None,
        }
    }

    /// `incomplete_path_data` for a path missing selection fields.
    pub fn incomplete_path_data(path_id: &str) -> Self {
        Self {
            kind: WarningKind::IncompletePathData,
            path_id: Some(path_id.to_string()),
            message: format!("Path \"{path_id}\" has incomplete data"),
            missing_prerequisite: None,
        }
    }

    /// `missing_prerequisite` naming the first unmet prerequisite.
    pub fn missing_prerequisite(path_id: &str, prerequisite: &str) -> Self {
        Self {
            kind: WarningKind::MissingPrerequisite,
            path_id: Some(path_id.to_string()),
            message: format!("Path \"{path_id}\" requires prerequisite path \"{prerequisite}\""),
            missing_prerequisite: Some(prerequisite.to_string()),
        }
    }

    /// `selection_limit_reached` after dropping `dropped` items.
    pub fn selection_limit_reached(limit: usize, dropped: usize) -> Self {
        Self {
            kind: WarningKind::SelectionLimitReached,
            path_id: None,
            message: format!(
                "Auto-selection limited to {limit} item(s); {dropped} item(s) not selected"
            ),
            missing_prerequisite: None,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Kind of blocking finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionErrorKind {
    /// The path lies on or leads into a prerequisite cycle.
    CircularDependency,
}

/// A finding that blocks auto-selection for the affected path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionError {
    /// Error kind.
    #[serde(rename = "type")]
    pub kind: SelectionErrorKind,
    /// Paths on the cycle.
    pub paths: Vec<String>,
    /// Human-readable description.
    pub message: String,
}

impl SelectionError {
    /// `circular_dependency` found while processing `path_id`.
    pub fn circular_dependency(path_id: &str, paths: Vec<String>) -> Self {
        Self {
            kind: SelectionErrorKind::CircularDependency,
            paths,
            message: format!("Circular dependency detected involving path \"{path_id}\""),
        }
    }
}

// ============================================================================
// ResolutionResult
// ============================================================================

/// Everything one call to
/// [`process_path_selection`](crate::AutoSelectionEngine::process_path_selection)
/// found. Built fresh per call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    /// Items to auto-select, without repeats, in discovery order.
    pub auto_selected_items: Vec<String>,
    /// Related paths to suggest, without repeats, never a selected path.
    pub suggested_related: Vec<String>,
    /// Pairwise conflicts among the valid selected paths.
    pub conflicts: Vec<Conflict>,
    /// Non-fatal findings.
    pub warnings: Vec<SelectionWarning>,
    /// Blocking findings.
    pub errors: Vec<SelectionError>,
    /// Suggested resolution of `conflicts`, when enabled and needed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_resolution: Option<ConflictResolution>,
}

impl ResolutionResult {
    /// Whether any warning of `kind` was recorded.
    pub fn has_warning(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }

    /// Whether nothing needs the caller's attention.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty() && self.warnings.is_empty() && self.errors.is_empty()
    }
}

// ============================================================================
// Error messages
// ============================================================================

/// Kinds with a user-facing message template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// See [`WarningKind::MissingPrerequisite`].
    MissingPrerequisite,
    /// A path conflicts with the rest of the selection.
    LevelConflict,
    /// See [`WarningKind::InvalidPathId`].
    InvalidPathId,
    /// See [`SelectionErrorKind::CircularDependency`].
    CircularDependency,
    /// A generic validation failure.
    ValidationError,
}

impl MessageKind {
    /// The snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingPrerequisite => "missing_prerequisite",
            Self::LevelConflict => "level_conflict",
            Self::InvalidPathId => "invalid_path_id",
            Self::CircularDependency => "circular_dependency",
            Self::ValidationError => "validation_error",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "missing_prerequisite" => Ok(Self::MissingPrerequisite),
            "level_conflict" => Ok(Self::LevelConflict),
            "invalid_path_id" => Ok(Self::InvalidPathId),
            "circular_dependency" => Ok(Self::CircularDependency),
            "validation_error" => Ok(Self::ValidationError),
            other => Err(Error::invalid_data(format!("Unknown error type: {other}"))),
        }
    }
}

/// Values substituted into message templates. Absent values render empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageContext {
    /// Path the message is about.
    pub path_id: Option<String>,
    /// Unmet prerequisite.
    pub missing_prerequisite: Option<String>,
    /// Level name.
    pub level: Option<String>,
    /// Paths involved.
    pub paths: Vec<String>,
    /// Free-form reason.
    pub reason: Option<String>,
}

impl MessageContext {
    /// Context naming a single path.
    pub fn for_path(path_id: impl Into<String>) -> Self {
        Self {
            path_id: Some(path_id.into()),
            ..Self::default()
        }
    }
}

/// Render the message for `kind`.
pub fn message_for(kind: MessageKind, context: &MessageContext) -> String {
    let path = context.path_id.as_deref().unwrap_or_default();
    match kind {
        MessageKind::MissingPrerequisite => format!(
            "Path \"{path}\" requires prerequisite path \"{}\" to be completed first",
            context.missing_prerequisite.as_deref().unwrap_or_default()
        ),
        MessageKind::LevelConflict => format!(
            "Path \"{path}\" ({}) conflicts with other selected paths",
            context.level.as_deref().unwrap_or_default()
        ),
        MessageKind::InvalidPathId => {
            format!("Path \"{path}\" does not exist or is not available")
        }
        MessageKind::CircularDependency => format!(
            "Circular dependency detected involving paths: {}",
            context.paths.join(", ")
        ),
        MessageKind::ValidationError => format!(
            "Validation failed for path \"{path}\": {}",
            context.reason.as_deref().unwrap_or_default()
        ),
    }
}

/// Render the message for a kind given by name.
///
/// Unrecognised names produce `Unknown error type: <name>`.
pub fn error_message(kind: &str, context: &MessageContext) -> String {
    match kind.parse::<MessageKind>() {
        Ok(kind) => message_for(kind, context),
        Err(_) => format!("Unknown error type: {kind}"),
    }
}

// ============================================================================
// Tests
// ============================================================================
