//! Parsing selection requests from untyped input.
//!
//! A request is either a bare array of path ids or an options object
//! `{selectedPaths, currentProgress, userLevel}`. Missing progress is empty
//! and missing or unknown levels fall back to Beginner.

use pathway_core::{Error, Level, ProgressSnapshot, Result};
use serde_json::Value;

/// Normalized input to the orchestrator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionRequest {
    /// Selected path ids, in the order given.
    pub selected_paths: Vec<String>,
    /// Progress snapshot, possibly carrying malformed records.
    pub progress: ProgressSnapshot,
    /// Learner level.
    pub user_level: Level,
}

impl SelectionRequest {
    /// A request with empty progress at Beginner level.
    pub fn new<I, S>(selected_paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_paths: selected_paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the progress snapshot.
    pub fn with_progress(mut self, progress: ProgressSnapshot) -> Self {
        self.progress = progress;
        self
    }

    /// Set the learner level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.user_level = level;
        self
    }

    /// Parse a request from JSON.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Array(paths) => Ok(Self {
                selected_paths: path_ids(paths),
                ..Self::default()
            }),
            Value::Object(options) => {
                let selected_paths = match options.get("selectedPaths") {
                    Some(Value::Array(paths)) => path_ids(paths),
                    _ => return Err(Error::invalid_data("selectedPaths must be an array")),
                };

                let progress = options
                    .get("currentProgress")
                    .map(ProgressSnapshot::from_json)
                    .unwrap_or_default();

                let user_level = options
                    .get("userLevel")
                    .and_then(Value::as_str)
                    .map(Level::parse_lenient)
                    .unwrap_or_default();

                Ok(Self {
                    selected_paths,
                    progress,
                    user_level,
                })
            }
            _ => Err(Error::invalid_data(
                "First parameter must be an array of selectedPaths or an options object",
            )),
        }
    }
}

/// Non-string ids are kept in their JSON form so they surface as unknown
/// paths instead of vanishing.
fn path_ids(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}
