//! File-backed collaborators for the engine.
//!
//! [`FileProgressStore`] reads a progress JSON file on every fetch.
//! [`FileSelectionSink`] overwrites a JSON file with the last applied
//! selection.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pathway_core::{
    Error, Level, ProgressSnapshot, ProgressStore, Result, SelectionSink, SelectionUpdate,
};

// ============================================================================
// Progress store
// ============================================================================

/// Progress read from a JSON file shaped `{ itemId: {completed, inProgress, selected} }`.
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    path: Option<PathBuf>,
    level: Level,
    enabled: bool,
}

impl FileProgressStore {
    /// Store reading `path`, or reporting no progress when `None`.
    pub fn new(path: Option<PathBuf>, level: Level) -> Self {
        Self {
            path,
            level,
            enabled: true,
        }
    }

    /// Switch auto-selection on or off.
    pub fn with_auto_selection(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[async_trait]
impl ProgressStore for FileProgressStore {
    async fn kata_progress(&self) -> Result<ProgressSnapshot> {
        let Some(path) = &self.path else {
            return Ok(ProgressSnapshot::new());
        };

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::io_with_path(e, path))?;
        let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
            Error::parse(format!("Failed to parse progress {}: {e}", path.display()))
        })?;

        let snapshot = ProgressSnapshot::from_json(&value);
        log::debug!(
            "Loaded progress for {} item(s) from {} ({} malformed)",
            snapshot.len(),
            path.display(),
            snapshot.malformed().len()
        );
        Ok(snapshot)
    }

    fn user_level(&self) -> Level {
        self.level
    }

    fn auto_selection_enabled(&self) -> bool {
        self.enabled
    }
}

// ============================================================================
// Selection sink
// ============================================================================

/// Writes each applied selection to a JSON file, replacing the previous one.
#[derive(Debug, Clone)]
pub struct FileSelectionSink {
    path: PathBuf,
}

impl FileSelectionSink {
    /// Sink writing to `path`. Parent directories are created on write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Output file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SelectionSink for FileSelectionSink {
    fn apply_selections(&self, update: &SelectionUpdate) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
        }

        let json = serde_json::to_string_pretty(update)
            .map_err(|e| Error::serialization(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| Error::io_with_path(e, &self.path))?;

        log::info!(
            "Applied {} item(s) to {}",
            update.selected_items.len(),
            self.path.display()
        );
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
