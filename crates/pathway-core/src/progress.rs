//! Per-item progress snapshots.
//!
//! A [`ProgressSnapshot`] maps item ids to their [`ProgressEntry`]. Items
//! without an entry have not been started. Snapshots built from untyped JSON
//! are parsed leniently: entries that do not have the expected shape are kept
//! aside as [`MalformedProgress`] records and treated as not started, so a
//! single bad entry never blocks selection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Progress state of a single item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressEntry {
    /// The item has been completed.
    pub completed: bool,
    /// The item has been started but not completed.
    pub in_progress: bool,
    /// The item has been selected without being started.
    pub selected: bool,
}

impl ProgressEntry {
    /// A completed entry.
    pub fn completed() -> Self {
        Self {
            completed: true,
            ..Self::default()
        }
    }

    /// An in-progress entry.
    pub fn in_progress() -> Self {
        Self {
            in_progress: true,
            ..Self::default()
        }
    }

    /// A selected-only entry.
    pub fn selected() -> Self {
        Self {
            selected: true,
            ..Self::default()
        }
    }

    /// Completed or in progress.
    pub fn is_started(&self) -> bool {
        self.completed || self.in_progress
    }
}

/// A progress entry that could not be interpreted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MalformedProgress {
    /// The offending item id (may be empty).
    pub item_id: String,
    /// Why the entry was rejected.
    pub reason: String,
}

/// Progress for a set of items, keyed by item id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgressSnapshot {
    entries: BTreeMap<String, ProgressEntry>,
    malformed: Vec<MalformedProgress>,
}

impl ProgressSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder style).
    pub fn with_entry(mut self, item_id: impl Into<String>, entry: ProgressEntry) -> Self {
        self.insert(item_id, entry);
        self
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, item_id: impl Into<String>, entry: ProgressEntry) {
        self.entries.insert(item_id.into(), entry);
    }

    /// Look up the entry for an item.
    pub fn get(&self, item_id: &str) -> Option<&ProgressEntry> {
        self.entries.get(item_id)
    }

    /// Whether the item is marked completed.
    pub fn is_completed(&self, item_id: &str) -> bool {
        self.get(item_id).is_some_and(|e| e.completed)
    }

    /// Whether the item is completed or in progress.
    pub fn is_started(&self, item_id: &str) -> bool {
        self.get(item_id).is_some_and(ProgressEntry::is_started)
    }

    /// Iterate entries in item id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProgressEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Item ids with an entry.
    pub fn item_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of well-formed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no well-formed entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries rejected while parsing.
    pub fn malformed(&self) -> &[MalformedProgress] {
        &self.malformed
    }

    /// Parse a snapshot from untyped JSON.
    ///
    /// The value must be an object keyed by item id. `null` values are
    /// skipped. Object values contribute `completed`, `inProgress`, and
    /// `selected`; a non-boolean `completed` or a non-object value is
    /// recorded as malformed and the item is treated as not started.
    pub fn from_json(value: &Value) -> Self {
        let mut snapshot = Self::new();

        let Some(map) = value.as_object() else {
            if !value.is_null() {
                snapshot.reject("", "Progress data must be an object");
            }
            return snapshot;
        };

        for (item_id, raw) in map {
            if item_id.is_empty() || item_id == "null" {
                snapshot.reject(item_id, format!("Invalid kata ID: {item_id}"));
                continue;
            }

            match raw {
                Value::Null => {}
                Value::Object(fields) => {
                    let completed = match fields.get("completed") {
                        None | Some(Value::Null) => false,
                        Some(Value::Bool(b)) => *b,
                        Some(other) => {
                            snapshot.reject(
                                item_id,
                                format!(
                                    "Completed field for {item_id} must be boolean, got {}",
                                    json_type_name(other)
                                ),
                            );
                            continue;
                        }
                    };
                    let flag = |name: &str| fields.get(name).and_then(Value::as_bool).unwrap_or(false);
                    snapshot.insert(
                        item_id.clone(),
                        ProgressEntry {
                            completed,
                            in_progress: flag("inProgress"),
                            selected: flag("selected"),
                        },
                    );
                }
                other => snapshot.reject(
                    item_id,
                    format!(
                        "Progress data for {item_id} must be an object or null, got {}",
                        json_type_name(other)
                    ),
                ),
            }
        }

        snapshot
    }

    fn reject(&mut self, item_id: &str, reason: impl Into<String>) {
        self.malformed.push(MalformedProgress {
            item_id: item_id.to_string(),
            reason: reason.into(),
        });
    }
}

impl<K: Into<String>> FromIterator<(K, ProgressEntry)> for ProgressSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, ProgressEntry)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (id, entry) in iter {
            snapshot.insert(id, entry);
        }
        snapshot
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
