//! Shared collaborators for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use pathway_core::{
    ErrorRecorder, Level, ProgressSnapshot, ProgressStore, Result, SelectionSink, SelectionUpdate,
};
use pathway_graph::RelationshipGraph;
use pathway_select::{AutoSelectionEngine, EngineConfig};

/// Progress store returning a fixed snapshot and level.
pub struct FixedStore {
    pub progress: ProgressSnapshot,
    pub level: Level,
}

#[async_trait::async_trait]
impl ProgressStore for FixedStore {
    async fn kata_progress(&self) -> Result<ProgressSnapshot> {
        Ok(self.progress.clone())
    }

    fn user_level(&self) -> Level {
        self.level
    }
}

/// Sink and recorder that keep everything they receive.
#[derive(Default)]
pub struct Recorder {
    pub updates: Mutex<Vec<SelectionUpdate>>,
    pub errors: Mutex<Vec<(String, String)>>,
}

impl SelectionSink for Recorder {
    fn apply_selections(&self, update: &SelectionUpdate) -> Result<()> {
        self.updates.lock().unwrap().push(update.clone());
        Ok(())
    }
}

impl ErrorRecorder for Recorder {
    fn record_error(&self, context: &str, message: &str) {
        self.errors
            .lock()
            .unwrap()
            .push((context.to_string(), message.to_string()));
    }
}

/// Engine over `graph` with empty progress and default config.
pub fn engine(graph: RelationshipGraph) -> AutoSelectionEngine {
    engine_with_store(
        graph,
        FixedStore {
            progress: ProgressSnapshot::new(),
            level: Level::Beginner,
        },
    )
}

/// Engine over `graph` backed by `store`.
pub fn engine_with_store(graph: RelationshipGraph, store: FixedStore) -> AutoSelectionEngine {
    AutoSelectionEngine::builder(graph)
        .config(EngineConfig::default())
        .progress_store(Arc::new(store))
        .selection_sink(Arc::new(Recorder::default()))
        .build()
        .unwrap()
}
