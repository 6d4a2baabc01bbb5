//! Collaborator wiring, the async progress wrapper, and destruction.

mod common;

use std::sync::Arc;

use common::{FixedStore, Recorder};
use pathway_core::{
    Error, Level, ProgressEntry, ProgressSnapshot, ProgressStore, Result, SelectionSink,
};
use pathway_graph::test_utils::*;
use pathway_select::{AutoSelectionEngine, IntegrationState, Mismatch, SelectionState};

struct BrokenStore;

#[async_trait::async_trait]
impl ProgressStore for BrokenStore {
    async fn kata_progress(&self) -> Result<ProgressSnapshot> {
        Err(Error::operation("progress backend unavailable"))
    }
}

// ============================================================================
// Async wrapper
// ============================================================================

#[tokio::test]
async fn test_wrapper_uses_store_progress_and_level() {
    let store = FixedStore {
        progress: ProgressSnapshot::new()
            .with_entry("project-planning/01-basic-prompt-usage", ProgressEntry::completed()),
        level: Level::Intermediate,
    };
    let engine = common::engine_with_store(sample_catalog(), store);

    let result = engine
        .process_path_selection_with_progress(&ids(&[INFRA]))
        .await
        .unwrap();

    assert_eq!(result.auto_selected_items.len(), 2);
    assert!(
        !result
            .auto_selected_items
            .contains(&"project-planning/01-basic-prompt-usage".to_string())
    );
    assert_eq!(result.suggested_related, ids(&[FOUNDATION, DEVOPS]));
}

#[tokio::test]
async fn test_wrapper_propagates_store_errors() {
    let engine = AutoSelectionEngine::builder(sample_catalog())
        .progress_store(Arc::new(BrokenStore))
        .selection_sink(Arc::new(Recorder::default()))
        .build()
        .unwrap();

    let err = engine
        .process_path_selection_with_progress(&ids(&[FOUNDATION]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("progress backend unavailable"));
}

#[tokio::test]
async fn test_wrapper_after_destroy() {
    let mut engine = common::engine(sample_catalog());
    engine.destroy();

    let err = engine
        .process_path_selection_with_progress(&ids(&[FOUNDATION]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Destroyed));
    assert_eq!(err.to_string(), "AutoSelectionEngine has been destroyed");
}

// ============================================================================
// Apply and follow-up
// ============================================================================

#[tokio::test]
async fn test_select_apply_then_track_progress() {
    let sink = Arc::new(Recorder::default());
    let engine = AutoSelectionEngine::builder(sample_catalog())
        .progress_store(Arc::new(FixedStore {
            progress: ProgressSnapshot::new(),
            level: Level::Beginner,
        }))
        .selection_sink(Arc::clone(&sink) as Arc<dyn SelectionSink>)
        .build()
        .unwrap();

    let result = engine
        .process_path_selection_with_progress(&ids(&[FOUNDATION]))
        .await
        .unwrap();
    engine.apply_auto_selections(&result, Some(FOUNDATION)).unwrap();

    let applied = sink.updates.lock().unwrap().clone();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].selected_items.len(), 5);

    let later = ProgressSnapshot::new().with_entry(
        "ai-assisted-engineering/01-ai-development-fundamentals",
        ProgressEntry::completed(),
    );
    let state = engine
        .update_selections_for_progress(&SelectionState::from(&result), &later)
        .unwrap();
    assert_eq!(state.auto_selected_items.len(), 4);
    assert_eq!(
        state.completed_items,
        ids(&["ai-assisted-engineering/01-ai-development-fundamentals"])
    );

    let check = engine
        .validate_integration_consistency(&IntegrationState {
            auto_selection_state: Some(state.auto_selected_items.clone()),
            checkbox_state: Some(applied[0].selected_items.clone()),
            progress_state: Some(later),
        })
        .unwrap();
    assert!(!check.is_consistent);
    assert!(matches!(check.mismatches[0], Mismatch::StateMismatch { .. }));
}

// ============================================================================
// Destruction
// ============================================================================

#[test]
fn test_every_operation_fails_after_destroy() {
    let mut engine = common::engine(sample_catalog());
    assert!(!engine.is_destroyed());
    engine.destroy();

    let paths = ids(&[FOUNDATION]);
    let empty = ProgressSnapshot::new();

    assert!(engine.graph().is_err());
    assert!(engine.config().is_err());
    assert!(engine.clear_cache().is_err());
    assert!(engine.validate_path_structure().is_err());
    assert!(engine.detect_circular_dependencies().is_err());
    assert!(engine.detect_conflicts(&paths, Level::Beginner).is_err());
    assert!(engine.build_dependency_chain(FOUNDATION).is_err());
    assert!(engine.optimize_path_order(&paths).is_err());
    assert!(engine.resolve_diamond_dependencies(&paths).is_err());
    assert!(engine.validate_prerequisites(&paths, &empty).is_err());
    assert!(engine.suggest_related_paths(&paths, Level::Beginner).is_err());
    assert!(engine.discover_available_paths().is_err());
    assert!(engine.graph_stats().is_err());
    assert!(engine.process_multiple_path_selections(&paths).is_err());
    assert!(engine.categorize_progress_items(&empty).is_err());
}
