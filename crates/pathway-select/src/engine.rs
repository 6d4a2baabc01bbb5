//! The auto-selection engine.
//!
//! [`AutoSelectionEngine`] owns a read-only [`RelationshipGraph`], its
//! collaborators, and a lookup cache. Selection runs in a fixed order:
//!
//! 1. Forward malformed progress records to the error recorder.
//! 2. Drop unknown paths (`invalid_path_id`) and flag incomplete ones
//!    (`incomplete_path_data`, still processed).
//! 3. Detect conflicts once across every valid path.
//! 4. Per valid path, in input order: skip on a prerequisite cycle
//!    (`circular_dependency`) or an unmet prerequisite
//!    (`missing_prerequisite`), otherwise collect unstarted items and
//!    level-appropriate related paths.
//! 5. Deduplicate, apply the selection cap, and attach a conflict
//!    resolution when enabled.
//!
//! # Lifecycle
//!
//! [`AutoSelectionEngine::destroy`] drops the graph, the collaborators, and
//! the cache. Every later call fails with [`Error::Destroyed`].

use std::collections::HashSet;
use std::sync::Arc;

use pathway_core::{
    Error, ErrorRecorder, Level, LogErrorRecorder, ProgressSnapshot, ProgressStore, Result,
    SelectionSink, SelectionUpdate, dedup_ordered,
};
use pathway_graph::{
    Conflict, ConflictResolution, CycleReport, DependencyGraph, DiamondResolution, GraphStats,
    LevelConsistency, PrerequisiteUnlock, PrerequisiteValidation, RankedPath, RelationshipGraph,
    StructureValidation, UserPreferences,
};
use serde::{Deserialize, Serialize};

use crate::cache::{CacheStats, PathCache};
use crate::config::EngineConfig;
use crate::integration::{IntegrationConsistency, IntegrationState};
use crate::request::SelectionRequest;
use crate::result::{MessageContext, ResolutionResult, SelectionError, SelectionWarning};
use crate::tracking::{ProgressCategories, SelectionState};

// ============================================================================
// Aggregate results
// ============================================================================

/// Result of [`AutoSelectionEngine::process_multiple_path_selections`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSelectionResult {
    /// One result per input path, in input order.
    pub selections: Vec<ResolutionResult>,
    /// Every conflict from every selection.
    pub conflicts: Vec<Conflict>,
    /// Sum of auto-selected item counts.
    pub total_auto_selected_items: usize,
}

/// Result of
/// [`AutoSelectionEngine::process_path_selection_with_conflict_resolution`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictOutcome {
    /// Paths to keep.
    pub resolved_paths: Vec<String>,
    /// Paths to drop.
    pub removed_paths: Vec<String>,
    /// Why.
    pub reason: String,
}

impl From<ConflictResolution> for ConflictOutcome {
    fn from(resolution: ConflictResolution) -> Self {
        Self {
            resolved_paths: resolution.resolved_paths,
            removed_paths: resolution.removed_paths,
            reason: resolution.reason,
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`AutoSelectionEngine`].
///
/// The progress store and selection sink are required; the error recorder
/// defaults to [`LogErrorRecorder`].
pub struct EngineBuilder {
    graph: RelationshipGraph,
    config: EngineConfig,
    progress_store: Option<Arc<dyn ProgressStore>>,
    selection_sink: Option<Arc<dyn SelectionSink>>,
    recorder: Option<Arc<dyn ErrorRecorder>>,
}

impl EngineBuilder {
    fn new(graph: RelationshipGraph) -> Self {
        Self {
            graph,
            config: EngineConfig::default(),
            progress_store: None,
            selection_sink: None,
            recorder: None,
        }
    }

    /// Set the engine configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the progress store.
    pub fn progress_store(mut self, store: Arc<dyn ProgressStore>) -> Self {
        self.progress_store = Some(store);
        self
    }

    /// Set the selection sink.
    pub fn selection_sink(mut self, sink: Arc<dyn SelectionSink>) -> Self {
        self.selection_sink = Some(sink);
        self
    }

    /// Set the error recorder.
    pub fn error_recorder(mut self, recorder: Arc<dyn ErrorRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Build the engine.
    ///
    /// Fails with [`Error::MissingDependency`] when the progress store or
    /// selection sink was not supplied.
    pub fn build(self) -> Result<AutoSelectionEngine> {
        let progress_store = self
            .progress_store
            .ok_or(Error::MissingDependency("progressStore"))?;
        let selection_sink = self
            .selection_sink
            .ok_or(Error::MissingDependency("selectionSink"))?;
        let recorder = self
            .recorder
            .unwrap_or_else(|| Arc::new(LogErrorRecorder));

        log::debug!(
            "Auto-selection engine ready with {} path(s)",
            self.graph.len()
        );

        Ok(AutoSelectionEngine {
            inner: Some(EngineInner {
                graph: self.graph,
                config: self.config,
                progress_store,
                selection_sink,
                recorder,
                cache: PathCache::new(),
            }),
        })
    }
}

// ============================================================================
// Engine
// ============================================================================

struct EngineInner {
    graph: RelationshipGraph,
    config: EngineConfig,
    progress_store: Arc<dyn ProgressStore>,
    selection_sink: Arc<dyn SelectionSink>,
    recorder: Arc<dyn ErrorRecorder>,
    cache: PathCache,
}

impl EngineInner {
    /// Unknown ids are answered without touching the cache.
    fn related_paths(&self, path_id: &str) -> Vec<String> {
        let Some(descriptor) = self.graph.get(path_id) else {
            return Vec::new();
        };
        let compute = || descriptor.related_paths.clone();
        if self.config.cache_enabled {
            self.cache.related(path_id, compute)
        } else {
            compute()
        }
    }

    fn dependency_chain(&self, path_id: &str) -> Vec<String> {
        if !self.graph.contains(path_id) {
            return Vec::new();
        }
        let compute = || pathway_graph::build_dependency_chain(&self.graph, path_id);
        if self.config.cache_enabled {
            self.cache.dependency_chain(path_id, compute)
        } else {
            compute()
        }
    }

    fn record_malformed(&self, progress: &ProgressSnapshot) {
        for bad in progress.malformed() {
            self.recorder
                .record_error("malformed_progress_data", &bad.reason);
        }
    }

    fn process(
        &self,
        selected: &[String],
        progress: &ProgressSnapshot,
        user_level: Level,
    ) -> ResolutionResult {
        self.record_malformed(progress);

        let mut result = ResolutionResult::default();
        let valid = self.valid_paths(selected, &mut result);
        if valid.is_empty() {
            return result;
        }

        result.conflicts = pathway_graph::detect_conflicts(&self.graph, &valid, user_level);

        let enabled = self.progress_store.auto_selection_enabled();
        let selected_set: HashSet<&str> = selected.iter().map(String::as_str).collect();

        for path_id in &valid {
            let cycles = pathway_graph::detect_cycles_from(&self.graph, path_id);
            if cycles.has_cycles {
                result
                    .errors
                    .push(SelectionError::circular_dependency(path_id, cycles.circular_paths));
                continue;
            }

            let missing = pathway_graph::missing_prerequisites(&self.graph, path_id, progress);
            if let Some(first) = missing.first() {
                result
                    .warnings
                    .push(SelectionWarning::missing_prerequisite(path_id, first));
                continue;
            }

            if !enabled {
                continue;
            }

            let Some(descriptor) = self.graph.get(path_id) else {
                continue;
            };

            result.auto_selected_items.extend(
                descriptor
                    .auto_select_items
                    .iter()
                    .filter(|item| !progress.is_started(item))
                    .cloned(),
            );

            result.suggested_related.extend(
                self.related_paths(path_id)
                    .into_iter()
                    .filter(|related| !selected_set.contains(related.as_str()))
                    .filter(|related| {
                        self.graph
                            .get(related)
                            .is_some_and(|d| user_level.admits(d.level))
                    }),
            );
        }

        result.auto_selected_items = dedup_ordered(std::mem::take(&mut result.auto_selected_items));
        result.suggested_related = dedup_ordered(std::mem::take(&mut result.suggested_related));

        let dropped = self.config.truncate(&mut result.auto_selected_items);
        if dropped > 0 {
            result.warnings.push(SelectionWarning::selection_limit_reached(
                self.config.max_auto_selections,
                dropped,
            ));
        }

        if self.config.enable_conflict_resolution && !result.conflicts.is_empty() {
            let involved = dedup_ordered(
                result
                    .conflicts
                    .iter()
                    .flat_map(|c| c.conflicting_paths.iter().cloned()),
            );
            result.conflict_resolution = Some(pathway_graph::resolve_conflicts(
                &self.graph,
                &involved,
                user_level,
                progress,
            ));
        }

        log::debug!(
            "Selection of {} path(s) at {user_level}: {} item(s), {} suggestion(s), {} conflict(s), {} warning(s), {} error(s)",
            selected.len(),
            result.auto_selected_items.len(),
            result.suggested_related.len(),
            result.conflicts.len(),
            result.warnings.len(),
            result.errors.len()
        );

        result
    }

    /// Known selected paths without repeats, recording warnings on the way.
    fn valid_paths(&self, selected: &[String], result: &mut ResolutionResult) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut valid = Vec::new();

        for path_id in selected {
            let Some(descriptor) = self.graph.get(path_id) else {
                result
                    .warnings
                    .push(SelectionWarning::invalid_path_id(path_id));
                continue;
            };
            if !seen.insert(path_id.as_str()) {
                continue;
            }
            if !descriptor.is_complete() {
                result
                    .warnings
                    .push(SelectionWarning::incomplete_path_data(path_id));
            }
            valid.push(path_id.clone());
        }

        valid
    }
}

/// Resolves learning path selections against a relationship graph.
pub struct AutoSelectionEngine {
    inner: Option<EngineInner>,
}

impl std::fmt::Debug for AutoSelectionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            Some(inner) => f
                .debug_struct("AutoSelectionEngine")
                .field("paths", &inner.graph.len())
                .field("config", &inner.config)
                .finish_non_exhaustive(),
            None => f.write_str("AutoSelectionEngine(destroyed)"),
        }
    }
}

impl AutoSelectionEngine {
    /// Start building an engine over `graph`.
    pub fn builder(graph: RelationshipGraph) -> EngineBuilder {
        EngineBuilder::new(graph)
    }

    fn live(&self) -> Result<&EngineInner> {
        self.inner.as_ref().ok_or(Error::Destroyed)
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Release the graph, collaborators, and cache.
    ///
    /// Calling it again is a no-op.
    pub fn destroy(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.cache.clear();
            log::debug!("Auto-selection engine destroyed");
        }
    }

    /// Whether [`destroy`](Self::destroy) has been called.
    pub fn is_destroyed(&self) -> bool {
        self.inner.is_none()
    }

    /// The catalog.
    pub fn graph(&self) -> Result<&RelationshipGraph> {
        Ok(&self.live()?.graph)
    }

    /// The configuration.
    pub fn config(&self) -> Result<&EngineConfig> {
        Ok(&self.live()?.config)
    }

    /// Drop every cached lookup.
    pub fn clear_cache(&self) -> Result<()> {
        self.live()?.cache.clear();
        Ok(())
    }

    /// Cache counters.
    pub fn cache_stats(&self) -> Result<CacheStats> {
        Ok(self.live()?.cache.stats())
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    /// Resolve `selected` paths for a learner at `user_level`.
    ///
    /// Findings about individual paths are reported in the result; the only
    /// failure is use after [`destroy`](Self::destroy).
    pub fn process_path_selection(
        &self,
        selected: &[String],
        progress: &ProgressSnapshot,
        user_level: Level,
    ) -> Result<ResolutionResult> {
        Ok(self.live()?.process(selected, progress, user_level))
    }

    /// [`process_path_selection`](Self::process_path_selection) for a parsed
    /// request.
    pub fn process_request(&self, request: &SelectionRequest) -> Result<ResolutionResult> {
        self.process_path_selection(
            &request.selected_paths,
            &request.progress,
            request.user_level,
        )
    }

    /// Fetch progress and level from the progress store, then resolve.
    ///
    /// Errors from the store are returned as is.
    pub async fn process_path_selection_with_progress(
        &self,
        selected: &[String],
    ) -> Result<ResolutionResult> {
        let store = Arc::clone(&self.live()?.progress_store);
        let progress = store.kata_progress().await?;
        let user_level = store.user_level();
        self.process_path_selection(selected, &progress, user_level)
    }

    /// Forward a result to the selection sink.
    ///
    /// Sink failures are recorded and logged, not returned.
    pub fn apply_auto_selections(
        &self,
        result: &ResolutionResult,
        path_id: Option<&str>,
    ) -> Result<()> {
        let inner = self.live()?;
        let update = SelectionUpdate {
            selected_items: result.auto_selected_items.clone(),
            suggested_related: result.suggested_related.clone(),
            path_id: path_id.map(String::from),
        };

        if let Err(e) = inner.selection_sink.apply_selections(&update) {
            log::warn!("Failed to apply auto-selections: {e}");
            inner
                .recorder
                .record_error("AutoSelectionEngine.applyAutoSelections", &e.to_string());
        }
        Ok(())
    }

    /// Resolve each path on its own, with no progress, at Beginner level.
    pub fn process_multiple_path_selections(
        &self,
        path_ids: &[String],
    ) -> Result<MultiSelectionResult> {
        let inner = self.live()?;
        let empty = ProgressSnapshot::new();
        let mut combined = MultiSelectionResult::default();

        for path_id in path_ids {
            let result = inner.process(std::slice::from_ref(path_id), &empty, Level::Beginner);
            combined.conflicts.extend(result.conflicts.iter().cloned());
            combined.total_auto_selected_items += result.auto_selected_items.len();
            combined.selections.push(result);
        }

        Ok(combined)
    }

    /// Resolve conflicting paths with no progress information.
    pub fn process_path_selection_with_conflict_resolution(
        &self,
        conflicting: &[String],
        user_level: Level,
    ) -> Result<ConflictOutcome> {
        self.resolve_conflicts(conflicting, user_level, &ProgressSnapshot::new())
            .map(ConflictOutcome::from)
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Check the catalog for dangling references and missing fields.
    pub fn validate_path_structure(&self) -> Result<StructureValidation> {
        Ok(pathway_graph::validate_path_structure(&self.live()?.graph))
    }

    /// Find every path on a prerequisite cycle.
    pub fn detect_circular_dependencies(&self) -> Result<CycleReport> {
        Ok(pathway_graph::detect_cycles(&self.live()?.graph))
    }

    /// Find prerequisite cycles reachable from `path_id`.
    pub fn detect_cycles_from(&self, path_id: &str) -> Result<CycleReport> {
        Ok(pathway_graph::detect_cycles_from(&self.live()?.graph, path_id))
    }

    /// Whether `kata_id` has the `category/NN-name` shape.
    pub fn validate_kata_id(&self, kata_id: &str) -> Result<bool> {
        self.live()?;
        Ok(pathway_graph::validate_kata_id(kata_id))
    }

    /// Check whether `path_ids` mix Beginner and Advanced paths.
    pub fn validate_level_consistency(&self, path_ids: &[String]) -> Result<LevelConsistency> {
        Ok(pathway_graph::validate_level_consistency(
            &self.live()?.graph,
            path_ids,
        ))
    }

    /// Check prerequisite paths and dependency items.
    pub fn validate_prerequisites(
        &self,
        path_ids: &[String],
        progress: &ProgressSnapshot,
    ) -> Result<PrerequisiteValidation> {
        Ok(pathway_graph::validate_prerequisites(
            &self.live()?.graph,
            path_ids,
            progress,
        ))
    }

    /// Split paths into unlocked and blocked.
    pub fn validate_and_update_prerequisites(
        &self,
        path_ids: &[String],
        progress: &ProgressSnapshot,
    ) -> Result<PrerequisiteUnlock> {
        Ok(pathway_graph::validate_and_update_prerequisites(
            &self.live()?.graph,
            path_ids,
            progress,
        ))
    }

    /// Compare component states against each other and the catalog.
    pub fn validate_integration_consistency(
        &self,
        state: &IntegrationState,
    ) -> Result<IntegrationConsistency> {
        Ok(crate::integration::validate_integration_consistency(
            &self.live()?.graph,
            state,
        ))
    }

    // ------------------------------------------------------------------------
    // Conflicts
    // ------------------------------------------------------------------------

    /// Pairwise conflicts among `selected`.
    pub fn detect_conflicts(&self, selected: &[String], user_level: Level) -> Result<Vec<Conflict>> {
        Ok(pathway_graph::detect_conflicts(
            &self.live()?.graph,
            selected,
            user_level,
        ))
    }

    /// Level-keyed resolution of `conflicting` paths.
    pub fn resolve_conflicts(
        &self,
        conflicting: &[String],
        user_level: Level,
        progress: &ProgressSnapshot,
    ) -> Result<ConflictResolution> {
        Ok(pathway_graph::resolve_conflicts(
            &self.live()?.graph,
            conflicting,
            user_level,
            progress,
        ))
    }

    // ------------------------------------------------------------------------
    // Dependencies
    // ------------------------------------------------------------------------

    /// Transitive prerequisites of `path_id`, by level then priority.
    pub fn build_dependency_chain(&self, path_id: &str) -> Result<Vec<String>> {
        Ok(self.live()?.dependency_chain(path_id))
    }

    /// Alias of [`build_dependency_chain`](Self::build_dependency_chain).
    pub fn resolve_dependency_chain(&self, path_id: &str) -> Result<Vec<String>> {
        self.build_dependency_chain(path_id)
    }

    /// Shared prerequisites and a convergence path for `path_ids`.
    pub fn resolve_diamond_dependencies(&self, path_ids: &[String]) -> Result<DiamondResolution> {
        Ok(pathway_graph::resolve_diamond_dependencies(
            &self.live()?.graph,
            path_ids,
        ))
    }

    /// Best-effort prerequisite-first ordering of `path_ids`.
    pub fn optimize_path_order(&self, path_ids: &[String]) -> Result<Vec<String>> {
        Ok(pathway_graph::optimize_path_order(
            &self.live()?.graph,
            path_ids,
        ))
    }

    // ------------------------------------------------------------------------
    // Related paths and ranking
    // ------------------------------------------------------------------------

    /// Related paths of `path_id` as declared; empty for unknown paths.
    pub fn get_related_paths(&self, path_id: &str) -> Result<Vec<String>> {
        Ok(self.live()?.related_paths(path_id))
    }

    /// Level-appropriate related paths of every selected path, minus the
    /// selection.
    pub fn suggest_related_paths(
        &self,
        selected: &[String],
        user_level: Level,
    ) -> Result<Vec<String>> {
        let inner = self.live()?;
        let suggestions = selected
            .iter()
            .flat_map(|id| inner.related_paths(id))
            .filter(|related| {
                inner
                    .graph
                    .get(related)
                    .is_some_and(|d| user_level.admits(d.level))
            })
            .filter(|related| !selected.contains(related));
        Ok(dedup_ordered(suggestions))
    }

    /// Compatibility of `path_b` alongside `path_a`, in `[0, 1]`.
    pub fn calculate_compatibility_score(
        &self,
        path_a: &str,
        path_b: &str,
        user_level: Level,
    ) -> Result<f64> {
        Ok(pathway_graph::calculate_compatibility_score(
            &self.live()?.graph,
            path_a,
            path_b,
            user_level,
        ))
    }

    /// Unselected paths ranked by fit with `selected`.
    pub fn rank_paths_by_relevance(
        &self,
        selected: &[String],
        user_level: Level,
        preferences: &UserPreferences,
    ) -> Result<Vec<RankedPath>> {
        Ok(pathway_graph::rank_paths_by_relevance(
            &self.live()?.graph,
            selected,
            user_level,
            preferences,
        ))
    }

    // ------------------------------------------------------------------------
    // Discovery
    // ------------------------------------------------------------------------

    /// Every path id, in catalog order.
    pub fn discover_available_paths(&self) -> Result<Vec<String>> {
        Ok(self.live()?.graph.ids().map(String::from).collect())
    }

    /// Paths in `category`; paths without one are `uncategorized`.
    pub fn get_paths_by_category(&self, category: &str) -> Result<Vec<String>> {
        Ok(pathway_graph::paths_by_category(
            &self.live()?.graph,
            category,
        ))
    }

    /// Paths at `level`; paths without one count as Beginner.
    pub fn get_paths_by_level(&self, level: Level) -> Result<Vec<String>> {
        Ok(pathway_graph::paths_by_level(&self.live()?.graph, level))
    }

    /// Node and edge export of the catalog.
    pub fn build_dependency_graph(&self) -> Result<DependencyGraph> {
        Ok(pathway_graph::build_dependency_graph(&self.live()?.graph))
    }

    /// Catalog statistics.
    pub fn graph_stats(&self) -> Result<GraphStats> {
        Ok(pathway_graph::compute_stats(&self.live()?.graph))
    }

    // ------------------------------------------------------------------------
    // Progress
    // ------------------------------------------------------------------------

    /// Move newly completed items out of the pending list.
    pub fn update_selections_for_progress(
        &self,
        current: &SelectionState,
        update: &ProgressSnapshot,
    ) -> Result<SelectionState> {
        self.live()?;
        Ok(crate::tracking::update_selections_for_progress(current, update))
    }

    /// Bucket items by status.
    pub fn categorize_progress_items(
        &self,
        progress: &ProgressSnapshot,
    ) -> Result<ProgressCategories> {
        self.live()?;
        Ok(crate::tracking::categorize_progress_items(progress))
    }

    /// Human-readable message for a warning or error kind.
    pub fn error_message(&self, kind: &str, context: &MessageContext) -> Result<String> {
        self.live()?;
        Ok(crate::result::error_message(kind, context))
    }
}

// ============================================================================
// Tests
// ============================================================================
