//! Handler functions for catalog and selection commands.
//!
//! Every handler loads the catalog, wraps it in an engine backed by the
//! file collaborators, and prints its findings. JSON output goes to stdout;
//! logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use pathway_core::{Error, Level, Result};
use pathway_graph::{RelationshipGraph, UserPreferences, load_graph};
use pathway_select::AutoSelectionEngine;
use serde::Serialize;

use crate::config::PathwayConfig;
use crate::store::{FileProgressStore, FileSelectionSink};

// ============================================================================
// Option types
// ============================================================================

/// Options for `pathway select`.
#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    /// Selected path ids.
    pub paths: Vec<String>,
    /// Progress file overriding `progress.path`.
    pub progress: Option<String>,
    /// Level overriding `progress.user_level`.
    pub level: Option<String>,
    /// Forward the result to the selection sink.
    pub apply: bool,
}

/// Options for `pathway rank`.
#[derive(Debug, Clone, Default)]
pub struct RankOptions {
    /// Selected path ids.
    pub paths: Vec<String>,
    /// Learner level name.
    pub level: String,
    /// Title keywords.
    pub interests: Vec<String>,
}

// ============================================================================
// Helpers
// ============================================================================

/// Load the catalog named by `--catalog` or the configuration.
pub fn load_catalog(config: &PathwayConfig, catalog: Option<&str>) -> Result<RelationshipGraph> {
    let path = config.catalog_path(catalog)?;
    if !path.exists() {
        return Err(Error::file_not_found(&path));
    }
    load_graph(&path)
}

/// Build an engine over `graph` with file-backed collaborators.
pub fn build_engine(
    config: &PathwayConfig,
    graph: RelationshipGraph,
    progress: Option<PathBuf>,
    level: Level,
) -> Result<AutoSelectionEngine> {
    let store = FileProgressStore::new(progress, level)
        .with_auto_selection(config.progress.auto_selection_enabled);
    let sink = FileSelectionSink::new(config.selections_path()?);

    AutoSelectionEngine::builder(graph)
        .config(config.engine.clone())
        .progress_store(Arc::new(store))
        .selection_sink(Arc::new(sink))
        .build()
}

fn open_engine(config: &PathwayConfig, catalog: Option<&str>) -> Result<AutoSelectionEngine> {
    let graph = load_catalog(config, catalog)?;
    build_engine(config, graph, None, config.progress.level())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| Error::serialization(e.to_string()))?;
    println!("{json}");
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// Resolve a selection and print the result as JSON.
pub async fn handle_select(
    config: &PathwayConfig,
    catalog: Option<&str>,
    options: SelectOptions,
) -> Result<()> {
    let graph = load_catalog(config, catalog)?;
    let progress = options
        .progress
        .as_deref()
        .or(config.progress.path.as_deref())
        .map(PathBuf::from);
    let level = options
        .level
        .as_deref()
        .map_or_else(|| config.progress.level(), Level::parse_lenient);

    let engine = build_engine(config, graph, progress, level)?;
    let result = engine
        .process_path_selection_with_progress(&options.paths)
        .await?;

    for warning in &result.warnings {
        tracing::warn!("{}", warning.message);
    }
    for error in &result.errors {
        tracing::error!("{}", error.message);
    }

    print_json(&result)?;

    if options.apply {
        engine.apply_auto_selections(&result, options.paths.first().map(String::as_str))?;
    }
    Ok(())
}

/// Validate catalog structure and check for prerequisite cycles.
pub fn handle_validate(config: &PathwayConfig, catalog: Option<&str>) -> Result<()> {
    let engine = open_engine(config, catalog)?;
    let structure = engine.validate_path_structure()?;
    let cycles = engine.detect_circular_dependencies()?;

    let valid = structure.is_valid && !cycles.has_cycles;
    if valid {
        println!("Catalog is valid.");
    } else {
        println!("Catalog has validation issues:");
    }

    for error in &structure.errors {
        println!(
            "  ERROR [{}]: {} -> {}",
            error.kind.as_str(),
            error.path_id,
            error.reference.as_deref().unwrap_or("?")
        );
    }
    if cycles.has_cycles {
        println!("  ERROR [circular_dependency]: {}", cycles.circular_paths.join(", "));
    }
    for warning in &structure.warnings {
        let detail = match &warning.reference {
            Some(declared) => format!("declares id {declared}"),
            None => format!("missing {}", warning.missing_fields.join(", ")),
        };
        println!(
            "  WARN  [{}]: {} {detail}",
            warning.kind.as_str(),
            warning.path_id
        );
    }

    let error_count = structure.errors.len() + usize::from(cycles.has_cycles);
    println!(
        "\nSummary: {} error(s), {} warning(s)",
        error_count,
        structure.warnings.len()
    );

    if valid {
        Ok(())
    } else {
        Err(Error::operation(format!(
            "Catalog validation failed with {error_count} error(s)"
        )))
    }
}

/// Print the dependency chain of `path`.
pub fn handle_chain(config: &PathwayConfig, catalog: Option<&str>, path: &str) -> Result<()> {
    let engine = open_engine(config, catalog)?;
    if !engine.graph()?.contains(path) {
        return Err(Error::not_found(format!("path {path}")));
    }

    let chain = engine.build_dependency_chain(path)?;
    println!("Dependency chain for '{path}' (learning order):");
    for (i, id) in chain.iter().enumerate() {
        println!("  {}. {id}", i + 1);
    }
    Ok(())
}

/// Print `paths` in prerequisite-first order.
pub fn handle_order(config: &PathwayConfig, catalog: Option<&str>, paths: &[String]) -> Result<()> {
    let engine = open_engine(config, catalog)?;
    for (i, id) in engine.optimize_path_order(paths)?.iter().enumerate() {
        println!("  {}. {id}", i + 1);
    }
    Ok(())
}

/// Print shared prerequisites and the convergence path of `paths`.
pub fn handle_diamond(
    config: &PathwayConfig,
    catalog: Option<&str>,
    paths: &[String],
) -> Result<()> {
    let engine = open_engine(config, catalog)?;
    let diamond = engine.resolve_diamond_dependencies(paths)?;

    println!("Required paths:");
    if diamond.required_paths.is_empty() {
        println!("  (none)");
    }
    for id in &diamond.required_paths {
        println!("  - {id}");
    }
    match &diamond.convergence_path {
        Some(id) => println!("Convergence path: {id}"),
        None => println!("Convergence path: (none)"),
    }
    Ok(())
}

/// Print the conflicts among `paths` as JSON.
pub fn handle_conflicts(
    config: &PathwayConfig,
    catalog: Option<&str>,
    paths: &[String],
    level: &str,
) -> Result<()> {
    let engine = open_engine(config, catalog)?;
    let conflicts = engine.detect_conflicts(paths, Level::parse_lenient(level))?;
    print_json(&conflicts)
}

/// Print the resolution of conflicting `paths` as JSON.
pub fn handle_resolve(
    config: &PathwayConfig,
    catalog: Option<&str>,
    paths: &[String],
    level: &str,
) -> Result<()> {
    let engine = open_engine(config, catalog)?;
    let outcome = engine
        .process_path_selection_with_conflict_resolution(paths, Level::parse_lenient(level))?;
    print_json(&outcome)
}

/// Print unselected paths ranked by relevance.
pub fn handle_rank(
    config: &PathwayConfig,
    catalog: Option<&str>,
    options: RankOptions,
) -> Result<()> {
    let engine = open_engine(config, catalog)?;
    let preferences = UserPreferences::with_interests(options.interests);
    let ranked = engine.rank_paths_by_relevance(
        &options.paths,
        Level::parse_lenient(&options.level),
        &preferences,
    )?;

    if ranked.is_empty() {
        println!("  (no candidates)");
    }
    for (i, path) in ranked.iter().enumerate() {
        println!("  {}. {:.2}  {} ({})", i + 1, path.score, path.path_id, path.title);
    }
    Ok(())
}

/// Print catalog statistics.
pub fn handle_stats(config: &PathwayConfig, catalog: Option<&str>) -> Result<()> {
    let engine = open_engine(config, catalog)?;
    let stats = engine.graph_stats()?;

    println!("Catalog Statistics");
    println!("==================");
    println!("Paths:              {}", stats.path_count);
    println!("Unique items:       {}", stats.unique_item_count);
    println!("Prerequisite edges: {}", stats.prerequisite_edge_count);
    println!("Related edges:      {}", stats.related_edge_count);
    println!("Conflict edges:     {}", stats.conflict_edge_count);
    if let Some(avg) = stats.avg_estimated_time {
        println!("Avg time (min):     {avg:.1}");
    }
    if let Some(id) = &stats.most_required {
        println!("Most required:      {id} ({} dependent(s))", stats.max_dependents);
    }
    if !stats.roots.is_empty() {
        println!("Roots:              {}", stats.roots.join(", "));
    }

    println!("\nLevels:");
    for (level, count) in &stats.level_distribution {
        println!("  {level}: {count}");
    }

    println!("\nCategories:");
    let mut cats: Vec<_> = stats.category_distribution.iter().collect();
    cats.sort_by(|a, b| b.1.cmp(a.1));
    for (cat, count) in cats {
        println!("  {cat}: {count}");
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
