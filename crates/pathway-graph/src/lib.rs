//! Relationship graph infrastructure for Pathway.
//!
//! This crate provides the learning path catalog model and the graph
//! algorithms that run over it, using petgraph where a real graph
//! structure pays off.
//!
//! # Features
//!
//! - `test-utils`: Sample catalogs for tests in downstream crates
//!
//! # Key Abstractions
//!
//! - `RelationshipGraph`: insertion-ordered map of path id to
//!   `PathDescriptor`
//! - `StructureValidation`: dangling references and missing fields
//! - `CycleReport`: circular prerequisite chains

#![doc = include_str!("../README.md")]

pub mod conflict;
pub mod cycles;
pub mod dependency;
pub mod persistence;
pub mod prerequisites;
pub mod ranking;
pub mod stats;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use conflict::{
    Conflict, ConflictKind, ConflictResolution, ResolutionStrategy, detect_conflicts,
    has_explicit_conflict, is_level_conflict, resolve_conflicts,
};
pub use cycles::{CycleReport, detect_cycles, detect_cycles_from};
pub use dependency::{
    DiamondResolution, build_dependency_chain, optimize_path_order, resolve_diamond_dependencies,
};
pub use persistence::{load_graph, load_graph_from_str, load_graph_from_yaml_str, save_graph};
pub use prerequisites::{
    PrerequisiteUnlock, PrerequisiteValidation, is_prerequisite_satisfied, missing_prerequisites,
    validate_and_update_prerequisites, validate_prerequisites,
};
pub use ranking::{RankedPath, UserPreferences, calculate_compatibility_score, rank_paths_by_relevance};
pub use stats::{
    DependencyEdge, DependencyGraph, DependencyNode, EdgeKind, GraphStats, build_dependency_graph,
    compute_stats, paths_by_category, paths_by_level,
};
pub use types::{DEFAULT_PRIORITY, PathDescriptor, RelationshipGraph};
pub use validation::{
    IssueKind, LevelConsistency, LevelMismatch, StructureIssue, StructureValidation, is_valid,
    validate_kata_id, validate_level_consistency, validate_path_structure,
};
