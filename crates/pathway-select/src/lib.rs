//! Auto-selection engine for Pathway.
//!
//! Turns a set of selected learning paths, a progress snapshot, and a
//! learner level into items to auto-select, related paths to suggest, and
//! the conflicts, warnings, and errors found on the way.
//!
//! # Key Abstractions
//!
//! - `AutoSelectionEngine`: the orchestrator, built with `EngineBuilder`
//! - `ResolutionResult`: everything one selection call found
//! - `SelectionRequest`: a selection parsed from untyped JSON
//! - `PathCache`: memoized related-path and dependency-chain lookups

#![doc = include_str!("../README.md")]

pub mod cache;
pub mod config;
pub mod engine;
pub mod integration;
pub mod request;
pub mod result;
pub mod tracking;

pub use cache::{CacheStats, PathCache};
pub use config::{DEFAULT_MAX_AUTO_SELECTIONS, EngineConfig};
pub use engine::{AutoSelectionEngine, ConflictOutcome, EngineBuilder, MultiSelectionResult};
pub use integration::{
    IntegrationConsistency, IntegrationState, Mismatch, validate_integration_consistency,
};
pub use request::SelectionRequest;
pub use result::{
    MessageContext, MessageKind, ResolutionResult, SelectionError, SelectionErrorKind,
    SelectionWarning, WarningKind, error_message, message_for,
};
pub use tracking::{
    ProgressCategories, SelectionState, categorize_progress_items, update_selections_for_progress,
};
