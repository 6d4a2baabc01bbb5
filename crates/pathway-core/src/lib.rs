//! Pathway Core: shared types, traits, errors, and utilities.
//!
//! This crate provides the foundational types used across all Pathway crates.
//! It has no internal Pathway dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`level`]: The learner skill scale
//! - [`progress`]: Per-item progress snapshots
//! - [`traits`]: Collaborator traits the selection engine depends on
//! - [`util`]: Small collection helpers

#![doc = include_str!("../README.md")]

pub mod error;
pub mod level;
pub mod progress;
pub mod traits;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use level::Level;
pub use progress::{MalformedProgress, ProgressEntry, ProgressSnapshot};
pub use traits::{ErrorRecorder, LogErrorRecorder, ProgressStore, SelectionSink, SelectionUpdate};
pub use util::dedup_ordered;
