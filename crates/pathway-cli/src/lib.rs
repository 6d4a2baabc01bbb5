//! Command-line interface for Pathway.
//!
//! # Key Abstractions
//!
//! - `PathwayCli`: loads configuration and dispatches commands
//! - `PathwayConfig`: confyg-loaded configuration
//! - `FileProgressStore` / `FileSelectionSink`: file-backed engine
//!   collaborators

#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod handlers;
pub mod store;

pub use app::PathwayCli;
pub use cli::{CliArgs, Command, ConfigAction, ConfigCommand};
pub use config::{CatalogConfig, PathwayConfig, ProgressConfig};
pub use store::{FileProgressStore, FileSelectionSink};
