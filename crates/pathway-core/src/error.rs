//! Error types for Pathway operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all Pathway crates. Uses `thiserror` for derive macros.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur in Pathway operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a specific file.
    #[error("I/O error at {path}: {source}")]
    IoWithPath {
        /// The file that could not be read or written.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data or format.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Parse error (JSON, YAML, TOML).
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A higher-level operation failed.
    #[error("Operation failed: {0}")]
    Operation(String),

    /// A required collaborator was not supplied at construction time.
    #[error("AutoSelectionEngine requires {0} dependency")]
    MissingDependency(&'static str),

    /// The engine was used after `destroy()`.
    #[error("AutoSelectionEngine has been destroyed")]
    Destroyed,
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a not found error for a missing file.
    pub fn file_not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound(format!("file {}", path.as_ref().display()))
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create an operation error.
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Wrap an I/O error with the path that caused it.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error signals use of a destroyed engine.
    pub fn is_destroyed(&self) -> bool {
        matches!(self, Self::Destroyed)
    }
}

/// Result type alias using Pathway's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        assert!(matches!(Error::config("x"), Error::Config(m) if m == "x"));
        assert!(matches!(Error::parse("bad"), Error::Parse(_)));
        assert!(matches!(Error::operation("op"), Error::Operation(_)));
        assert!(matches!(Error::invalid_data("d"), Error::InvalidData(_)));
    }

    #[test]
    fn test_missing_dependency_message() {
        let err = Error::MissingDependency("progress store");
        assert_eq!(
            err.to_string(),
            "AutoSelectionEngine requires progress store dependency"
        );
    }

    #[test]
    fn test_destroyed_message() {
        let err = Error::Destroyed;
        assert!(err.is_destroyed());
        assert_eq!(err.to_string(), "AutoSelectionEngine has been destroyed");
    }

    #[test]
    fn test_io_with_path_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::io_with_path(io, "/tmp/catalog.json");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/catalog.json"));
        assert!(msg.contains("gone"));
    }
}
