//! Configuration for the `pathway` CLI.
//!
//! Provides [`PathwayConfig`], loaded from TOML files, environment variables,
//! and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `PATHWAY_CONFIG` environment variable
//! 3. XDG default: `~/.config/pathway/config.toml`
//! 4. Built-in defaults

use confyg::{Confygery, env};
use pathway_core::{Error, Level, Result};
use pathway_select::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathwayConfig {
    /// Engine tunables.
    pub engine: EngineConfig,

    /// Where the catalog lives.
    pub catalog: CatalogConfig,

    /// Learner progress and selection output.
    pub progress: ProgressConfig,
}

/// Catalog location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to the catalog file (JSON, or YAML by extension).
    pub path: Option<String>,
}

/// Progress source and selection destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Progress JSON file. Missing means no progress.
    pub path: Option<String>,

    /// Learner level name. Unknown names fall back to Beginner.
    pub user_level: String,

    /// Whether selections add items at all.
    pub auto_selection_enabled: bool,

    /// Where applied selections are written.
    pub selections_path: Option<String>,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            path: None,
            user_level: Level::Beginner.to_string(),
            auto_selection_enabled: true,
            selections_path: None,
        }
    }
}

impl ProgressConfig {
    /// The configured level, leniently parsed.
    pub fn level(&self) -> Level {
        Level::parse_lenient(&self.user_level)
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl PathwayConfig {
    /// Load configuration from file, environment, and defaults.
    ///
    /// Environment values arrive as strings, so overrides only work for
    /// string-typed keys such as `PATHWAY_CATALOG_PATH` or
    /// `PATHWAY_PROGRESS_USER_LEVEL`.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path)
            && path.exists()
        {
            builder
                .add_file(&path.to_string_lossy())
                .map_err(|e| Error::config(format!("config file: {e}")))?;
        }

        let mut env_opts = env::Options::with_top_level("PATHWAY");
        env_opts.add_section("engine");
        env_opts.add_section("catalog");
        env_opts.add_section("progress");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("PATHWAY_CONFIG") {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("pathway").join("config.toml"))
    }

    /// The catalog file: the explicit override, else `catalog.path`.
    pub fn catalog_path(&self, explicit: Option<&str>) -> Result<PathBuf> {
        explicit
            .or(self.catalog.path.as_deref())
            .map(PathBuf::from)
            .ok_or_else(|| {
                Error::config("No catalog configured; set catalog.path or pass --catalog")
            })
    }

    /// Where applied selections go: `progress.selections_path`, else
    /// `selections.json` under the user data directory.
    pub fn selections_path(&self) -> Result<PathBuf> {
        match &self.progress.selections_path {
            Some(p) => Ok(PathBuf::from(p)),
            None => dirs::data_dir()
                .map(|d| d.join("pathway").join("selections.json"))
                .ok_or_else(|| Error::config("Could not determine data directory")),
        }
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with `PATHWAY_` prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value: toml::Value =
            toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, "PATHWAY", &mut vars);
        Ok(vars)
    }
}

// ============================================================================
// Helper: flatten TOML to env vars
// ============================================================================

fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Integer(i) => out.push((prefix.to_string(), i.to_string())),
        toml::Value::Float(f) => out.push((prefix.to_string(), f.to_string())),
        toml::Value::Boolean(b) => out.push((prefix.to_string(), b.to_string())),
        toml::Value::Datetime(dt) => out.push((prefix.to_string(), dt.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================
