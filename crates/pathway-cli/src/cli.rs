//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level arguments for `pathway`.
#[derive(Parser, Debug)]
#[command(name = "pathway", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "PATHWAY_CONFIG")]
    pub config: Option<String>,

    /// Path to the learning path catalog (JSON or YAML). Overrides
    /// `catalog.path` from the configuration.
    #[arg(long)]
    pub catalog: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a selection of paths and print the result as JSON.
    Select {
        /// Selected path ids.
        #[arg(required = true)]
        paths: Vec<String>,

        /// Progress JSON file (defaults to `progress.path`).
        #[arg(short, long)]
        progress: Option<String>,

        /// Learner level (defaults to `progress.user_level`).
        #[arg(short, long)]
        level: Option<String>,

        /// Write the selection through the selection sink.
        #[arg(long)]
        apply: bool,
    },

    /// Check the catalog for dangling references and prerequisite cycles.
    Validate,

    /// Show the dependency chain of a path.
    Chain {
        /// Path id.
        path: String,
    },

    /// Order paths so prerequisites come first.
    Order {
        /// Path ids.
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Show shared prerequisites and a convergence path.
    Diamond {
        /// Path ids.
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Detect conflicts among paths.
    Conflicts {
        /// Path ids.
        #[arg(required = true)]
        paths: Vec<String>,

        /// Learner level.
        #[arg(short, long, default_value = "Beginner")]
        level: String,
    },

    /// Resolve conflicting paths for a learner level.
    Resolve {
        /// Path ids.
        #[arg(required = true)]
        paths: Vec<String>,

        /// Learner level.
        #[arg(short, long, default_value = "Beginner")]
        level: String,
    },

    /// Rank unselected paths by fit with the given selection.
    Rank {
        /// Selected path ids.
        paths: Vec<String>,

        /// Learner level.
        #[arg(short, long, default_value = "Beginner")]
        level: String,

        /// Interest keyword matched against path titles (repeatable).
        #[arg(short, long = "interest")]
        interests: Vec<String>,
    },

    /// Show catalog statistics.
    Stats,

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Print the effective configuration as TOML.
    Show,

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================
