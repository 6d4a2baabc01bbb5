//! The `pathway` application.
//!
//! Loads configuration, installs logging, and dispatches commands to the
//! handlers.

use crate::cli::{CliArgs, Command};
use crate::config::PathwayConfig;
use crate::handlers::{self, RankOptions, SelectOptions};
use crate::config_handlers;
use pathway_core::Result;
use tracing_subscriber::EnvFilter;

// ============================================================================
// PathwayCli
// ============================================================================

/// CLI application holding the loaded configuration.
pub struct PathwayCli {
    config: PathwayConfig,
    version: String,
}

impl PathwayCli {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let config = PathwayConfig::load(args.config.as_deref())?;
        Ok(Self::new(config))
    }

    /// Create with an already loaded configuration.
    pub fn new(config: PathwayConfig) -> Self {
        Self {
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// The loaded configuration.
    pub fn config(&self) -> &PathwayConfig {
        &self.config
    }

    /// Initialise tracing-based logging on stderr.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);

        let catalog = args.catalog.as_deref();
        match args.command {
            Some(Command::Select {
                paths,
                progress,
                level,
                apply,
            }) => {
                let options = SelectOptions {
                    paths,
                    progress,
                    level,
                    apply,
                };
                handlers::handle_select(&self.config, catalog, options).await
            }
            Some(Command::Validate) => handlers::handle_validate(&self.config, catalog),
            Some(Command::Chain { path }) => handlers::handle_chain(&self.config, catalog, &path),
            Some(Command::Order { paths }) => handlers::handle_order(&self.config, catalog, &paths),
            Some(Command::Diamond { paths }) => {
                handlers::handle_diamond(&self.config, catalog, &paths)
            }
            Some(Command::Conflicts { paths, level }) => {
                handlers::handle_conflicts(&self.config, catalog, &paths, &level)
            }
            Some(Command::Resolve { paths, level }) => {
                handlers::handle_resolve(&self.config, catalog, &paths, &level)
            }
            Some(Command::Rank {
                paths,
                level,
                interests,
            }) => handlers::handle_rank(
                &self.config,
                catalog,
                RankOptions {
                    paths,
                    level,
                    interests,
                },
            ),
            Some(Command::Stats) => handlers::handle_stats(&self.config, catalog),
            Some(Command::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            None => {
                println!("pathway {} (use --help for usage)", self.version);
                Ok(())
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
