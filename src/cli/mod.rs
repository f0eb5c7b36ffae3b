//! Command-line interface for bc-hierarchy.
//!
//! # Available Commands
//!
//! - `expand` - create a hierarchy (or continue a saved one) and expand it by
//!   a number of levels
//! - `tree` - display a saved hierarchy
//!
//! # Typical Session
//!
//! ```bash
//! # Create the top-level node and its direct dependencies
//! bc-hierarchy expand --catalog world.toml --gav org.acme:app:1.0 \
//!     --scm-url https://git.example.com/app.git --scm-revision 1.0-prod \
//!     --state app.json --levels 1
//!
//! # Expand only one interesting dependency a level further
//! bc-hierarchy expand --catalog world.toml --state app.json \
//!     --select org.acme:lib:2.0
//!
//! # Look at the result
//! bc-hierarchy tree --state app.json
//! ```
//!
//! # Global Options
//!
//! - `--verbose` - enable debug logging
//! - `--quiet` - disable logging
//! - `--config <path>` - use a specific configuration file
//!
//! `RUST_LOG` takes precedence over both verbosity flags when set. Logs go to
//! stderr so `--format json` output stays machine-readable.

mod expand;
mod tree;

pub use expand::ExpandCommand;
pub use tree::TreeCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Main CLI structure for bc-hierarchy.
#[derive(Parser, Debug)]
#[command(
    name = "bc-hierarchy",
    about = "Expand dependency hierarchies for build-configuration planning",
    version,
    long_about = "Builds the dependency tree of a top-level artifact one level at a time, \
                  enriching every node with source locations, existing build configurations \
                  and already-built versions."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging; only results and errors are printed
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    ///
    /// Overrides `BCH_CONFIG_PATH` and `~/.bc-hierarchy/config.toml`.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or continue a hierarchy and expand selected nodes.
    ///
    /// See [`ExpandCommand`] for options.
    Expand(ExpandCommand),

    /// Display a saved hierarchy.
    ///
    /// See [`TreeCommand`] for options.
    Tree(TreeCommand),
}

impl Cli {
    /// Execute the parsed command.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();

        match self.command {
            Commands::Expand(cmd) => {
                let config = Config::load_with_optional(self.config).await?;
                cmd.execute(config).await
            }
            Commands::Tree(cmd) => cmd.execute().await,
        }
    }

    /// Log filter selected by the verbosity flags, `None` for no logging.
    fn log_level(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            None
        } else {
            Some("info")
        }
    }

    fn init_logging(&self) {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => match self.log_level() {
                Some(level) => EnvFilter::new(level),
                None => return,
            },
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}
