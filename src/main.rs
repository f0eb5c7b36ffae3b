//! bc-hierarchy CLI entry point
//!
//! Parses the command line, runs the command and turns failures into a
//! colored error report with a suggestion.
//!
//! - `expand` - create or continue a dependency hierarchy
//! - `tree` - show a saved hierarchy

use anyhow::Result;
use bc_hierarchy::cli;
use bc_hierarchy::core::user_friendly_error;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
