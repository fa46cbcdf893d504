//! Command implementations

mod config;
mod gaps;
mod merge;
mod visits;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config_file = cli.config.as_deref();

    match cli.command {
        Commands::Gaps(args) => gaps::execute(args, config_file, &output),
        Commands::Visits(args) => visits::execute(args, config_file, &output).await,
        Commands::Merge(args) => merge::execute(args, &output),
        Commands::Config => config::execute(config_file, &output),
    }
}
