//! Command implementations

mod apply;
mod config;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli, output: &OutputWriter) -> Result<()> {
    let layered_config = load_config(cli.config.as_deref(), cli.config_overrides())?;

    match cli.command {
        Commands::Apply(args) => apply::execute(args, &layered_config, output),
        Commands::Config => config::execute(&layered_config, output),
    }
}
