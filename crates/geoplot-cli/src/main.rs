//! GeoPlot CLI - Command-line interface
//!
//! Replays GeoJSON shape requests through the feature store and reports
//! what was accepted, trimmed or rejected.

mod cli;
mod commands;
mod config_loader;
mod output;
mod output_types;

use clap::Parser;
use cli::Cli;
use output::OutputWriter;

fn main() {
    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = OutputWriter::new(cli.json);

    if let Err(err) = commands::execute(cli, &output) {
        output.error(format!("{:#}", err));
        std::process::exit(1);
    }
}
