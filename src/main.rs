//! SizeHound: find the largest files and folders under a directory.
//!
//! Thin binary entry point. All logic lives in the `sizehound-core`
//! and `sizehound-cli` crates.

use clap::Parser;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = sizehound_cli::Cli::parse();

    // Logs go to stderr so the report on stdout stays clean.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cli.log_level())
        .init();

    tracing::debug!("SizeHound starting");

    sizehound_cli::run(&cli)
}
