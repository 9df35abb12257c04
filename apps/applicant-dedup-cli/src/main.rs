//! applicant-dedup CLI
//!
//! Flags likely duplicate job applications in a JSON or CSV export.
//! Reports go to stdout as JSON; logs go to stderr (`RUST_LOG`, default `warn`).

mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    commands::run(cli, &mut stdout)
}
