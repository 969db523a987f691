//! apkpack - Alpine package builder CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use apkpack_cli::Cli;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    apkpack_cli::run(Cli::parse())
}
