mod commands;
mod config;
mod file;
mod ops;
mod reports;

use clap::Parser;
use eyre::Result;

use crate::commands::Cli;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "NBSTUB_LOG";

fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging();

    Cli::parse().run()
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .ok();
}
