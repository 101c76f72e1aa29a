//! VolCurve CLI - implied volatility surfaces and yield curve scenarios.
//!
//! # Usage
//!
//! ```bash
//! # Build the SPY surface from Yahoo Finance
//! volcurve surface
//!
//! # Build a surface from saved quotes
//! volcurve surface --quotes-csv quotes.csv --spot 512.3 --output spy.csv
//!
//! # Run the curve scenarios and print the impact report
//! volcurve scenarios
//!
//! # Use a configuration file and JSON output
//! volcurve --config volcurve.toml --format json scenarios
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod error;
mod output;
mod sink;

use cli::{Cli, Commands};

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = commands::load_config(cli.config.as_deref())?;
    let format = cli.format;

    match cli.command {
        Commands::Surface(args) => commands::surface::execute(args, &config, format)?,
        Commands::Scenarios(args) => commands::scenarios::execute(args, &config, format)?,
        Commands::Config(args) => commands::config::execute(args, &config, format)?,
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    if let Err(err) = run(cli) {
        output::print_error(&format!("{err:#}"));
        std::process::exit(1);
    }
}
