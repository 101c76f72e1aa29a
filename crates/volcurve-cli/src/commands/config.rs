//! Config command implementation.
//!
//! Prints the configuration in effect after defaults are applied.

use anyhow::Result;
use clap::Args;
use volcurve_config::AppConfig;

use crate::cli::OutputFormat;
use crate::output::print_json_value;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {}

/// Execute the config command.
pub fn execute(_args: ConfigArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json_value(config)?,
        _ => print!("{}", config.to_toml_string()?),
    }
    Ok(())
}
