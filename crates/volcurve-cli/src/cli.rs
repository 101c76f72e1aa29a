//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{ConfigArgs, ScenariosArgs, SurfaceArgs};

/// VolCurve - implied volatility surfaces and yield curve scenarios
#[derive(Parser, Debug)]
#[command(name = "volcurve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// TOML configuration file; defaults apply when omitted
    #[arg(short, long, env = "VOLCURVE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch option quotes and build an implied volatility surface
    Surface(SurfaceArgs),

    /// Value the bond portfolio under the yield curve scenarios
    Scenarios(ScenariosArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output
    Minimal,
}
