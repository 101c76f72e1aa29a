//! Surface command implementation.
//!
//! Fetches option chains, cleans them, interpolates the implied volatility
//! surface and writes the grid to disk.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use volcurve_config::{AppConfig, SurfaceConfig, Validate};
use volcurve_surface::clean::CleaningReport;
use volcurve_surface::source::{CsvChainSource, OptionChainSource, YahooSource};
use volcurve_surface::surface::FillSummary;
use volcurve_surface::{build_from_source, SurfaceBuild};

use crate::cli::OutputFormat;
use crate::output::{print_header, print_json_value, print_output, print_success, KeyValue};
use crate::sink::{ChartSink, CsvChartSink};

/// Arguments for the surface command.
#[derive(Args, Debug)]
pub struct SurfaceArgs {
    /// Underlying symbol (overrides the configured ticker)
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// Read quotes from a CSV file instead of Yahoo Finance
    #[arg(long, requires = "spot")]
    pub quotes_csv: Option<PathBuf>,

    /// Spot price of the underlying, used with --quotes-csv
    #[arg(long, requires = "quotes_csv")]
    pub spot: Option<f64>,

    /// Samples per grid axis
    #[arg(long)]
    pub grid_points: Option<usize>,

    /// Surface output file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl SurfaceArgs {
    fn apply(&self, base: &SurfaceConfig) -> SurfaceConfig {
        let mut config = base.clone();
        if let Some(ticker) = &self.ticker {
            config = config.with_ticker(ticker.as_str());
        }
        if let Some(n) = self.grid_points {
            config = config.with_grid_points(n);
        }
        if let Some(output) = &self.output {
            config = config.with_output_path(output.display().to_string());
        }
        config
    }

    fn source(&self) -> Result<Box<dyn OptionChainSource>> {
        Ok(match (&self.quotes_csv, self.spot) {
            (Some(path), Some(spot)) => Box::new(CsvChainSource::new(path, spot)?),
            _ => Box::new(YahooSource::new()?),
        })
    }
}

/// Machine-readable summary of a surface run.
#[derive(Debug, Serialize)]
struct SurfaceSummary<'a> {
    symbol: &'a str,
    spot: f64,
    quotes: usize,
    cleaning: CleaningReport,
    grid_points: usize,
    fill: FillSummary,
    min_iv: f64,
    max_iv: f64,
    output: &'a str,
}

impl<'a> SurfaceSummary<'a> {
    fn new(build: &'a SurfaceBuild, output: &'a str) -> Self {
        let (min_iv, max_iv) = build.grid.value_range();
        Self {
            symbol: &build.symbol,
            spot: build.spot,
            quotes: build.quote_count,
            cleaning: build.cleaning,
            grid_points: build.grid.time_axis().len(),
            fill: build.grid.fill(),
            min_iv,
            max_iv,
            output,
        }
    }

    fn rows(&self) -> Vec<KeyValue> {
        let c = &self.cleaning;
        vec![
            KeyValue::new("Symbol", self.symbol),
            KeyValue::from_f64("Spot", self.spot, 2),
            KeyValue::new("Quotes fetched", self.quotes.to_string()),
            KeyValue::new("Dropped: expired or no IV", c.expired_or_no_iv.to_string()),
            KeyValue::new("Dropped: no bid/ask", c.no_market.to_string()),
            KeyValue::new("Dropped: no volume or OI", c.inactive.to_string()),
            KeyValue::new("Dropped: wide spread", c.wide_spread.to_string()),
            KeyValue::new("Dropped: moneyness band", c.out_of_band.to_string()),
            KeyValue::new("Dropped: crossed", c.crossed.to_string()),
            KeyValue::new("Quotes kept", c.kept.to_string()),
            KeyValue::new("Grid", format!("{0} x {0}", self.grid_points)),
            KeyValue::new(
                "Cells cubic / linear / mean",
                format!("{} / {} / {}", self.fill.cubic, self.fill.linear, self.fill.mean),
            ),
            KeyValue::from_percent("Min IV", self.min_iv),
            KeyValue::from_percent("Max IV", self.max_iv),
            KeyValue::new("Output", self.output),
        ]
    }
}

/// Execute the surface command.
pub fn execute(args: SurfaceArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let surface_config = args.apply(&config.surface);
    surface_config.validate_or_error()?;

    let source = args.source()?;
    let build = build_from_source(source.as_ref(), &surface_config)?;

    let mut sink = CsvChartSink::new(&surface_config.output_path);
    sink.write_surface(&build.grid)?;

    let summary = SurfaceSummary::new(&build, &surface_config.output_path);
    match format {
        OutputFormat::Table => {
            print_header(&format!("Volatility Surface: {}", summary.symbol));
            print_output(&summary.rows(), format)?;
            print_success(&format!("Surface written to {}", surface_config.output_path));
        }
        OutputFormat::Json => print_json_value(&summary)?,
        OutputFormat::Csv => print_output(&summary.rows(), format)?,
        OutputFormat::Minimal => println!("{}", surface_config.output_path),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_applied() {
        let args = SurfaceArgs {
            ticker: Some("QQQ".to_string()),
            quotes_csv: None,
            spot: None,
            grid_points: Some(50),
            output: Some(PathBuf::from("out/qqq.csv")),
        };
        let config = args.apply(&SurfaceConfig::default());
        assert_eq!(config.ticker, "QQQ");
        assert_eq!(config.grid_points, 50);
        assert_eq!(config.output_path, "out/qqq.csv");
        assert_eq!(config.moneyness_min, 0.7);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let args = SurfaceArgs {
            ticker: None,
            quotes_csv: None,
            spot: None,
            grid_points: None,
            output: None,
        };
        assert_eq!(args.apply(&SurfaceConfig::default()), SurfaceConfig::default());
    }
}
