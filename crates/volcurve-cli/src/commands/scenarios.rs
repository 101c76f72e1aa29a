//! Scenarios command implementation.
//!
//! Builds the base curve, values the configured portfolio under every
//! scenario and writes the scenario curves to disk.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use volcurve_config::{AppConfig, CurveEngineConfig, Validate};
use volcurve_rates::curve::base_yield_curve;
use volcurve_rates::portfolio::{ScenarioAnalysis, ScenarioImpact};
use volcurve_rates::risk::BondRisk;
use volcurve_rates::RatesError;

use crate::cli::OutputFormat;
use crate::output::{print_header, print_json_value, print_output, print_success};
use crate::sink::{ChartSink, CsvChartSink};

/// Arguments for the scenarios command.
#[derive(Args, Debug)]
pub struct ScenariosArgs {
    /// Scenario curve output file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip the per-bond risk table
    #[arg(long)]
    pub no_risk: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct ImpactRow {
    #[tabled(rename = "Scenario")]
    name: String,
    #[tabled(rename = "Shift")]
    description: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Delta")]
    delta: String,
}

impl TryFrom<&ScenarioImpact> for ImpactRow {
    type Error = RatesError;

    fn try_from(impact: &ScenarioImpact) -> Result<Self, Self::Error> {
        Ok(Self {
            name: impact.name.clone(),
            description: impact.description.clone(),
            value: format!("{:.4}", impact.value),
            delta: impact.rounded_delta()?.to_string(),
        })
    }
}

fn impact_rows(analysis: &ScenarioAnalysis) -> Result<Vec<ImpactRow>, RatesError> {
    analysis.impacts.iter().map(ImpactRow::try_from).collect()
}

#[derive(Debug, Serialize, Tabled)]
struct RiskRow {
    #[tabled(rename = "Maturity")]
    maturity: String,
    #[tabled(rename = "Yield")]
    yield_rate: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "DV01")]
    dv01: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Convexity")]
    convexity: String,
}

impl From<&BondRisk> for RiskRow {
    fn from(risk: &BondRisk) -> Self {
        Self {
            maturity: format!("{}Y", risk.maturity_years),
            yield_rate: format!("{:.4}%", risk.yield_rate * 100.0),
            price: format!("{:.4}", risk.price),
            dv01: format!("{:.6}", risk.dv01),
            duration: format!("{:.4}", risk.duration),
            convexity: format!("{:.4}", risk.convexity),
        }
    }
}

#[derive(Debug, Serialize)]
struct ScenarioOutput<'a> {
    analysis: &'a ScenarioAnalysis,
    risk: &'a [BondRisk],
}

fn run(config: &CurveEngineConfig) -> Result<(ScenarioAnalysis, Vec<BondRisk>)> {
    let base = base_yield_curve(&config.tenors);
    let portfolio = config.portfolio();
    let analysis = portfolio.scenario_analysis(&base, &config.scenarios)?;
    let risk = portfolio.risk(&base, config.risk_bump)?;
    Ok((analysis, risk))
}

/// Execute the scenarios command.
pub fn execute(args: ScenariosArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let mut curves = config.curves.clone();
    if let Some(output) = &args.output {
        curves.output_path = output.display().to_string();
    }
    curves.validate_or_error()?;

    let (analysis, risk) = run(&curves)?;

    let mut sink = CsvChartSink::new(&curves.output_path);
    sink.write_curves(&analysis)?;

    match format {
        OutputFormat::Table => {
            print!("{}", analysis.report()?);
            print_header("Scenario Detail");
            print_output(&impact_rows(&analysis)?, format)?;
            if !args.no_risk {
                print_header("Bond Risk at Base Curve");
                let rows: Vec<RiskRow> = risk.iter().map(RiskRow::from).collect();
                print_output(&rows, format)?;
            }
            print_success(&format!("Curves written to {}", curves.output_path));
        }
        OutputFormat::Json => print_json_value(&ScenarioOutput {
            analysis: &analysis,
            risk: &risk,
        })?,
        OutputFormat::Csv => print_output(&impact_rows(&analysis)?, format)?,
        OutputFormat::Minimal => print!("{}", analysis.report()?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run() {
        let (analysis, risk) = run(&CurveEngineConfig::default()).unwrap();
        assert_eq!(analysis.impacts.len(), 5);
        assert_eq!(risk.len(), 3);
        assert_eq!(risk[1].maturity_years, 5);
    }

    #[test]
    fn test_impact_row_uses_rounded_delta() {
        let impact = ScenarioImpact {
            name: "Up".to_string(),
            description: "Parallel +50bp".to_string(),
            value: 101.0,
            delta: -1.23456,
            yields: vec![],
        };
        let row = ImpactRow::try_from(&impact).unwrap();
        assert_eq!(row.delta, "-1.23");
        assert_eq!(row.value, "101.0000");
    }

    #[test]
    fn test_non_finite_delta_has_no_row() {
        let impact = ScenarioImpact {
            name: "Crash".to_string(),
            description: "Parallel -11000bp".to_string(),
            value: f64::INFINITY,
            delta: f64::INFINITY,
            yields: vec![],
        };
        assert!(ImpactRow::try_from(&impact).is_err());
    }

    #[test]
    fn test_degenerate_scenario_fails_run() {
        let mut config = CurveEngineConfig::default();
        config.scenarios = vec![volcurve_rates::scenario::Scenario::new(
            "Crash",
            volcurve_rates::scenario::CurveShift::parallel(-11000.0),
        )];
        let err = run(&config).unwrap_err();
        assert!(err.to_string().contains("Numeric degenerate"));
    }
}
