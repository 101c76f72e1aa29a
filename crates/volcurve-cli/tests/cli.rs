//! End-to-end tests of the `volcurve` binary. None touch the network.

use std::fmt::Write as _;

use assert_cmd::Command;
use predicates::prelude::*;

fn volcurve() -> Command {
    let mut cmd = Command::cargo_bin("volcurve").unwrap();
    cmd.env_remove("VOLCURVE_CONFIG").env("RUST_LOG", "off");
    cmd
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn test_scenarios_report_and_curve_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("curves.csv");

    volcurve()
        .args(["--format", "minimal", "scenarios", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("\nPORTFOLIO VALUE IMPACT\n\n"))
        .stdout(predicate::str::contains("Parallel +50bp: -"))
        .stdout(predicate::str::contains("Butterfly: "));

    let curves = std::fs::read_to_string(&output).unwrap();
    assert!(curves.starts_with("tenor,Base,Parallel +50bp,Steepener,Flattener,Twist,Butterfly"));
    assert_eq!(curves.lines().count(), 9);
}

#[test]
fn test_scenarios_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("curves.csv");

    let assert = volcurve()
        .args(["--format", "json", "scenarios", "--output"])
        .arg(&output)
        .assert()
        .success();
    let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(json["analysis"]["impacts"].as_array().unwrap().len(), 5);
    assert_eq!(json["risk"].as_array().unwrap().len(), 3);
}

#[test]
fn test_config_file_scenarios() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("volcurve.toml");
    let output = dir.path().join("curves.csv");
    std::fs::write(
        &config,
        r#"
[curves]
tenors = [1.0, 2.0, 5.0]

[[curves.bonds]]
maturity = 2
weight = 1.0

[[curves.scenarios]]
name = "Up 10"
kind = "parallel"
shift_bps = 10.0
"#,
    )
    .unwrap();

    volcurve()
        .arg("--config")
        .arg(&config)
        .args(["--format", "minimal", "scenarios", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Up 10: -"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("volcurve.toml");
    std::fs::write(&config, "[surface]\ngrid_points = 1\n").unwrap();

    volcurve()
        .arg("--config")
        .arg(&config)
        .arg("scenarios")
        .assert()
        .failure()
        .stderr(predicate::str::contains("grid_points"));
}

// =============================================================================
// SURFACE
// =============================================================================

fn write_quotes(path: &std::path::Path) {
    let mut csv = String::from(
        "expiration_date,option_type,strike,bid,ask,last_price,last_trade_date,volume,open_interest,implied_volatility\n",
    );
    for (expiry, bump) in [("2024-02-01", 0.0), ("2024-03-01", 0.01), ("2024-05-01", 0.02)] {
        for strike in (80..=120).step_by(5) {
            let m = f64::from(strike) / 100.0;
            let iv = 0.2 + 0.4 * (m - 1.0) * (m - 1.0) + bump;
            writeln!(
                csv,
                "{expiry},call,{strike},2.0,2.1,2.05,2024-01-02T16:00:00,10,100,{iv}"
            )
            .unwrap();
        }
    }
    std::fs::write(path, csv).unwrap();
}

#[test]
fn test_surface_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let quotes = dir.path().join("quotes.csv");
    let output = dir.path().join("surface.csv");
    write_quotes(&quotes);

    volcurve()
        .args(["--format", "json", "surface", "--grid-points", "20", "--spot", "100"])
        .arg("--quotes-csv")
        .arg(&quotes)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"grid_points\": 20"));

    let surface = std::fs::read_to_string(&output).unwrap();
    let mut lines = surface.lines();
    assert_eq!(
        lines.next(),
        Some("moneyness,time_to_expiry,implied_volatility")
    );
    assert_eq!(lines.count(), 400);
}

#[test]
fn test_surface_without_usable_quotes_fails() {
    let dir = tempfile::tempdir().unwrap();
    let quotes = dir.path().join("quotes.csv");
    std::fs::write(
        &quotes,
        "expiration_date,option_type,strike,bid,ask,last_price,last_trade_date,volume,open_interest,implied_volatility\n\
         2024-02-01,call,100,0,0,1.0,2024-01-02T16:00:00,10,100,0.2\n",
    )
    .unwrap();

    volcurve()
        .args(["surface", "--spot", "100", "--output"])
        .arg(dir.path().join("surface.csv"))
        .arg("--quotes-csv")
        .arg(&quotes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient data"));
}

#[test]
fn test_config_command_prints_toml() {
    volcurve()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("ticker = \"SPY\""));
}
