//! Surface builder configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

/// Settings for building an implied volatility surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Underlying symbol.
    #[serde(default = "default_ticker")]
    pub ticker: String,

    /// Risk-free rate. Carried for reference; no computation reads it.
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// Samples per grid axis.
    #[serde(default = "default_grid_points")]
    pub grid_points: usize,

    /// Lowest moneyness (strike / spot) kept.
    #[serde(default = "default_moneyness_min")]
    pub moneyness_min: f64,

    /// Highest moneyness (strike / spot) kept.
    #[serde(default = "default_moneyness_max")]
    pub moneyness_max: f64,

    /// Largest bid-ask spread kept, as a fraction of the last price.
    #[serde(default = "default_max_spread_pct")]
    pub max_spread_pct: f64,

    /// Days per year when converting whole days to years.
    #[serde(default = "default_day_count_basis")]
    pub day_count_basis: f64,

    /// Surface grid output file.
    #[serde(default = "default_surface_output")]
    pub output_path: String,
}

fn default_ticker() -> String {
    "SPY".to_string()
}

fn default_risk_free_rate() -> f64 {
    0.045
}

fn default_grid_points() -> usize {
    100
}

fn default_moneyness_min() -> f64 {
    0.7
}

fn default_moneyness_max() -> f64 {
    1.3
}

fn default_max_spread_pct() -> f64 {
    1.0
}

fn default_day_count_basis() -> f64 {
    365.25
}

fn default_surface_output() -> String {
    "volatility_surface.csv".to_string()
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            ticker: default_ticker(),
            risk_free_rate: default_risk_free_rate(),
            grid_points: default_grid_points(),
            moneyness_min: default_moneyness_min(),
            moneyness_max: default_moneyness_max(),
            max_spread_pct: default_max_spread_pct(),
            day_count_basis: default_day_count_basis(),
            output_path: default_surface_output(),
        }
    }
}

impl SurfaceConfig {
    /// Sets the ticker.
    #[must_use]
    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = ticker.into();
        self
    }

    /// Sets the number of samples per grid axis.
    #[must_use]
    pub fn with_grid_points(mut self, grid_points: usize) -> Self {
        self.grid_points = grid_points;
        self
    }

    /// Sets the output path.
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<String>) -> Self {
        self.output_path = path.into();
        self
    }
}

impl Validate for SurfaceConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.ticker.trim().is_empty() {
            errors.push(ValidationError::new("ticker", "Ticker cannot be empty"));
        }

        if self.grid_points < 2 {
            errors.push(ValidationError::with_rule(
                "grid_points",
                format!("Grid needs at least 2 points per axis, got {}", self.grid_points),
                "min_grid_points",
            ));
        }

        if !(self.moneyness_min > 0.0 && self.moneyness_min < self.moneyness_max) {
            errors.push(ValidationError::with_rule(
                "moneyness_min",
                "Moneyness bounds must satisfy 0 < min < max",
                "valid_moneyness_band",
            ));
        }

        if !(self.max_spread_pct > 0.0) {
            errors.push(ValidationError::with_rule(
                "max_spread_pct",
                "Spread threshold must be positive",
                "positive_spread",
            ));
        }

        if !(self.day_count_basis > 0.0) {
            errors.push(ValidationError::with_rule(
                "day_count_basis",
                "Day count basis must be positive",
                "positive_basis",
            ));
        }

        if self.output_path.trim().is_empty() {
            errors.push(ValidationError::new("output_path", "Output path cannot be empty"));
        }

        errors
    }
}
