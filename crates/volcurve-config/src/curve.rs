//! Curve scenario engine configuration.

use serde::{Deserialize, Serialize};
use volcurve_rates::bond::{FixedCouponBond, DEFAULT_COUPON, DEFAULT_FACE};
use volcurve_rates::curve::Tenors;
use volcurve_rates::portfolio::{Holding, Portfolio};
use volcurve_rates::risk::ONE_BP;
use volcurve_rates::scenario::{standard_scenarios, Scenario};

use crate::error::{Validate, ValidationError};

/// A bond position in the scenario portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondConfig {
    /// Years to maturity.
    pub maturity: u32,
    /// Portfolio weight.
    pub weight: f64,
}

impl BondConfig {
    /// Creates a bond position.
    #[must_use]
    pub fn new(maturity: u32, weight: f64) -> Self {
        Self { maturity, weight }
    }
}

/// Settings for the curve scenario engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveEngineConfig {
    /// Curve tenors in years.
    #[serde(default)]
    pub tenors: Tenors,

    /// Portfolio positions.
    #[serde(default = "default_bonds")]
    pub bonds: Vec<BondConfig>,

    /// Annual coupon rate shared by all bonds.
    #[serde(default = "default_coupon")]
    pub coupon: f64,

    /// Face value shared by all bonds.
    #[serde(default = "default_face")]
    pub face: f64,

    /// Yield bump for risk sensitivities.
    #[serde(default = "default_risk_bump")]
    pub risk_bump: f64,

    /// Scenarios, in report order.
    #[serde(default = "standard_scenarios")]
    pub scenarios: Vec<Scenario>,

    /// Scenario curve output file.
    #[serde(default = "default_curve_output")]
    pub output_path: String,
}

fn default_bonds() -> Vec<BondConfig> {
    vec![
        BondConfig::new(2, 0.3),
        BondConfig::new(5, 0.4),
        BondConfig::new(10, 0.3),
    ]
}

fn default_coupon() -> f64 {
    DEFAULT_COUPON
}

fn default_face() -> f64 {
    DEFAULT_FACE
}

fn default_risk_bump() -> f64 {
    ONE_BP
}

fn default_curve_output() -> String {
    "yield_curve_scenarios.csv".to_string()
}

impl Default for CurveEngineConfig {
    fn default() -> Self {
        Self {
            tenors: Tenors::default(),
            bonds: default_bonds(),
            coupon: default_coupon(),
            face: default_face(),
            risk_bump: default_risk_bump(),
            scenarios: standard_scenarios(),
            output_path: default_curve_output(),
        }
    }
}

impl CurveEngineConfig {
    /// Builds the portfolio, applying the shared coupon and face to every bond.
    #[must_use]
    pub fn portfolio(&self) -> Portfolio {
        Portfolio::new(
            self.bonds
                .iter()
                .map(|b| {
                    let bond = FixedCouponBond::new(b.maturity)
                        .with_coupon(self.coupon)
                        .with_face(self.face);
                    Holding::new(bond, b.weight)
                })
                .collect(),
        )
    }
}

impl Validate for CurveEngineConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.bonds.is_empty() {
            errors.push(ValidationError::new("bonds", "Portfolio needs at least one bond"));
        }

        for (i, bond) in self.bonds.iter().enumerate() {
            if bond.maturity == 0 {
                errors.push(ValidationError::with_rule(
                    format!("bonds[{i}].maturity"),
                    "Maturity must be at least 1 year",
                    "positive_maturity",
                ));
            }
            if !bond.weight.is_finite() {
                errors.push(ValidationError::new(
                    format!("bonds[{i}].weight"),
                    "Weight must be finite",
                ));
            }
        }

        if !(self.face > 0.0) {
            errors.push(ValidationError::with_rule(
                "face",
                "Face value must be positive",
                "positive_face",
            ));
        }

        if !self.coupon.is_finite() || self.coupon < 0.0 {
            errors.push(ValidationError::new("coupon", "Coupon must be non-negative"));
        }

        if !(self.risk_bump > 0.0) {
            errors.push(ValidationError::with_rule(
                "risk_bump",
                "Risk bump must be positive",
                "positive_bump",
            ));
        }

        for (i, scenario) in self.scenarios.iter().enumerate() {
            if scenario.name.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("scenarios[{i}].name"),
                    "Scenario name cannot be empty",
                ));
            }
            if self.tenors.len() < scenario.shift.min_tenors() {
                errors.push(ValidationError::with_rule(
                    format!("scenarios[{i}]"),
                    format!(
                        "'{}' needs at least {} tenors, got {}",
                        scenario.name,
                        scenario.shift.min_tenors(),
                        self.tenors.len()
                    ),
                    "min_tenors",
                ));
            }
        }

        if self.output_path.trim().is_empty() {
            errors.push(ValidationError::new("output_path", "Output path cannot be empty"));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volcurve_rates::scenario::CurveShift;

    #[test]
    fn test_defaults() {
        let config = CurveEngineConfig::default();
        assert_eq!(config.tenors.len(), 8);
        assert_eq!(config.bonds.len(), 3);
        assert_eq!(config.scenarios.len(), 5);
        assert_eq!(config.output_path, "yield_curve_scenarios.csv");
        assert!(config.is_valid());
    }

    #[test]
    fn test_default_portfolio_matches_sample() {
        assert_eq!(CurveEngineConfig::default().portfolio(), Portfolio::sample());
    }

    #[test]
    fn test_portfolio_uses_shared_terms() {
        let config = CurveEngineConfig {
            coupon: 0.04,
            face: 1000.0,
            ..CurveEngineConfig::default()
        };
        let portfolio = config.portfolio();
        assert_eq!(portfolio.holdings().len(), 3);
        assert!(portfolio
            .holdings()
            .iter()
            .all(|h| h.bond.coupon_rate == 0.04 && h.bond.face == 1000.0));
    }

    #[test]
    fn test_zero_maturity_rejected() {
        let config = CurveEngineConfig {
            bonds: vec![BondConfig::new(0, 1.0)],
            ..CurveEngineConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors[0].field, "bonds[0].maturity");
    }

    #[test]
    fn test_twist_needs_three_tenors() {
        let config = CurveEngineConfig {
            tenors: Tenors::new(vec![1.0, 10.0]).unwrap(),
            scenarios: vec![Scenario::new("Twist", CurveShift::twist(1.0, 2.0, 3.0))],
            ..CurveEngineConfig::default()
        };
        assert!(!config.is_valid());
    }
}
