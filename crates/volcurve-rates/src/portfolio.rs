//! Portfolio valuation and scenario impact analysis.
//!
//! A portfolio is a weighted list of bonds. Each bond is priced at the
//! curve yield for its maturity; the portfolio value is the weighted sum.
//! Scenario impact is the value on the shocked curve minus the value on the
//! base curve, kept at full precision. Rounding happens only for reporting.

use std::fmt::Write as _;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bond::FixedCouponBond;
use crate::curve::YieldCurve;
use crate::error::{RatesError, RatesResult};
use crate::risk::BondRisk;
use crate::scenario::Scenario;

/// Header printed above the impact lines.
pub const REPORT_HEADER: &str = "PORTFOLIO VALUE IMPACT";

/// A bond and its weight in the portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// The bond.
    pub bond: FixedCouponBond,
    /// Multiplier applied to the bond price.
    pub weight: f64,
}

impl Holding {
    /// Creates a holding.
    #[must_use]
    pub fn new(bond: FixedCouponBond, weight: f64) -> Self {
        Self { bond, weight }
    }
}

/// A weighted collection of bonds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    holdings: Vec<Holding>,
}

impl Portfolio {
    /// Creates a portfolio from holdings.
    #[must_use]
    pub fn new(holdings: Vec<Holding>) -> Self {
        Self { holdings }
    }

    /// The sample portfolio: 2Y, 5Y and 10Y bonds weighted 0.3, 0.4, 0.3.
    #[must_use]
    pub fn sample() -> Self {
        Self::new(vec![
            Holding::new(FixedCouponBond::new(2), 0.3),
            Holding::new(FixedCouponBond::new(5), 0.4),
            Holding::new(FixedCouponBond::new(10), 0.3),
        ])
    }

    /// Returns the holdings.
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Weighted sum of bond prices, each at the curve yield for its maturity.
    ///
    /// # Errors
    ///
    /// Returns `NumericDegenerate` if any bond cannot be priced or the
    /// weighted sum is not finite.
    pub fn value(&self, curve: &YieldCurve) -> RatesResult<f64> {
        let value = self.holdings.iter().try_fold(0.0, |total, h| {
            let y = curve.yield_at(h.bond.maturity())?;
            Ok::<_, RatesError>(total + h.weight * h.bond.price(y)?)
        })?;
        if !value.is_finite() {
            return Err(RatesError::degenerate("portfolio value is not finite"));
        }
        Ok(value)
    }

    /// Per-bond price and sensitivities at the curve yield for each maturity.
    pub fn risk(&self, curve: &YieldCurve, bump: f64) -> RatesResult<Vec<BondRisk>> {
        self.holdings
            .iter()
            .map(|h| {
                let y = curve.yield_at(h.bond.maturity())?;
                BondRisk::compute(&h.bond, y, bump)
            })
            .collect()
    }

    /// Values the portfolio under each scenario against the base curve.
    ///
    /// Impacts are returned in scenario order.
    ///
    /// # Errors
    ///
    /// Fails on the first scenario that cannot be applied or valued,
    /// including one whose delta is not finite.
    pub fn scenario_analysis(
        &self,
        base: &YieldCurve,
        scenarios: &[Scenario],
    ) -> RatesResult<ScenarioAnalysis> {
        let base_value = self.value(base)?;
        tracing::debug!(base_value, holdings = self.holdings.len(), "valued base curve");

        let impacts = scenarios
            .iter()
            .map(|scenario| {
                let curve = scenario.apply(base)?;
                let value = self.value(&curve)?;
                let delta = value - base_value;
                if !delta.is_finite() {
                    return Err(RatesError::degenerate(format!(
                        "scenario '{}' has a non-finite delta",
                        scenario.name
                    )));
                }
                let impact = ScenarioImpact {
                    name: scenario.name.clone(),
                    description: scenario.shift.description(),
                    value,
                    delta,
                    yields: curve.yields().to_vec(),
                };
                tracing::debug!(scenario = %impact.name, delta = impact.delta, "scenario valued");
                Ok(impact)
            })
            .collect::<RatesResult<Vec<_>>>()?;

        Ok(ScenarioAnalysis {
            tenors: base.tenors().as_slice().to_vec(),
            base_yields: base.yields().to_vec(),
            base_value,
            impacts,
        })
    }
}

/// Outcome of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioImpact {
    /// Scenario name.
    pub name: String,
    /// Description of the curve shift.
    pub description: String,
    /// Portfolio value on the shocked curve.
    pub value: f64,
    /// Shocked value minus base value, unrounded.
    pub delta: f64,
    /// Shocked curve yields, aligned to the base tenors.
    pub yields: Vec<f64>,
}

impl ScenarioImpact {
    /// Delta rounded half-to-even at two decimals, from its exact binary value.
    ///
    /// # Errors
    ///
    /// Returns `NumericDegenerate` if the delta is not finite.
    pub fn rounded_delta(&self) -> RatesResult<Decimal> {
        round_to_cents(self.delta)
    }
}

/// Base valuation together with every scenario outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAnalysis {
    /// Curve tenors.
    pub tenors: Vec<f64>,
    /// Base curve yields.
    pub base_yields: Vec<f64>,
    /// Portfolio value on the base curve.
    pub base_value: f64,
    /// Scenario outcomes in input order.
    pub impacts: Vec<ScenarioImpact>,
}

impl ScenarioAnalysis {
    /// Plain-text impact report: a header, then `name: delta` per scenario.
    ///
    /// Deltas are normalized decimals, so whole values print without a
    /// fractional part (`2`, not `2.0`) and a negative zero prints as `0`.
    ///
    /// # Errors
    ///
    /// Returns `NumericDegenerate` if any delta is not finite.
    pub fn report(&self) -> RatesResult<String> {
        let mut out = format!("\n{REPORT_HEADER}\n\n");
        for impact in &self.impacts {
            let _ = writeln!(out, "{}: {}", impact.name, impact.rounded_delta()?);
        }
        Ok(out)
    }
}

/// Rounds half-to-even at two decimals, dropping trailing zeros.
///
/// # Errors
///
/// Returns `NumericDegenerate` for NaN, infinities and values outside the
/// `Decimal` range.
pub fn round_to_cents(x: f64) -> RatesResult<Decimal> {
    Decimal::from_f64_retain(x)
        .map(|d| d.round_dp(2).normalize())
        .ok_or_else(|| RatesError::degenerate(format!("cannot round {x} to cents")))
}
