//! Finite-difference risk sensitivities.
//!
//! All measures come from three prices: at the yield `y` and at `y ± bump`.
//!
//! ```text
//! DV01      = (P(y - e) - P(y + e)) / 2
//! Duration  = (P(y - e) - P(y + e)) / (2 P(y) e)
//! Convexity = (P(y + e) + P(y - e) - 2 P(y)) / (P(y) e^2)
//! ```

use serde::{Deserialize, Serialize};

use crate::bond::FixedCouponBond;
use crate::error::{RatesError, RatesResult};

/// One basis point as a yield bump.
pub const ONE_BP: f64 = 0.0001;

/// Price change per bump, averaged over the up and down moves.
#[must_use]
pub fn dv01_from_prices(price_up: f64, price_down: f64) -> f64 {
    (price_down - price_up) / 2.0
}

/// Effective duration from bumped prices.
///
/// # Errors
///
/// Returns `NumericDegenerate` if the base price or the bump is zero.
pub fn duration_from_prices(
    price: f64,
    price_up: f64,
    price_down: f64,
    bump: f64,
) -> RatesResult<f64> {
    check_denominators(price, bump)?;
    Ok((price_down - price_up) / (2.0 * price * bump))
}

/// Effective convexity from bumped prices.
///
/// # Errors
///
/// Returns `NumericDegenerate` if the base price or the bump is zero.
pub fn convexity_from_prices(
    price: f64,
    price_up: f64,
    price_down: f64,
    bump: f64,
) -> RatesResult<f64> {
    check_denominators(price, bump)?;
    Ok((price_up + price_down - 2.0 * price) / (price * bump * bump))
}

fn check_denominators(price: f64, bump: f64) -> RatesResult<()> {
    if price.abs() < 1e-10 {
        return Err(RatesError::degenerate("base price is zero"));
    }
    if bump.abs() < 1e-12 {
        return Err(RatesError::degenerate("yield bump is zero"));
    }
    Ok(())
}

/// Price and first/second order sensitivities of a bond at one yield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondRisk {
    /// Maturity in years.
    pub maturity_years: u32,
    /// Yield the bond was priced at.
    pub yield_rate: f64,
    /// Price at the yield.
    pub price: f64,
    /// Price change for a one-bump move.
    pub dv01: f64,
    /// Effective duration.
    pub duration: f64,
    /// Effective convexity.
    pub convexity: f64,
}

impl BondRisk {
    /// Prices the bond at `y` and `y ± bump` and derives all measures.
    ///
    /// # Errors
    ///
    /// Returns `NumericDegenerate` for a zero maturity, zero price or zero
    /// bump.
    pub fn compute(bond: &FixedCouponBond, y: f64, bump: f64) -> RatesResult<Self> {
        let price = bond.price(y)?;
        let price_up = bond.price(y + bump)?;
        let price_down = bond.price(y - bump)?;

        Ok(Self {
            maturity_years: bond.maturity_years,
            yield_rate: y,
            price,
            dv01: dv01_from_prices(price_up, price_down),
            duration: duration_from_prices(price, price_up, price_down, bump)?,
            convexity: convexity_from_prices(price, price_up, price_down, bump)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dv01_from_prices() {
        assert_relative_eq!(dv01_from_prices(99.95, 100.05), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_denominators() {
        assert!(duration_from_prices(0.0, 1.0, 2.0, ONE_BP).is_err());
        assert!(duration_from_prices(100.0, 99.0, 101.0, 0.0).is_err());
        assert!(convexity_from_prices(0.0, 1.0, 2.0, ONE_BP).is_err());
        assert!(convexity_from_prices(100.0, 99.0, 101.0, 0.0).is_err());
    }

    #[test]
    fn test_zero_coupon_like_duration() {
        // A one-year annual bond has Macaulay duration 1, modified 1 / (1 + y)
        let bond = FixedCouponBond::new(1);
        let risk = BondRisk::compute(&bond, 0.04, ONE_BP).unwrap();
        assert_relative_eq!(risk.duration, 1.0 / 1.04, epsilon = 1e-6);
        assert!(risk.convexity > 0.0);
        assert!(risk.dv01 > 0.0);
    }

    #[test]
    fn test_risk_matches_components() {
        let bond = FixedCouponBond::new(5);
        let y = 0.0245;
        let risk = BondRisk::compute(&bond, y, ONE_BP).unwrap();

        let up = bond.price(y + ONE_BP).unwrap();
        let down = bond.price(y - ONE_BP).unwrap();
        assert_eq!(risk.price, bond.price(y).unwrap());
        assert_eq!(risk.dv01, (down - up) / 2.0);
        assert_relative_eq!(risk.dv01, risk.duration * risk.price * ONE_BP, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_maturity_propagates() {
        let err = BondRisk::compute(&FixedCouponBond::new(0), 0.03, ONE_BP).unwrap_err();
        assert!(matches!(err, RatesError::NumericDegenerate { .. }));
    }
}
