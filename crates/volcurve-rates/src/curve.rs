//! Tenor grids and yield curves.
//!
//! A [`YieldCurve`] is a set of annually compounded yields aligned to a
//! [`Tenors`] grid. Lookups between tenors are linear; lookups before the
//! first or after the last tenor return the nearest end yield.

use serde::{Deserialize, Serialize};
use volcurve_math::interpolation::{Interpolator, LinearInterpolator};

use crate::error::{RatesError, RatesResult};

/// Default tenor grid in years.
pub const STANDARD_TENORS: [f64; 8] = [0.5, 1.0, 2.0, 5.0, 7.0, 10.0, 20.0, 30.0];

/// Yield floor applied where the base curve formula goes negative.
pub const BASE_RATE_FLOOR: f64 = 0.001;

/// Strictly increasing maturities in years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Tenors(Vec<f64>);

impl Tenors {
    /// Creates a tenor grid.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 tenors, or tenors are not
    /// finite and strictly increasing.
    pub fn new(tenors: Vec<f64>) -> RatesResult<Self> {
        if tenors.len() < 2 {
            return Err(RatesError::invalid_input(format!(
                "need at least 2 tenors, got {}",
                tenors.len()
            )));
        }
        if tenors.iter().any(|t| !t.is_finite()) {
            return Err(RatesError::invalid_input("tenors must be finite"));
        }
        if tenors.windows(2).any(|w| w[1] <= w[0]) {
            return Err(RatesError::invalid_input(
                "tenors must be strictly increasing",
            ));
        }
        Ok(Self(tenors))
    }

    /// The standard grid: 6M, 1Y, 2Y, 5Y, 7Y, 10Y, 20Y, 30Y.
    #[must_use]
    pub fn standard() -> Self {
        Self(STANDARD_TENORS.to_vec())
    }

    /// Returns the tenors as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Returns the number of tenors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a grid holds at least two tenors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shortest tenor.
    pub fn first(&self) -> f64 {
        self.0[0]
    }

    /// Longest tenor.
    pub fn last(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    /// Middle tenor, at index `len / 2`.
    pub fn mid(&self) -> f64 {
        self.0[self.0.len() / 2]
    }
}

impl Default for Tenors {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<f64>> for Tenors {
    type Error = RatesError;

    fn try_from(tenors: Vec<f64>) -> RatesResult<Self> {
        Self::new(tenors)
    }
}

impl From<Tenors> for Vec<f64> {
    fn from(tenors: Tenors) -> Self {
        tenors.0
    }
}

/// Base curve formula: `0.015 + 0.002 t - 0.00002 t^2`, floored at 0.001
/// where negative.
#[must_use]
pub fn base_rate(t: f64) -> f64 {
    let rate = 0.015 + 0.002 * t - 0.00002 * t * t;
    if rate < 0.0 {
        BASE_RATE_FLOOR
    } else {
        rate
    }
}

/// Generates the base yield curve on a tenor grid.
///
/// # Example
///
/// ```rust
/// use volcurve_rates::curve::{base_yield_curve, Tenors};
///
/// let curve = base_yield_curve(&Tenors::new(vec![1.0, 2.0, 5.0]).unwrap());
/// assert!((curve.yields()[0] - 0.01698).abs() < 1e-12);
/// ```
#[must_use]
pub fn base_yield_curve(tenors: &Tenors) -> YieldCurve {
    let yields = tenors.as_slice().iter().map(|&t| base_rate(t)).collect();
    YieldCurve::from_parts(tenors.clone(), yields)
}

/// Yields aligned to a tenor grid.
#[derive(Debug, Clone, PartialEq)]
pub struct YieldCurve {
    tenors: Tenors,
    yields: Vec<f64>,
}

impl YieldCurve {
    /// Creates a curve from yields on a tenor grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of yields differs from the number of
    /// tenors.
    pub fn new(tenors: Tenors, yields: Vec<f64>) -> RatesResult<Self> {
        if yields.len() != tenors.len() {
            return Err(RatesError::invalid_input(format!(
                "expected {} yields, got {}",
                tenors.len(),
                yields.len()
            )));
        }
        Ok(Self::from_parts(tenors, yields))
    }

    fn from_parts(tenors: Tenors, yields: Vec<f64>) -> Self {
        Self { tenors, yields }
    }

    /// Returns the tenor grid.
    pub fn tenors(&self) -> &Tenors {
        &self.tenors
    }

    /// Returns the yields.
    pub fn yields(&self) -> &[f64] {
        &self.yields
    }

    /// Yield at maturity `t`, linear between tenors and flat beyond the ends.
    pub fn yield_at(&self, t: f64) -> RatesResult<f64> {
        let interp = LinearInterpolator::new(self.tenors.0.clone(), self.yields.clone())?
            .with_flat_extrapolation();
        Ok(interp.interpolate(t)?)
    }

    /// Returns a new curve with `shifts` added tenor by tenor.
    ///
    /// # Errors
    ///
    /// Returns an error if `shifts` is not aligned to the tenor grid.
    pub fn shifted(&self, shifts: &[f64]) -> RatesResult<Self> {
        if shifts.len() != self.yields.len() {
            return Err(RatesError::invalid_input(format!(
                "expected {} shifts, got {}",
                self.yields.len(),
                shifts.len()
            )));
        }
        let yields = self.yields.iter().zip(shifts).map(|(y, s)| y + s).collect();
        Ok(Self::from_parts(self.tenors.clone(), yields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_base_curve_values() {
        let curve = base_yield_curve(&Tenors::new(vec![1.0, 2.0, 5.0]).unwrap());
        let expected = [0.01698, 0.01892, 0.0245];
        for (y, e) in curve.yields().iter().zip(expected) {
            assert_relative_eq!(*y, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_base_curve_floor() {
        // Quadratic turns negative beyond ~107Y
        assert_eq!(base_rate(150.0), BASE_RATE_FLOOR);
        for &t in &STANDARD_TENORS {
            assert!(base_rate(t) >= BASE_RATE_FLOOR);
        }
    }

    #[test]
    fn test_tenor_validation() {
        assert!(Tenors::new(vec![1.0]).is_err());
        assert!(Tenors::new(vec![1.0, 1.0, 2.0]).is_err());
        assert!(Tenors::new(vec![2.0, 1.0]).is_err());
        assert!(Tenors::new(vec![0.5, f64::INFINITY]).is_err());
        assert_eq!(Tenors::standard().mid(), 7.0);
    }

    #[test]
    fn test_yield_at_is_clamped() {
        let curve = base_yield_curve(&Tenors::standard());
        assert_eq!(curve.yield_at(0.1).unwrap(), curve.yields()[0]);
        assert_eq!(curve.yield_at(50.0).unwrap(), curve.yields()[7]);
        assert_eq!(curve.yield_at(10.0).unwrap(), base_rate(10.0));

        let mid = curve.yield_at(6.0).unwrap();
        assert_relative_eq!(mid, 0.5 * (base_rate(5.0) + base_rate(7.0)), epsilon = 1e-15);
    }

    #[test]
    fn test_shifted_requires_alignment() {
        let curve = base_yield_curve(&Tenors::standard());
        assert!(curve.shifted(&[0.0; 3]).is_err());

        let up = curve.shifted(&[0.005; 8]).unwrap();
        assert_relative_eq!(up.yields()[3], curve.yields()[3] + 0.005, epsilon = 1e-15);
    }

    #[test]
    fn test_tenors_deserialize_validated() {
        let ok: Tenors = serde_json::from_str("[1.0, 2.0, 5.0]").unwrap();
        assert_eq!(ok.len(), 3);
        assert!(serde_json::from_str::<Tenors>("[5.0, 2.0]").is_err());
    }
}
