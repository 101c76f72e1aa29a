//! Deterministic yield curve scenarios.
//!
//! Each [`CurveShift`] produces a shift per tenor which is added to the
//! curve. Shapes other than the parallel shift are defined by anchor values
//! at the first, middle (`tenors[len / 2]`) and last tenor and linearly
//! interpolated in between; the shift is held flat outside the anchors and
//! equals the anchor value exactly at an anchor tenor.
//!
//! # Example
//!
//! ```rust
//! use volcurve_rates::curve::{base_yield_curve, Tenors};
//! use volcurve_rates::scenario::{CurveShift, Scenario};
//!
//! let base = base_yield_curve(&Tenors::standard());
//! let scenario = Scenario::new("Steepener", CurveShift::steepener(-20.0, 30.0));
//!
//! let shocked = scenario.apply(&base).unwrap();
//! assert!((shocked.yields()[0] - base.yields()[0] + 0.0020).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use volcurve_math::interpolation::{Interpolator, LinearInterpolator};

use crate::curve::{Tenors, YieldCurve};
use crate::error::{RatesError, RatesResult};

/// Basis points per unit of yield.
pub const BPS_PER_UNIT: f64 = 10_000.0;

/// A curve transformation, with all amounts in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveShift {
    /// Uniform shift across all tenors.
    Parallel {
        /// Shift in basis points.
        shift_bps: f64,
    },

    /// Linear shift from the short end to the long end.
    Steepener {
        /// Shift at the first tenor.
        short_bps: f64,
        /// Shift at the last tenor.
        long_bps: f64,
    },

    /// Linear shift from the short end to the long end.
    ///
    /// Same profile as [`CurveShift::Steepener`]; the two differ only in the
    /// sign convention of the parameters callers pass.
    Flattener {
        /// Shift at the first tenor.
        short_bps: f64,
        /// Shift at the last tenor.
        long_bps: f64,
    },

    /// Piecewise-linear shift through short, middle and long anchors.
    Twist {
        /// Shift at the first tenor.
        short_bps: f64,
        /// Shift at the middle tenor.
        mid_bps: f64,
        /// Shift at the last tenor.
        long_bps: f64,
    },

    /// Wings move together, the belly moves separately.
    Butterfly {
        /// Shift at the first and last tenor.
        wing_bps: f64,
        /// Shift at the middle tenor.
        belly_bps: f64,
    },
}

impl CurveShift {
    /// Creates a parallel shift.
    #[must_use]
    pub fn parallel(shift_bps: f64) -> Self {
        Self::Parallel { shift_bps }
    }

    /// Creates a steepener, conventionally short down and long up.
    #[must_use]
    pub fn steepener(short_bps: f64, long_bps: f64) -> Self {
        Self::Steepener {
            short_bps,
            long_bps,
        }
    }

    /// Creates a flattener, conventionally short up and long down.
    #[must_use]
    pub fn flattener(short_bps: f64, long_bps: f64) -> Self {
        Self::Flattener {
            short_bps,
            long_bps,
        }
    }

    /// Creates a three-anchor twist.
    #[must_use]
    pub fn twist(short_bps: f64, mid_bps: f64, long_bps: f64) -> Self {
        Self::Twist {
            short_bps,
            mid_bps,
            long_bps,
        }
    }

    /// Creates a butterfly.
    #[must_use]
    pub fn butterfly(wing_bps: f64, belly_bps: f64) -> Self {
        Self::Butterfly {
            wing_bps,
            belly_bps,
        }
    }

    /// Minimum number of tenors the shape needs.
    #[must_use]
    pub fn min_tenors(&self) -> usize {
        match self {
            Self::Parallel { .. } | Self::Steepener { .. } | Self::Flattener { .. } => 2,
            Self::Twist { .. } | Self::Butterfly { .. } => 3,
        }
    }

    /// Anchor tenors and shifts (as decimals) defining the profile.
    fn anchors(&self, tenors: &Tenors) -> (Vec<f64>, Vec<f64>) {
        let (first, mid, last) = (tenors.first(), tenors.mid(), tenors.last());
        let (xs, bps) = match *self {
            Self::Parallel { shift_bps } => (vec![first, last], vec![shift_bps, shift_bps]),
            Self::Steepener {
                short_bps,
                long_bps,
            }
            | Self::Flattener {
                short_bps,
                long_bps,
            } => (vec![first, last], vec![short_bps, long_bps]),
            Self::Twist {
                short_bps,
                mid_bps,
                long_bps,
            } => (vec![first, mid, last], vec![short_bps, mid_bps, long_bps]),
            Self::Butterfly {
                wing_bps,
                belly_bps,
            } => (vec![first, mid, last], vec![wing_bps, belly_bps, wing_bps]),
        };
        (xs, bps.into_iter().map(|b| b / BPS_PER_UNIT).collect())
    }

    /// Shift at every tenor of the grid, as decimals.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid has fewer tenors than the shape needs.
    pub fn shifts(&self, tenors: &Tenors) -> RatesResult<Vec<f64>> {
        if let Self::Parallel { shift_bps } = *self {
            return Ok(vec![shift_bps / BPS_PER_UNIT; tenors.len()]);
        }
        if tenors.len() < self.min_tenors() {
            return Err(RatesError::invalid_input(format!(
                "{} needs at least {} tenors, got {}",
                self.description(),
                self.min_tenors(),
                tenors.len()
            )));
        }

        let (xs, ys) = self.anchors(tenors);
        let profile = LinearInterpolator::new(xs, ys)?.with_flat_extrapolation();
        tenors
            .as_slice()
            .iter()
            .map(|&t| Ok(profile.interpolate(t)?))
            .collect()
    }

    /// Applies the shift to a curve, returning a new curve.
    pub fn apply(&self, curve: &YieldCurve) -> RatesResult<YieldCurve> {
        let shifts = self.shifts(curve.tenors())?;
        curve.shifted(&shifts)
    }

    /// Returns a short description of this shift.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Parallel { shift_bps } => format!("Parallel {shift_bps:+.0}bp"),
            Self::Steepener {
                short_bps,
                long_bps,
            } => format!("Steepener {short_bps:+.0}/{long_bps:+.0}bp"),
            Self::Flattener {
                short_bps,
                long_bps,
            } => format!("Flattener {short_bps:+.0}/{long_bps:+.0}bp"),
            Self::Twist {
                short_bps,
                mid_bps,
                long_bps,
            } => format!("Twist {short_bps:+.0}/{mid_bps:+.0}/{long_bps:+.0}bp"),
            Self::Butterfly {
                wing_bps,
                belly_bps,
            } => format!("Butterfly wings {wing_bps:+.0}bp belly {belly_bps:+.0}bp"),
        }
    }
}

/// A named curve shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Name used in reports.
    pub name: String,
    /// The transformation.
    #[serde(flatten)]
    pub shift: CurveShift,
}

impl Scenario {
    /// Creates a named scenario.
    #[must_use]
    pub fn new(name: impl Into<String>, shift: CurveShift) -> Self {
        Self {
            name: name.into(),
            shift,
        }
    }

    /// Applies the scenario to a curve.
    pub fn apply(&self, curve: &YieldCurve) -> RatesResult<YieldCurve> {
        self.shift.apply(curve)
    }
}

/// The five canonical scenarios, in report order.
#[must_use]
pub fn standard_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("Parallel +50bp", CurveShift::parallel(50.0)),
        Scenario::new("Steepener", CurveShift::steepener(-20.0, 30.0)),
        Scenario::new("Flattener", CurveShift::flattener(20.0, -30.0)),
        Scenario::new("Twist", CurveShift::twist(20.0, -10.0, 30.0)),
        Scenario::new("Butterfly", CurveShift::butterfly(-20.0, 40.0)),
    ]
}
