//! One-dimensional interpolation.
//!
//! Yield curves in VolCurve are sampled on a small tenor grid and looked up
//! at arbitrary maturities. The lookup rule throughout the rates code is
//! piecewise-linear between nodes and flat beyond the first and last node,
//! which [`LinearInterpolator`] provides via [`Extrapolation::Flat`].

mod linear;

pub use linear::LinearInterpolator;

use crate::error::MathResult;

/// Behaviour of an interpolator outside its node range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolation {
    /// Queries outside the node range are an error.
    #[default]
    None,
    /// Queries outside the node range return the nearest end value.
    Flat,
}

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}
