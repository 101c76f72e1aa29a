//! Linear interpolation.

use crate::error::{MathError, MathResult};
use crate::interpolation::{Extrapolation, Interpolator};

/// Linear interpolation between data points.
///
/// Consecutive nodes are joined with straight lines. The value at a node is
/// returned exactly, including the last node.
///
/// # Example
///
/// ```rust
/// use volcurve_math::interpolation::{Interpolator, LinearInterpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 1.0, 4.0, 9.0];
///
/// let interp = LinearInterpolator::new(xs, ys).unwrap().with_flat_extrapolation();
/// assert_eq!(interp.interpolate(1.5).unwrap(), 2.5);
/// assert_eq!(interp.interpolate(10.0).unwrap(), 9.0);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    extrapolation: Extrapolation,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// # Arguments
    ///
    /// * `xs` - X coordinates (must be strictly increasing)
    /// * `ys` - Y coordinates
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points or if lengths differ.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        if xs.len() < 2 {
            return Err(MathError::insufficient_data(2, xs.len()));
        }
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }

        for i in 1..xs.len() {
            if xs[i] <= xs[i - 1] {
                return Err(MathError::invalid_input(
                    "x values must be strictly increasing",
                ));
            }
        }

        Ok(Self {
            xs,
            ys,
            extrapolation: Extrapolation::None,
        })
    }

    /// Holds the end values constant beyond the data range.
    #[must_use]
    pub fn with_flat_extrapolation(mut self) -> Self {
        self.extrapolation = Extrapolation::Flat;
        self
    }

    /// Returns the extrapolation mode.
    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    fn last(&self) -> usize {
        self.xs.len() - 1
    }

    /// Finds the index i such that xs[i] <= x < xs[i+1].
    fn find_segment(&self, x: f64) -> usize {
        match self
            .xs
            .binary_search_by(|probe| probe.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => i.min(self.xs.len() - 2),
            Err(i) => (i.saturating_sub(1)).min(self.xs.len() - 2),
        }
    }

    fn check_range(&self, x: f64) -> MathResult<()> {
        if x.is_nan() {
            return Err(MathError::invalid_input("query point is NaN"));
        }
        if self.extrapolation == Extrapolation::None && !self.in_range(x) {
            return Err(MathError::ExtrapolationNotAllowed {
                x,
                min: self.xs[0],
                max: self.xs[self.last()],
            });
        }
        Ok(())
    }

    fn slope(&self, i: usize) -> f64 {
        (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i])
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;

        let last = self.last();
        if self.extrapolation == Extrapolation::Flat {
            if x <= self.xs[0] {
                return Ok(self.ys[0]);
            }
            if x >= self.xs[last] {
                return Ok(self.ys[last]);
            }
        }
        if x == self.xs[last] {
            return Ok(self.ys[last]);
        }

        let i = self.find_segment(x);
        Ok(self.slope(i) * (x - self.xs[i]) + self.ys[i])
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.last()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_interpolation() {
        let xs = vec![0.0, 1.0, 2.0];
        let ys = vec![0.0, 2.0, 4.0];

        let interp = LinearInterpolator::new(xs, ys).unwrap();

        assert_relative_eq!(interp.interpolate(0.0).unwrap(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(1.0).unwrap(), 2.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(2.0).unwrap(), 4.0, epsilon = 1e-10);

        assert_relative_eq!(interp.interpolate(0.5).unwrap(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(1.5).unwrap(), 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_nodes_reproduced_exactly() {
        let xs = vec![0.5, 1.0, 2.0, 5.0, 7.0, 10.0, 20.0, 30.0];
        let ys = vec![0.0013, -0.002, 0.0007, 0.0031, -0.001, 0.0029, 0.0003, 0.003];
        let interp = LinearInterpolator::new(xs.clone(), ys.clone())
            .unwrap()
            .with_flat_extrapolation();

        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_eq!(interp.interpolate(*x).unwrap(), *y);
        }
    }

    #[test]
    fn test_extrapolation_disabled() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]).unwrap();

        assert!(interp.interpolate(-0.5).is_err());
        assert!(interp.interpolate(2.5).is_err());
    }

    #[test]
    fn test_flat_extrapolation_clamps() {
        let interp = LinearInterpolator::new(vec![1.0, 2.0], vec![10.0, 20.0])
            .unwrap()
            .with_flat_extrapolation();

        assert_eq!(interp.interpolate(0.0).unwrap(), 10.0);
        assert_eq!(interp.interpolate(99.0).unwrap(), 20.0);
        assert_relative_eq!(interp.interpolate(1.5).unwrap(), 15.0, epsilon = 1e-12);
        assert_eq!(interp.extrapolation(), Extrapolation::Flat);
    }

    #[test]
    fn test_insufficient_points() {
        assert!(LinearInterpolator::new(vec![0.0], vec![1.0]).is_err());
    }

    #[test]
    fn test_unsorted_error() {
        assert!(LinearInterpolator::new(vec![1.0, 0.0, 2.0], vec![1.0, 0.0, 2.0]).is_err());
    }

    #[test]
    fn test_nan_query_rejected() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0], vec![0.0, 1.0])
            .unwrap()
            .with_flat_extrapolation();
        assert!(interp.interpolate(f64::NAN).is_err());
    }
}
