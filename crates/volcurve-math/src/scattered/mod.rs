//! Interpolation of scattered two-dimensional data.
//!
//! Irregularly placed samples `(x, y) -> z` are triangulated once with a
//! Delaunay triangulation; interpolants then evaluate inside the triangle
//! that contains the query point.
//!
//! # Available Methods
//!
//! - [`LinearNd`]: barycentric (piecewise-planar) interpolation, C0
//! - [`CloughTocher2d`]: Clough-Tocher piecewise cubic, C1, with vertex
//!   gradients estimated by minimising the curvature of the interpolant
//!
//! Both return `None` for queries outside the convex hull of the data.
//!
//! # Example
//!
//! ```rust
//! use volcurve_math::scattered::{CloughTocher2d, LinearNd, ScatteredData, ScatteredInterpolator};
//!
//! let points = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
//! let values = vec![0.0, 1.0, 1.0, 2.0];
//! let data = ScatteredData::new(&points, &values).unwrap();
//!
//! let linear = LinearNd::new(&data);
//! let cubic = CloughTocher2d::new(&data);
//!
//! assert!((linear.interpolate(0.5, 0.5).unwrap() - 1.0).abs() < 1e-12);
//! assert!(cubic.interpolate(0.25, 0.25).is_some());
//! assert!(cubic.interpolate(2.0, 2.0).is_none());
//! ```

mod clough_tocher;
mod delaunay;
mod linear;

pub use clough_tocher::CloughTocher2d;
pub use delaunay::Triangulation;
pub use linear::LinearNd;

use crate::error::{MathError, MathResult};

/// Trait for interpolants over scattered 2D data.
pub trait ScatteredInterpolator {
    /// Returns the interpolated value at `(x, y)`, or `None` outside the
    /// convex hull of the data.
    fn interpolate(&self, x: f64, y: f64) -> Option<f64>;
}

/// Triangulated sample set shared by the scattered interpolants.
///
/// Points with identical coordinates are collapsed onto their first
/// occurrence before triangulation.
#[derive(Debug, Clone)]
pub struct ScatteredData {
    triangulation: Triangulation,
    values: Vec<f64>,
}

impl ScatteredData {
    /// Triangulates `points` carrying `values`.
    ///
    /// # Errors
    ///
    /// Returns an error if lengths differ, any coordinate or value is not
    /// finite, fewer than 3 distinct points remain, or the points are
    /// collinear.
    pub fn new(points: &[[f64; 2]], values: &[f64]) -> MathResult<Self> {
        if points.len() != values.len() {
            return Err(MathError::invalid_input(format!(
                "points and values must have same length: {} vs {}",
                points.len(),
                values.len()
            )));
        }
        if let Some(i) = points
            .iter()
            .zip(values)
            .position(|(p, v)| !(p[0].is_finite() && p[1].is_finite() && v.is_finite()))
        {
            return Err(MathError::invalid_input(format!(
                "non-finite sample at index {i}"
            )));
        }

        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&a, &b| {
            points[a][0]
                .total_cmp(&points[b][0])
                .then(points[a][1].total_cmp(&points[b][1]))
                .then(a.cmp(&b))
        });
        let mut keep = vec![true; points.len()];
        for pair in order.windows(2) {
            if points[pair[0]] == points[pair[1]] {
                keep[pair[1]] = false;
            }
        }

        let (unique_points, unique_values): (Vec<[f64; 2]>, Vec<f64>) = points
            .iter()
            .zip(values)
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|((p, v), _)| (*p, *v))
            .unzip();

        let dropped = points.len() - unique_points.len();
        if dropped > 0 {
            log::debug!("collapsed {dropped} duplicate sample points");
        }

        let triangulation = Triangulation::new(unique_points)?;
        Ok(Self {
            triangulation,
            values: unique_values,
        })
    }

    /// Returns the triangulation.
    pub fn triangulation(&self) -> &Triangulation {
        &self.triangulation
    }

    /// Returns the sample values, aligned with the triangulation's points.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the number of distinct sample points.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse_to_first() {
        let points = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 0.0]];
        let values = vec![1.0, 2.0, 3.0, 99.0];
        let data = ScatteredData::new(&points, &values).unwrap();

        assert_eq!(data.len(), 3);
        assert_eq!(data.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(ScatteredData::new(&[[0.0, 0.0]], &[]).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let points = vec![[0.0, 0.0], [1.0, 0.0], [0.0, f64::NAN]];
        assert!(ScatteredData::new(&points, &[1.0, 1.0, 1.0]).is_err());
    }

    #[test]
    fn test_too_few_points() {
        let err = ScatteredData::new(&[[0.0, 0.0], [1.0, 1.0]], &[1.0, 2.0]).unwrap_err();
        assert!(err.is_data_shortage());
    }

    #[test]
    fn test_collinear_points() {
        let points = vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let err = ScatteredData::new(&points, &[1.0, 2.0, 3.0, 4.0]).unwrap_err();
        assert!(err.is_data_shortage());
    }
}
