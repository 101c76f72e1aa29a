//! Piecewise-linear interpolation over a triangulation.

use super::{ScatteredData, ScatteredInterpolator};

/// Barycentric interpolation inside Delaunay triangles.
///
/// The interpolant is continuous and planar on each triangle. It is used as
/// the fallback when the cubic interpolant is undefined.
#[derive(Debug, Clone, Copy)]
pub struct LinearNd<'a> {
    data: &'a ScatteredData,
}

impl<'a> LinearNd<'a> {
    /// Creates a linear interpolant over triangulated data.
    #[must_use]
    pub fn new(data: &'a ScatteredData) -> Self {
        Self { data }
    }
}

impl ScatteredInterpolator for LinearNd<'_> {
    fn interpolate(&self, x: f64, y: f64) -> Option<f64> {
        let tri = self.data.triangulation();
        let (t, bary) = tri.locate([x, y])?;
        let values = self.data.values();
        let value = tri.triangles()[t]
            .iter()
            .zip(bary)
            .map(|(&v, b)| b * values[v])
            .sum();
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reproduces_plane() {
        let points = vec![[0.7, 0.1], [1.3, 0.1], [0.7, 2.0], [1.3, 2.0], [1.0, 0.8]];
        let plane = |p: &[f64; 2]| 0.2 + 0.5 * p[0] - 0.03 * p[1];
        let values: Vec<f64> = points.iter().map(plane).collect();
        let data = ScatteredData::new(&points, &values).unwrap();
        let interp = LinearNd::new(&data);

        for q in [[0.8, 0.5], [1.2, 1.9], [1.0, 0.1], [0.7, 2.0]] {
            assert_relative_eq!(interp.interpolate(q[0], q[1]).unwrap(), plane(&q), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_outside_hull_is_none() {
        let points = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let data = ScatteredData::new(&points, &[1.0, 2.0, 3.0]).unwrap();
        let interp = LinearNd::new(&data);

        assert!(interp.interpolate(0.6, 0.6).is_none());
        assert!(interp.interpolate(-0.1, 0.0).is_none());
    }
}
