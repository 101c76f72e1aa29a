//! Clough-Tocher piecewise cubic interpolation.
//!
//! Each Delaunay triangle is split into three sub-triangles around its
//! centroid and a cubic Bernstein-Bezier patch is fitted on each, giving a
//! C1 surface. The patches need a gradient at every vertex; these are
//! estimated globally by minimising the second derivative of the
//! interpolant along the triangulation edges (Nielson's method), solved by
//! Gauss-Seidel sweeps over the vertices.

use nalgebra::{Matrix2, Vector2};

use super::{ScatteredData, ScatteredInterpolator};

/// Maximum number of Gauss-Seidel sweeps for gradient estimation.
const GRADIENT_MAX_ITER: usize = 400;

/// Convergence tolerance on the relative gradient update.
const GRADIENT_TOL: f64 = 1e-6;

/// Clough-Tocher C1 cubic interpolant over scattered 2D data.
///
/// # Example
///
/// ```rust
/// use volcurve_math::scattered::{CloughTocher2d, ScatteredData, ScatteredInterpolator};
///
/// let points = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.4, 0.6]];
/// let values: Vec<f64> = points.iter().map(|p| 2.0 * p[0] - p[1]).collect();
/// let data = ScatteredData::new(&points, &values).unwrap();
///
/// let ct = CloughTocher2d::new(&data);
/// let z = ct.interpolate(0.3, 0.2).unwrap();
/// assert!((z - 0.4).abs() < 1e-5);
/// ```
#[derive(Debug, Clone)]
pub struct CloughTocher2d<'a> {
    data: &'a ScatteredData,
    gradients: Vec<[f64; 2]>,
}

impl<'a> CloughTocher2d<'a> {
    /// Builds the interpolant, estimating vertex gradients.
    #[must_use]
    pub fn new(data: &'a ScatteredData) -> Self {
        let gradients = estimate_gradients(data);
        Self { data, gradients }
    }

    /// Returns the estimated gradient at each data point.
    pub fn gradients(&self) -> &[[f64; 2]] {
        &self.gradients
    }

    fn evaluate(&self, t: usize, b: [f64; 3]) -> f64 {
        let tri = self.data.triangulation();
        let vertices = tri.triangles()[t];
        let points = tri.points();
        let values = self.data.values();

        let [p0, p1, p2] = vertices.map(|v| points[v]);
        let [g0, g1, g2] = vertices.map(|v| self.gradients[v]);
        let [f1, f2, f3] = vertices.map(|v| values[v]);

        let e12 = [p1[0] - p0[0], p1[1] - p0[1]];
        let e23 = [p2[0] - p1[0], p2[1] - p1[1]];
        let e31 = [p0[0] - p2[0], p0[1] - p2[1]];
        let dot = |g: [f64; 2], e: [f64; 2]| g[0] * e[0] + g[1] * e[1];

        let df12 = dot(g0, e12);
        let df21 = -dot(g1, e12);
        let df23 = dot(g1, e23);
        let df32 = -dot(g2, e23);
        let df31 = dot(g2, e31);
        let df13 = -dot(g0, e31);

        // Control net: vertex and edge points
        let c3000 = f1;
        let c2100 = (df12 + 3.0 * c3000) / 3.0;
        let c2010 = (df13 + 3.0 * c3000) / 3.0;
        let c0300 = f2;
        let c1200 = (df21 + 3.0 * c0300) / 3.0;
        let c0210 = (df23 + 3.0 * c0300) / 3.0;
        let c0030 = f3;
        let c1020 = (df31 + 3.0 * c0030) / 3.0;
        let c0120 = (df32 + 3.0 * c0030) / 3.0;

        let c2001 = (c2100 + c2010 + c3000) / 3.0;
        let c0201 = (c1200 + c0300 + c0210) / 3.0;
        let c0021 = (c1020 + c0120 + c0030) / 3.0;

        // Cross-boundary continuity weights from the neighbouring triangles
        let mut g = [-0.5; 3];
        for (k, neighbor) in tri.neighbors(t).into_iter().enumerate() {
            let Some(n) = neighbor else { continue };
            let centroid = tri.triangles()[n]
                .iter()
                .fold([0.0, 0.0], |acc, &v| {
                    [acc[0] + points[v][0] / 3.0, acc[1] + points[v][1] / 3.0]
                });
            let Some(c) = tri.barycentric(t, centroid) else { continue };
            g[k] = match k {
                0 => (2.0 * c[2] + c[1] - 1.0) / (2.0 - 3.0 * c[2] - 3.0 * c[1]),
                1 => (2.0 * c[0] + c[2] - 1.0) / (2.0 - 3.0 * c[0] - 3.0 * c[2]),
                _ => (2.0 * c[1] + c[0] - 1.0) / (2.0 - 3.0 * c[1] - 3.0 * c[0]),
            };
        }

        let c0111 = (g[0] * (-c0300 + 3.0 * c0210 - 3.0 * c0120 + c0030)
            + (-c0300 + 2.0 * c0210 - c0120 + c0021 + c0201))
            / 2.0;
        let c1011 = (g[1] * (-c0030 + 3.0 * c1020 - 3.0 * c2010 + c3000)
            + (-c0030 + 2.0 * c1020 - c2010 + c2001 + c0021))
            / 2.0;
        let c1101 = (g[2] * (-c3000 + 3.0 * c2100 - 3.0 * c1200 + c0300)
            + (-c3000 + 2.0 * c2100 - c1200 + c2001 + c0201))
            / 2.0;

        let c1002 = (c1101 + c1011 + c2001) / 3.0;
        let c0102 = (c1101 + c0111 + c0201) / 3.0;
        let c0012 = (c1011 + c0111 + c0021) / 3.0;
        let c0003 = (c1002 + c0102 + c0012) / 3.0;

        // Sub-triangle containing the point, in split barycentric coordinates
        let minval = b[0].min(b[1]).min(b[2]);
        let b1 = b[0] - minval;
        let b2 = b[1] - minval;
        let b3 = b[2] - minval;
        let b4 = 3.0 * minval;

        b1.powi(3) * c3000
            + 3.0 * b1 * b1 * b2 * c2100
            + 3.0 * b1 * b1 * b3 * c2010
            + 3.0 * b1 * b1 * b4 * c2001
            + 3.0 * b1 * b2 * b2 * c1200
            + 6.0 * b1 * b2 * b4 * c1101
            + 3.0 * b1 * b3 * b3 * c1020
            + 6.0 * b1 * b3 * b4 * c1011
            + 3.0 * b1 * b4 * b4 * c1002
            + b2.powi(3) * c0300
            + 3.0 * b2 * b2 * b3 * c0210
            + 3.0 * b2 * b2 * b4 * c0201
            + 3.0 * b2 * b3 * b3 * c0120
            + 6.0 * b2 * b3 * b4 * c0111
            + 3.0 * b2 * b4 * b4 * c0102
            + b3.powi(3) * c0030
            + 3.0 * b3 * b3 * b4 * c0021
            + 3.0 * b3 * b4 * b4 * c0012
            + b4.powi(3) * c0003
    }
}

impl ScatteredInterpolator for CloughTocher2d<'_> {
    fn interpolate(&self, x: f64, y: f64) -> Option<f64> {
        let (t, bary) = self.data.triangulation().locate([x, y])?;
        Some(self.evaluate(t, bary))
    }
}

/// Estimates vertex gradients minimising the interpolant's curvature.
fn estimate_gradients(data: &ScatteredData) -> Vec<[f64; 2]> {
    let points = data.triangulation().points();
    let values = data.values();
    let adjacency = data.triangulation().vertex_neighbors();
    let mut grad = vec![[0.0_f64; 2]; points.len()];

    for iteration in 0..GRADIENT_MAX_ITER {
        let mut err = 0.0_f64;

        for (i, neighbors) in adjacency.iter().enumerate() {
            if neighbors.is_empty() {
                continue;
            }
            let mut q = Matrix2::<f64>::zeros();
            let mut s = Vector2::<f64>::zeros();

            for &j in neighbors {
                let ex = points[j][0] - points[i][0];
                let ey = points[j][1] - points[i][1];
                let l3 = (ex * ex + ey * ey).sqrt().powi(3);

                let df2 = -ex * grad[j][0] - ey * grad[j][1];
                let rhs = 6.0 * (values[i] - values[j]) - 2.0 * df2;

                q[(0, 0)] += 4.0 * ex * ex / l3;
                q[(0, 1)] += 4.0 * ex * ey / l3;
                q[(1, 1)] += 4.0 * ey * ey / l3;
                s[0] += rhs * ex / l3;
                s[1] += rhs * ey / l3;
            }
            q[(1, 0)] = q[(0, 1)];

            let Some(r) = q.try_inverse().map(|inv| inv * s) else {
                continue;
            };

            let change = (grad[i][0] + r[0]).abs().max((grad[i][1] + r[1]).abs())
                / 1.0_f64.max(r[0].abs()).max(r[1].abs());
            grad[i] = [-r[0], -r[1]];
            err = err.max(change);
        }

        if err < GRADIENT_TOL {
            log::trace!("gradient estimation converged after {} sweeps", iteration + 1);
            return grad;
        }
    }

    log::debug!("gradient estimation stopped at {GRADIENT_MAX_ITER} sweeps without converging");
    grad
}
