//! Regular-grid volatility surface from scattered samples.
//!
//! Cleaned samples `(moneyness, time_to_expiry) -> iv` are triangulated
//! once. Each grid cell is then estimated with a three-tier fallback:
//!
//! 1. Clough-Tocher cubic inside the convex hull
//! 2. barycentric linear where the cubic is undefined
//! 3. the mean of every defined cell for whatever remains
//!
//! The resulting grid never contains NaN.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use volcurve_math::grid::linspace;
use volcurve_math::scattered::{CloughTocher2d, LinearNd, ScatteredData, ScatteredInterpolator};

use crate::error::{SurfaceError, SurfaceResult};
use crate::quote::CleanedPoint;

/// How many cells each estimator filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillSummary {
    /// Cells from the cubic interpolant.
    pub cubic: usize,
    /// Cells backfilled by the linear interpolant.
    pub linear: usize,
    /// Cells set to the mean of defined cells.
    pub mean: usize,
}

/// One cell of the grid in long format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    /// Moneyness coordinate.
    pub moneyness: f64,
    /// Time coordinate in years.
    pub time_to_expiry: f64,
    /// Surface height.
    pub implied_volatility: f64,
}

/// Implied volatility sampled on a regular moneyness by time grid.
///
/// `values[[i, j]]` is the volatility at `time_axis[i]` and
/// `moneyness_axis[j]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGrid {
    moneyness_axis: Vec<f64>,
    time_axis: Vec<f64>,
    values: Array2<f64>,
    fill: FillSummary,
}

impl SurfaceGrid {
    /// Moneyness samples, ascending.
    pub fn moneyness_axis(&self) -> &[f64] {
        &self.moneyness_axis
    }

    /// Time-to-expiry samples, ascending.
    pub fn time_axis(&self) -> &[f64] {
        &self.time_axis
    }

    /// Grid values, rows by time and columns by moneyness.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Per-estimator cell counts.
    pub fn fill(&self) -> FillSummary {
        self.fill
    }

    /// Value at time index `i` and moneyness index `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get((i, j)).copied()
    }

    /// Smallest and largest value on the grid.
    pub fn value_range(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// All cells in row-major order (time outer, moneyness inner).
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.values.indexed_iter().map(|((i, j), &v)| GridCell {
            moneyness: self.moneyness_axis[j],
            time_to_expiry: self.time_axis[i],
            implied_volatility: v,
        })
    }
}

fn axis_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Interpolates cleaned samples onto a `grid_points` by `grid_points` grid
/// spanning the observed moneyness and time ranges.
///
/// # Errors
///
/// Returns `InvalidInput` for fewer than 2 grid points and
/// `DataInsufficient` when the samples cannot be triangulated (fewer than
/// 3 distinct points, or all collinear) or no cell can be estimated.
pub fn build_surface(points: &[CleanedPoint], grid_points: usize) -> SurfaceResult<SurfaceGrid> {
    if grid_points < 2 {
        return Err(SurfaceError::invalid_input(format!(
            "grid needs at least 2 points per axis, got {grid_points}"
        )));
    }
    if points.is_empty() {
        return Err(SurfaceError::insufficient("no samples to interpolate"));
    }

    let (m_min, m_max) = axis_bounds(points.iter().map(|p| p.moneyness));
    let (t_min, t_max) = axis_bounds(points.iter().map(|p| p.time_to_expiry));
    let moneyness_axis = linspace(m_min, m_max, grid_points);
    let time_axis = linspace(t_min, t_max, grid_points);

    let xy: Vec<[f64; 2]> = points
        .iter()
        .map(|p| [p.moneyness, p.time_to_expiry])
        .collect();
    let iv: Vec<f64> = points.iter().map(|p| p.implied_volatility).collect();
    let data = ScatteredData::new(&xy, &iv)?;
    tracing::debug!(
        samples = points.len(),
        distinct = data.len(),
        triangles = data.triangulation().triangles().len(),
        "triangulated samples"
    );

    let cubic = CloughTocher2d::new(&data);
    let linear = LinearNd::new(&data);
    let mut fill = FillSummary::default();

    let estimates = Array2::from_shape_fn((grid_points, grid_points), |(i, j)| {
        let (x, y) = (moneyness_axis[j], time_axis[i]);
        if let Some(v) = cubic.interpolate(x, y).filter(|v| v.is_finite()) {
            fill.cubic += 1;
            return Some(v);
        }
        let v = linear.interpolate(x, y).filter(|v| v.is_finite());
        if v.is_some() {
            fill.linear += 1;
        }
        v
    });

    let (sum, defined) = estimates
        .iter()
        .flatten()
        .fold((0.0, 0_usize), |(s, n), v| (s + v, n + 1));
    if defined == 0 {
        return Err(SurfaceError::insufficient(
            "no grid cell could be interpolated",
        ));
    }
    let mean = sum / defined as f64;
    fill.mean = estimates.len() - defined;

    let values = estimates.mapv(|v| v.unwrap_or(mean));
    tracing::info!(
        grid_points,
        cubic = fill.cubic,
        linear = fill.linear,
        mean = fill.mean,
        "built volatility surface"
    );

    Ok(SurfaceGrid {
        moneyness_axis,
        time_axis,
        values,
        fill,
    })
}
