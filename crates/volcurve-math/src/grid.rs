//! Evenly spaced sample axes.

/// Returns `num` evenly spaced samples over `[start, stop]`.
///
/// The first sample is `start` and the last sample is exactly `stop`, so grid
/// nodes on the boundary of a data range land on the boundary rather than a
/// rounding error inside or outside it.
///
/// # Example
///
/// ```rust
/// use volcurve_math::grid::linspace;
///
/// let axis = linspace(0.0, 1.0, 5);
/// assert_eq!(axis, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// ```
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut axis: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            axis[num - 1] = stop;
            axis
        }
    }
}
