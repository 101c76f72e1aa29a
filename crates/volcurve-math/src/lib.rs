//! # VolCurve Math
//!
//! Numerical building blocks shared by the VolCurve pipelines.
//!
//! This crate provides:
//!
//! - **Interpolation**: 1D linear interpolation with optional flat (clamped)
//!   extrapolation, used for tenor-axis lookups on yield curves
//! - **Scattered interpolation**: Delaunay triangulation of 2D points with
//!   piecewise-linear and Clough-Tocher cubic interpolants
//! - **Grids**: evenly spaced sample axes
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: inputs are never mutated
//! - **Explicit hull semantics**: scattered interpolants return `None` outside
//!   the convex hull of the data instead of a NaN sentinel

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::suboptimal_flops)]

pub mod error;
pub mod grid;
pub mod interpolation;
pub mod scattered;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::grid::linspace;
    pub use crate::interpolation::{Extrapolation, Interpolator, LinearInterpolator};
    pub use crate::scattered::{
        CloughTocher2d, LinearNd, ScatteredData, ScatteredInterpolator, Triangulation,
    };
}

pub use error::{MathError, MathResult};
