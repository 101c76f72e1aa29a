//! # VolCurve Rates
//!
//! Yield curve scenario engine for VolCurve.
//!
//! This crate provides:
//!
//! - **Curves**: tenor grids, yield curves with clamped linear lookup, and the
//!   deterministic base curve generator
//! - **Scenarios**: parallel, steepener, flattener, twist and butterfly shifts
//! - **Bonds**: annual fixed-coupon bullet pricing
//! - **Risk**: finite-difference DV01, duration and convexity
//! - **Portfolio**: weighted valuation and scenario impact reports
//!
//! ## Quick Start
//!
//! ```rust
//! use volcurve_rates::prelude::*;
//!
//! let base = base_yield_curve(&Tenors::standard());
//! let analysis = Portfolio::sample()
//!     .scenario_analysis(&base, &standard_scenarios())
//!     .unwrap();
//!
//! for impact in &analysis.impacts {
//!     println!("{}: {}", impact.name, impact.rounded_delta().unwrap());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod bond;
pub mod curve;
pub mod error;
pub mod portfolio;
pub mod risk;
pub mod scenario;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bond::FixedCouponBond;
    pub use crate::curve::{base_rate, base_yield_curve, Tenors, YieldCurve};
    pub use crate::error::{RatesError, RatesResult};
    pub use crate::portfolio::{Holding, Portfolio, ScenarioAnalysis, ScenarioImpact};
    pub use crate::risk::{BondRisk, ONE_BP};
    pub use crate::scenario::{standard_scenarios, CurveShift, Scenario};
}

pub use error::{RatesError, RatesResult};
