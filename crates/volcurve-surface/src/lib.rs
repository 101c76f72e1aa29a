//! # VolCurve Surface
//!
//! Implied volatility surface construction from listed option quotes.
//!
//! This crate provides:
//!
//! - **Quotes**: the option chain row model
//! - **Sources**: the [`OptionChainSource`](source::OptionChainSource) trait
//!   with a Yahoo Finance client and an offline CSV reader
//! - **Cleaning**: liquidity, spread and moneyness filters producing
//!   `(moneyness, time_to_expiry, iv)` samples
//! - **Surface**: cubic, then linear, then mean interpolation onto a regular
//!   grid with no undefined cells
//!
//! ## Quick Start
//!
//! ```rust
//! use volcurve_surface::prelude::*;
//!
//! let samples = vec![
//!     CleanedPoint::new(0.8, 0.1, 0.30),
//!     CleanedPoint::new(1.2, 0.1, 0.20),
//!     CleanedPoint::new(0.8, 1.0, 0.25),
//!     CleanedPoint::new(1.2, 1.0, 0.18),
//! ];
//! let grid = build_surface(&samples, 25).unwrap();
//! assert!(grid.values().iter().all(|v| v.is_finite()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

pub mod clean;
pub mod error;
pub mod quote;
pub mod source;
pub mod surface;

use volcurve_config::SurfaceConfig;

use crate::clean::{clean_quotes, CleaningReport};
use crate::source::{fetch_snapshot, OptionChainSource};
use crate::surface::{build_surface, SurfaceGrid};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::clean::{clean_quotes, time_to_expiry, CleanedQuotes, CleaningReport};
    pub use crate::error::{SurfaceError, SurfaceResult};
    pub use crate::quote::{CleanedPoint, OptionQuote, OptionType};
    pub use crate::source::{
        fetch_snapshot, CsvChainSource, MarketSnapshot, OptionChain, OptionChainSource,
        YahooSource,
    };
    pub use crate::surface::{build_surface, FillSummary, GridCell, SurfaceGrid};
    pub use crate::{build_from_source, SurfaceBuild};
}

pub use error::{SurfaceError, SurfaceResult};

/// Everything produced by one surface run.
#[derive(Debug, Clone)]
pub struct SurfaceBuild {
    /// Underlying symbol.
    pub symbol: String,
    /// Spot price used for moneyness.
    pub spot: f64,
    /// Rows fetched before cleaning.
    pub quote_count: usize,
    /// Per-stage cleaning counts.
    pub cleaning: CleaningReport,
    /// The interpolated grid.
    pub grid: SurfaceGrid,
}

/// Fetches, cleans and interpolates quotes for `config.ticker`.
///
/// # Errors
///
/// Propagates `DataRetrieval` from the source and `DataInsufficient` from
/// cleaning or interpolation.
pub fn build_from_source<S>(source: &S, config: &SurfaceConfig) -> SurfaceResult<SurfaceBuild>
where
    S: OptionChainSource + ?Sized,
{
    let snapshot = fetch_snapshot(source, &config.ticker)?;
    let cleaned = clean_quotes(&snapshot.quotes, snapshot.spot, config)?;
    tracing::info!(
        symbol = %snapshot.symbol,
        fetched = cleaned.report.input,
        kept = cleaned.report.kept,
        "cleaned quotes"
    );
    let grid = build_surface(&cleaned.points, config.grid_points)?;

    Ok(SurfaceBuild {
        symbol: snapshot.symbol,
        spot: snapshot.spot,
        quote_count: snapshot.quotes.len(),
        cleaning: cleaned.report,
        grid,
    })
}
