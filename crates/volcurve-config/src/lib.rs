//! # VolCurve Configuration
//!
//! Explicit, immutable settings for the two VolCurve pipelines.
//!
//! - [`SurfaceConfig`]: ticker, grid size, quote filters and output file for
//!   the implied volatility surface builder
//! - [`CurveEngineConfig`]: tenors, portfolio, scenarios and output file for
//!   the curve scenario engine
//! - [`AppConfig`]: both of the above, loadable from TOML
//!
//! All structs carry serde defaults matching the standard run, and implement
//! [`Validate`].
//!
//! # Example
//!
//! ```rust
//! use volcurve_config::{AppConfig, Validate};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.surface.ticker, "SPY");
//! assert_eq!(config.curves.bonds.len(), 3);
//! config.validate_or_error().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod curve;
pub mod error;
pub mod surface;

pub use app::AppConfig;
pub use curve::{BondConfig, CurveEngineConfig};
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use surface::SurfaceConfig;
