//! CLI command implementations.

pub mod config;
pub mod scenarios;
pub mod surface;

pub use config::ConfigArgs;
pub use scenarios::ScenariosArgs;
pub use surface::SurfaceArgs;

use std::path::Path;

use anyhow::{Context, Result};
use volcurve_config::{AppConfig, Validate};

/// Loads the configuration file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading configuration");
            AppConfig::from_file(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?
        }
        None => AppConfig::default(),
    };
    config.validate_or_error()?;
    Ok(config)
}
