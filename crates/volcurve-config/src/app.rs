//! Top-level application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::curve::CurveEngineConfig;
use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use crate::surface::SurfaceConfig;

/// Configuration for both pipelines.
///
/// Every field has a default, so an empty file is a valid configuration.
///
/// # Example
///
/// ```rust
/// use volcurve_config::{AppConfig, Validate};
///
/// let config = AppConfig::from_toml_str(r#"
///     [surface]
///     ticker = "QQQ"
///
///     [curves]
///     tenors = [1.0, 2.0, 5.0, 10.0]
///
///     [[curves.scenarios]]
///     name = "Bear steepener"
///     kind = "steepener"
///     short_bps = 10.0
///     long_bps = 40.0
/// "#).unwrap();
///
/// assert_eq!(config.surface.ticker, "QQQ");
/// assert_eq!(config.surface.grid_points, 100);
/// assert_eq!(config.curves.scenarios.len(), 1);
/// assert!(config.is_valid());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Surface builder settings.
    #[serde(default)]
    pub surface: SurfaceConfig,

    /// Curve scenario engine settings.
    #[serde(default)]
    pub curves: CurveEngineConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration to TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Vec<ValidationError> {
        self.surface
            .validate()
            .into_iter()
            .map(|e| e.in_section("surface"))
            .chain(self.curves.validate().into_iter().map(|e| e.in_section("curves")))
            .collect()
    }
}
