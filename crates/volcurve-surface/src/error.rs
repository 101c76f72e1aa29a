//! Error types for surface construction.

use thiserror::Error;
use volcurve_math::MathError;

/// A specialized Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Errors that can occur while fetching, cleaning or interpolating quotes.
#[derive(Error, Debug)]
pub enum SurfaceError {
    /// The market data provider failed or returned unusable data.
    #[error("Data retrieval failed: {reason}")]
    DataRetrieval {
        /// What went wrong.
        reason: String,
    },

    /// Too little usable data survived to build a surface.
    #[error("Insufficient data: {reason}")]
    DataInsufficient {
        /// What was missing.
        reason: String,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// Interpolation failure other than a shortage of data.
    #[error("Interpolation failed: {0}")]
    Math(MathError),
}

impl SurfaceError {
    /// Creates a data retrieval error.
    #[must_use]
    pub fn retrieval(reason: impl Into<String>) -> Self {
        Self::DataRetrieval {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self::DataInsufficient {
            reason: reason.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl From<MathError> for SurfaceError {
    fn from(err: MathError) -> Self {
        if err.is_data_shortage() {
            Self::insufficient(err.to_string())
        } else {
            Self::Math(err)
        }
    }
}

impl From<reqwest::Error> for SurfaceError {
    fn from(err: reqwest::Error) -> Self {
        Self::retrieval(err.to_string())
    }
}

impl From<csv::Error> for SurfaceError {
    fn from(err: csv::Error) -> Self {
        Self::retrieval(err.to_string())
    }
}
