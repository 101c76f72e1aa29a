//! Error types for the curve scenario engine.

use thiserror::Error;
use volcurve_math::MathError;

/// A specialized Result type for rates operations.
pub type RatesResult<T> = Result<T, RatesError>;

/// Errors that can occur while pricing bonds or shifting curves.
#[derive(Error, Debug, Clone)]
pub enum RatesError {
    /// A computation hit a zero denominator or an empty cash flow schedule.
    #[error("Numeric degenerate: {reason}")]
    NumericDegenerate {
        /// What degenerated.
        reason: String,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// Underlying interpolation failure.
    #[error("Interpolation failed: {0}")]
    Math(#[from] MathError),
}

impl RatesError {
    /// Creates a numeric degenerate error.
    #[must_use]
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::NumericDegenerate {
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
