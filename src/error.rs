//! Error types for the statkit library.
//!
//! Every computation reports failure through a single `thiserror`-derived
//! enum. Nothing is retried internally: each error is the terminal result of
//! the one call that produced it.

use thiserror::Error;

/// The main error type for the statkit library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ============ Sample Size Errors ============
    /// The sample is too small for the requested statistic.
    #[error("{statistic} requires at least {required} values, got {actual}")]
    InsufficientData {
        /// Name of the statistic that could not be computed.
        statistic: &'static str,
        /// Minimum number of values needed.
        required: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// The subgroup size has no tabulated control chart constants.
    #[error("subgroup size {size} is not supported (valid range: {min}..={max})")]
    UnsupportedSampleSize {
        /// Observed subgroup size (0 for an empty table).
        size: usize,
        /// Smallest supported subgroup size.
        min: usize,
        /// Largest supported subgroup size.
        max: usize,
    },

    // ============ Shape Errors ============
    /// The input table violates the shape required by the analysis.
    #[error("invalid table shape: {message}")]
    Shape {
        /// Description of the violated constraint.
        message: String,
    },

    // ============ Input Errors ============
    /// A value that should be numeric is not a finite number.
    #[error("non-numeric input: {value:?}")]
    NonNumericInput {
        /// The offending value as supplied.
        value: String,
    },

    /// A configuration parameter is outside its domain.
    #[error("invalid parameters: {message}")]
    InvalidParams {
        /// Description of what is invalid.
        message: String,
    },
}

/// A specialized `Result` type for statkit operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Create a new `Shape` error.
    #[must_use]
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape {
            message: message.into(),
        }
    }

    /// Create a new `InvalidParams` error.
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    /// Create a new `NonNumericInput` error.
    #[must_use]
    pub fn non_numeric(value: impl Into<String>) -> Self {
        Self::NonNumericInput {
            value: value.into(),
        }
    }
}

/// Reject NaN and infinite values handed to a computation.
pub(crate) fn ensure_finite(values: impl IntoIterator<Item = f64>) -> Result<()> {
    match values.into_iter().find(|v| !v.is_finite()) {
        Some(v) => Err(Error::non_numeric(v.to_string())),
        None => Ok(()),
    }
}
