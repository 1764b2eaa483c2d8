//! Error types for foliocore.
//!
//! Missing or partial input never produces an error; the engines degrade to
//! documented defaults instead. Errors are reserved for malformed input.

use thiserror::Error;

/// Result type alias for foliocore operations.
pub type Result<T> = std::result::Result<T, FolioError>;

/// Error types for the analytics engines.
#[derive(Error, Debug)]
pub enum FolioError {
    /// Invalid parameter value.
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// A weight fraction below zero.
    #[error("Negative weight {weight} for {asset_class}")]
    NegativeWeight { asset_class: String, weight: f64 },

    /// NaN or infinite numeric input.
    #[error("Non-finite value for {context}")]
    NonFiniteInput { context: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Empty data error.
    #[error("Empty data provided for {context}")]
    EmptyData { context: String },

    /// Simulation stopped by its cancellation token.
    #[error("Simulation cancelled after {completed_paths} paths")]
    Cancelled { completed_paths: usize },
}

impl FolioError {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create a negative weight error.
    pub fn negative_weight(asset_class: impl Into<String>, weight: f64) -> Self {
        Self::NegativeWeight {
            asset_class: asset_class.into(),
            weight,
        }
    }

    /// Create a non-finite input error.
    pub fn non_finite(context: impl Into<String>) -> Self {
        Self::NonFiniteInput {
            context: context.into(),
        }
    }

    /// Create an invalid config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an empty data error.
    pub fn empty_data(context: impl Into<String>) -> Self {
        Self::EmptyData {
            context: context.into(),
        }
    }

    /// Create a cancellation error.
    pub fn cancelled(completed_paths: usize) -> Self {
        Self::Cancelled { completed_paths }
    }
}

/// Reject NaN and infinities for a named input.
pub(crate) fn ensure_finite(value: f64, context: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FolioError::non_finite(context))
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        FolioError::invalid_config(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<FolioError> for pyo3::PyErr {
    fn from(err: FolioError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = FolioError::negative_weight("US Equity", -0.1);
        assert_eq!(err.to_string(), "Negative weight -0.1 for US Equity");

        let err = FolioError::cancelled(512);
        assert_eq!(err.to_string(), "Simulation cancelled after 512 paths");
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite(1.5, "x").is_ok());
        assert!(matches!(
            ensure_finite(f64::NAN, "volatility"),
            Err(FolioError::NonFiniteInput { .. })
        ));
    }
}
