//! Model-related error types

use thiserror::Error;

use rd_core::data::DataError;
use rd_core::design::{DesignError, ModelKind};

/// Model-related errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// Selection or design-matrix error
    #[error("Design error: {0}")]
    Design(#[from] DesignError),

    /// Data-related error
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Numerical computation error
    #[error("Numerical error: {message} (operation: {operation})")]
    NumericalError {
        /// Error message
        message: String,
        /// Operation that failed
        operation: String,
    },

    /// Insufficient data for model fitting
    #[error("Not enough data: {n_samples} samples for {n_predictors} predictors")]
    InsufficientData {
        /// Number of samples
        n_samples: usize,
        /// Number of predictors
        n_predictors: usize,
    },

    /// Model fitting failed to converge
    #[error("Failed to converge after {max_iter} iterations")]
    NotConverged {
        /// Maximum number of iterations attempted
        max_iter: usize,
    },

    /// Singular matrix encountered
    #[error("Singular matrix encountered: the predictors are perfectly collinear")]
    SingularMatrix,

    /// The predictors separate the two outcome classes exactly
    #[error("Perfect separation detected: the maximum-likelihood estimate does not exist")]
    PerfectSeparation,

    /// Invalid model configuration
    #[error("Invalid model configuration: {message}")]
    InvalidConfig {
        /// Configuration error message
        message: String,
    },

    /// Model not fitted yet
    #[error("Model not fitted yet")]
    NotFitted,

    /// Operation that the model kind does not support
    #[error("{operation} is not available for {kind} models")]
    Unsupported {
        /// Requested operation
        operation: &'static str,
        /// Kind of the fitted model
        kind: ModelKind,
    },

    /// A prediction input was not supplied
    #[error("Missing value for feature '{0}'")]
    MissingFeature(String),

    /// A prediction input is NaN or infinite
    #[error("Feature '{name}' must be a finite number, got {value}")]
    InvalidFeature {
        /// Feature name
        name: String,
        /// Supplied value
        value: f64,
    },

    /// Export failure
    #[error("Failed to write CSV: {0}")]
    Csv(String),
}

/// Coarse classification used by a presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The user can fix it by changing the file or selection
    Input,
    /// The estimator could not produce a fit
    Estimation,
    /// The operation does not apply in the current state
    UnsupportedOperation,
}

impl ModelError {
    /// Classify the error
    pub fn category(&self) -> ErrorCategory {
        match self {
            ModelError::Design(_)
            | ModelError::Data(_)
            | ModelError::InvalidConfig { .. }
            | ModelError::MissingFeature(_)
            | ModelError::InvalidFeature { .. }
            | ModelError::Csv(_) => ErrorCategory::Input,
            ModelError::NumericalError { .. }
            | ModelError::InsufficientData { .. }
            | ModelError::NotConverged { .. }
            | ModelError::SingularMatrix
            | ModelError::PerfectSeparation => ErrorCategory::Estimation,
            ModelError::NotFitted | ModelError::Unsupported { .. } => {
                ErrorCategory::UnsupportedOperation
            }
        }
    }

    pub(crate) fn numerical(message: impl Into<String>, operation: &str) -> Self {
        ModelError::NumericalError {
            message: message.into(),
            operation: operation.to_string(),
        }
    }
}

impl From<lowess::prelude::LowessError> for ModelError {
    fn from(err: lowess::prelude::LowessError) -> Self {
        ModelError::numerical(err.to_string(), "lowess")
    }
}

impl From<csv::Error> for ModelError {
    fn from(err: csv::Error) -> Self {
        ModelError::Csv(err.to_string())
    }
}
