//! Design-matrix error types
//!
//! Every variant describes an input problem the user can fix by choosing a
//! different file, target, or predictor set.

use crate::data::DataError;
use thiserror::Error;

/// Errors raised while validating a selection or building a design matrix
#[derive(Debug, Error)]
pub enum DesignError {
    /// Data-related errors that bubble up from the data layer
    #[error("Data error while building design matrix: {0}")]
    Data(#[from] DataError),

    /// The uploaded table has nothing a regression could use as a target
    #[error("No numeric columns found in the uploaded dataset")]
    NoNumericColumns,

    /// Least-squares models need a numeric dependent variable
    #[error("Dependent variable '{column}' has type {dtype}, but a numeric column is required")]
    NonNumericTarget { column: String, dtype: &'static str },

    /// Logistic models need a 0/1 target
    #[error("Dependent variable '{column}' is not binary (found values {values:?}); logistic regression requires a 0/1 target")]
    NonBinaryTarget { column: String, values: Vec<f64> },

    /// Every row was dropped by the missing-value filter
    #[error("No complete rows remain after removing {dropped} rows with missing values")]
    EmptyDataset { dropped: usize },

    /// No predictor columns were selected or survived encoding
    #[error("At least one independent variable is required")]
    NoPredictors,

    /// Polynomial degree outside the supported range
    #[error("Polynomial degree must be between {min} and {max}, got {degree}")]
    InvalidDegree { degree: u32, min: u32, max: u32 },

    /// Inconsistent variable selection
    #[error("Invalid variable selection: {message}")]
    InvalidSelection { message: String },

    /// Model kind label that does not name a supported model
    #[error("Unknown regression type '{0}'")]
    UnknownModelKind(String),

    /// Feature values do not line up with the design's inputs
    #[error("Expected {expected} feature values, got {actual}")]
    FeatureCount { expected: usize, actual: usize },
}

impl DesignError {
    pub(crate) fn invalid_selection(message: impl Into<String>) -> Self {
        DesignError::InvalidSelection {
            message: message.into(),
        }
    }
}

/// Result type for design-matrix operations
pub type DesignResult<T> = std::result::Result<T, DesignError>;
