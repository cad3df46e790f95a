//! Core traits and types for fitted models
//!
//! This module defines the interface every fitted regression exposes to the
//! diagnostics, prediction and export layers.

use std::fmt;

use ndarray::{Array1, ArrayView1};

use rd_core::data::Matrix;
use rd_core::design::ModelKind;

// Re-export core types
pub use coefficient::Coefficient;
pub use statistics::ModelStatistics;
pub use statistics::ResidualStatistics;
pub use summary::ModelSummary;
pub use summary::ModelType;
pub use summary::TestStatistic;

pub use crate::error::ModelError;
use crate::prediction::PredictionResult;

pub mod coefficient;
pub mod statistics;
pub mod summary;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// A fitted regression model
///
/// Capabilities that only some model kinds have are exposed as `Option`s:
/// residuals and Cook's distance exist for least-squares fits only.
pub trait FittedModel: fmt::Debug + Send + Sync {
    /// Kind the model was fitted as
    fn kind(&self) -> ModelKind;

    /// Dependent variable name
    fn dependent(&self) -> &str;

    /// Design column names, starting with `const`
    fn column_names(&self) -> &[String];

    /// Estimated parameters, aligned with [`FittedModel::column_names`]
    fn params(&self) -> &Array1<f64>;

    /// Coefficient table with inference statistics
    fn coefficients(&self) -> Vec<Coefficient>;

    /// Covariance matrix of the parameter estimates
    fn covariance(&self) -> &Matrix;

    /// Model-level statistics
    fn statistics(&self) -> &ModelStatistics;

    /// Number of observations used in the fit
    fn nobs(&self) -> usize;

    /// In-sample fitted values (probabilities for logistic models)
    fn fitted_values(&self) -> Option<&Array1<f64>>;

    /// Response residuals
    fn residuals(&self) -> Option<&Array1<f64>> {
        None
    }

    /// Cook's distance per observation
    fn cooks_distance(&self) -> Option<&Array1<f64>> {
        None
    }

    /// Point predictions for full design rows
    fn predict(&self, x: &Matrix) -> Result<Array1<f64>>;

    /// Point estimate and interval for one full design row
    fn predict_row(&self, row: ArrayView1<f64>, level: f64) -> Result<PredictionResult>;

    /// Generate model summary
    fn summary(&self) -> ModelSummary;
}

/// Check that a design matrix has the model's column count
pub(crate) fn check_columns(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ModelError::Data(rd_core::data::DataError::DimensionMismatch {
            expected: format!("{} design columns", expected),
            actual: format!("{} design columns", actual),
        }))
    }
}

/// Check that a confidence level lies strictly inside (0, 1)
pub(crate) fn check_level(level: f64) -> Result<()> {
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidConfig {
            message: format!("confidence level must be in (0, 1), got {}", level),
        })
    }
}
