//! Regression models for RegDash
//!
//! This crate fits the models the dashboard offers on a design built by
//! `rd-core`, and derives everything the panels show from the fit:
//! diagnostics, in-sample metrics, predictions and the next-month forecast.
//! [`Session`] ties the steps together for one user.

pub mod base;
pub mod diagnostics;
pub mod error;
pub mod fit;
pub mod glm;
pub mod lm;
pub mod metrics;
pub mod prediction;
pub mod session;

mod linalg;

// Re-exports
pub use base::{Coefficient, FittedModel, ModelStatistics, ModelSummary, Result};
pub use diagnostics::{diagnose, DiagnosticsConfig, DiagnosticsReport};
pub use error::{ErrorCategory, ModelError};
pub use fit::{fit, fit_with, FitConfig, LogitConfig};
pub use glm::LogisticModel;
pub use lm::{LinearModel, PolynomialModel};
pub use metrics::FitMetrics;
pub use prediction::{
    forecast_next, predict, FeatureVector, Forecast, Interval, PredictionLog, PredictionResult,
};
pub use session::{Selection, Session};
