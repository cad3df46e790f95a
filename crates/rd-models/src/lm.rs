//! Least-squares regression models
//!
//! This module provides the models fitted by ordinary least squares:
//! - multiple linear regression on the encoded predictors
//! - polynomial regression on an expanded design
//!
//! Both share the same estimator and result type; they differ only in how
//! raw inputs are turned into design rows.

pub mod ols;
pub mod polynomial;
pub mod result;


// Re-exports
pub use ols::{fit_least_squares, LinearModel};
pub use polynomial::PolynomialModel;
pub use result::LinearRegressionResult;
