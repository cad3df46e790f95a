//! Linear regression result structure
//!
//! This module defines the result structure for least-squares fits,
//! containing all the information from fitting a linear model.

use ndarray::ArrayView1;
use statrs::distribution::{ContinuousCDF, StudentsT};

use rd_core::design::ModelKind;

use crate::base::{
    check_level, Coefficient, ModelError, ModelStatistics, ModelSummary, ResidualStatistics,
    Result, TestStatistic,
};
use crate::lm::ols::{Matrix, Vector};
use crate::linalg::quad_form;
use crate::prediction::{Interval, PredictionResult};

/// OLS linear regression result
#[derive(Debug, Clone)]
pub struct LinearRegressionResult {
    /// Coefficients (β)
    pub coefficients: Vector,
    /// Standard errors of coefficients
    pub standard_errors: Vector,
    /// t-statistics for coefficients
    pub t_statistics: Vector,
    /// p-values for coefficients
    pub p_values: Vector,
    /// Lower bounds of confidence intervals
    pub ci_lower: Vector,
    /// Upper bounds of confidence intervals
    pub ci_upper: Vector,
    /// Fitted values (ŷ)
    pub fitted_values: Vector,
    /// Residuals (y - ŷ)
    pub residuals: Vector,
    /// Hat matrix diagonal (leverage)
    pub hat_diagonal: Vector,
    /// Cook's distances
    pub cooks_distance: Vector,
    /// Covariance of the coefficients, σ²(X'X)⁻¹
    pub covariance: Matrix,
    /// Response vector (y)
    pub y: Vector,
    /// Variable names
    pub variable_names: Vec<String>,
    /// Model statistics
    pub model_statistics: ModelStatistics,
    /// Confidence level of the coefficient intervals
    pub confidence_level: f64,
}

impl LinearRegressionResult {
    /// Convert coefficients to Coefficient structs
    pub fn to_coefficients(&self) -> Vec<Coefficient> {
        self.coefficients
            .iter()
            .zip(self.standard_errors.iter())
            .zip(self.t_statistics.iter())
            .zip(self.p_values.iter())
            .zip(self.ci_lower.iter())
            .zip(self.ci_upper.iter())
            .enumerate()
            .map(|(i, (((((&coef, &se), &t), &p), &ci_low), &ci_up))| {
                let name = self
                    .variable_names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("x{}", i));

                let coefficient = Coefficient::new(name, coef)
                    .with_std_error(se)
                    .with_statistic(t)
                    .with_p_value(p)
                    .with_ci(ci_low, ci_up);

                if i == 0 {
                    coefficient.as_intercept()
                } else {
                    coefficient
                }
            })
            .collect()
    }

    /// Get the number of observations
    pub fn n_obs(&self) -> usize {
        self.y.len()
    }

    /// Get the number of predictors (including intercept)
    pub fn n_predictors(&self) -> usize {
        self.coefficients.len()
    }

    /// Residual variance σ²
    pub fn scale(&self) -> f64 {
        self.model_statistics
            .residual_std_error
            .map_or(f64::NAN, |s| s * s)
    }

    /// Get predictions for new design rows
    pub fn predict(&self, x_new: &Matrix) -> Vector {
        x_new.dot(&self.coefficients)
    }

    /// Mean and observation intervals for one design row
    ///
    /// `mean_se = sqrt(x'Σx)`; the observation interval adds the residual
    /// variance, `sqrt(mean_se² + σ²)`.
    pub fn predict_row(&self, row: ArrayView1<f64>, level: f64) -> Result<PredictionResult> {
        check_level(level)?;

        let mean = row.dot(&self.coefficients);
        let mean_se = quad_form(&self.covariance, row).max(0.0).sqrt();
        let obs_se = (mean_se * mean_se + self.scale()).sqrt();

        let df = self.model_statistics.df_residual.unwrap_or(0) as f64;
        let t_dist = StudentsT::new(0.0, 1.0, df).map_err(|e| {
            ModelError::numerical(
                format!("Failed to create t-distribution: {}", e),
                "predict_row",
            )
        })?;
        let t_critical = t_dist.inverse_cdf(1.0 - (1.0 - level) / 2.0);

        Ok(PredictionResult {
            mean,
            mean_se,
            mean_ci: Interval::around(mean, t_critical * mean_se),
            obs_ci: Some(Interval::around(mean, t_critical * obs_se)),
            confidence_level: level,
        })
    }

    /// Summary statistics of the residuals
    pub fn residual_statistics(&self) -> ResidualStatistics {
        ResidualStatistics::from_residuals(&self.residuals)
    }

    /// Build the exportable summary
    pub fn summary(&self, kind: ModelKind, dependent: &str) -> ModelSummary {
        ModelSummary {
            model_type: kind.into(),
            dependent: dependent.to_string(),
            n_obs: self.n_obs(),
            n_predictors: self.n_predictors(),
            test_statistic: TestStatistic::T,
            confidence_level: self.confidence_level,
            coefficients: self.to_coefficients(),
            model_statistics: self.model_statistics,
            residual_statistics: Some(self.residual_statistics()),
        }
    }
}
