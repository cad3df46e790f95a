//! Ordinary Least Squares (OLS) linear regression
//!
//! This module implements the standard linear regression model
//! using the ordinary least squares estimator.

use ndarray::{Array1, ArrayView1};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

use rd_core::design::{DesignMatrix, ModelKind};

use crate::base::statistics::two_sided_p;
use crate::base::{
    check_columns, Coefficient, FittedModel, ModelError, ModelStatistics, ModelSummary, Result,
};
use crate::fit::FitConfig;
use crate::linalg;
use crate::lm::result::LinearRegressionResult;
use crate::prediction::PredictionResult;

// ==================== Type Definitions ====================

/// Matrix type alias for 2D arrays
pub type Matrix = rd_core::data::Matrix;

/// Vector type alias for 1D arrays
pub type Vector = Array1<f64>;

// ==================== Estimation ====================

/// Fit OLS on a design matrix that already contains the intercept column
pub fn fit_least_squares(
    x: &Matrix,
    y: &Vector,
    variable_names: &[String],
    config: &FitConfig,
) -> Result<LinearRegressionResult> {
    // Check dimensions
    let n = x.nrows();
    let p = x.ncols();

    if n <= p {
        return Err(ModelError::InsufficientData {
            n_samples: n,
            n_predictors: p,
        });
    }

    // SVD least squares (numerically stable, detects collinearity)
    let solution = linalg::least_squares(x, y, config.rank_tolerance)?;
    let coefficients = solution.coefficients;

    // Calculate fitted values and residuals
    let fitted_values = x.dot(&coefficients);
    let residuals = y - &fitted_values;

    // Calculate basic statistics
    let rss = residuals.mapv(|r| r * r).sum();
    let y_mean = y.mean().unwrap_or(0.0);
    let tss = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum::<f64>();
    let df_residual = (n - p) as f64;
    let r_squared = 1.0 - rss / tss;
    let adj_r_squared = 1.0 - (1.0 - r_squared) * ((n as f64 - 1.0) / df_residual);
    let sigma2 = rss / df_residual;
    let residual_std_error = sigma2.sqrt();

    // Standard errors = sqrt(diag(σ² (X'X)^-1))
    let covariance = &solution.xtx_inv * sigma2;
    let standard_errors = covariance.diag().mapv(|v| v.max(0.0).sqrt());

    // Calculate inference statistics
    let (t_statistics, p_values, ci_lower, ci_upper) =
        calculate_inference(&coefficients, &standard_errors, n - p, config.confidence_level)?;

    // Calculate F-statistic
    let (f_statistic, f_p_value) = f_statistic(rss, tss, n, p)?;

    // Calculate log-likelihood and information criteria
    let log_likelihood = log_likelihood(n, rss);
    let aic = 2.0 * p as f64 - 2.0 * log_likelihood;
    let bic = (n as f64).ln() * p as f64 - 2.0 * log_likelihood;

    // Calculate leverage (hat values) and Cook's distances
    let hat_diagonal = hat_matrix_diagonal(x, &solution.xtx_inv);
    let cooks_distance = cooks_distance(&residuals, &hat_diagonal, p, sigma2);

    let model_statistics = ModelStatistics {
        r_squared: Some(r_squared),
        adj_r_squared: Some(adj_r_squared),
        residual_std_error: Some(residual_std_error),
        f_statistic: Some(f_statistic),
        f_p_value: Some(f_p_value),
        log_likelihood: Some(log_likelihood),
        aic: Some(aic),
        bic: Some(bic),
        df_residual: Some(n - p),
        df_model: Some(p - 1),
        ..ModelStatistics::default()
    };

    tracing::debug!(n, p, r_squared, "fitted least squares");

    Ok(LinearRegressionResult {
        coefficients,
        standard_errors,
        t_statistics,
        p_values,
        ci_lower,
        ci_upper,
        fitted_values,
        residuals,
        hat_diagonal,
        cooks_distance,
        covariance,
        y: y.clone(),
        variable_names: variable_names.to_vec(),
        model_statistics,
        confidence_level: config.confidence_level,
    })
}

/// Calculate t-statistics, p-values and confidence intervals
fn calculate_inference(
    coefficients: &Vector,
    std_errors: &Vector,
    df: usize,
    confidence_level: f64,
) -> Result<(Vector, Vector, Vector, Vector)> {
    let t_statistics: Vector = coefficients
        .iter()
        .zip(std_errors.iter())
        .map(|(&coef, &se)| coef / se)
        .collect();

    let t_dist = StudentsT::new(0.0, 1.0, df as f64).map_err(|e| {
        ModelError::numerical(
            format!("Failed to create t-distribution: {}", e),
            "calculate_inference",
        )
    })?;

    let p_values: Vector = t_statistics
        .iter()
        .map(|&t| two_sided_p(&t_dist, t))
        .collect();

    let alpha = 1.0 - confidence_level;
    let t_critical = t_dist.inverse_cdf(1.0 - alpha / 2.0);

    let ci_lower: Vector = coefficients
        .iter()
        .zip(std_errors.iter())
        .map(|(&coef, &se)| coef - t_critical * se)
        .collect();

    let ci_upper: Vector = coefficients
        .iter()
        .zip(std_errors.iter())
        .map(|(&coef, &se)| coef + t_critical * se)
        .collect();

    Ok((t_statistics, p_values, ci_lower, ci_upper))
}

/// Calculate F-statistic for the joint significance of the non-constant terms
fn f_statistic(rss: f64, tss: f64, n: usize, p: usize) -> Result<(f64, f64)> {
    let ess = tss - rss;
    let df_model = (p - 1) as f64;
    let df_residual = (n - p) as f64;

    let f_statistic = (ess / df_model) / (rss / df_residual);

    let f_dist = FisherSnedecor::new(df_model, df_residual).map_err(|e| {
        ModelError::numerical(
            format!("Failed to create F-distribution: {}", e),
            "f_statistic",
        )
    })?;

    let f_p_value = if f_statistic.is_nan() {
        f64::NAN
    } else if f_statistic.is_infinite() {
        0.0
    } else {
        f_dist.sf(f_statistic)
    };

    Ok((f_statistic, f_p_value))
}

/// Gaussian log-likelihood at the maximum-likelihood variance `RSS / n`
fn log_likelihood(n: usize, rss: f64) -> f64 {
    let n = n as f64;
    -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + (rss / n).ln() + 1.0)
}

/// Leverage h_ii = x_i'(X'X)^-1 x_i
fn hat_matrix_diagonal(x: &Matrix, xtx_inv: &Matrix) -> Vector {
    x.rows()
        .into_iter()
        .map(|xi| linalg::quad_form(xtx_inv, xi))
        .collect()
}

/// Cook's distances D_i = r_i² h_i / (p σ² (1 - h_i)²)
fn cooks_distance(residuals: &Vector, hat_diag: &Vector, p: usize, sigma2: f64) -> Vector {
    residuals
        .iter()
        .zip(hat_diag.iter())
        .map(|(&r, &h)| (r * r * h) / (p as f64 * sigma2 * (1.0 - h).powi(2)))
        .collect()
}

// ==================== Linear Regression Model ====================

/// OLS model on a design matrix
#[derive(Debug, Clone)]
pub struct LinearModel {
    kind: ModelKind,
    dependent: String,
    result: LinearRegressionResult,
}

impl LinearModel {
    /// Fit OLS to a prepared design
    pub fn fit(design: &DesignMatrix, config: &FitConfig) -> Result<Self> {
        let result = fit_least_squares(&design.x, &design.y, &design.columns, config)?;

        Ok(Self {
            kind: design.kind,
            dependent: design.dependent.clone(),
            result,
        })
    }

    /// Full least-squares result
    pub fn result(&self) -> &LinearRegressionResult {
        &self.result
    }
}

impl FittedModel for LinearModel {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn dependent(&self) -> &str {
        &self.dependent
    }

    fn column_names(&self) -> &[String] {
        &self.result.variable_names
    }

    fn params(&self) -> &Vector {
        &self.result.coefficients
    }

    fn coefficients(&self) -> Vec<Coefficient> {
        self.result.to_coefficients()
    }

    fn covariance(&self) -> &Matrix {
        &self.result.covariance
    }

    fn statistics(&self) -> &ModelStatistics {
        &self.result.model_statistics
    }

    fn nobs(&self) -> usize {
        self.result.n_obs()
    }

    fn fitted_values(&self) -> Option<&Vector> {
        Some(&self.result.fitted_values)
    }

    fn residuals(&self) -> Option<&Vector> {
        Some(&self.result.residuals)
    }

    fn cooks_distance(&self) -> Option<&Vector> {
        Some(&self.result.cooks_distance)
    }

    fn predict(&self, x: &Matrix) -> Result<Vector> {
        check_columns(self.result.n_predictors(), x.ncols())?;
        Ok(self.result.predict(x))
    }

    fn predict_row(&self, row: ArrayView1<f64>, level: f64) -> Result<PredictionResult> {
        check_columns(self.result.n_predictors(), row.len())?;
        self.result.predict_row(row, level)
    }

    fn summary(&self) -> ModelSummary {
        self.result.summary(self.kind, &self.dependent)
    }
}
