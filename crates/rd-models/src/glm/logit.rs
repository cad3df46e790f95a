//! Logistic regression by maximum likelihood
//!
//! Newton-Raphson on the Bernoulli log-likelihood, starting from zero. The
//! iteration stops when every coefficient moves by less than the configured
//! tolerance. Standard errors come from the inverse observed information at
//! the final estimate.

use ndarray::{Array1, ArrayView1, Axis};
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

use rd_core::design::{DesignMatrix, ModelKind};

use crate::base::statistics::two_sided_p;
use crate::base::{
    check_columns, check_level, Coefficient, FittedModel, ModelError, ModelStatistics,
    ModelSummary, Result, TestStatistic,
};
use crate::fit::{FitConfig, LogitConfig};
use crate::linalg::{quad_form, solve_spd};
use crate::prediction::{Interval, PredictionResult};

type Matrix = rd_core::data::Matrix;
type Vector = Array1<f64>;

/// Logistic regression for a binary target
#[derive(Debug, Clone)]
pub struct LogisticModel {
    dependent: String,
    variable_names: Vec<String>,
    /// Coefficients (β)
    pub coefficients: Vector,
    /// Standard errors of coefficients
    pub standard_errors: Vector,
    /// z-statistics for coefficients
    pub z_statistics: Vector,
    /// p-values for coefficients
    pub p_values: Vector,
    /// Lower bounds of confidence intervals
    pub ci_lower: Vector,
    /// Upper bounds of confidence intervals
    pub ci_upper: Vector,
    /// In-sample probabilities
    pub fitted_values: Vector,
    /// Inverse observed information
    pub covariance: Matrix,
    /// Observed 0/1 outcomes
    pub y: Vector,
    /// Model statistics
    pub model_statistics: ModelStatistics,
    /// Confidence level of the coefficient intervals
    pub confidence_level: f64,
}

/// Logistic function, evaluated without overflow
pub fn sigmoid(v: f64) -> f64 {
    if v >= 0.0 {
        1.0 / (1.0 + (-v).exp())
    } else {
        let e = v.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^v)`, evaluated without overflow
fn log1p_exp(v: f64) -> f64 {
    if v > 0.0 {
        v + (-v).exp().ln_1p()
    } else {
        v.exp().ln_1p()
    }
}

/// Bernoulli log-likelihood in terms of the linear predictor
fn log_likelihood(eta: &Vector, y: &Vector) -> f64 {
    eta.iter()
        .zip(y.iter())
        .map(|(&e, &yi)| yi * e - log1p_exp(e))
        .sum()
}

/// Log-likelihood of the intercept-only model
fn null_log_likelihood(y: &Vector) -> f64 {
    let n = y.len() as f64;
    let p = y.mean().unwrap_or(0.0);

    let term = |q: f64| if q > 0.0 { q * q.ln() } else { 0.0 };
    n * (term(p) + term(1.0 - p))
}

/// Every observation lies on the correct side of the decision boundary
fn separates(eta: &Vector, y: &Vector) -> bool {
    eta.iter()
        .zip(y.iter())
        .all(|(&e, &yi)| (yi == 1.0 && e > 0.0) || (yi == 0.0 && e < 0.0))
}

/// Observed information X' W X with W = p(1 - p)
fn information(x: &Matrix, prob: &Vector) -> Matrix {
    let w = prob.mapv(|p| p * (1.0 - p));
    let xw = x * &w.insert_axis(Axis(1));
    x.t().dot(&xw)
}

/// Run Newton-Raphson and return `(params, iterations)`
fn newton(x: &Matrix, y: &Vector, config: &LogitConfig) -> Result<(Vector, usize)> {
    let mut beta = Vector::zeros(x.ncols());

    for iteration in 1..=config.max_iter {
        let eta = x.dot(&beta);
        let prob = eta.mapv(sigmoid);

        if prob.iter().zip(y.iter()).all(|(p, yi)| (p - yi).abs() < 1e-8) {
            return Err(ModelError::PerfectSeparation);
        }

        let gradient = x.t().dot(&(y - &prob));
        let step = match solve_spd(&information(x, &prob), &gradient) {
            Ok((step, _)) if step.iter().all(|s| s.is_finite()) => step,
            Ok(_) | Err(_) if separates(&eta, y) => return Err(ModelError::PerfectSeparation),
            Ok(_) => {
                return Err(ModelError::numerical(
                    "Newton step is not finite",
                    "logit_newton",
                ))
            }
            Err(err) => return Err(err),
        };

        beta += &step;

        let max_change = step.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()));
        tracing::debug!(iteration, max_change, "logit newton step");

        if max_change < config.tolerance {
            return Ok((beta, iteration));
        }
    }

    if separates(&x.dot(&beta), y) {
        return Err(ModelError::PerfectSeparation);
    }

    Err(ModelError::NotConverged {
        max_iter: config.max_iter,
    })
}

impl LogisticModel {
    /// Fit a logistic regression to a prepared design
    pub fn fit(design: &DesignMatrix, config: &FitConfig) -> Result<Self> {
        let x = &design.x;
        let y = &design.y;
        let n = x.nrows();
        let p = x.ncols();

        if n <= p {
            return Err(ModelError::InsufficientData {
                n_samples: n,
                n_predictors: p,
            });
        }

        let (coefficients, iterations) = newton(x, y, &config.logit)?;

        let eta = x.dot(&coefficients);
        let fitted_values = eta.mapv(sigmoid);
        let (_, covariance) = solve_spd(&information(x, &fitted_values), &Vector::zeros(p))?;
        let standard_errors = covariance.diag().mapv(|v| v.max(0.0).sqrt());

        // Wald inference on the normal reference distribution
        let normal = Normal::new(0.0, 1.0).map_err(|e| {
            ModelError::numerical(format!("Failed to create normal: {}", e), "logit_fit")
        })?;
        let z_critical = normal.inverse_cdf(1.0 - (1.0 - config.confidence_level) / 2.0);

        let z_statistics: Vector = coefficients
            .iter()
            .zip(standard_errors.iter())
            .map(|(&b, &se)| b / se)
            .collect();
        let p_values = z_statistics.mapv(|z| two_sided_p(&normal, z));
        let ci_lower = &coefficients - &(&standard_errors * z_critical);
        let ci_upper = &coefficients + &(&standard_errors * z_critical);

        // Likelihood statistics
        let llf = log_likelihood(&eta, y);
        let llnull = null_log_likelihood(y);
        let llr = -2.0 * (llnull - llf);
        let df_model = p - 1;
        let llr_p_value = if df_model > 0 {
            ChiSquared::new(df_model as f64)
                .map(|chi2| chi2.sf(llr))
                .unwrap_or(f64::NAN)
        } else {
            f64::NAN
        };

        let model_statistics = ModelStatistics {
            log_likelihood: Some(llf),
            null_log_likelihood: Some(llnull),
            pseudo_r_squared: Some(1.0 - llf / llnull),
            aic: Some(-2.0 * llf + 2.0 * p as f64),
            bic: Some(-2.0 * llf + (n as f64).ln() * p as f64),
            null_deviance: Some(-2.0 * llnull),
            residual_deviance: Some(-2.0 * llf),
            chi_squared: Some(llr),
            chi_squared_p_value: Some(llr_p_value),
            df_residual: Some(n - p),
            df_model: Some(df_model),
            iterations: Some(iterations),
            converged: Some(true),
            ..ModelStatistics::default()
        };

        tracing::debug!(n, p, iterations, llf, "fitted logit");

        Ok(Self {
            dependent: design.dependent.clone(),
            variable_names: design.columns.clone(),
            coefficients,
            standard_errors,
            z_statistics,
            p_values,
            ci_lower,
            ci_upper,
            fitted_values,
            covariance,
            y: y.clone(),
            model_statistics,
            confidence_level: config.confidence_level,
        })
    }

    /// Linear predictor X β
    pub fn linear_predictor(&self, x: &Matrix) -> Vector {
        x.dot(&self.coefficients)
    }

    /// Predicted probabilities P(y = 1)
    pub fn predict_proba(&self, x: &Matrix) -> Vector {
        self.linear_predictor(x).mapv(sigmoid)
    }
}

impl FittedModel for LogisticModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Logistic
    }

    fn dependent(&self) -> &str {
        &self.dependent
    }

    fn column_names(&self) -> &[String] {
        &self.variable_names
    }

    fn params(&self) -> &Vector {
        &self.coefficients
    }

    fn coefficients(&self) -> Vec<Coefficient> {
        (0..self.coefficients.len())
            .map(|i| {
                let coefficient = Coefficient::new(self.variable_names[i].clone(), self.coefficients[i])
                    .with_std_error(self.standard_errors[i])
                    .with_statistic(self.z_statistics[i])
                    .with_p_value(self.p_values[i])
                    .with_ci(self.ci_lower[i], self.ci_upper[i]);

                if i == 0 {
                    coefficient.as_intercept()
                } else {
                    coefficient
                }
            })
            .collect()
    }

    fn covariance(&self) -> &Matrix {
        &self.covariance
    }

    fn statistics(&self) -> &ModelStatistics {
        &self.model_statistics
    }

    fn nobs(&self) -> usize {
        self.y.len()
    }

    fn fitted_values(&self) -> Option<&Vector> {
        Some(&self.fitted_values)
    }

    fn predict(&self, x: &Matrix) -> Result<Vector> {
        check_columns(self.coefficients.len(), x.ncols())?;
        Ok(self.predict_proba(x))
    }

    /// Probability with an interval mapped from the linear-predictor scale
    fn predict_row(&self, row: ArrayView1<f64>, level: f64) -> Result<PredictionResult> {
        check_columns(self.coefficients.len(), row.len())?;
        check_level(level)?;

        let eta = row.dot(&self.coefficients);
        let se = quad_form(&self.covariance, row).max(0.0).sqrt();

        let normal = Normal::new(0.0, 1.0).map_err(|e| {
            ModelError::numerical(format!("Failed to create normal: {}", e), "predict_row")
        })?;
        let z = normal.inverse_cdf(1.0 - (1.0 - level) / 2.0);

        let mean = sigmoid(eta);
        Ok(PredictionResult {
            mean,
            // Delta method on the probability scale
            mean_se: mean * (1.0 - mean) * se,
            mean_ci: Interval::new(sigmoid(eta - z * se), sigmoid(eta + z * se)),
            obs_ci: None,
            confidence_level: level,
        })
    }

    fn summary(&self) -> ModelSummary {
        ModelSummary {
            model_type: ModelKind::Logistic.into(),
            dependent: self.dependent.clone(),
            n_obs: self.nobs(),
            n_predictors: self.coefficients.len(),
            test_statistic: TestStatistic::Z,
            confidence_level: self.confidence_level,
            coefficients: FittedModel::coefficients(self),
            model_statistics: self.model_statistics,
            residual_statistics: None,
        }
    }
}
