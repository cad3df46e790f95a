//! Statistical structures for model results

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use statrs::distribution::ContinuousCDF;

/// Model statistics
///
/// Least-squares fits fill the R²/F block; logistic fits fill the
/// likelihood-ratio block. Fields that do not apply stay `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelStatistics {
    /// R-squared
    pub r_squared: Option<f64>,
    /// Adjusted R-squared
    pub adj_r_squared: Option<f64>,
    /// Residual standard error
    pub residual_std_error: Option<f64>,
    /// F-statistic
    pub f_statistic: Option<f64>,
    /// F-statistic p-value
    pub f_p_value: Option<f64>,
    /// Log-likelihood
    pub log_likelihood: Option<f64>,
    /// Log-likelihood of the intercept-only model
    pub null_log_likelihood: Option<f64>,
    /// McFadden pseudo R-squared
    pub pseudo_r_squared: Option<f64>,
    /// AIC
    pub aic: Option<f64>,
    /// BIC
    pub bic: Option<f64>,
    /// Null deviance
    pub null_deviance: Option<f64>,
    /// Residual deviance
    pub residual_deviance: Option<f64>,
    /// Likelihood-ratio chi-squared statistic
    pub chi_squared: Option<f64>,
    /// Chi-squared p-value
    pub chi_squared_p_value: Option<f64>,
    /// Residual degrees of freedom
    pub df_residual: Option<usize>,
    /// Model degrees of freedom
    pub df_model: Option<usize>,
    /// Number of iterations
    pub iterations: Option<usize>,
    /// Convergence status
    pub converged: Option<bool>,
}

/// Residual statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResidualStatistics {
    /// Minimum residual
    pub min: f64,
    /// First quartile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub q3: f64,
    /// Maximum residual
    pub max: f64,
    /// Mean residual
    pub mean: f64,
    /// Standard deviation
    pub std_dev: f64,
    /// Skewness
    pub skewness: Option<f64>,
    /// Excess kurtosis
    pub kurtosis: Option<f64>,
    /// Durbin-Watson statistic
    pub durbin_watson: Option<f64>,
}

impl ResidualStatistics {
    /// Summarize a residual vector
    pub fn from_residuals(residuals: &Array1<f64>) -> Self {
        if residuals.is_empty() {
            return Self::default();
        }

        let mut sorted = residuals.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
            mean: residuals.mean().unwrap_or(0.0),
            std_dev: if residuals.len() > 1 {
                residuals.std(1.0)
            } else {
                0.0
            },
            skewness: Some(skewness(residuals)),
            kurtosis: Some(kurtosis(residuals)),
            durbin_watson: Some(durbin_watson(residuals)),
        }
    }
}

/// Two-sided p-value of a statistic under a symmetric reference distribution
pub(crate) fn two_sided_p<D: ContinuousCDF<f64, f64>>(dist: &D, stat: f64) -> f64 {
    if stat.is_nan() {
        f64::NAN
    } else if stat.is_infinite() {
        0.0
    } else {
        (2.0 * dist.sf(stat.abs())).min(1.0)
    }
}

/// Linearly interpolated quantile of sorted data
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let idx = (sorted.len() as f64 - 1.0) * q;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = idx - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

/// Population central moments `(m2, m3, m4)`
fn central_moments(data: &Array1<f64>) -> (f64, f64, f64) {
    let n = data.len() as f64;
    let mean = data.mean().unwrap_or(0.0);

    let (m2, m3, m4) = data.iter().fold((0.0, 0.0, 0.0), |(m2, m3, m4), &x| {
        let d = x - mean;
        let d2 = d * d;
        (m2 + d2, m3 + d2 * d, m4 + d2 * d2)
    });

    (m2 / n, m3 / n, m4 / n)
}

/// Biased sample skewness
pub(crate) fn skewness(data: &Array1<f64>) -> f64 {
    if data.len() < 3 {
        return 0.0;
    }

    let (m2, m3, _) = central_moments(data);
    if m2 < 1e-300 {
        return 0.0;
    }
    m3 / m2.powf(1.5)
}

/// Biased sample excess kurtosis
pub(crate) fn kurtosis(data: &Array1<f64>) -> f64 {
    if data.len() < 4 {
        return 0.0;
    }

    let (m2, _, m4) = central_moments(data);
    if m2 < 1e-300 {
        return 0.0;
    }
    m4 / (m2 * m2) - 3.0
}

/// Durbin-Watson statistic of an ordered residual series
pub(crate) fn durbin_watson(residuals: &Array1<f64>) -> f64 {
    let n = residuals.len();
    if n < 2 {
        return 0.0;
    }

    let sum_sq_diff: f64 = residuals
        .windows(2)
        .into_iter()
        .map(|w| (w[1] - w[0]).powi(2))
        .sum();
    let sum_sq: f64 = residuals.iter().map(|&r| r * r).sum();

    if sum_sq < 1e-300 {
        0.0
    } else {
        sum_sq_diff / sum_sq
    }
}
