//! Residual diagnostics for least-squares fits

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

use crate::base::statistics::{durbin_watson, kurtosis, quantile, skewness};
use crate::base::{ModelError, ResidualStatistics, Result};
use crate::diagnostics::smooth::{lowess_curve, LowessCurve};
use crate::diagnostics::DiagnosticsConfig;

/// Upper bound on histogram bins, automatic or configured
pub const MAX_HISTOGRAM_BINS: usize = 1000;

/// Normal Q-Q data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QqPlot {
    /// Standard-normal quantiles at `(i - 0.5) / n`
    pub theoretical: Vec<f64>,
    /// Residuals in ascending order
    pub sample: Vec<f64>,
    /// Reference line intercept (residual mean)
    pub intercept: f64,
    /// Reference line slope (residual standard deviation)
    pub slope: f64,
}

/// Jarque-Bera normality test and the moments it is built from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normality {
    pub jarque_bera: f64,
    pub p_value: f64,
    pub skewness: f64,
    /// Excess kurtosis
    pub kurtosis: f64,
}

/// Equal-width histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Cook's distance with flagged observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CooksDistance {
    pub values: Vec<f64>,
    pub threshold: f64,
    /// Observations with a distance above `threshold`
    pub influential: Vec<usize>,
}

/// Everything the residual panels need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidualDiagnostics {
    pub fitted: Vec<f64>,
    pub residuals: Vec<f64>,
    /// Smooth of residuals on fitted values
    pub lowess: LowessCurve,
    pub qq: QqPlot,
    pub normality: Normality,
    pub durbin_watson: f64,
    pub histogram: Histogram,
    pub summary: ResidualStatistics,
    pub cooks: CooksDistance,
}

impl ResidualDiagnostics {
    pub(crate) fn compute(
        fitted: &Array1<f64>,
        residuals: &Array1<f64>,
        cooks: &[f64],
        config: &DiagnosticsConfig,
    ) -> Result<Self> {
        let fitted_values = fitted.to_vec();
        let residual_values = residuals.to_vec();

        Ok(Self {
            lowess: lowess_curve(
                &fitted_values,
                &residual_values,
                config.lowess_frac,
                config.lowess_iterations,
            )?,
            qq: qq_plot(residuals)?,
            normality: jarque_bera(residuals)?,
            durbin_watson: durbin_watson(residuals),
            histogram: histogram(&residual_values, config.histogram_bins),
            summary: ResidualStatistics::from_residuals(residuals),
            cooks: cooks_distance(cooks, config.cooks_threshold),
            fitted: fitted_values,
            residuals: residual_values,
        })
    }
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| {
        ModelError::numerical(format!("Failed to create normal: {}", e), "residual_diagnostics")
    })
}

/// Sorted residuals against normal quantiles
pub fn qq_plot(residuals: &Array1<f64>) -> Result<QqPlot> {
    let normal = standard_normal()?;
    let n = residuals.len();

    let mut sample = residuals.to_vec();
    sample.sort_by(f64::total_cmp);

    let theoretical = (1..=n)
        .map(|i| normal.inverse_cdf((i as f64 - 0.5) / n as f64))
        .collect();

    Ok(QqPlot {
        theoretical,
        sample,
        intercept: residuals.mean().unwrap_or(0.0),
        slope: if n > 0 { residuals.std(0.0) } else { 0.0 },
    })
}

/// `JB = n/6 (S² + K²/4)`, compared with chi-squared(2)
pub fn jarque_bera(residuals: &Array1<f64>) -> Result<Normality> {
    let n = residuals.len() as f64;
    let skew = skewness(residuals);
    let kurt = kurtosis(residuals);
    let statistic = n / 6.0 * (skew * skew + kurt * kurt / 4.0);

    let chi2 = ChiSquared::new(2.0).map_err(|e| {
        ModelError::numerical(format!("Failed to create chi-squared: {}", e), "jarque_bera")
    })?;

    Ok(Normality {
        jarque_bera: statistic,
        p_value: chi2.sf(statistic),
        skewness: skew,
        kurtosis: kurt,
    })
}

/// Bin count as the larger of the Sturges and Freedman-Diaconis choices
///
/// A narrow IQR next to a far outlier makes Freedman-Diaconis ask for an
/// unbounded number of bins; past [`MAX_HISTOGRAM_BINS`] the Sturges count
/// is used alone.
fn auto_bins(sorted: &[f64]) -> usize {
    let n = sorted.len();
    let range = sorted[n - 1] - sorted[0];
    if range <= 0.0 || !range.is_finite() {
        return 1;
    }

    let sturges_bins = ((n as f64).log2() + 1.0).ceil();
    let sturges = range / ((n as f64).log2() + 1.0);
    let iqr = quantile(sorted, 0.75) - quantile(sorted, 0.25);
    let fd = 2.0 * iqr / (n as f64).cbrt();

    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };
    let bins = (range / width).ceil();
    if bins <= MAX_HISTOGRAM_BINS as f64 {
        (bins as usize).max(1)
    } else {
        tracing::debug!(requested = bins, "histogram bin count capped");
        (sturges_bins as usize).clamp(1, MAX_HISTOGRAM_BINS)
    }
}

/// Equal-width histogram over the data range
///
/// With `bins` unset the count follows numpy's `"auto"` rule. The last bin
/// is closed on the right.
pub fn histogram(values: &[f64], bins: Option<usize>) -> Histogram {
    if values.is_empty() {
        return Histogram {
            edges: Vec::new(),
            counts: Vec::new(),
        };
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let bins = bins
        .unwrap_or_else(|| auto_bins(&sorted))
        .clamp(1, MAX_HISTOGRAM_BINS);
    let (mut lo, mut hi) = (sorted[0], sorted[sorted.len() - 1]);
    if hi <= lo {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|k| lo + k as f64 * width).collect();

    let mut counts = vec![0; bins];
    for &v in values {
        let idx = (((v - lo) / (hi - lo)) * bins as f64) as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    Histogram { edges, counts }
}

/// Flag observations above `threshold`, default `4/n`
pub fn cooks_distance(values: &[f64], threshold: Option<f64>) -> CooksDistance {
    let threshold = threshold.unwrap_or(4.0 / values.len().max(1) as f64);
    let influential = values
        .iter()
        .enumerate()
        .filter(|(_, d)| **d > threshold)
        .map(|(i, _)| i)
        .collect();

    CooksDistance {
        values: values.to_vec(),
        threshold,
        influential,
    }
}
