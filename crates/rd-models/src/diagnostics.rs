//! Model diagnostics
//!
//! This module collects the numbers behind the dashboard's diagnostic panels:
//! - variance inflation factors for every design column
//! - the correlation matrix of the numeric predictors
//! - residual analysis (LOWESS, Q-Q, normality, histogram, Cook's distance)
//!
//! Nothing here renders; a presentation layer draws from the report.

pub mod residuals;
pub mod smooth;
pub mod vif;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use rd_core::data::{DataFrame, Matrix};
use rd_core::design::DesignMatrix;

use crate::base::{FittedModel, ModelError, Result};
use crate::fit::FitConfig;

pub use residuals::{
    CooksDistance, Histogram, Normality, QqPlot, ResidualDiagnostics, MAX_HISTOGRAM_BINS,
};
pub use smooth::LowessCurve;
pub use vif::{VifEntry, VifOutcome};

/// Diagnostics configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Share of points in each LOWESS neighbourhood
    pub lowess_frac: f64,
    /// LOWESS robustifying passes
    pub lowess_iterations: usize,
    /// Fixed histogram bin count; automatic when unset
    pub histogram_bins: Option<usize>,
    /// Cook's distance cutoff; `4/n` when unset
    pub cooks_threshold: Option<f64>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            lowess_frac: 2.0 / 3.0,
            lowess_iterations: 3,
            histogram_bins: None,
            cooks_threshold: None,
        }
    }
}

impl DiagnosticsConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.lowess_frac > 0.0 && self.lowess_frac <= 1.0) {
            return Err(ModelError::InvalidConfig {
                message: format!("lowess_frac must be in (0, 1], got {}", self.lowess_frac),
            });
        }
        if let Some(bins) = self.histogram_bins {
            if !(1..=MAX_HISTOGRAM_BINS).contains(&bins) {
                return Err(ModelError::InvalidConfig {
                    message: format!(
                        "histogram_bins must be in 1..={}, got {}",
                        MAX_HISTOGRAM_BINS, bins
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Pearson correlations of the numeric predictors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Correlation {
    Matrix { columns: Vec<String>, values: Matrix },
    Unavailable { notice: String },
}

/// Residual analysis, when the model has residuals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Residuals {
    Available(Box<ResidualDiagnostics>),
    Unavailable { notice: String },
}

/// Full diagnostics for one fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    pub vif: Vec<VifEntry>,
    pub correlation: Correlation,
    pub residuals: Residuals,
}

/// Correlation of the numeric columns among `independents` in the raw table
pub fn correlation<S: AsRef<str>>(table: &DataFrame, independents: &[S]) -> Result<Correlation> {
    let mut columns = Vec::new();
    for name in independents {
        let name = name.as_ref();
        if table.column(name)?.column_type().is_number() {
            columns.push(name.to_string());
        }
    }

    if columns.is_empty() {
        return Ok(Correlation::Unavailable {
            notice: "No numeric independent variables available to compute correlation matrix."
                .to_string(),
        });
    }

    let values = table.select(&columns)?.corr()?;
    Ok(Correlation::Matrix { columns, values })
}

/// Run every diagnostic that applies to the model
pub fn diagnose<S: AsRef<str>>(
    table: &DataFrame,
    design: &DesignMatrix,
    model: &dyn FittedModel,
    independents: &[S],
    config: &DiagnosticsConfig,
) -> Result<DiagnosticsReport> {
    config.validate()?;

    let vif = vif::vif(&design.x, &design.columns, FitConfig::default().rank_tolerance);
    let correlation = correlation(table, independents)?;

    let residuals = match (model.fitted_values(), model.residuals()) {
        (Some(fitted), Some(residuals)) => {
            let cooks = model.cooks_distance().map(|c| c.to_vec()).unwrap_or_default();
            Residuals::Available(Box::new(ResidualDiagnostics::compute(
                fitted, residuals, &cooks, config,
            )?))
        }
        _ => Residuals::Unavailable {
            notice: format!(
                "Residual analysis is not available for {} regression.",
                model.kind().label().to_lowercase()
            ),
        },
    };

    tracing::debug!(
        vif_failures = vif.iter().filter(|e| e.vif().is_none()).count(),
        "diagnostics computed"
    );

    Ok(DiagnosticsReport {
        vif,
        correlation,
        residuals,
    })
}
