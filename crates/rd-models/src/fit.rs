//! Model fitting entry point
//!
//! [`fit`] dispatches on the design's [`ModelKind`] and returns the fitted
//! model behind the [`FittedModel`] trait.

use serde::{Deserialize, Serialize};

use rd_core::design::{DesignMatrix, ModelKind};

use crate::base::{FittedModel, ModelError, Result};
use crate::glm::LogisticModel;
use crate::lm::{LinearModel, PolynomialModel};

/// Fitting configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Confidence level for coefficient intervals
    pub confidence_level: f64,
    /// Relative singular-value cutoff for the rank check
    pub rank_tolerance: f64,
    /// Logistic solver settings
    pub logit: LogitConfig,
}

/// Newton-Raphson settings for logistic regression
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogitConfig {
    /// Maximum number of Newton steps
    pub max_iter: usize,
    /// Convergence threshold on the largest coefficient change
    pub tolerance: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            rank_tolerance: 1e-10,
            logit: LogitConfig::default(),
        }
    }
}

impl Default for LogitConfig {
    fn default() -> Self {
        Self {
            max_iter: 35,
            tolerance: 1e-8,
        }
    }
}

impl FitConfig {
    /// Check that every setting is usable
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(ModelError::InvalidConfig { message });

        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return invalid(format!(
                "confidence level must be in (0, 1), got {}",
                self.confidence_level
            ));
        }
        if !(self.rank_tolerance > 0.0 && self.rank_tolerance < 1.0) {
            return invalid(format!(
                "rank tolerance must be in (0, 1), got {}",
                self.rank_tolerance
            ));
        }
        if self.logit.max_iter == 0 {
            return invalid("logit max_iter must be at least 1".to_string());
        }
        if !(self.logit.tolerance > 0.0) {
            return invalid(format!(
                "logit tolerance must be positive, got {}",
                self.logit.tolerance
            ));
        }

        Ok(())
    }
}

/// Fit the model the design was built for, with default settings
pub fn fit(design: &DesignMatrix) -> Result<Box<dyn FittedModel>> {
    fit_with(design, &FitConfig::default())
}

/// Fit the model the design was built for
pub fn fit_with(design: &DesignMatrix, config: &FitConfig) -> Result<Box<dyn FittedModel>> {
    config.validate()?;

    let model: Box<dyn FittedModel> = match design.kind {
        ModelKind::MultipleLinear => Box::new(LinearModel::fit(design, config)?),
        ModelKind::Polynomial { .. } => Box::new(PolynomialModel::fit(design, config)?),
        ModelKind::Logistic => Box::new(LogisticModel::fit(design, config)?),
    };

    tracing::info!(
        kind = %design.kind,
        dependent = %design.dependent,
        nobs = design.nobs(),
        columns = design.ncols(),
        "model fitted"
    );

    Ok(model)
}
