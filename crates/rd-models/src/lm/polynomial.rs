//! Polynomial regression
//!
//! OLS on a design whose columns are the monomials of the inputs. The
//! expansion is kept with the model so raw inputs can be predicted.

use ndarray::ArrayView1;

use rd_core::design::{DesignError, DesignMatrix, ModelKind, PolynomialFeatures};

use crate::base::{Coefficient, FittedModel, ModelStatistics, ModelSummary, Result};
use crate::fit::FitConfig;
use crate::lm::ols::{LinearModel, Matrix, Vector};
use crate::lm::result::LinearRegressionResult;
use crate::prediction::PredictionResult;

/// OLS model on polynomial terms
#[derive(Debug, Clone)]
pub struct PolynomialModel {
    expansion: PolynomialFeatures,
    linear: LinearModel,
}

impl PolynomialModel {
    /// Fit OLS to a polynomial design
    pub fn fit(design: &DesignMatrix, config: &FitConfig) -> Result<Self> {
        let expansion = design.expansion.clone().ok_or_else(|| {
            DesignError::InvalidSelection {
                message: format!("design for {} has no polynomial expansion", design.kind),
            }
        })?;

        Ok(Self {
            expansion,
            linear: LinearModel::fit(design, config)?,
        })
    }

    /// Polynomial degree
    pub fn degree(&self) -> u32 {
        self.expansion.degree()
    }

    /// Expansion applied to raw inputs
    pub fn expansion(&self) -> &PolynomialFeatures {
        &self.expansion
    }

    /// Full least-squares result
    pub fn result(&self) -> &LinearRegressionResult {
        self.linear.result()
    }

    /// Predict from raw (unexpanded) inputs, one row per observation
    pub fn predict_inputs(&self, inputs: &Matrix) -> Result<Vector> {
        let terms = self.expansion.transform(inputs);
        let mut x = Matrix::ones((terms.nrows(), terms.ncols() + 1));
        x.slice_mut(ndarray::s![.., 1..]).assign(&terms);
        self.linear.predict(&x)
    }
}

impl FittedModel for PolynomialModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Polynomial {
            degree: self.degree(),
        }
    }

    fn dependent(&self) -> &str {
        self.linear.dependent()
    }

    fn column_names(&self) -> &[String] {
        self.linear.column_names()
    }

    fn params(&self) -> &Vector {
        self.linear.params()
    }

    fn coefficients(&self) -> Vec<Coefficient> {
        self.linear.coefficients()
    }

    fn covariance(&self) -> &Matrix {
        self.linear.covariance()
    }

    fn statistics(&self) -> &ModelStatistics {
        self.linear.statistics()
    }

    fn nobs(&self) -> usize {
        self.linear.nobs()
    }

    fn fitted_values(&self) -> Option<&Vector> {
        self.linear.fitted_values()
    }

    fn residuals(&self) -> Option<&Vector> {
        self.linear.residuals()
    }

    fn cooks_distance(&self) -> Option<&Vector> {
        self.linear.cooks_distance()
    }

    fn predict(&self, x: &Matrix) -> Result<Vector> {
        self.linear.predict(x)
    }

    fn predict_row(&self, row: ArrayView1<f64>, level: f64) -> Result<PredictionResult> {
        self.linear.predict_row(row, level)
    }

    fn summary(&self) -> ModelSummary {
        self.linear.summary()
    }
}
