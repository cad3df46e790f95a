//! Model summary structures
//!
//! The [`fmt::Display`] implementation is the plain-text summary the
//! dashboard offers for download.

use super::coefficient::Coefficient;
use super::statistics::{ModelStatistics, ResidualStatistics};
use rd_core::design::ModelKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comprehensive model summary structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Model type
    pub model_type: ModelType,
    /// Dependent variable
    pub dependent: String,
    /// Number of observations
    pub n_obs: usize,
    /// Number of predictors (including intercept)
    pub n_predictors: usize,
    /// Distribution used for coefficient tests
    pub test_statistic: TestStatistic,
    /// Confidence level of the coefficient intervals
    pub confidence_level: f64,
    /// Coefficients table
    pub coefficients: Vec<Coefficient>,
    /// Model statistics
    pub model_statistics: ModelStatistics,
    /// Residual statistics, for models with residuals
    pub residual_statistics: Option<ResidualStatistics>,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = format!("{} Results", self.model_type);
        writeln!(f, "{}", title)?;
        writeln!(f, "{}", "=".repeat(title.len()))?;
        writeln!(f, "Dependent Variable: {}", self.dependent)?;
        writeln!(f, "Method: {}", self.model_type.method())?;
        writeln!(f, "Observations: {}", self.n_obs)?;
        writeln!(f, "Predictors: {}", self.n_predictors)?;
        writeln!(f)?;

        // Coefficients
        let pct = self.confidence_level * 100.0;
        writeln!(f, "Coefficients:")?;
        writeln!(
            f,
            "{:<20} {:>12} {:>12} {:>10} {:>10} {:>12} {:>12}",
            "Term",
            "Estimate",
            "Std Error",
            format!("{}-value", self.test_statistic),
            format!("P>|{}|", self.test_statistic),
            format!("[{:.1}% low", pct),
            "high]"
        )?;
        writeln!(
            f,
            "{:-<20} {:-<12} {:-<12} {:-<10} {:-<10} {:-<12} {:-<12}",
            "", "", "", "", "", "", ""
        )?;

        for coeff in &self.coefficients {
            writeln!(
                f,
                "{:<20} {:>12.6} {:>12.6} {:>10.3} {:>10.4} {:>12.6} {:>12.6}",
                coeff.name,
                coeff.estimate,
                coeff.std_error.unwrap_or(f64::NAN),
                coeff.statistic.unwrap_or(f64::NAN),
                coeff.p_value.unwrap_or(f64::NAN),
                coeff.ci_lower.unwrap_or(f64::NAN),
                coeff.ci_upper.unwrap_or(f64::NAN)
            )?;
        }
        writeln!(f)?;

        // Model statistics
        let stats = &self.model_statistics;
        writeln!(f, "Model Statistics:")?;
        if let Some(r2) = stats.r_squared {
            writeln!(f, "  R-squared: {:.4}", r2)?;
        }
        if let Some(adj_r2) = stats.adj_r_squared {
            writeln!(f, "  Adjusted R-squared: {:.4}", adj_r2)?;
        }
        if let Some(f_stat) = stats.f_statistic {
            writeln!(f, "  F-statistic: {:.4}", f_stat)?;
        }
        if let Some(f_p) = stats.f_p_value {
            writeln!(f, "  Prob (F-statistic): {:.4e}", f_p)?;
        }
        if let Some(pseudo) = stats.pseudo_r_squared {
            writeln!(f, "  Pseudo R-squared: {:.4}", pseudo)?;
        }
        if let Some(log_lik) = stats.log_likelihood {
            writeln!(f, "  Log-likelihood: {:.4}", log_lik)?;
        }
        if let Some(ll_null) = stats.null_log_likelihood {
            writeln!(f, "  LL-Null: {:.4}", ll_null)?;
        }
        if let Some(llr) = stats.chi_squared {
            writeln!(f, "  LLR: {:.4}", llr)?;
        }
        if let Some(llr_p) = stats.chi_squared_p_value {
            writeln!(f, "  LLR p-value: {:.4e}", llr_p)?;
        }
        if let Some(aic) = stats.aic {
            writeln!(f, "  AIC: {:.4}", aic)?;
        }
        if let Some(bic) = stats.bic {
            writeln!(f, "  BIC: {:.4}", bic)?;
        }
        if let Some(resid_se) = stats.residual_std_error {
            writeln!(f, "  Residual Std. Error: {:.4}", resid_se)?;
        }
        if let Some(df_resid) = stats.df_residual {
            writeln!(f, "  Residual DF: {}", df_resid)?;
        }
        if let Some(df_model) = stats.df_model {
            writeln!(f, "  Model DF: {}", df_model)?;
        }
        if let Some(iterations) = stats.iterations {
            writeln!(f, "  Iterations: {}", iterations)?;
        }
        if let Some(converged) = stats.converged {
            writeln!(f, "  Converged: {}", converged)?;
        }

        if let Some(resid) = &self.residual_statistics {
            writeln!(f)?;
            writeln!(f, "Residuals:")?;
            writeln!(
                f,
                "  Min: {:.4}  Q1: {:.4}  Median: {:.4}  Q3: {:.4}  Max: {:.4}",
                resid.min, resid.q1, resid.median, resid.q3, resid.max
            )?;
            if let Some(skew) = resid.skewness {
                writeln!(f, "  Skew: {:.4}", skew)?;
            }
            if let Some(kurt) = resid.kurtosis {
                writeln!(f, "  Excess Kurtosis: {:.4}", kurt)?;
            }
            if let Some(dw) = resid.durbin_watson {
                writeln!(f, "  Durbin-Watson: {:.4}", dw)?;
            }
        }

        Ok(())
    }
}

/// Model type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    /// Linear regression
    LinearRegression,
    /// Linear regression on polynomial terms
    PolynomialRegression { degree: u32 },
    /// Logistic regression
    LogisticRegression,
}

impl ModelType {
    /// Estimation method shown in the summary header
    pub fn method(&self) -> &'static str {
        match self {
            ModelType::LinearRegression | ModelType::PolynomialRegression { .. } => {
                "Least Squares"
            }
            ModelType::LogisticRegression => "Maximum Likelihood",
        }
    }
}

impl From<ModelKind> for ModelType {
    fn from(kind: ModelKind) -> Self {
        match kind {
            ModelKind::MultipleLinear => ModelType::LinearRegression,
            ModelKind::Polynomial { degree } => ModelType::PolynomialRegression { degree },
            ModelKind::Logistic => ModelType::LogisticRegression,
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::LinearRegression => write!(f, "Linear Regression"),
            ModelType::PolynomialRegression { degree } => {
                write!(f, "Polynomial Regression (degree {})", degree)
            }
            ModelType::LogisticRegression => write!(f, "Logistic Regression"),
        }
    }
}

/// Reference distribution of the coefficient tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatistic {
    /// Student t, for least squares
    T,
    /// Standard normal, for maximum likelihood
    Z,
}

impl fmt::Display for TestStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatistic::T => write!(f, "t"),
            TestStatistic::Z => write!(f, "z"),
        }
    }
}
