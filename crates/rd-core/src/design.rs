//! Design matrix construction
//!
//! Turns a loaded table plus a variable selection into the numeric
//! `(X, y)` pair an estimator consumes. The steps are fixed:
//!
//! 1. select the predictor columns;
//! 2. reduce a `Month` predictor to its month number;
//! 3. one-hot encode text predictors, dropping the first category;
//! 4. coerce the target to numbers;
//! 5. drop every row with a missing predictor or target;
//! 6. apply the model-specific transform and prepend the `const` column.

pub mod encoding;
pub mod error;
mod polynomial;

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::data::{DataFrame, FloatArray, Matrix, Series};
use crate::io::MONTH_COLUMN;

pub use error::{DesignError, DesignResult};
pub use polynomial::PolynomialFeatures;

/// Name of the intercept column in every design matrix
pub const INTERCEPT: &str = "const";

/// The regression families the dashboard can fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    /// Ordinary least squares on the encoded predictors
    MultipleLinear,
    /// Ordinary least squares on a polynomial expansion of the predictors
    Polynomial { degree: u32 },
    /// Maximum-likelihood logistic regression on a 0/1 target
    Logistic,
}

impl ModelKind {
    pub const MIN_DEGREE: u32 = 2;
    pub const MAX_DEGREE: u32 = 5;

    /// Create a polynomial kind, validating the degree
    pub fn polynomial(degree: u32) -> DesignResult<Self> {
        let kind = ModelKind::Polynomial { degree };
        kind.validate()?;
        Ok(kind)
    }

    /// Check the kind's parameters
    pub fn validate(&self) -> DesignResult<()> {
        match *self {
            ModelKind::Polynomial { degree }
                if !(Self::MIN_DEGREE..=Self::MAX_DEGREE).contains(&degree) =>
            {
                Err(DesignError::InvalidDegree {
                    degree,
                    min: Self::MIN_DEGREE,
                    max: Self::MAX_DEGREE,
                })
            }
            _ => Ok(()),
        }
    }

    /// Whether the kind is fitted by least squares and has residuals
    pub fn is_least_squares(&self) -> bool {
        match self {
            ModelKind::MultipleLinear | ModelKind::Polynomial { .. } => true,
            ModelKind::Logistic => false,
        }
    }

    /// Polynomial degree, if any
    pub fn degree(&self) -> Option<u32> {
        match self {
            ModelKind::Polynomial { degree } => Some(*degree),
            ModelKind::MultipleLinear | ModelKind::Logistic => None,
        }
    }

    /// Label used by the dashboard's model selector
    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::MultipleLinear => "Multiple Linear",
            ModelKind::Polynomial { .. } => "Polynomial",
            ModelKind::Logistic => "Logistic",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Polynomial { degree } => write!(f, "Polynomial (degree {})", degree),
            other => write!(f, "{}", other.label()),
        }
    }
}

impl FromStr for ModelKind {
    type Err = DesignError;

    /// Parse a selector label; `Polynomial` defaults to degree 2
    fn from_str(s: &str) -> DesignResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multiple linear" | "linear" | "ols" => Ok(ModelKind::MultipleLinear),
            "polynomial" => ModelKind::polynomial(Self::MIN_DEGREE),
            "logistic" | "logit" => Ok(ModelKind::Logistic),
            _ => Err(DesignError::UnknownModelKind(s.to_string())),
        }
    }
}

/// A model-ready design matrix and its aligned target
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    /// Model kind the matrix was prepared for
    pub kind: ModelKind,
    /// Dependent variable name
    pub dependent: String,
    /// Column names of `x`, starting with [`INTERCEPT`]
    pub columns: Vec<String>,
    /// Predictor matrix including the intercept column
    pub x: Matrix,
    /// Target vector, row-aligned with `x`
    pub y: FloatArray,
    /// Encoded predictors before any polynomial expansion
    pub inputs: Vec<String>,
    /// Filtered values of `inputs`, row-aligned with `x`
    pub input_matrix: Matrix,
    /// Polynomial expansion applied to `input_matrix`, if any
    pub expansion: Option<PolynomialFeatures>,
}

impl DesignMatrix {
    /// Number of observations
    pub fn nobs(&self) -> usize {
        self.x.nrows()
    }

    /// Number of design columns, including the intercept
    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    /// Values of one input column
    pub fn input_column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.inputs
            .iter()
            .position(|c| c == name)
            .map(|j| self.input_matrix.column(j))
    }

    /// Mean of every input column, in input order
    pub fn input_means(&self) -> Vec<(String, f64)> {
        let means = self
            .input_matrix
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(self.inputs.len()));

        self.inputs.iter().cloned().zip(means.iter().copied()).collect()
    }

    /// Turn raw input values into a full design row
    ///
    /// `values` must follow the order of [`DesignMatrix::inputs`]. The
    /// polynomial expansion is applied when present and the intercept is
    /// prepended.
    pub fn feature_row(&self, values: &[f64]) -> DesignResult<Array1<f64>> {
        if values.len() != self.inputs.len() {
            return Err(DesignError::FeatureCount {
                expected: self.inputs.len(),
                actual: values.len(),
            });
        }

        let raw = ArrayView1::from(values);
        let terms = match &self.expansion {
            Some(poly) => poly.transform_row(raw),
            None => raw.to_owned(),
        };

        let mut row = Array1::ones(terms.len() + 1);
        row.slice_mut(ndarray::s![1..]).assign(&terms);
        Ok(row)
    }
}

/// Build the design matrix for a selection
pub fn build<S: AsRef<str>>(
    table: &DataFrame,
    dependent: &str,
    independents: &[S],
    kind: ModelKind,
) -> DesignResult<DesignMatrix> {
    kind.validate()?;
    let independents: Vec<&str> = independents.iter().map(AsRef::as_ref).collect();
    check_selection(dependent, &independents)?;

    // 1. Select
    let mut predictors = table.select(&independents)?;

    // 2. Month becomes its month number
    if let Some(month) = predictors.get_column(MONTH_COLUMN) {
        let months = encoding::month_numbers(month);
        predictors.replace_column(MONTH_COLUMN, Series::Float(months))?;
    }

    // 3. Numeric predictors first, then indicator columns
    let mut encoded: Vec<(String, FloatArray)> = Vec::new();
    let mut indicators: Vec<(String, FloatArray)> = Vec::new();
    for (name, series) in predictors.columns.iter() {
        if series.is_numeric() {
            encoded.push((name.to_string(), series.to_float()?));
        } else {
            indicators.extend(encoding::one_hot(name, series));
        }
    }
    encoded.extend(indicators);

    if encoded.is_empty() {
        return Err(DesignError::NoPredictors);
    }

    // 4. Target
    let target = table.column(dependent)?;
    if target.column_type().is_temporal() {
        return Err(DesignError::NonNumericTarget {
            column: dependent.to_string(),
            dtype: target.dtype(),
        });
    }
    let target = target.coerce_numeric();
    if kind == ModelKind::Logistic {
        check_binary(dependent, &target)?;
    }

    // 5. Complete rows only
    let mask: Vec<bool> = (0..table.nrows())
        .map(|i| !target[i].is_nan() && encoded.iter().all(|(_, col)| !col[i].is_nan()))
        .collect();
    let kept: Vec<usize> = mask
        .iter()
        .enumerate()
        .filter(|(_, keep)| **keep)
        .map(|(i, _)| i)
        .collect();
    let dropped = table.nrows() - kept.len();

    if kept.is_empty() {
        return Err(DesignError::EmptyDataset { dropped });
    }
    if dropped > 0 {
        tracing::debug!(dropped, kept = kept.len(), "dropped rows with missing values");
    }

    let inputs: Vec<String> = encoded.iter().map(|(name, _)| name.clone()).collect();
    let input_matrix = Matrix::from_shape_fn((kept.len(), encoded.len()), |(i, j)| {
        encoded[j].1[kept[i]]
    });
    let y: FloatArray = kept.iter().map(|&i| target[i]).collect();

    // 6. Model-specific transform
    let (terms, term_names, expansion) = match kind {
        ModelKind::MultipleLinear | ModelKind::Logistic => {
            (input_matrix.clone(), inputs.clone(), None)
        }
        ModelKind::Polynomial { degree } => {
            let poly = PolynomialFeatures::new(&inputs, degree);
            (poly.transform(&input_matrix), poly.feature_names(), Some(poly))
        }
    };

    let x = with_intercept(&terms);
    let mut columns = Vec::with_capacity(term_names.len() + 1);
    columns.push(INTERCEPT.to_string());
    columns.extend(term_names);

    tracing::debug!(
        kind = %kind,
        rows = x.nrows(),
        columns = x.ncols(),
        "built design matrix"
    );

    Ok(DesignMatrix {
        kind,
        dependent: dependent.to_string(),
        columns,
        x,
        y,
        inputs,
        input_matrix,
        expansion,
    })
}

fn check_selection(dependent: &str, independents: &[&str]) -> DesignResult<()> {
    if independents.is_empty() {
        return Err(DesignError::NoPredictors);
    }

    if independents.contains(&dependent) {
        return Err(DesignError::invalid_selection(format!(
            "'{}' cannot be both the dependent and an independent variable",
            dependent
        )));
    }

    for (i, name) in independents.iter().enumerate() {
        if independents[..i].contains(name) {
            return Err(DesignError::invalid_selection(format!(
                "independent variable '{}' is selected more than once",
                name
            )));
        }
    }

    Ok(())
}

/// Reject targets with values outside {0, 1}
fn check_binary(column: &str, target: &FloatArray) -> DesignResult<()> {
    let mut values: Vec<f64> = target.iter().copied().filter(|v| !v.is_nan()).collect();
    values.sort_by(f64::total_cmp);
    values.dedup();

    let binary = !values.is_empty() && values.iter().all(|&v| v == 0.0 || v == 1.0);
    if binary {
        Ok(())
    } else {
        values.truncate(10);
        Err(DesignError::NonBinaryTarget {
            column: column.to_string(),
            values,
        })
    }
}

fn with_intercept(terms: &Matrix) -> Matrix {
    let mut x = Matrix::ones((terms.nrows(), terms.ncols() + 1));
    x.slice_mut(ndarray::s![.., 1..]).assign(terms);
    x
}
