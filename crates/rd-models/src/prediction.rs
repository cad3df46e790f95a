//! Point predictions, intervals and the next-month forecast
//!
//! A prediction request names a value for every input column of the design.
//! Values are expanded the same way the design was (polynomial terms, then
//! the intercept) before the fitted model evaluates them.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use rd_core::design::{DesignMatrix, ModelKind, INTERCEPT};
use rd_core::io::MONTH_COLUMN;

use crate::base::{FittedModel, ModelError, Result};


/// Default confidence level for prediction intervals
pub const DEFAULT_LEVEL: f64 = 0.95;

/// Column holding the point prediction in the exported log
pub const PREDICTED_MEAN_COLUMN: &str = "Predicted_Mean";

// ==================== Intervals ====================

/// Closed interval `[lower, upper]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// `center ± half_width`
    pub fn around(center: f64, half_width: f64) -> Self {
        Self::new(center - half_width, center + half_width)
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.4}, {:.4}]", self.lower, self.upper)
    }
}

/// Point estimate with its intervals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted mean (a probability for logistic models)
    pub mean: f64,
    /// Standard error of the mean
    pub mean_se: f64,
    /// Confidence interval for the mean
    pub mean_ci: Interval,
    /// Prediction interval for a new observation (least squares only)
    pub obs_ci: Option<Interval>,
    /// Level both intervals were computed at
    pub confidence_level: f64,
}

impl PredictionResult {
    /// The widest interval available: the observation interval when the
    /// model has one, the mean interval otherwise
    pub fn interval(&self) -> Interval {
        self.obs_ci.unwrap_or(self.mean_ci)
    }
}

// ==================== Feature Vectors ====================

/// Named input values for one prediction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: IndexMap<String, f64>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a value, replacing any previous one
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Mean of every input column of the design
    pub fn from_means(design: &DesignMatrix) -> Self {
        design.input_means().into_iter().collect()
    }

    /// Values in the design's input order
    fn ordered(&self, design: &DesignMatrix) -> Result<Vec<f64>> {
        let values = design
            .inputs
            .iter()
            .map(|name| match self.get(name) {
                Some(value) if value.is_finite() => Ok(value),
                Some(value) => Err(ModelError::InvalidFeature {
                    name: name.clone(),
                    value,
                }),
                None => Err(ModelError::MissingFeature(name.clone())),
            })
            .collect::<Result<Vec<f64>>>()?;

        let extra = self
            .values
            .keys()
            .filter(|k| !design.inputs.contains(k))
            .count();
        if extra > 0 {
            tracing::debug!(extra, "ignoring features that are not design inputs");
        }

        Ok(values)
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// ==================== Prediction ====================

fn check_model(design: &DesignMatrix, model: &dyn FittedModel) -> Result<()> {
    if model.column_names() != design.columns.as_slice() {
        return Err(ModelError::InvalidConfig {
            message: format!(
                "model columns {:?} do not match design columns {:?}",
                model.column_names(),
                design.columns
            ),
        });
    }
    Ok(())
}

/// Predict one observation from named input values
pub fn predict(
    design: &DesignMatrix,
    model: &dyn FittedModel,
    features: &FeatureVector,
    level: f64,
) -> Result<PredictionResult> {
    check_model(design, model)?;

    let values = features.ordered(design)?;
    let row = design.feature_row(&values)?;
    model.predict_row(row.view(), level)
}

/// Outcome of a forecast request
#[derive(Debug, Clone, PartialEq)]
pub enum Forecast {
    /// Prediction for the month after the last observed one
    Predicted {
        month: f64,
        features: FeatureVector,
        prediction: PredictionResult,
    },
    /// `Month` is not among the inputs, so there is nothing to extrapolate
    NoMonthColumn,
}

/// Predict the month after the latest observed `Month`
///
/// Every other input is held at its mean.
pub fn forecast_next(
    design: &DesignMatrix,
    model: &dyn FittedModel,
    level: f64,
) -> Result<Forecast> {
    if model.kind() == ModelKind::Logistic {
        return Err(ModelError::Unsupported {
            operation: "forecast",
            kind: model.kind(),
        });
    }

    let Some(months) = design.input_column(MONTH_COLUMN) else {
        tracing::debug!("forecast skipped: Month is not an input");
        return Ok(Forecast::NoMonthColumn);
    };

    let last = months.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let month = last + 1.0;

    let mut features = FeatureVector::from_means(design);
    features.insert(MONTH_COLUMN, month);

    let prediction = predict(design, model, &features, level)?;
    tracing::debug!(month, mean = prediction.mean, "forecast next month");

    Ok(Forecast::Predicted {
        month,
        features,
        prediction,
    })
}

// ==================== Prediction Log ====================

/// One logged prediction request
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Input values in the design's input order
    pub inputs: Vec<f64>,
    pub predicted_mean: f64,
}

/// Accumulated prediction requests for export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionLog {
    inputs: Vec<String>,
    entries: Vec<LogEntry>,
}

impl PredictionLog {
    /// Empty log for a design's inputs
    pub fn new(design: &DesignMatrix) -> Self {
        Self {
            inputs: design.inputs.clone(),
            entries: Vec::new(),
        }
    }

    /// Append a request and its result
    pub fn record(&mut self, features: &FeatureVector, result: &PredictionResult) -> Result<()> {
        let inputs = self
            .inputs
            .iter()
            .map(|name| {
                features
                    .get(name)
                    .ok_or_else(|| ModelError::MissingFeature(name.clone()))
            })
            .collect::<Result<Vec<f64>>>()?;

        self.entries.push(LogEntry {
            inputs,
            predicted_mean: result.mean,
        });
        Ok(())
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// CSV with header `const,<inputs…>,Predicted_Mean`
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = Vec::with_capacity(self.inputs.len() + 2);
        header.push(INTERCEPT);
        header.extend(self.inputs.iter().map(String::as_str));
        header.push(PREDICTED_MEAN_COLUMN);
        writer.write_record(&header)?;

        for entry in &self.entries {
            let mut record = Vec::with_capacity(entry.inputs.len() + 2);
            record.push("1".to_string());
            record.extend(entry.inputs.iter().map(|v| v.to_string()));
            record.push(entry.predicted_mean.to_string());
            writer.write_record(&record)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ModelError::Csv(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ModelError::Csv(e.to_string()))
    }
}
