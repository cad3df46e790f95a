//! Goodness-of-fit metrics
//!
//! RMSE for least-squares models; accuracy and the ROC curve for logistic
//! models. The free functions work on plain slices so they can score any
//! pair of target and prediction vectors.

use serde::{Deserialize, Serialize};

use rd_core::design::{DesignMatrix, ModelKind};

use crate::base::{FittedModel, ModelError, Result};


/// Probability above which a logistic prediction counts as class 1
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Root Mean Squared Error
///
/// `NaN` when the inputs are empty or differ in length.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    (sum / actual.len() as f64).sqrt()
}

/// Share of observations whose thresholded probability matches the label
///
/// A probability strictly above `threshold` predicts class 1.
pub fn accuracy(actual: &[f64], probabilities: &[f64], threshold: f64) -> f64 {
    if actual.len() != probabilities.len() || actual.is_empty() {
        return f64::NAN;
    }

    let correct = actual
        .iter()
        .zip(probabilities.iter())
        .filter(|&(&a, &p)| {
            let predicted = if p > threshold { 1.0 } else { 0.0 };
            predicted == a
        })
        .count();

    correct as f64 / actual.len() as f64
}

/// Receiver operating characteristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    /// False positive rates, non-decreasing from 0 to 1
    pub fpr: Vec<f64>,
    /// True positive rates, non-decreasing from 0 to 1
    pub tpr: Vec<f64>,
    /// Decreasing score thresholds; the first is `+inf`
    pub thresholds: Vec<f64>,
}

impl RocCurve {
    /// Area under the curve
    pub fn auc(&self) -> f64 {
        auc(&self.fpr, &self.tpr)
    }
}

/// ROC curve of binary labels against scores
///
/// Tied scores form a single point and points lying on a straight segment
/// between their neighbours are dropped.
pub fn roc_curve(actual: &[f64], scores: &[f64]) -> Result<RocCurve> {
    if actual.len() != scores.len() {
        return Err(ModelError::Data(rd_core::data::DataError::DimensionMismatch {
            expected: format!("{} scores", actual.len()),
            actual: format!("{} scores", scores.len()),
        }));
    }

    let positives = actual.iter().filter(|&&a| a == 1.0).count();
    if positives == 0 || positives == actual.len() {
        return Err(ModelError::Unsupported {
            operation: "ROC curve with a single class",
            kind: ModelKind::Logistic,
        });
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    // Cumulative counts at the last index of each distinct score
    let mut tps = Vec::new();
    let mut fps = Vec::new();
    let mut thresholds = Vec::new();
    let mut true_positives = 0.0;
    for (rank, &i) in order.iter().enumerate() {
        true_positives += actual[i];
        let last_of_run = order
            .get(rank + 1)
            .map_or(true, |&next| scores[next] != scores[i]);
        if last_of_run {
            tps.push(true_positives);
            fps.push((rank + 1) as f64 - true_positives);
            thresholds.push(scores[i]);
        }
    }

    // Drop collinear intermediate points
    if tps.len() > 2 {
        let keep: Vec<bool> = (0..tps.len())
            .map(|k| {
                if k == 0 || k == tps.len() - 1 {
                    return true;
                }
                let second_diff = |v: &[f64]| v[k + 1] - 2.0 * v[k] + v[k - 1];
                second_diff(&fps) != 0.0 || second_diff(&tps) != 0.0
            })
            .collect();

        let retain = |v: Vec<f64>| -> Vec<f64> {
            v.into_iter()
                .zip(keep.iter())
                .filter(|&(_, &k)| k)
                .map(|(x, _)| x)
                .collect()
        };
        tps = retain(tps);
        fps = retain(fps);
        thresholds = retain(thresholds);
    }

    tps.insert(0, 0.0);
    fps.insert(0, 0.0);
    thresholds.insert(0, f64::INFINITY);

    let total_fp = fps[fps.len() - 1];
    let total_tp = tps[tps.len() - 1];

    Ok(RocCurve {
        fpr: fps.iter().map(|f| f / total_fp).collect(),
        tpr: tps.iter().map(|t| t / total_tp).collect(),
        thresholds,
    })
}

/// Area under a curve by the trapezoidal rule
pub fn auc(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[1] + ys[0]) / 2.0)
        .sum()
}

/// Metrics appropriate to the fitted model's kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitMetrics {
    /// In-sample RMSE (least squares)
    pub rmse: Option<f64>,
    /// In-sample accuracy at [`DEFAULT_THRESHOLD`] (logistic)
    pub accuracy: Option<f64>,
    /// In-sample ROC curve (logistic)
    pub roc: Option<RocCurve>,
    /// Area under the ROC curve (logistic)
    pub auc: Option<f64>,
}

impl FitMetrics {
    /// Score a model on the design it was fitted to
    pub fn compute(design: &DesignMatrix, model: &dyn FittedModel) -> Result<Self> {
        let fitted = model.fitted_values().ok_or(ModelError::NotFitted)?.to_vec();
        let actual = design.y.to_vec();

        if model.kind().is_least_squares() {
            return Ok(Self {
                rmse: Some(rmse(&actual, &fitted)),
                ..Self::default()
            });
        }

        let roc = roc_curve(&actual, &fitted)?;
        Ok(Self {
            accuracy: Some(accuracy(&actual, &fitted, DEFAULT_THRESHOLD)),
            auc: Some(roc.auc()),
            roc: Some(roc),
            ..Self::default()
        })
    }
}
