//! Variance inflation factors
//!
//! Each design column, the intercept included, is regressed on all the
//! others. No intercept is added to these auxiliary regressions; R² is
//! centered only when the remaining columns already contain a constant.

use ndarray::{Array1, Axis};
use serde::{Deserialize, Serialize};

use rd_core::data::Matrix;

use crate::linalg;

/// Outcome of one auxiliary regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VifOutcome {
    /// `vif = 1 / (1 - R²)`, `tolerance = 1 / vif`
    Computed { vif: f64, tolerance: f64 },
    /// The auxiliary regression could not be solved
    Failed { reason: String },
}

/// VIF of one design column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VifEntry {
    pub variable: String,
    pub outcome: VifOutcome,
}

impl VifEntry {
    /// The factor, when it could be computed
    pub fn vif(&self) -> Option<f64> {
        match self.outcome {
            VifOutcome::Computed { vif, .. } => Some(vif),
            VifOutcome::Failed { .. } => None,
        }
    }
}

/// A non-zero column with a single repeated value
fn is_constant(column: ndarray::ArrayView1<f64>) -> bool {
    match column.first() {
        Some(&first) => first != 0.0 && column.iter().all(|&v| v == first),
        None => false,
    }
}

fn column_vif(target: &Array1<f64>, others: &Matrix, tolerance: f64) -> Result<f64, String> {
    let solution =
        linalg::least_squares(others, target, tolerance).map_err(|e| e.to_string())?;

    let fitted = others.dot(&solution.coefficients);
    let rss: f64 = target
        .iter()
        .zip(fitted.iter())
        .map(|(t, f)| (t - f).powi(2))
        .sum();

    let centered = others.columns().into_iter().any(is_constant);
    let tss: f64 = if centered {
        let mean = target.mean().unwrap_or(0.0);
        target.iter().map(|t| (t - mean).powi(2)).sum()
    } else {
        target.iter().map(|t| t * t).sum()
    };

    // Exact linear dependence
    if tss <= 0.0 || rss <= 1e-12 * tss {
        return Ok(f64::INFINITY);
    }

    let r_squared = 1.0 - rss / tss;
    Ok(1.0 / (1.0 - r_squared))
}

/// VIF for every column of `x`
///
/// A column whose auxiliary regression fails gets a [`VifOutcome::Failed`]
/// entry; the remaining columns are still computed.
pub fn vif(x: &Matrix, names: &[String], tolerance: f64) -> Vec<VifEntry> {
    let p = x.ncols();

    (0..p)
        .map(|j| {
            let variable = names.get(j).cloned().unwrap_or_else(|| format!("x{}", j));

            let outcome = if p < 2 {
                VifOutcome::Failed {
                    reason: "no other columns to regress on".to_string(),
                }
            } else {
                let keep: Vec<usize> = (0..p).filter(|&k| k != j).collect();
                let others = x.select(Axis(1), &keep);
                let target = x.column(j).to_owned();

                match column_vif(&target, &others, tolerance) {
                    Ok(vif) => VifOutcome::Computed {
                        vif,
                        tolerance: 1.0 / vif,
                    },
                    Err(reason) => {
                        tracing::warn!(variable = %variable, %reason, "VIF regression failed");
                        VifOutcome::Failed { reason }
                    }
                }
            };

            VifEntry { variable, outcome }
        })
        .collect()
}
