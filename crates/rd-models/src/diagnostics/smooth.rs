//! LOWESS trend line for the residuals-versus-fitted panel

use ::lowess::prelude::*;
use serde::{Deserialize, Serialize};

use crate::base::Result;

/// Smoothed curve, sorted by `x`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LowessCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Smooth `y` against `x`
///
/// `frac` is the share of points in each neighbourhood and `iterations` the
/// number of robustifying passes after the initial fit. Every point is
/// evaluated directly, no interpolation between anchors.
pub fn lowess_curve(x: &[f64], y: &[f64], frac: f64, iterations: usize) -> Result<LowessCurve> {
    let result = Lowess::new()
        .fraction(frac)
        .iterations(iterations)
        .delta(0.0)
        .weight_function(Tricube)
        .robustness_method(Bisquare)
        .adapter(Batch)
        .build()?
        .fit(x, y)?;

    Ok(LowessCurve {
        x: result.x,
        y: result.y,
    })
}
