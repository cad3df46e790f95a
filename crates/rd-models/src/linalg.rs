//! Dense linear algebra on ndarray containers
//!
//! Models keep their data in `ndarray`; decompositions go through
//! `nalgebra`. Least squares uses an SVD of the column-equilibrated design
//! so that rank decisions are not dominated by column scale (polynomial
//! terms span many orders of magnitude).

use nalgebra::{DMatrix, DVector};
use ndarray::Array1;

use rd_core::data::Matrix;

use crate::base::{ModelError, Result};

/// Copy an ndarray matrix into nalgebra storage
pub(crate) fn to_dmatrix(x: &Matrix) -> DMatrix<f64> {
    DMatrix::from_fn(x.nrows(), x.ncols(), |i, j| x[(i, j)])
}

/// Copy an nalgebra matrix back into ndarray storage
pub(crate) fn from_dmatrix(m: &DMatrix<f64>) -> Matrix {
    Matrix::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Solution of a full-rank least-squares problem
#[derive(Debug, Clone)]
pub(crate) struct LeastSquares {
    /// Minimizer of `||y - X b||`
    pub coefficients: Array1<f64>,
    /// `(X'X)^-1`
    pub xtx_inv: Matrix,
}

/// Solve `min ||y - X b||` by SVD, rejecting rank-deficient designs
///
/// A column is dependent when its singular value falls below
/// `tolerance * max_singular_value` after scaling every column to unit norm.
pub(crate) fn least_squares(x: &Matrix, y: &Array1<f64>, tolerance: f64) -> Result<LeastSquares> {
    let p = x.ncols();
    if p == 0 || x.nrows() < p {
        return Err(ModelError::SingularMatrix);
    }

    let norms: Vec<f64> = x
        .columns()
        .into_iter()
        .map(|c| c.dot(&c).sqrt())
        .collect();
    if norms.iter().any(|&n| n == 0.0 || !n.is_finite()) {
        return Err(ModelError::SingularMatrix);
    }

    let scaled = DMatrix::from_fn(x.nrows(), p, |i, j| x[(i, j)] / norms[j]);
    let svd = scaled.svd(true, true);

    let s = &svd.singular_values;
    let s_max = s.iter().fold(0.0_f64, |acc, &v| acc.max(v));
    let rank = s.iter().filter(|&&v| v > tolerance * s_max).count();
    if rank < p {
        return Err(ModelError::SingularMatrix);
    }

    let u = svd
        .u
        .as_ref()
        .ok_or_else(|| ModelError::numerical("left singular vectors missing", "least_squares"))?;
    let v_t = svd
        .v_t
        .as_ref()
        .ok_or_else(|| ModelError::numerical("right singular vectors missing", "least_squares"))?;

    let y_vec = DVector::from_iterator(y.len(), y.iter().copied());
    let uty = u.transpose() * y_vec;

    // b_scaled = V S^-1 U'y, then undo the column scaling
    let coefficients: Array1<f64> = (0..p)
        .map(|j| {
            let b: f64 = (0..s.len()).map(|k| v_t[(k, j)] * uty[k] / s[k]).sum();
            b / norms[j]
        })
        .collect();

    // (X'X)^-1 = D^-1 V S^-2 V' D^-1
    let xtx_inv = Matrix::from_shape_fn((p, p), |(i, j)| {
        let v: f64 = (0..s.len())
            .map(|k| v_t[(k, i)] * v_t[(k, j)] / (s[k] * s[k]))
            .sum();
        v / (norms[i] * norms[j])
    });

    if coefficients.iter().any(|b| !b.is_finite()) {
        return Err(ModelError::numerical(
            "least-squares solution is not finite",
            "least_squares",
        ));
    }

    Ok(LeastSquares {
        coefficients,
        xtx_inv,
    })
}

/// Solve a symmetric positive-definite system and return `(solution, inverse)`
pub(crate) fn solve_spd(a: &Matrix, b: &Array1<f64>) -> Result<(Array1<f64>, Matrix)> {
    let chol = to_dmatrix(a).cholesky().ok_or(ModelError::SingularMatrix)?;

    let rhs = DVector::from_iterator(b.len(), b.iter().copied());
    let solution = chol.solve(&rhs);
    let inverse = chol.inverse();

    Ok((solution.iter().copied().collect(), from_dmatrix(&inverse)))
}

/// Quadratic form `x' A x`
pub(crate) fn quad_form(a: &Matrix, x: ndarray::ArrayView1<f64>) -> f64 {
    x.dot(&a.dot(&x))
}
