//! Polynomial feature expansion
//!
//! Expands `k` input columns into every monomial of total degree
//! `1..=degree`. Terms are ordered by degree, and within a degree as
//! combinations-with-replacement of the input indices in lexicographic
//! order, so `[a, b]` at degree 2 becomes `a, b, a^2, a b, b^2`. No bias
//! column is produced; the intercept is added by the builder.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::data::Matrix;

/// A fitted polynomial expansion over a fixed set of named inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialFeatures {
    degree: u32,
    input_names: Vec<String>,
    /// One exponent vector per output term
    powers: Vec<Vec<u32>>,
}

impl PolynomialFeatures {
    /// Build the expansion for the given inputs
    pub fn new<S: AsRef<str>>(input_names: &[S], degree: u32) -> Self {
        let k = input_names.len();
        let mut powers = Vec::new();

        for d in 1..=degree as usize {
            let mut combo = Vec::with_capacity(d);
            combinations_with_replacement(k, d, 0, &mut combo, &mut |indices: &[usize]| {
                let mut exponents = vec![0u32; k];
                for &i in indices {
                    exponents[i] += 1;
                }
                powers.push(exponents);
            });
        }

        Self {
            degree,
            input_names: input_names.iter().map(|s| s.as_ref().to_string()).collect(),
            powers,
        }
    }

    /// Maximum total degree
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Number of output terms
    pub fn n_outputs(&self) -> usize {
        self.powers.len()
    }

    /// Output term names, e.g. `Price`, `Price^2`, `Price Month`
    pub fn feature_names(&self) -> Vec<String> {
        self.powers
            .iter()
            .map(|exponents| {
                exponents
                    .iter()
                    .zip(&self.input_names)
                    .filter(|(e, _)| **e > 0)
                    .map(|(&e, name)| {
                        if e == 1 {
                            name.clone()
                        } else {
                            format!("{}^{}", name, e)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// Expand a single row of inputs
    pub fn transform_row(&self, row: ArrayView1<f64>) -> Array1<f64> {
        self.powers
            .iter()
            .map(|exponents| {
                exponents
                    .iter()
                    .zip(row.iter())
                    .filter(|(e, _)| **e > 0)
                    .map(|(&e, &v)| v.powi(e as i32))
                    .product::<f64>()
            })
            .collect()
    }

    /// Expand every row of an input matrix
    pub fn transform(&self, inputs: &Matrix) -> Matrix {
        let mut out = Matrix::zeros((inputs.nrows(), self.n_outputs()));
        for (i, row) in inputs.rows().into_iter().enumerate() {
            out.row_mut(i).assign(&self.transform_row(row));
        }
        out
    }
}

fn combinations_with_replacement(
    n: usize,
    len: usize,
    start: usize,
    current: &mut Vec<usize>,
    emit: &mut dyn FnMut(&[usize]),
) {
    if current.len() == len {
        emit(current.as_slice());
        return;
    }

    for i in start..n {
        current.push(i);
        combinations_with_replacement(n, len, i, current, emit);
        current.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_single_input_degree_two() {
        let poly = PolynomialFeatures::new(&["x"], 2);
        assert_eq!(poly.feature_names(), vec!["x", "x^2"]);
    }

    #[test]
    fn test_two_inputs_degree_two_ordering() {
        let poly = PolynomialFeatures::new(&["a", "b"], 2);
        assert_eq!(poly.feature_names(), vec!["a", "b", "a^2", "a b", "b^2"]);

        let out = poly.transform(&array![[2.0, 3.0]]);
        assert_eq!(out, array![[2.0, 3.0, 4.0, 6.0, 9.0]]);
    }

    #[test]
    fn test_term_counts() {
        // C(k + d, d) - 1 terms without the bias
        assert_eq!(PolynomialFeatures::new(&["a", "b", "c"], 3).n_outputs(), 19);
        assert_eq!(PolynomialFeatures::new(&["a"], 5).n_outputs(), 5);
    }

    #[test]
    fn test_cubic_names() {
        let poly = PolynomialFeatures::new(&["a", "b"], 3);
        let names = poly.feature_names();
        assert_eq!(&names[5..], &["a^3", "a^2 b", "a b^2", "b^3"]);
    }
}
