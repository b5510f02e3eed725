//! Cholesky decomposition of symmetric positive definite matrices
//!
//! Computes `A = L · Lᵀ` with L lower triangular and a strictly positive
//! diagonal. The elimination works in place on the upper triangle, which ends
//! up holding Lᵀ.

use super::helpers::{matrix_from_rows, validate_square_matrix};
use super::options::CholeskyOptions;
use super::solver::{DecompositionSolver, check_solvable};
use crate::error::{Error, Result};
use crate::matrix::RealMatrix;
use tracing::debug;

/// Cholesky decomposition `A = L · Lᵀ`
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition {
    lt_data: Vec<Vec<f64>>,
    l: RealMatrix,
    lt: RealMatrix,
    determinant: f64,
}

impl CholeskyDecomposition {
    /// Decompose with default thresholds
    pub fn new(matrix: &RealMatrix) -> Result<Self> {
        Self::with_options(matrix, CholeskyOptions::default())
    }

    /// Decompose with custom symmetry and positivity thresholds
    ///
    /// # Errors
    ///
    /// - [`Error::NonSquare`] for rectangular input
    /// - [`Error::NotSymmetric`] when a pair `(a_ij, a_ji)` differs by more than
    ///   `relative_symmetry_threshold` relative to the larger magnitude
    /// - [`Error::NotPositiveDefinite`] when a diagonal pivot is not strictly
    ///   greater than `absolute_positivity_threshold`
    pub fn with_options(matrix: &RealMatrix, options: CholeskyOptions) -> Result<Self> {
        let n = validate_square_matrix(matrix)?;
        let mut lt = matrix.to_rows();

        for i in 0..n {
            for j in i + 1..n {
                let a_ij = lt[i][j];
                let a_ji = lt[j][i];
                let max_delta = options.relative_symmetry_threshold * a_ij.abs().max(a_ji.abs());
                if (a_ij - a_ji).abs() > max_delta {
                    return Err(Error::NotSymmetric {
                        row: i,
                        col: j,
                        threshold: options.relative_symmetry_threshold,
                    });
                }
                lt[j][i] = 0.0;
            }
        }

        for i in 0..n {
            let pivot = lt[i][i];
            if !pivot.is_finite() || pivot <= options.absolute_positivity_threshold {
                return Err(Error::NotPositiveDefinite {
                    index: i,
                    value: pivot,
                    threshold: options.absolute_positivity_threshold,
                });
            }

            lt[i][i] = pivot.sqrt();
            let inverse = 1.0 / lt[i][i];

            for q in (i + 1..n).rev() {
                lt[i][q] *= inverse;
                let factor = lt[i][q];
                for p in q..n {
                    let lt_ip = lt[i][p];
                    lt[q][p] -= factor * lt_ip;
                }
            }
        }

        let diagonal_product: f64 = (0..n).map(|i| lt[i][i]).product();
        let determinant = diagonal_product * diagonal_product;
        let lt_matrix = matrix_from_rows(&lt);
        let l = lt_matrix.transpose();

        debug!(n, determinant, "Cholesky decomposition computed");

        Ok(Self {
            lt_data: lt,
            l,
            lt: lt_matrix,
            determinant,
        })
    }

    /// Lower triangular factor L
    pub fn l(&self) -> &RealMatrix {
        &self.l
    }

    /// Upper triangular factor Lᵀ
    pub fn lt(&self) -> &RealMatrix {
        &self.lt
    }

    /// Determinant, the squared product of the diagonal of L
    pub fn determinant(&self) -> f64 {
        self.determinant
    }

    /// Solver bound to this decomposition
    pub fn solver(&self) -> CholeskySolver<'_> {
        CholeskySolver { decomposition: self }
    }
}

/// Triangular solves through a [`CholeskyDecomposition`]
#[derive(Debug, Clone, Copy)]
pub struct CholeskySolver<'a> {
    decomposition: &'a CholeskyDecomposition,
}

impl DecompositionSolver for CholeskySolver<'_> {
    fn rows(&self) -> usize {
        self.decomposition.lt_data.len()
    }

    fn cols(&self) -> usize {
        self.decomposition.lt_data.len()
    }

    fn is_non_singular(&self) -> bool {
        // positive definiteness was established at construction
        true
    }

    fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        let lt = &self.decomposition.lt_data;
        let n = lt.len();
        check_solvable(n, true, b.len())?;

        let mut x = b.to_vec();

        // L y = b
        for j in 0..n {
            x[j] /= lt[j][j];
            let x_j = x[j];
            for i in j + 1..n {
                x[i] -= x_j * lt[j][i];
            }
        }

        // Lᵀ x = y
        for j in (0..n).rev() {
            x[j] /= lt[j][j];
            let x_j = x[j];
            for i in 0..j {
                x[i] -= x_j * lt[i][j];
            }
        }

        Ok(x)
    }
}
