//! Shared solver contract
//!
//! Every decomposition hands out a solver: a borrowed view that answers
//! whether the factored matrix is invertible and solves `A x = b` through the
//! cached factors. Solvers hold no state of their own.

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::matrix::DenseMatrix;
use crate::vector::DenseVector;

/// Solve linear systems through a computed decomposition
pub trait DecompositionSolver<T: Element = f64> {
    /// Rows of the factored matrix; right-hand sides must match it
    fn rows(&self) -> usize;

    /// Columns of the factored matrix; solutions have this length
    fn cols(&self) -> usize;

    /// Whether the decomposition judged the matrix invertible (full rank for
    /// rectangular matrices)
    fn is_non_singular(&self) -> bool;

    /// Solve for a single right-hand side
    ///
    /// Rectangular solvers return the least-squares solution when there are
    /// more rows than columns.
    fn solve(&self, b: &[T]) -> Result<Vec<T>>;

    /// Solve for a right-hand side vector
    fn solve_vector(&self, b: &DenseVector<T>) -> Result<DenseVector<T>> {
        self.solve(b.as_slice()).map(DenseVector::from_vec)
    }

    /// Solve for every column of `b`
    fn solve_matrix(&self, b: &DenseMatrix<T>) -> Result<DenseMatrix<T>> {
        if b.rows() != self.rows() {
            return Err(Error::dimension_mismatch(
                &[self.rows(), b.cols()],
                &b.shape(),
            ));
        }
        let mut out = DenseMatrix::zeros(self.cols(), b.cols())?;
        for col in 0..b.cols() {
            out.set_column(col, &self.solve(&b.column(col)?)?)?;
        }
        Ok(out)
    }

    /// Inverse (or least-squares left inverse) of the factored matrix
    fn inverse(&self) -> Result<DenseMatrix<T>> {
        self.solve_matrix(&DenseMatrix::identity_of_order(self.rows()))
    }
}

/// Common precondition checks for `solve`
pub(crate) fn check_solvable(rows: usize, non_singular: bool, b_len: usize) -> Result<()> {
    if b_len != rows {
        return Err(Error::dimension_mismatch(&[rows], &[b_len]));
    }
    if !non_singular {
        return Err(Error::Singular);
    }
    Ok(())
}
