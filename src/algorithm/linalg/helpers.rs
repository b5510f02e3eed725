//! Helper functions for the decompositions
//!
//! Validation utilities and conversions between matrices and the row arrays
//! the algorithms work on in place.

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::matrix::{DenseMatrix, RealMatrix};

/// Validate matrix is square, returning its order
pub fn validate_square_matrix<T: Element>(matrix: &DenseMatrix<T>) -> Result<usize> {
    if !matrix.is_square() {
        return Err(Error::NonSquare {
            rows: matrix.rows(),
            cols: matrix.cols(),
        });
    }
    Ok(matrix.rows())
}

/// Validate matrix is symmetric within a relative tolerance
pub fn validate_symmetric_matrix(matrix: &RealMatrix, relative_tolerance: f64) -> Result<()> {
    validate_square_matrix(matrix)?;
    match matrix.first_asymmetry(relative_tolerance) {
        Some((row, col)) => Err(Error::NotSymmetric {
            row,
            col,
            threshold: relative_tolerance,
        }),
        None => Ok(()),
    }
}

/// Matrix built from row arrays of a known, non-empty, rectangular shape
pub(crate) fn matrix_from_rows<T: Element>(data: &[Vec<T>]) -> DenseMatrix<T> {
    let cols = data.first().map_or(0, Vec::len);
    DenseMatrix::filled_with(data.len(), cols, |r, c| data[r][c].clone())
}

/// Signed norm of a Householder reflector's target vector
///
/// The sign is chosen opposite to the leading entry so `lead - result` never
/// cancels.
pub(crate) fn reflector_norm(norm_sqr: f64, lead: f64) -> f64 {
    if lead > 0.0 {
        -norm_sqr.sqrt()
    } else {
        norm_sqr.sqrt()
    }
}

/// `rows × cols` matrix with `diagonal` on the main diagonal and zeros elsewhere
pub(crate) fn rectangular_diagonal(rows: usize, cols: usize, diagonal: &[f64]) -> RealMatrix {
    DenseMatrix::filled_with(rows, cols, |r, c| {
        if r == c && r < diagonal.len() {
            diagonal[r]
        } else {
            0.0
        }
    })
}
