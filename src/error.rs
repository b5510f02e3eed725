//! Error types for dense-linalg

use std::fmt;
use thiserror::Error;

/// Result type alias using dense-linalg's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Which index of a matrix an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row index
    Row,
    /// Column index
    Column,
    /// Vector entry index
    Entry,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
            Axis::Entry => f.write_str("entry"),
        }
    }
}

/// Errors that can occur in dense-linalg operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Operand shapes are incompatible
    #[error("Dimension mismatch: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        /// Shape the operation required
        expected: Vec<usize>,
        /// Shape that was supplied
        got: Vec<usize>,
    },

    /// Row, column or entry index outside the valid range
    #[error("{axis} index {index} out of range [{min}, {max}]")]
    IndexOutOfRange {
        /// Which index is invalid
        axis: Axis,
        /// The offending index
        index: usize,
        /// Smallest valid index
        min: usize,
        /// Largest valid index
        max: usize,
    },

    /// Range whose end precedes its start
    #[error("Invalid {axis} range: end {end} is before start {start}")]
    InvalidRange {
        /// Which axis the range applies to
        axis: Axis,
        /// Range start (inclusive)
        start: usize,
        /// Range end (inclusive)
        end: usize,
    },

    /// Construction input with no data
    #[error("Empty input: {what}")]
    EmptyInput {
        /// What was empty
        what: &'static str,
    },

    /// Row arrays of unequal length
    #[error("Ragged input: row {row} has {got} entries, expected {expected}")]
    RaggedRows {
        /// Index of the first offending row
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        got: usize,
    },

    /// Square matrix required
    #[error("Matrix must be square, got {rows}x{cols}")]
    NonSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// Symmetric matrix required
    #[error("Matrix is not symmetric: entries ({row}, {col}) and ({col}, {row}) differ beyond {threshold:e}")]
    NotSymmetric {
        /// Row of the first asymmetric pair
        row: usize,
        /// Column of the first asymmetric pair
        col: usize,
        /// Relative tolerance in effect
        threshold: f64,
    },

    /// Symmetric positive definite matrix required
    #[error("Matrix is not positive definite: pivot {index} is {value:e} (threshold {threshold:e})")]
    NotPositiveDefinite {
        /// Diagonal index where elimination failed
        index: usize,
        /// Pivot value reached at that index
        value: f64,
        /// Absolute positivity threshold in effect
        threshold: f64,
    },

    /// Matrix is singular or rank deficient
    #[error("Matrix is singular")]
    Singular,

    /// Operation needs a vector with non-zero norm
    #[error("Vector has zero norm")]
    ZeroNorm,

    /// Iterative algorithm exhausted its budget
    #[error("Failed to converge after {iterations} iterations")]
    NotConvergent {
        /// Iterations performed
        iterations: usize,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

impl Error {
    /// Create a dimension mismatch error from two shapes
    pub fn dimension_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::DimensionMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an index error for an index that must lie in `0..len`
    pub fn index_out_of_range(axis: Axis, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            axis,
            index,
            min: 0,
            max: len.saturating_sub(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_offending_values() {
        let err = Error::index_out_of_range(Axis::Row, 7, 3);
        assert_eq!(err.to_string(), "row index 7 out of range [0, 2]");

        let err = Error::dimension_mismatch(&[2, 3], &[4, 3]);
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected [2, 3], got [4, 3]"
        );
    }
}
