//! Matrix decompositions and the solvers built on them
//!
//! Every decomposition runs eagerly in its constructor, caches its factors as
//! owned matrices and hands them out by reference. Each one exposes a
//! `solver()` borrowing it and implementing [`DecompositionSolver`].
//!
//! # Module Structure
//!
//! - `lu`: LU with partial pivoting, real and exact-field
//! - `cholesky`: `L · Lᵀ` for symmetric positive definite matrices
//! - `qr`: Householder QR with least-squares solving
//! - `bidiagonal`, `tridiagonal`: orthogonal reductions feeding SVD and eigen
//! - `eigen`: symmetric eigen-decomposition by implicit QL
//! - `svd`: singular value decomposition by Golub-Kahan sweeps
//! - `options`: numerical thresholds and iteration budgets
//! - `helpers`: validation utilities
//!
//! # Example
//!
//! ```
//! use dense_linalg::prelude::*;
//!
//! # fn main() -> dense_linalg::error::Result<()> {
//! let a = RealMatrix::from_rows(vec![vec![4.0, 2.0], vec![2.0, 3.0]])?;
//! let chol = CholeskyDecomposition::new(&a)?;
//! let x = chol.solver().solve(&[6.0, 5.0])?;
//! assert!((x[0] - 1.0).abs() < 1e-12 && (x[1] - 1.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

pub mod bidiagonal;
pub mod cholesky;
pub mod eigen;
pub mod helpers;
pub mod lu;
pub mod options;
pub mod qr;
pub mod solver;
pub mod svd;
pub mod tridiagonal;

pub use bidiagonal::BidiagonalTransformer;
pub use cholesky::{CholeskyDecomposition, CholeskySolver};
pub use eigen::{EigenDecomposition, EigenSolver};
pub use helpers::{validate_square_matrix, validate_symmetric_matrix};
pub use lu::{
    FieldLuDecomposition, FirstNonZeroPivot, LuDecomposition, LuSolver, MagnitudePivot,
    PivotPolicy,
};
pub use options::{
    CholeskyOptions, DEFAULT_SINGULARITY_THRESHOLD, EigenOptions, LuOptions, QrOptions, SvdOptions,
};
pub use qr::{QrDecomposition, QrSolver};
pub use solver::DecompositionSolver;
pub use svd::{SingularValueDecomposition, SvdSolver};
pub use tridiagonal::TridiagonalTransformer;
