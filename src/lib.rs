//! # dense-linalg
//!
//! **Dense matrices, vectors and the classical decompositions, in pure Rust.**
//!
//! dense-linalg provides a dense matrix type with a cache-blocked layout for
//! large sizes, and the textbook factorizations built on it, each paired with
//! a solver for `A x = b`.
//!
//! ## Features
//!
//! - **Containers**: [`DenseMatrix`](matrix::DenseMatrix) and
//!   [`DenseVector`](vector::DenseVector), generic over any field element
//! - **Decompositions**: LU (floating point and exact), Cholesky, Householder
//!   QR, bidiagonal and tridiagonal reduction, symmetric eigen, SVD
//! - **Solvers**: one [`DecompositionSolver`](algorithm::linalg::DecompositionSolver)
//!   contract for square, least-squares and pseudo-inverse solves
//! - **Traversal**: visitors in row, column or storage-optimal order
//!
//! ## Quick Start
//!
//! ```
//! use dense_linalg::prelude::*;
//!
//! # fn main() -> dense_linalg::error::Result<()> {
//! let a = RealMatrix::from_rows(vec![
//!     vec![1.0, 2.0, 3.0],
//!     vec![2.0, 5.0, 3.0],
//!     vec![1.0, 0.0, 8.0],
//! ])?;
//!
//! let lu = LuDecomposition::new(&a)?;
//! assert!((lu.determinant() + 1.0).abs() < 1e-12);
//!
//! let x = lu.solver().solve(&[14.0, 21.0, 25.0])?;
//! assert!((x[0] - 1.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): multi-threaded multiply for blocked matrices
//!
//! ## Logging
//!
//! Decompositions emit [`tracing`] events (`debug` on construction, `trace`
//! per iteration). Install any subscriber to see them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod algorithm;
pub mod dtype;
pub mod error;
pub mod matrix;
pub mod vector;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithm::linalg::{
        BidiagonalTransformer, CholeskyDecomposition, CholeskyOptions, DecompositionSolver,
        EigenDecomposition, EigenOptions, FieldLuDecomposition, LuDecomposition, LuOptions,
        QrDecomposition, QrOptions, SingularValueDecomposition, SvdOptions,
        TridiagonalTransformer,
    };
    pub use crate::dtype::Element;
    pub use crate::error::{Error, Result};
    pub use crate::matrix::{
        ChangingVisitor, DenseMatrix, PreservingVisitor, RealMatrix, Region, StorageKind,
        TraversalOrder,
    };
    pub use crate::vector::{DenseVector, RealVector};
}
