//! LU decomposition with partial pivoting
//!
//! Computes `P · A = L · U` where L is unit lower triangular, U is upper
//! triangular and P is a row permutation.
//!
//! # Algorithm
//!
//! Crout-style Gaussian elimination, one column at a time:
//! 1. Finish the U entries above the diagonal in this column
//! 2. Form the pivot candidates on and below the diagonal
//! 3. Let a [`PivotPolicy`] pick the pivot row, or declare the matrix singular
//! 4. Swap rows, record the transposition, scale the multipliers
//!
//! The same routine serves floating-point and exact matrices; only the pivot
//! policy differs. Floating point uses [`MagnitudePivot`] (largest absolute
//! value, with a singularity threshold); exact fields use [`FirstNonZeroPivot`].
//!
//! A singular matrix does not make construction fail: the decomposition
//! reports a zero determinant, has no factors, and its solver refuses to
//! solve.

use super::helpers::validate_square_matrix;
use super::options::LuOptions;
use super::solver::{DecompositionSolver, check_solvable};
use crate::dtype::Element;
use crate::error::Result;
use crate::matrix::{DenseMatrix, RealMatrix};
use tracing::debug;

// ============================================================================
// Pivot policies
// ============================================================================

/// Rule choosing the pivot row for one elimination step
pub trait PivotPolicy<T: Element> {
    /// Pick a pivot among `candidates` (the column entries on and below the
    /// diagonal, top to bottom), returning its offset, or `None` when the
    /// column admits no usable pivot.
    fn select(&self, candidates: &[T]) -> Option<usize>;
}

/// Largest-magnitude pivoting for `f64`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudePivot {
    /// Pivots with magnitude at or below this value count as zero
    pub threshold: f64,
}

impl PivotPolicy<f64> for MagnitudePivot {
    fn select(&self, candidates: &[f64]) -> Option<usize> {
        let mut best = 0;
        let mut largest = f64::NEG_INFINITY;
        for (offset, value) in candidates.iter().enumerate() {
            if value.abs() > largest {
                largest = value.abs();
                best = offset;
            }
        }
        (largest > self.threshold).then_some(best)
    }
}

/// First non-zero pivoting for exact arithmetic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstNonZeroPivot;

impl<T: Element> PivotPolicy<T> for FirstNonZeroPivot {
    fn select(&self, candidates: &[T]) -> Option<usize> {
        candidates.iter().position(|v| !v.is_zero_element())
    }
}

// ============================================================================
// Elimination
// ============================================================================

struct Factorization<T> {
    lu: Vec<Vec<T>>,
    pivot: Vec<usize>,
    even: bool,
    singular: bool,
}

fn factorize<T: Element, P: PivotPolicy<T>>(mut lu: Vec<Vec<T>>, policy: &P) -> Factorization<T> {
    let n = lu.len();
    let mut pivot: Vec<usize> = (0..n).collect();
    let mut even = true;

    for col in 0..n {
        // upper part of the column
        for row in 0..col {
            let mut sum = lu[row][col].clone();
            for i in 0..row {
                sum = sum - lu[row][i].clone() * lu[i][col].clone();
            }
            lu[row][col] = sum;
        }

        // pivot candidates
        for row in col..n {
            let mut sum = lu[row][col].clone();
            for i in 0..col {
                sum = sum - lu[row][i].clone() * lu[i][col].clone();
            }
            lu[row][col] = sum;
        }

        let candidates: Vec<T> = lu[col..].iter().map(|r| r[col].clone()).collect();
        let Some(offset) = policy.select(&candidates) else {
            return Factorization {
                lu,
                pivot,
                even,
                singular: true,
            };
        };

        let max_row = col + offset;
        if max_row != col {
            lu.swap(max_row, col);
            pivot.swap(max_row, col);
            even = !even;
        }

        let diagonal = lu[col][col].clone();
        for row in col + 1..n {
            lu[row][col] = lu[row][col].clone() / diagonal.clone();
        }
    }

    Factorization {
        lu,
        pivot,
        even,
        singular: false,
    }
}

// ============================================================================
// Decomposition
// ============================================================================

/// LU decomposition of a square matrix
///
/// Factors are computed once at construction and returned by reference.
#[derive(Debug, Clone)]
pub struct LuDecomposition<T: Element = f64> {
    lu: Vec<Vec<T>>,
    pivot: Vec<usize>,
    singular: bool,
    determinant: T,
    l: Option<DenseMatrix<T>>,
    u: Option<DenseMatrix<T>>,
    p: Option<DenseMatrix<T>>,
}

/// LU decomposition over an exact field, built with [`LuDecomposition::new_exact`]
pub type FieldLuDecomposition<T> = LuDecomposition<T>;

impl LuDecomposition<f64> {
    /// Decompose with default options
    pub fn new(matrix: &RealMatrix) -> Result<Self> {
        Self::with_options(matrix, LuOptions::default())
    }

    /// Decompose with a custom singularity threshold
    ///
    /// The threshold is relative: a column whose largest pivot candidate is
    /// at or below `singularity_threshold * ‖A‖₁` marks the matrix singular.
    pub fn with_options(matrix: &RealMatrix, options: LuOptions) -> Result<Self> {
        validate_square_matrix(matrix)?;
        let policy = MagnitudePivot {
            threshold: options.singularity_threshold * matrix.norm(),
        };
        Self::with_pivot_policy(matrix, &policy)
    }
}

impl<T: Element> LuDecomposition<T> {
    /// Decompose in exact arithmetic, pivoting on the first non-zero entry
    pub fn new_exact(matrix: &DenseMatrix<T>) -> Result<Self> {
        Self::with_pivot_policy(matrix, &FirstNonZeroPivot)
    }

    /// Decompose with an arbitrary pivot policy
    pub fn with_pivot_policy<P: PivotPolicy<T>>(
        matrix: &DenseMatrix<T>,
        policy: &P,
    ) -> Result<Self> {
        let n = validate_square_matrix(matrix)?;
        let Factorization {
            lu,
            pivot,
            even,
            singular,
        } = factorize(matrix.to_rows(), policy);

        let determinant = if singular {
            T::zero()
        } else {
            let product = (0..n).fold(T::one(), |acc, i| acc * lu[i][i].clone());
            if even { product } else { -product }
        };

        let (l, u, p) = if singular {
            (None, None, None)
        } else {
            (
                Some(lower_factor(&lu)),
                Some(upper_factor(&lu)),
                Some(permutation_matrix(&pivot)),
            )
        };

        debug!(n, singular, "LU decomposition computed");

        Ok(Self {
            lu,
            pivot,
            singular,
            determinant,
            l,
            u,
            p,
        })
    }

    /// Unit lower triangular factor, `None` when singular
    pub fn l(&self) -> Option<&DenseMatrix<T>> {
        self.l.as_ref()
    }

    /// Upper triangular factor, `None` when singular
    pub fn u(&self) -> Option<&DenseMatrix<T>> {
        self.u.as_ref()
    }

    /// Row permutation matrix, `None` when singular
    pub fn p(&self) -> Option<&DenseMatrix<T>> {
        self.p.as_ref()
    }

    /// Row permutation as indices: row `i` of `P·A` is row `pivot[i]` of `A`
    pub fn pivot(&self) -> &[usize] {
        &self.pivot
    }

    /// Determinant; exactly zero for a singular matrix
    pub fn determinant(&self) -> T {
        self.determinant.clone()
    }

    /// Whether a pivot could not be found
    pub fn is_singular(&self) -> bool {
        self.singular
    }

    /// Solver bound to this decomposition
    pub fn solver(&self) -> LuSolver<'_, T> {
        LuSolver { decomposition: self }
    }
}

fn lower_factor<T: Element>(lu: &[Vec<T>]) -> DenseMatrix<T> {
    let n = lu.len();
    DenseMatrix::filled_with(n, n, |r, c| match r.cmp(&c) {
        std::cmp::Ordering::Greater => lu[r][c].clone(),
        std::cmp::Ordering::Equal => T::one(),
        std::cmp::Ordering::Less => T::zero(),
    })
}

fn upper_factor<T: Element>(lu: &[Vec<T>]) -> DenseMatrix<T> {
    let n = lu.len();
    DenseMatrix::filled_with(n, n, |r, c| if r <= c { lu[r][c].clone() } else { T::zero() })
}

fn permutation_matrix<T: Element>(pivot: &[usize]) -> DenseMatrix<T> {
    let n = pivot.len();
    DenseMatrix::filled_with(n, n, |r, c| if pivot[r] == c { T::one() } else { T::zero() })
}

// ============================================================================
// Solver
// ============================================================================

/// Forward and back substitution through an [`LuDecomposition`]
#[derive(Debug, Clone, Copy)]
pub struct LuSolver<'a, T: Element = f64> {
    decomposition: &'a LuDecomposition<T>,
}

impl<T: Element> DecompositionSolver<T> for LuSolver<'_, T> {
    fn rows(&self) -> usize {
        self.decomposition.lu.len()
    }

    fn cols(&self) -> usize {
        self.decomposition.lu.len()
    }

    fn is_non_singular(&self) -> bool {
        !self.decomposition.singular
    }

    fn solve(&self, b: &[T]) -> Result<Vec<T>> {
        let lu = &self.decomposition.lu;
        let n = lu.len();
        check_solvable(n, self.is_non_singular(), b.len())?;

        let mut x: Vec<T> = self
            .decomposition
            .pivot
            .iter()
            .map(|&row| b[row].clone())
            .collect();

        // L y = P b
        for col in 0..n {
            for i in col + 1..n {
                x[i] = x[i].clone() - x[col].clone() * lu[i][col].clone();
            }
        }

        // U x = y
        for col in (0..n).rev() {
            x[col] = x[col].clone() / lu[col][col].clone();
            for i in 0..col {
                x[i] = x[i].clone() - x[col].clone() * lu[i][col].clone();
            }
        }

        Ok(x)
    }
}
