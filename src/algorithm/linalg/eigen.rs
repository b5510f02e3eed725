//! Eigen-decomposition of real symmetric matrices
//!
//! Computes `A = V · D · Vᵀ` where D is the diagonal matrix of (real)
//! eigenvalues and V is orthogonal with the eigenvectors as columns.
//!
//! # Algorithm
//!
//! 1. Reduce A to tridiagonal form with [`TridiagonalTransformer`], keeping Q
//! 2. Run implicit-shift QL iteration on the tridiagonal, one eigenvalue at a
//!    time, splitting the active block wherever an off-diagonal entry becomes
//!    negligible against its diagonal neighbours
//! 3. Accumulate every plane rotation into the columns of Q
//! 4. Sort eigenvalues in descending order (moving eigenvector columns with
//!    them) and snap values below `ε · max|λ|` to zero
//!
//! Only symmetric input is supported, so every imaginary part is zero.

use super::helpers::{matrix_from_rows, validate_square_matrix};
use super::options::EigenOptions;
use super::solver::{DecompositionSolver, check_solvable};
use super::tridiagonal::TridiagonalTransformer;
use crate::error::{Axis, Error, Result};
use crate::matrix::{RealMatrix, check_index};
use crate::vector::RealVector;
use tracing::{debug, trace, warn};

/// Symmetric eigen-decomposition `A = V · D · Vᵀ`
#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    real_eigenvalues: Vec<f64>,
    imag_eigenvalues: Vec<f64>,
    eigenvectors: Vec<RealVector>,
    singularity_tolerance: f64,
    v: RealMatrix,
    d: RealMatrix,
    vt: RealMatrix,
}

impl EigenDecomposition {
    /// Decompose a symmetric matrix with default options
    pub fn new(matrix: &RealMatrix) -> Result<Self> {
        Self::with_options(matrix, EigenOptions::default())
    }

    /// Decompose a symmetric matrix with custom options
    ///
    /// # Errors
    ///
    /// - [`Error::NonSquare`] for rectangular input
    /// - [`Error::NotSymmetric`] when the matrix fails the relative symmetry
    ///   check
    /// - [`Error::NotConvergent`] when an eigenvalue needs more than
    ///   `max_iterations` QL sweeps
    pub fn with_options(matrix: &RealMatrix, options: EigenOptions) -> Result<Self> {
        let n = validate_square_matrix(matrix)?;
        let threshold = options
            .symmetry_threshold
            .unwrap_or(10.0 * (n * n) as f64 * f64::EPSILON);
        if let Some((row, col)) = matrix.first_asymmetry(threshold) {
            return Err(Error::NotSymmetric {
                row,
                col,
                threshold,
            });
        }

        let transformer = TridiagonalTransformer::new(matrix)?;
        Self::from_parts(
            transformer.main_diagonal(),
            transformer.secondary_diagonal(),
            transformer.q().to_rows(),
            options,
        )
    }

    /// Decompose the symmetric tridiagonal matrix with the given diagonals
    ///
    /// `secondary` holds the off-diagonal and must be one shorter than `main`.
    pub fn from_tridiagonal(main: &[f64], secondary: &[f64]) -> Result<Self> {
        if main.is_empty() {
            return Err(Error::EmptyInput {
                what: "main diagonal",
            });
        }
        if secondary.len() + 1 != main.len() {
            return Err(Error::dimension_mismatch(
                &[main.len() - 1],
                &[secondary.len()],
            ));
        }
        let n = main.len();
        let identity = (0..n)
            .map(|r| (0..n).map(|c| if r == c { 1.0 } else { 0.0 }).collect())
            .collect();
        Self::from_parts(main, secondary, identity, EigenOptions::default())
    }

    fn from_parts(
        main: &[f64],
        secondary: &[f64],
        mut z: Vec<Vec<f64>>,
        options: EigenOptions,
    ) -> Result<Self> {
        let n = main.len();
        let mut d = main.to_vec();
        let mut e = secondary.to_vec();
        e.push(0.0);

        ql_iterate(&mut d, &mut e, &mut z, options.max_iterations)?;
        sort_descending(&mut d, &mut z);

        let max_abs = d.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if max_abs != 0.0 {
            for value in d.iter_mut() {
                if value.abs() < f64::EPSILON * max_abs {
                    *value = 0.0;
                }
            }
        }

        let v = matrix_from_rows(&z);
        let eigenvectors = (0..n)
            .map(|c| RealVector::from_vec(z.iter().map(|row| row[c]).collect()))
            .collect();
        let d_matrix = RealMatrix::filled_with(n, n, |r, c| if r == c { d[r] } else { 0.0 });

        debug!(n, max_eigenvalue = max_abs, "eigen decomposition computed");

        Ok(Self {
            imag_eigenvalues: vec![0.0; n],
            real_eigenvalues: d,
            eigenvectors,
            singularity_tolerance: options.singularity_threshold * max_abs,
            vt: v.transpose(),
            v,
            d: d_matrix,
        })
    }

    /// Real parts of the eigenvalues, in descending order
    pub fn real_eigenvalues(&self) -> &[f64] {
        &self.real_eigenvalues
    }

    /// Real part of the `i`-th eigenvalue
    pub fn real_eigenvalue(&self, i: usize) -> Result<f64> {
        check_index(Axis::Entry, i, self.real_eigenvalues.len())?;
        Ok(self.real_eigenvalues[i])
    }

    /// Imaginary parts of the eigenvalues (all zero)
    pub fn imag_eigenvalues(&self) -> &[f64] {
        &self.imag_eigenvalues
    }

    /// Imaginary part of the `i`-th eigenvalue
    pub fn imag_eigenvalue(&self, i: usize) -> Result<f64> {
        check_index(Axis::Entry, i, self.imag_eigenvalues.len())?;
        Ok(self.imag_eigenvalues[i])
    }

    /// Unit eigenvector of the `i`-th eigenvalue
    pub fn eigenvector(&self, i: usize) -> Result<&RealVector> {
        check_index(Axis::Entry, i, self.eigenvectors.len())?;
        Ok(&self.eigenvectors[i])
    }

    /// Eigenvector matrix V (eigenvectors as columns)
    pub fn v(&self) -> &RealMatrix {
        &self.v
    }

    /// Diagonal eigenvalue matrix D
    pub fn d(&self) -> &RealMatrix {
        &self.d
    }

    /// Transpose of V
    pub fn vt(&self) -> &RealMatrix {
        &self.vt
    }

    /// Product of the eigenvalues
    pub fn determinant(&self) -> f64 {
        self.real_eigenvalues.iter().product()
    }

    /// Solver bound to this decomposition
    pub fn solver(&self) -> EigenSolver<'_> {
        EigenSolver { decomposition: self }
    }
}

// ============================================================================
// Implicit QL
// ============================================================================

/// Diagonalize the tridiagonal `(d, e)` in place, rotating the columns of `z`
///
/// `e[i]` couples `d[i]` and `d[i + 1]`; its last entry is scratch space.
fn ql_iterate(
    d: &mut [f64],
    e: &mut [f64],
    z: &mut [Vec<f64>],
    max_iterations: usize,
) -> Result<()> {
    let n = d.len();

    let max_abs = d
        .iter()
        .chain(e.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if max_abs != 0.0 {
        for value in d.iter_mut().chain(e.iter_mut()) {
            if value.abs() <= f64::EPSILON * max_abs {
                *value = 0.0;
            }
        }
    }

    for j in 0..n {
        let mut iterations = 0;
        loop {
            // find the end of the unreduced block starting at j
            let mut end = j;
            while end < n - 1 {
                let dd = d[end].abs() + d[end + 1].abs();
                if e[end].abs() + dd == dd {
                    break;
                }
                end += 1;
            }
            if end == j {
                break;
            }

            if iterations == max_iterations {
                warn!(eigenvalue = j, iterations, "QL iteration did not converge");
                return Err(Error::NotConvergent { iterations });
            }
            iterations += 1;
            trace!(block_start = j, block_end = end, iterations, "QL sweep");

            // Wilkinson-style shift from the leading 2×2 block
            let mut q = (d[j + 1] - d[j]) / (2.0 * e[j]);
            let mut t = (1.0 + q * q).sqrt();
            q = d[end] - d[j] + e[j] / if q < 0.0 { q - t } else { q + t };

            let mut u = 0.0;
            let mut s = 1.0;
            let mut c = 1.0;
            let mut underflow = false;
            for i in (j..end).rev() {
                let p = s * e[i];
                let h = c * e[i];
                if p.abs() >= q.abs() {
                    c = q / p;
                    t = (c * c + 1.0).sqrt();
                    e[i + 1] = p * t;
                    s = 1.0 / t;
                    c *= s;
                } else {
                    s = p / q;
                    t = (s * s + 1.0).sqrt();
                    e[i + 1] = q * t;
                    c = 1.0 / t;
                    s *= c;
                }
                if e[i + 1] == 0.0 {
                    d[i + 1] -= u;
                    e[end] = 0.0;
                    underflow = true;
                    break;
                }
                q = d[i + 1] - u;
                t = (d[i] - q) * s + 2.0 * c * h;
                u = s * t;
                d[i + 1] = q + u;
                q = c * t - h;
                for row in z.iter_mut() {
                    let p = row[i + 1];
                    row[i + 1] = s * row[i] + c * p;
                    row[i] = c * row[i] - s * p;
                }
            }
            if underflow {
                continue;
            }
            d[j] -= u;
            e[j] = q;
            e[end] = 0.0;
        }
    }

    Ok(())
}

/// Selection sort into descending order, swapping eigenvector columns along
fn sort_descending(d: &mut [f64], z: &mut [Vec<f64>]) {
    let n = d.len();
    for i in 0..n {
        let mut k = i;
        let mut p = d[i];
        for (j, &value) in d.iter().enumerate().skip(i + 1) {
            if value > p {
                k = j;
                p = value;
            }
        }
        if k != i {
            d[k] = d[i];
            d[i] = p;
            for row in z.iter_mut() {
                row.swap(i, k);
            }
        }
    }
}

// ============================================================================
// Solver
// ============================================================================

/// Solves through the eigen basis: `x = Σ vᵢ (vᵢ · b) / λᵢ`
#[derive(Debug, Clone, Copy)]
pub struct EigenSolver<'a> {
    decomposition: &'a EigenDecomposition,
}

impl DecompositionSolver for EigenSolver<'_> {
    fn rows(&self) -> usize {
        self.decomposition.real_eigenvalues.len()
    }

    fn cols(&self) -> usize {
        self.decomposition.real_eigenvalues.len()
    }

    fn is_non_singular(&self) -> bool {
        let tolerance = self.decomposition.singularity_tolerance;
        self.decomposition
            .real_eigenvalues
            .iter()
            .all(|lambda| lambda.abs() > tolerance)
    }

    fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        let n = self.rows();
        check_solvable(n, self.is_non_singular(), b.len())?;

        let mut x = vec![0.0; n];
        for (lambda, v) in self
            .decomposition
            .real_eigenvalues
            .iter()
            .zip(&self.decomposition.eigenvectors)
        {
            let coefficient = v.iter().zip(b).map(|(v, b)| v * b).sum::<f64>() / lambda;
            for (x_k, v_k) in x.iter_mut().zip(v.iter()) {
                *x_k += coefficient * v_k;
            }
        }
        Ok(x)
    }
}
