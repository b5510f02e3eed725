//! Singular value decomposition
//!
//! Computes `A = U · Σ · Vᵀ` for any `m × n` matrix: U (`m × m`) and V
//! (`n × n`) orthogonal, Σ (`m × n`) diagonal with non-negative entries in
//! descending order.
//!
//! # Algorithm
//!
//! Golub-Kahan-Reinsch:
//! 1. Reduce to upper bidiagonal form (wide matrices go through their
//!    transpose and swap U and V at the end)
//! 2. Repeatedly pick the trailing unreduced block of the bidiagonal and
//!    either deflate a negligible entry or run one implicit-shift QR sweep
//! 3. Accumulate every Givens rotation into U or V
//! 4. Flip signs to make each converged value non-negative and bubble it
//!    into descending position

use super::bidiagonal::{UpperBidiagonal, reduce_upper};
use super::helpers::{matrix_from_rows, rectangular_diagonal};
use super::options::SvdOptions;
use super::solver::{DecompositionSolver, check_solvable};
use crate::error::{Error, Result};
use crate::matrix::RealMatrix;
use tracing::{debug, trace, warn};

/// Entries below this are treated as exact zeros when deflating (2⁻⁹⁶⁶)
const TINY: f64 = 1.603_334_688_007_178_2e-291;

/// Singular value decomposition `A = U · Σ · Vᵀ`
#[derive(Debug, Clone)]
pub struct SingularValueDecomposition {
    singular_values: Vec<f64>,
    rows: usize,
    cols: usize,
    tolerance: f64,
    u: RealMatrix,
    ut: RealMatrix,
    s: RealMatrix,
    v: RealMatrix,
    vt: RealMatrix,
    pseudo_inverse: RealMatrix,
}

impl SingularValueDecomposition {
    /// Decompose with default options
    pub fn new(matrix: &RealMatrix) -> Result<Self> {
        Self::with_options(matrix, SvdOptions::default())
    }

    /// Decompose with custom options
    ///
    /// # Errors
    ///
    /// [`Error::NotConvergent`] when a singular value needs more than
    /// `max_iterations` QR sweeps.
    pub fn with_options(matrix: &RealMatrix, options: SvdOptions) -> Result<Self> {
        let (rows, cols) = (matrix.rows(), matrix.cols());
        let transposed = rows < cols;
        let work = if transposed {
            matrix.transpose()
        } else {
            matrix.clone()
        };

        let UpperBidiagonal {
            main,
            secondary,
            u: mut u_rows,
            v: mut v_rows,
        } = reduce_upper(work.to_rows());

        let mut s = main;
        let mut e = secondary;
        e.push(0.0);
        diagonalize(
            &mut s,
            &mut e,
            &mut u_rows,
            &mut v_rows,
            options.max_iterations,
        )?;

        if transposed {
            std::mem::swap(&mut u_rows, &mut v_rows);
        }

        let u = matrix_from_rows(&u_rows);
        let v = matrix_from_rows(&v_rows);
        let tolerance = options.rank_threshold * s[0];

        let pseudo_inverse = RealMatrix::filled_with(cols, rows, |i, j| {
            s.iter()
                .enumerate()
                .filter(|&(_, &sigma)| sigma > tolerance)
                .fold(0.0, |acc, (k, sigma)| acc + v_rows[i][k] / sigma * u_rows[j][k])
        });

        debug!(
            rows,
            cols,
            max_singular_value = s[0],
            min_singular_value = s[s.len() - 1],
            "singular value decomposition computed"
        );

        Ok(Self {
            s: rectangular_diagonal(rows, cols, &s),
            singular_values: s,
            rows,
            cols,
            tolerance,
            ut: u.transpose(),
            u,
            vt: v.transpose(),
            v,
            pseudo_inverse,
        })
    }

    /// Left singular vectors U (`m × m`)
    pub fn u(&self) -> &RealMatrix {
        &self.u
    }

    /// Transpose of U
    pub fn ut(&self) -> &RealMatrix {
        &self.ut
    }

    /// Diagonal factor Σ (`m × n`)
    pub fn s(&self) -> &RealMatrix {
        &self.s
    }

    /// Right singular vectors V (`n × n`)
    pub fn v(&self) -> &RealMatrix {
        &self.v
    }

    /// Transpose of V
    pub fn vt(&self) -> &RealMatrix {
        &self.vt
    }

    /// The `min(m, n)` singular values in descending order
    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    /// Spectral norm: the largest singular value
    pub fn norm(&self) -> f64 {
        self.singular_values[0]
    }

    /// Ratio of the largest to the smallest singular value
    pub fn condition_number(&self) -> f64 {
        self.singular_values[0] / self.singular_values[self.singular_values.len() - 1]
    }

    /// Ratio of the smallest to the largest singular value
    pub fn inverse_condition_number(&self) -> f64 {
        self.singular_values[self.singular_values.len() - 1] / self.singular_values[0]
    }

    /// Number of singular values above the rank tolerance
    pub fn rank(&self) -> usize {
        self.singular_values
            .iter()
            .filter(|&&sigma| sigma > self.tolerance)
            .count()
    }

    /// Covariance `(J·Vᵀ)ᵀ (J·Vᵀ)` with `J = diag(1/σᵢ)` over the singular
    /// values `σᵢ >= min_singular_value`
    ///
    /// For a least-squares Jacobian this is the parameter covariance. Fails
    /// with [`Error::InvalidArgument`] when no singular value is retained.
    pub fn covariance(&self, min_singular_value: f64) -> Result<RealMatrix> {
        let dimension = self
            .singular_values
            .iter()
            .take_while(|&&sigma| sigma >= min_singular_value)
            .count();
        if dimension == 0 {
            return Err(Error::InvalidArgument {
                arg: "min_singular_value",
                reason: format!(
                    "{min_singular_value} exceeds the largest singular value {}",
                    self.singular_values[0]
                ),
            });
        }

        let jv = RealMatrix::filled_with(dimension, self.cols, |r, c| {
            self.vt.entry(r, c) / self.singular_values[r]
        });
        jv.transpose().multiply(&jv)
    }

    /// Moore-Penrose pseudo-inverse `V · Σ⁺ · Uᵀ` (`n × m`)
    ///
    /// Singular values at or below the rank tolerance are treated as zero.
    pub fn pseudo_inverse(&self) -> &RealMatrix {
        &self.pseudo_inverse
    }

    /// Solver bound to this decomposition
    pub fn solver(&self) -> SvdSolver<'_> {
        SvdSolver { decomposition: self }
    }
}

// ============================================================================
// Bidiagonal iteration
// ============================================================================

/// What the next pass over the trailing block does
enum Sweep {
    /// `s[p-1]` is negligible: chase `e[p-2]` out with rotations on V
    ChaseTrailing,
    /// `s[k-1]` is negligible: split there, rotating into U
    SplitAt,
    /// Implicit-shift QR step on the unreduced block
    QrStep,
    /// `s[p-1]` converged
    Converged,
}

fn rotate_columns(rows: &mut [Vec<f64>], a: usize, b: usize, cs: f64, sn: f64) {
    for row in rows.iter_mut() {
        let t = cs * row[a] + sn * row[b];
        row[b] = -sn * row[a] + cs * row[b];
        row[a] = t;
    }
}

/// Reduce the upper bidiagonal `(s, e)` to diagonal, rotating U and V
fn diagonalize(
    s: &mut [f64],
    e: &mut [f64],
    u: &mut [Vec<f64>],
    v: &mut [Vec<f64>],
    max_iterations: usize,
) -> Result<()> {
    let n = s.len();
    let last = n - 1;
    let eps = f64::EPSILON;
    let mut p = n;
    let mut iterations = 0;

    while p > 0 {
        // largest k < p - 1 with negligible e[k], or -1
        let mut k = p as isize - 2;
        while k >= 0 {
            let ku = k as usize;
            if e[ku].abs() <= TINY + eps * (s[ku].abs() + s[ku + 1].abs()) {
                e[ku] = 0.0;
                break;
            }
            k -= 1;
        }

        let sweep = if k == p as isize - 2 {
            Sweep::Converged
        } else {
            let mut ks = p as isize - 1;
            while ks > k {
                let ksu = ks as usize;
                let t = e[ksu].abs() + if ks != k + 1 { e[ksu - 1].abs() } else { 0.0 };
                if s[ksu].abs() <= TINY + eps * t {
                    s[ksu] = 0.0;
                    break;
                }
                ks -= 1;
            }
            if ks == k {
                Sweep::QrStep
            } else if ks == p as isize - 1 {
                Sweep::ChaseTrailing
            } else {
                k = ks;
                Sweep::SplitAt
            }
        };
        let k = (k + 1) as usize;

        match sweep {
            Sweep::ChaseTrailing => {
                let mut f = e[p - 2];
                e[p - 2] = 0.0;
                for j in (k..=p - 2).rev() {
                    let t = s[j].hypot(f);
                    let cs = s[j] / t;
                    let sn = f / t;
                    s[j] = t;
                    if j != k {
                        f = -sn * e[j - 1];
                        e[j - 1] *= cs;
                    }
                    rotate_columns(v, j, p - 1, cs, sn);
                }
            }
            Sweep::SplitAt => {
                let mut f = e[k - 1];
                e[k - 1] = 0.0;
                for j in k..p {
                    let t = s[j].hypot(f);
                    let cs = s[j] / t;
                    let sn = f / t;
                    s[j] = t;
                    f = -sn * e[j];
                    e[j] *= cs;
                    rotate_columns(u, j, k - 1, cs, sn);
                }
            }
            Sweep::QrStep => {
                if iterations == max_iterations {
                    warn!(remaining = p, iterations, "SVD iteration did not converge");
                    return Err(Error::NotConvergent { iterations });
                }
                iterations += 1;
                trace!(block_start = k, block_end = p - 1, iterations, "SVD QR sweep");

                let scale = s[p - 1]
                    .abs()
                    .max(s[p - 2].abs())
                    .max(e[p - 2].abs())
                    .max(s[k].abs())
                    .max(e[k].abs());
                let sp = s[p - 1] / scale;
                let spm1 = s[p - 2] / scale;
                let epm1 = e[p - 2] / scale;
                let sk = s[k] / scale;
                let ek = e[k] / scale;
                let b = ((spm1 + sp) * (spm1 - sp) + epm1 * epm1) / 2.0;
                let c = (sp * epm1) * (sp * epm1);
                let mut shift = 0.0;
                if b != 0.0 || c != 0.0 {
                    shift = (b * b + c).sqrt();
                    if b < 0.0 {
                        shift = -shift;
                    }
                    shift = c / (b + shift);
                }
                let mut f = (sk + sp) * (sk - sp) + shift;
                let mut g = sk * ek;

                // chase the bulge down the block
                for j in k..p - 1 {
                    let t = f.hypot(g);
                    let cs = f / t;
                    let sn = g / t;
                    if j != k {
                        e[j - 1] = t;
                    }
                    f = cs * s[j] + sn * e[j];
                    e[j] = cs * e[j] - sn * s[j];
                    g = sn * s[j + 1];
                    s[j + 1] *= cs;
                    rotate_columns(v, j, j + 1, cs, sn);

                    let t = f.hypot(g);
                    let cs = f / t;
                    let sn = g / t;
                    s[j] = t;
                    f = cs * e[j] + sn * s[j + 1];
                    s[j + 1] = -sn * e[j] + cs * s[j + 1];
                    g = sn * e[j + 1];
                    e[j + 1] *= cs;
                    rotate_columns(u, j, j + 1, cs, sn);
                }
                e[p - 2] = f;
            }
            Sweep::Converged => {
                if s[k] <= 0.0 {
                    s[k] = if s[k] < 0.0 { -s[k] } else { 0.0 };
                    for row in v.iter_mut() {
                        row[k] = -row[k];
                    }
                }

                let mut k = k;
                while k < last && s[k] < s[k + 1] {
                    s.swap(k, k + 1);
                    for row in v.iter_mut() {
                        row.swap(k, k + 1);
                    }
                    for row in u.iter_mut() {
                        row.swap(k, k + 1);
                    }
                    k += 1;
                }
                iterations = 0;
                p -= 1;
            }
        }
    }

    Ok(())
}

// ============================================================================
// Solver
// ============================================================================

/// Solves through the pseudo-inverse of a [`SingularValueDecomposition`]
///
/// Requires full rank; the least-squares operator for rank-deficient
/// matrices stays available through
/// [`SingularValueDecomposition::pseudo_inverse`].
#[derive(Debug, Clone, Copy)]
pub struct SvdSolver<'a> {
    decomposition: &'a SingularValueDecomposition,
}

impl DecompositionSolver for SvdSolver<'_> {
    fn rows(&self) -> usize {
        self.decomposition.rows
    }

    fn cols(&self) -> usize {
        self.decomposition.cols
    }

    fn is_non_singular(&self) -> bool {
        self.decomposition.rank() == self.decomposition.singular_values.len()
    }

    fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        check_solvable(self.rows(), self.is_non_singular(), b.len())?;
        self.decomposition.pseudo_inverse.operate(b)
    }
}
