//! QR decomposition via Householder reflections
//!
//! Computes `A = Q · R` for any `m × n` matrix, with Q orthogonal (`m × m`)
//! and R upper trapezoidal (`m × n`).
//!
//! The reflectors are stored in the transpose of the input (`qrt`) so each
//! Householder vector is a contiguous row, and the diagonal of R is kept
//! separately in `r_diag`.

use super::helpers::{matrix_from_rows, reflector_norm};
use super::options::QrOptions;
use super::solver::{DecompositionSolver, check_solvable};
use crate::error::Result;
use crate::matrix::{RealMatrix, dot};
use tracing::debug;

/// Householder QR decomposition
#[derive(Debug, Clone)]
pub struct QrDecomposition {
    qrt: Vec<Vec<f64>>,
    r_diag: Vec<f64>,
    rows: usize,
    cols: usize,
    rank_tolerance: f64,
    q: RealMatrix,
    qt: RealMatrix,
    r: RealMatrix,
    h: RealMatrix,
}

impl QrDecomposition {
    /// Decompose with the default rank threshold
    pub fn new(matrix: &RealMatrix) -> Result<Self> {
        Self::with_options(matrix, QrOptions::default())
    }

    /// Decompose with a custom rank threshold (relative to the 1-norm)
    pub fn with_options(matrix: &RealMatrix, options: QrOptions) -> Result<Self> {
        let (rows, cols) = (matrix.rows(), matrix.cols());
        let mut qrt = matrix.transpose().to_rows();
        let mut r_diag = vec![0.0; rows.min(cols)];

        for minor in 0..r_diag.len() {
            let x_norm_sqr: f64 = qrt[minor][minor..].iter().map(|v| v * v).sum();
            let a = reflector_norm(x_norm_sqr, qrt[minor][minor]);
            r_diag[minor] = a;

            if a != 0.0 {
                // v = x - a e; the reflector is H = I - 2 v vᵀ / |v|², |v|² = -2 a v[minor]
                qrt[minor][minor] -= a;
                let (head, tail) = qrt.split_at_mut(minor + 1);
                let reflector = &head[minor];
                for column in tail.iter_mut() {
                    let alpha = -dot(&column[minor..], &reflector[minor..]) / (a * reflector[minor]);
                    for (c, v) in column[minor..].iter_mut().zip(&reflector[minor..]) {
                        *c -= alpha * v;
                    }
                }
            }
        }

        let r = build_r(&qrt, &r_diag, rows, cols);
        let qt = build_qt(&qrt, &r_diag, rows);
        let q = qt.transpose();
        let h = build_h(&qrt, &r_diag, rows, cols);
        let rank_tolerance = options.rank_threshold * matrix.norm();

        debug!(rows, cols, "QR decomposition computed");

        Ok(Self {
            qrt,
            r_diag,
            rows,
            cols,
            rank_tolerance,
            q,
            qt,
            r,
            h,
        })
    }

    /// Orthogonal factor Q (`m × m`)
    pub fn q(&self) -> &RealMatrix {
        &self.q
    }

    /// Transpose of Q
    pub fn qt(&self) -> &RealMatrix {
        &self.qt
    }

    /// Upper trapezoidal factor R (`m × n`)
    pub fn r(&self) -> &RealMatrix {
        &self.r
    }

    /// Householder vectors as columns of a lower trapezoidal `m × n` matrix
    pub fn h(&self) -> &RealMatrix {
        &self.h
    }

    /// Solver bound to this decomposition
    pub fn solver(&self) -> QrSolver<'_> {
        QrSolver { decomposition: self }
    }
}

fn build_r(qrt: &[Vec<f64>], r_diag: &[f64], rows: usize, cols: usize) -> RealMatrix {
    RealMatrix::filled_with(rows, cols, |r, c| match r.cmp(&c) {
        std::cmp::Ordering::Equal => r_diag[r],
        std::cmp::Ordering::Less if r < r_diag.len() => qrt[c][r],
        _ => 0.0,
    })
}

fn build_qt(qrt: &[Vec<f64>], r_diag: &[f64], rows: usize) -> RealMatrix {
    let mut qt = vec![vec![0.0; rows]; rows];
    for (minor, row) in qt.iter_mut().enumerate().skip(r_diag.len()) {
        row[minor] = 1.0;
    }

    for minor in (0..r_diag.len()).rev() {
        let reflector = &qrt[minor];
        qt[minor][minor] = 1.0;
        if reflector[minor] != 0.0 {
            let scale = r_diag[minor] * reflector[minor];
            for row in qt[minor..].iter_mut() {
                let alpha = -dot(&row[minor..], &reflector[minor..]) / scale;
                for (q, v) in row[minor..].iter_mut().zip(&reflector[minor..]) {
                    *q += -alpha * v;
                }
            }
        }
    }

    matrix_from_rows(&qt)
}

fn build_h(qrt: &[Vec<f64>], r_diag: &[f64], rows: usize, cols: usize) -> RealMatrix {
    RealMatrix::filled_with(rows, cols, |i, j| {
        // a zero diagonal means the column below it was already zero
        if i >= j && j < r_diag.len() && r_diag[j] != 0.0 {
            qrt[j][i] / -r_diag[j]
        } else {
            0.0
        }
    })
}

/// Least-squares solves through a [`QrDecomposition`]
///
/// With more rows than columns the solution minimises `‖A x − b‖₂`. With more
/// columns than rows the trailing unknowns are set to zero.
#[derive(Debug, Clone, Copy)]
pub struct QrSolver<'a> {
    decomposition: &'a QrDecomposition,
}

impl DecompositionSolver for QrSolver<'_> {
    fn rows(&self) -> usize {
        self.decomposition.rows
    }

    fn cols(&self) -> usize {
        self.decomposition.cols
    }

    fn is_non_singular(&self) -> bool {
        let tolerance = self.decomposition.rank_tolerance;
        self.decomposition
            .r_diag
            .iter()
            .all(|d| d.abs() > tolerance)
    }

    fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        let QrDecomposition {
            qrt,
            r_diag,
            rows,
            cols,
            ..
        } = self.decomposition;
        check_solvable(*rows, self.is_non_singular(), b.len())?;

        let mut y = b.to_vec();

        // y = Qᵀ b
        for (minor, reflector) in qrt.iter().enumerate().take(r_diag.len()) {
            let d = dot(&y[minor..], &reflector[minor..]) / (r_diag[minor] * reflector[minor]);
            for (y_r, v) in y[minor..].iter_mut().zip(&reflector[minor..]) {
                *y_r += d * v;
            }
        }

        // R x = y
        let mut x = vec![0.0; *cols];
        for row in (0..r_diag.len()).rev() {
            y[row] /= r_diag[row];
            let y_row = y[row];
            x[row] = y_row;
            for (y_i, r_ij) in y[..row].iter_mut().zip(&qrt[row][..row]) {
                *y_i -= y_row * r_ij;
            }
        }

        Ok(x)
    }
}
