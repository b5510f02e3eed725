//! Householder reduction of a symmetric matrix to tridiagonal form
//!
//! `A = Q · T · Qᵀ` with Q orthogonal and T symmetric tridiagonal. Only the
//! upper triangle of the input is read. This is the first step of the
//! symmetric eigen-decomposition.

use super::helpers::{matrix_from_rows, reflector_norm, validate_square_matrix};
use crate::error::Result;
use crate::matrix::RealMatrix;
use tracing::debug;

/// Orthogonal similarity reduction `A = Q · T · Qᵀ`
#[derive(Debug, Clone)]
pub struct TridiagonalTransformer {
    main: Vec<f64>,
    secondary: Vec<f64>,
    q: RealMatrix,
    qt: RealMatrix,
    t: RealMatrix,
}

impl TridiagonalTransformer {
    /// Reduce a square matrix, reading its upper triangle
    pub fn new(matrix: &RealMatrix) -> Result<Self> {
        let m = validate_square_matrix(matrix)?;
        let mut h = matrix.to_rows();
        let mut main = vec![0.0; m];
        let mut secondary = vec![0.0; m - 1];
        let mut z = vec![0.0; m];

        for k in 0..m - 1 {
            main[k] = h[k][k];

            let x_norm_sqr: f64 = h[k][k + 1..].iter().map(|v| v * v).sum();
            let a = reflector_norm(x_norm_sqr, h[k][k + 1]);
            secondary[k] = a;
            if a == 0.0 {
                continue;
            }

            h[k][k + 1] -= a;
            let beta = -1.0 / (a * h[k][k + 1]);

            // z = beta · A v, with A taken from its upper triangle
            let (head, tail) = h.split_at_mut(k + 1);
            let hk = &head[k];
            z[k + 1..].iter_mut().for_each(|v| *v = 0.0);
            for i in k + 1..m {
                let h_i = &tail[i - k - 1];
                let hk_i = hk[i];
                let mut z_i = h_i[i] * hk_i;
                for j in i + 1..m {
                    z_i += h_i[j] * hk[j];
                    z[j] += h_i[j] * hk_i;
                }
                z[i] = beta * (z[i] + z_i);
            }

            // z -= (beta / 2) (zᵀ v) v
            let gamma = beta / 2.0
                * z[k + 1..]
                    .iter()
                    .zip(&hk[k + 1..])
                    .map(|(a, b)| a * b)
                    .sum::<f64>();
            for i in k + 1..m {
                z[i] -= gamma * hk[i];
            }

            // A -= v zᵀ + z vᵀ, upper triangle only
            for i in k + 1..m {
                let h_i = &mut tail[i - k - 1];
                for j in i..m {
                    h_i[j] -= hk[i] * z[j] + z[i] * hk[j];
                }
            }
        }
        main[m - 1] = h[m - 1][m - 1];

        let qt = build_qt(&h, &secondary);
        let q = qt.transpose();
        let t = RealMatrix::filled_with(m, m, |r, c| {
            if r == c {
                main[r]
            } else if c == r + 1 {
                secondary[r]
            } else if r == c + 1 {
                secondary[c]
            } else {
                0.0
            }
        });

        debug!(n = m, "tridiagonal reduction computed");

        Ok(Self {
            main,
            secondary,
            q,
            qt,
            t,
        })
    }

    /// Orthogonal factor Q
    pub fn q(&self) -> &RealMatrix {
        &self.q
    }

    /// Transpose of Q
    pub fn qt(&self) -> &RealMatrix {
        &self.qt
    }

    /// Tridiagonal factor T
    pub fn t(&self) -> &RealMatrix {
        &self.t
    }

    /// Diagonal of T
    pub fn main_diagonal(&self) -> &[f64] {
        &self.main
    }

    /// Super-diagonal of T (equal to its sub-diagonal)
    pub fn secondary_diagonal(&self) -> &[f64] {
        &self.secondary
    }
}

fn build_qt(h: &[Vec<f64>], secondary: &[f64]) -> RealMatrix {
    let m = h.len();
    let mut qt = vec![vec![0.0; m]; m];

    for k in (1..m).rev() {
        let hk = &h[k - 1];
        qt[k][k] = 1.0;
        if hk[k] != 0.0 {
            let inv = 1.0 / (secondary[k - 1] * hk[k]);
            let beta = 1.0 / secondary[k - 1];
            qt[k][k] = 1.0 + beta * hk[k];
            for i in k + 1..m {
                qt[k][i] = beta * hk[i];
            }
            for row in qt[k + 1..].iter_mut() {
                let b = inv * row[k + 1..]
                    .iter()
                    .zip(&hk[k + 1..])
                    .map(|(q, v)| q * v)
                    .sum::<f64>();
                row[k] = b * hk[k];
                for (q, v) in row[k + 1..].iter_mut().zip(&hk[k + 1..]) {
                    *q += b * v;
                }
            }
        }
    }
    qt[0][0] = 1.0;

    matrix_from_rows(&qt)
}
