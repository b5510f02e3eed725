//! Householder reduction to bidiagonal form
//!
//! `A = U · B · Vᵀ` where U (`m × m`) and V (`n × n`) are orthogonal and B
//! (`m × n`) is bidiagonal: upper bidiagonal when `m >= n`, lower bidiagonal
//! otherwise. Reflectors alternate between columns (left, accumulated in U)
//! and rows (right, accumulated in V).
//!
//! This is the first step of the singular value decomposition.

use super::helpers::{matrix_from_rows, reflector_norm};
use crate::error::Result;
use crate::matrix::RealMatrix;
use tracing::debug;

/// Raw upper-bidiagonal reduction of a matrix with at least as many rows as
/// columns, as row arrays
pub(crate) struct UpperBidiagonal {
    pub main: Vec<f64>,
    pub secondary: Vec<f64>,
    pub u: Vec<Vec<f64>>,
    pub v: Vec<Vec<f64>>,
}

/// Reduce `h` (`m × n`, `m >= n`) to upper bidiagonal form
pub(crate) fn reduce_upper(mut h: Vec<Vec<f64>>) -> UpperBidiagonal {
    let m = h.len();
    let n = h.first().map_or(0, Vec::len);
    let p = m.min(n);
    let mut main = vec![0.0; p];
    let mut secondary = vec![0.0; p.saturating_sub(1)];

    for k in 0..n {
        // left reflector on column k
        let x_norm_sqr: f64 = (k..m).map(|i| h[i][k] * h[i][k]).sum();
        let a = reflector_norm(x_norm_sqr, h[k][k]);
        main[k] = a;
        if a != 0.0 {
            h[k][k] -= a;
            for j in k + 1..n {
                let alpha = -(k..m).map(|i| h[i][j] * h[i][k]).sum::<f64>() / (a * h[k][k]);
                for row in h[k..].iter_mut() {
                    row[j] -= alpha * row[k];
                }
            }
        }

        // right reflector on row k
        if k + 1 < n {
            let x_norm_sqr: f64 = h[k][k + 1..].iter().map(|v| v * v).sum();
            let b = reflector_norm(x_norm_sqr, h[k][k + 1]);
            secondary[k] = b;
            if b != 0.0 {
                h[k][k + 1] -= b;
                let (head, tail) = h.split_at_mut(k + 1);
                let reflector = &head[k];
                for row in tail.iter_mut() {
                    let beta = -row[k + 1..]
                        .iter()
                        .zip(&reflector[k + 1..])
                        .map(|(x, v)| x * v)
                        .sum::<f64>()
                        / (b * reflector[k + 1]);
                    for (x, v) in row[k + 1..].iter_mut().zip(&reflector[k + 1..]) {
                        *x -= beta * v;
                    }
                }
            }
        }
    }

    // U from the column reflectors
    let mut u = vec![vec![0.0; m]; m];
    for (k, row) in u.iter_mut().enumerate().skip(p) {
        row[k] = 1.0;
    }
    for k in (0..p).rev() {
        u[k][k] = 1.0;
        if h[k][k] != 0.0 {
            let scale = main[k] * h[k][k];
            for j in k..m {
                let alpha = -(k..m).map(|i| u[i][j] * h[i][k]).sum::<f64>() / scale;
                for i in k..m {
                    u[i][j] += -alpha * h[i][k];
                }
            }
        }
    }

    // V from the row reflectors
    let mut v = vec![vec![0.0; n]; n];
    for (k, row) in v.iter_mut().enumerate().skip(p) {
        row[k] = 1.0;
    }
    for k in (1..p).rev() {
        let reflector = &h[k - 1];
        v[k][k] = 1.0;
        if reflector[k] != 0.0 {
            let scale = secondary[k - 1] * reflector[k];
            for j in k..n {
                let beta = -(k..n).map(|i| v[i][j] * reflector[i]).sum::<f64>() / scale;
                for i in k..n {
                    v[i][j] += -beta * reflector[i];
                }
            }
        }
    }
    if n > 0 {
        v[0][0] = 1.0;
    }

    UpperBidiagonal {
        main,
        secondary,
        u,
        v,
    }
}

/// Reduce `h` (`m × n`, `m < n`) to lower bidiagonal form
fn reduce_lower(mut h: Vec<Vec<f64>>) -> (Vec<f64>, Vec<f64>, Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let m = h.len();
    let n = h.first().map_or(0, Vec::len);
    let p = m;
    let mut main = vec![0.0; p];
    let mut secondary = vec![0.0; p.saturating_sub(1)];

    for k in 0..m {
        // right reflector on row k
        let x_norm_sqr: f64 = h[k][k..].iter().map(|v| v * v).sum();
        let a = reflector_norm(x_norm_sqr, h[k][k]);
        main[k] = a;
        if a != 0.0 {
            h[k][k] -= a;
            let (head, tail) = h.split_at_mut(k + 1);
            let reflector = &head[k];
            for row in tail.iter_mut() {
                let alpha = -row[k..]
                    .iter()
                    .zip(&reflector[k..])
                    .map(|(x, v)| x * v)
                    .sum::<f64>()
                    / (a * reflector[k]);
                for (x, v) in row[k..].iter_mut().zip(&reflector[k..]) {
                    *x -= alpha * v;
                }
            }
        }

        // left reflector on column k
        if k + 1 < m {
            let x_norm_sqr: f64 = (k + 1..m).map(|i| h[i][k] * h[i][k]).sum();
            let b = reflector_norm(x_norm_sqr, h[k + 1][k]);
            secondary[k] = b;
            if b != 0.0 {
                h[k + 1][k] -= b;
                for j in k + 1..n {
                    let beta =
                        -(k + 1..m).map(|i| h[i][j] * h[i][k]).sum::<f64>() / (b * h[k + 1][k]);
                    for row in h[k + 1..].iter_mut() {
                        row[j] -= beta * row[k];
                    }
                }
            }
        }
    }

    let mut u = vec![vec![0.0; m]; m];
    for k in (1..p).rev() {
        u[k][k] = 1.0;
        if h[k][k - 1] != 0.0 {
            let scale = secondary[k - 1] * h[k][k - 1];
            for j in k..m {
                let alpha = -(k..m).map(|i| u[i][j] * h[i][k - 1]).sum::<f64>() / scale;
                for i in k..m {
                    u[i][j] += -alpha * h[i][k - 1];
                }
            }
        }
    }
    u[0][0] = 1.0;

    let mut v = vec![vec![0.0; n]; n];
    for (k, row) in v.iter_mut().enumerate().skip(p) {
        row[k] = 1.0;
    }
    for k in (0..p).rev() {
        let reflector = &h[k];
        v[k][k] = 1.0;
        if reflector[k] != 0.0 {
            let scale = main[k] * reflector[k];
            for j in k..n {
                let beta = -(k..n).map(|i| v[i][j] * reflector[i]).sum::<f64>() / scale;
                for i in k..n {
                    v[i][j] += -beta * reflector[i];
                }
            }
        }
    }

    (main, secondary, u, v)
}

/// Orthogonal reduction `A = U · B · Vᵀ` with B bidiagonal
#[derive(Debug, Clone)]
pub struct BidiagonalTransformer {
    main: Vec<f64>,
    secondary: Vec<f64>,
    upper: bool,
    u: RealMatrix,
    ut: RealMatrix,
    b: RealMatrix,
    v: RealMatrix,
    vt: RealMatrix,
}

impl BidiagonalTransformer {
    /// Reduce a matrix of any shape
    ///
    /// Matrices with at least as many rows as columns become upper
    /// bidiagonal, wider ones lower bidiagonal.
    pub fn new(matrix: &RealMatrix) -> Result<Self> {
        let (rows, cols) = (matrix.rows(), matrix.cols());
        let upper = rows >= cols;
        let (main, secondary, u, v) = if upper {
            let UpperBidiagonal {
                main,
                secondary,
                u,
                v,
            } = reduce_upper(matrix.to_rows());
            (main, secondary, u, v)
        } else {
            reduce_lower(matrix.to_rows())
        };

        let b = RealMatrix::filled_with(rows, cols, |r, c| {
            if r == c {
                main[r]
            } else if upper && c == r + 1 {
                secondary[r]
            } else if !upper && r == c + 1 {
                secondary[c]
            } else {
                0.0
            }
        });
        let u = matrix_from_rows(&u);
        let v = matrix_from_rows(&v);

        debug!(rows, cols, upper, "bidiagonal reduction computed");

        Ok(Self {
            main,
            secondary,
            upper,
            ut: u.transpose(),
            u,
            b,
            vt: v.transpose(),
            v,
        })
    }

    /// Left orthogonal factor U (`m × m`)
    pub fn u(&self) -> &RealMatrix {
        &self.u
    }

    /// Transpose of U
    pub fn ut(&self) -> &RealMatrix {
        &self.ut
    }

    /// Bidiagonal factor B (`m × n`)
    pub fn b(&self) -> &RealMatrix {
        &self.b
    }

    /// Right orthogonal factor V (`n × n`)
    pub fn v(&self) -> &RealMatrix {
        &self.v
    }

    /// Transpose of V
    pub fn vt(&self) -> &RealMatrix {
        &self.vt
    }

    /// Diagonal of B
    pub fn main_diagonal(&self) -> &[f64] {
        &self.main
    }

    /// Off-diagonal of B: above the diagonal when upper, below it otherwise
    pub fn secondary_diagonal(&self) -> &[f64] {
        &self.secondary
    }

    /// Whether B is upper bidiagonal
    pub fn is_upper_bidiagonal(&self) -> bool {
        self.upper
    }
}
