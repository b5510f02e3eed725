//! Operations specific to `f64` matrices

use super::RealMatrix;

impl RealMatrix {
    /// Maximum absolute column sum (the induced 1-norm)
    pub fn norm(&self) -> f64 {
        (0..self.cols())
            .map(|c| (0..self.rows()).map(|r| self.entry(r, c).abs()).sum::<f64>())
            .fold(0.0, f64::max)
    }

    /// Square root of the sum of squared entries
    pub fn frobenius_norm(&self) -> f64 {
        let mut sum = 0.0;
        for r in 0..self.rows() {
            for c in 0..self.cols() {
                let v = *self.entry(r, c);
                sum += v * v;
            }
        }
        sum.sqrt()
    }

    /// Whether `|a_ij - a_ji| <= tolerance * max(|a_ij|, |a_ji|)` for all pairs
    pub fn is_symmetric(&self, relative_tolerance: f64) -> bool {
        self.first_asymmetry(relative_tolerance).is_none()
    }

    /// First `(row, col)` pair, `row < col`, breaking relative symmetry
    pub(crate) fn first_asymmetry(&self, relative_tolerance: f64) -> Option<(usize, usize)> {
        if !self.is_square() {
            return Some((0, 0));
        }
        let n = self.rows();
        for i in 0..n {
            for j in i + 1..n {
                let a = *self.entry(i, j);
                let b = *self.entry(j, i);
                if (a - b).abs() > relative_tolerance * a.abs().max(b.abs()) {
                    return Some((i, j));
                }
            }
        }
        None
    }
}
