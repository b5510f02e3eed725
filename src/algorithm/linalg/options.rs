//! Tuning options for the decompositions
//!
//! Every threshold a decomposition uses to make a numerical judgement lives
//! here, with the default it falls back to.

/// Default relative threshold below which a pivot or diagonal counts as zero
pub const DEFAULT_SINGULARITY_THRESHOLD: f64 = 1e-11;

// ============================================================================
// LU
// ============================================================================

/// Configuration options for LU decomposition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuOptions {
    /// Largest pivot candidate at or below this fraction of the matrix
    /// 1-norm marks the matrix singular (default: 1e-11)
    pub singularity_threshold: f64,
}

impl Default for LuOptions {
    fn default() -> Self {
        Self {
            singularity_threshold: DEFAULT_SINGULARITY_THRESHOLD,
        }
    }
}

// ============================================================================
// Cholesky
// ============================================================================

/// Configuration options for Cholesky decomposition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CholeskyOptions {
    /// Largest accepted `|a_ij - a_ji| / max(|a_ij|, |a_ji|)` (default: 1e-15)
    pub relative_symmetry_threshold: f64,
    /// Diagonal pivots must exceed this value (default: 1e-10)
    pub absolute_positivity_threshold: f64,
}

impl Default for CholeskyOptions {
    fn default() -> Self {
        Self {
            relative_symmetry_threshold: 1e-15,
            absolute_positivity_threshold: 1e-10,
        }
    }
}

// ============================================================================
// QR
// ============================================================================

/// Configuration options for QR decomposition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QrOptions {
    /// A diagonal entry of R at or below this fraction of the matrix 1-norm
    /// marks the matrix rank deficient (default: 1e-11)
    pub rank_threshold: f64,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            rank_threshold: DEFAULT_SINGULARITY_THRESHOLD,
        }
    }
}

// ============================================================================
// Eigen
// ============================================================================

/// Configuration options for symmetric eigen-decomposition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenOptions {
    /// Relative symmetry tolerance; `None` uses `10 · n² · ε` (default: None)
    pub symmetry_threshold: Option<f64>,
    /// QL sweeps allowed per eigenvalue before giving up (default: 30)
    pub max_iterations: usize,
    /// Eigenvalues at or below this fraction of the largest magnitude mark
    /// the matrix singular for solving (default: 1e-11)
    pub singularity_threshold: f64,
}

impl Default for EigenOptions {
    fn default() -> Self {
        Self {
            symmetry_threshold: None,
            max_iterations: 30,
            singularity_threshold: DEFAULT_SINGULARITY_THRESHOLD,
        }
    }
}

// ============================================================================
// SVD
// ============================================================================

/// Configuration options for singular value decomposition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvdOptions {
    /// Singular values at or below this fraction of the largest one do not
    /// count towards the rank (default: 1e-11)
    pub rank_threshold: f64,
    /// Sweeps allowed per singular value before giving up (default: 75)
    pub max_iterations: usize,
}

impl Default for SvdOptions {
    fn default() -> Self {
        Self {
            rank_threshold: DEFAULT_SINGULARITY_THRESHOLD,
            max_iterations: 75,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(LuOptions::default().singularity_threshold, 1e-11);
        let chol = CholeskyOptions::default();
        assert_eq!(chol.relative_symmetry_threshold, 1e-15);
        assert_eq!(chol.absolute_positivity_threshold, 1e-10);
        assert_eq!(EigenOptions::default().max_iterations, 30);
        assert!(EigenOptions::default().symmetry_threshold.is_none());
        assert_eq!(QrOptions::default().rank_threshold, 1e-11);
        assert_eq!(SvdOptions::default().max_iterations, 75);
    }
}
