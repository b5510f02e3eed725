//! Common test utilities
#![allow(dead_code)]

use dense_linalg::matrix::RealMatrix;
use proptest::test_runner::Config as ProptestConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Once;

static INIT_LOGGING: Once = Once::new();

/// Route library `tracing` events to the test output
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .with_target(true)
            .with_ansi(false)
            .try_init();
    });
}

/// Proptest configuration with a fixed number of cases
pub fn test_proptest_config(cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two matrices have the same shape and entries within `atol`
pub fn assert_matrix_close(a: &RealMatrix, b: &RealMatrix, atol: f64, msg: &str) {
    assert_eq!(a.shape(), b.shape(), "{}: shape mismatch", msg);
    assert_allclose_f64(&a.to_row_major(), &b.to_row_major(), 0.0, atol, msg);
}

/// Assert `Mᵀ · M` is the identity within `atol`
pub fn assert_orthogonal(m: &RealMatrix, atol: f64, msg: &str) {
    let product = m.transpose().multiply(m).unwrap();
    assert_matrix_close(&product, &RealMatrix::identity(m.cols()).unwrap(), atol, msg);
}

/// Matrix with uniform entries in [-1, 1), reproducible from `seed`
pub fn random_matrix(rows: usize, cols: usize, seed: u64) -> RealMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..rows * cols)
        .map(|_| rng.random_range(-1.0..1.0))
        .collect();
    RealMatrix::from_row_major(rows, cols, data).unwrap()
}

/// Symmetric positive definite matrix `Bᵀ·B + n·I`, reproducible from `seed`
pub fn random_spd_matrix(n: usize, seed: u64) -> RealMatrix {
    let b = random_matrix(n, n, seed);
    b.transpose()
        .multiply(&b)
        .unwrap()
        .add(&RealMatrix::identity(n).unwrap().scalar_multiply(n as f64))
        .unwrap()
}

/// Diagonally dominant square matrix, well conditioned for any solver
pub fn random_well_conditioned(n: usize, seed: u64) -> RealMatrix {
    random_matrix(n, n, seed)
        .add(&RealMatrix::identity(n).unwrap().scalar_multiply(n as f64))
        .unwrap()
}

/// The 4×4 matrix whose last row is the sum of the first two
pub fn big_singular() -> RealMatrix {
    RealMatrix::from_rows(vec![
        vec![1.0, 2.0, 3.0, 4.0],
        vec![2.0, 5.0, 3.0, 4.0],
        vec![7.0, 3.0, 256.0, 1930.0],
        vec![3.0, 7.0, 6.0, 8.0],
    ])
    .unwrap()
}
