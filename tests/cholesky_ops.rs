//! Integration tests for Cholesky decomposition

use dense_linalg::prelude::*;

mod common;

use common::{assert_allclose_f64, assert_matrix_close, init_test_logging, random_spd_matrix};

fn spd_fixture() -> RealMatrix {
    RealMatrix::from_rows(vec![
        vec![1.0, 2.0, 4.0, 7.0, 11.0],
        vec![2.0, 13.0, 23.0, 38.0, 58.0],
        vec![4.0, 23.0, 77.0, 122.0, 182.0],
        vec![7.0, 38.0, 122.0, 294.0, 430.0],
        vec![11.0, 58.0, 182.0, 430.0, 855.0],
    ])
    .unwrap()
}

#[test]
fn test_reconstruction() {
    init_test_logging();
    for m in [spd_fixture(), random_spd_matrix(7, 5)] {
        let chol = CholeskyDecomposition::new(&m).unwrap();
        let product = chol.l().multiply(chol.lt()).unwrap();
        assert_matrix_close(&product, &m, 1e-13 * m.norm(), "L·Lᵀ");
    }
}

#[test]
fn test_triangular_factors() {
    let chol = CholeskyDecomposition::new(&spd_fixture()).unwrap();
    let l = chol.l();
    for i in 0..5 {
        assert!(l.get(i, i).unwrap() > 0.0);
        for j in i + 1..5 {
            assert_eq!(l.get(i, j).unwrap(), 0.0);
        }
    }
    assert_eq!(chol.lt(), &l.transpose());
}

#[test]
fn test_determinant() {
    let chol = CholeskyDecomposition::new(&spd_fixture()).unwrap();
    assert!((chol.determinant() - 7_290_000.0).abs() <= 1e-15 * 7_290_000.0);
}

#[test]
fn test_solve() {
    let m = spd_fixture();
    let expected = [1.0, -2.0, 0.5, 3.0, -1.0];
    let b = m.operate(&expected).unwrap();
    let x = CholeskyDecomposition::new(&m).unwrap().solver().solve(&b).unwrap();
    assert_allclose_f64(&x, &expected, 0.0, 1e-10, "Cholesky solve");
}

#[test]
fn test_not_symmetric() {
    let mut m = spd_fixture();
    m.set(3, 1, 38.0 + 1e-6).unwrap();
    assert!(matches!(
        CholeskyDecomposition::new(&m),
        Err(Error::NotSymmetric { row: 1, col: 3, .. })
    ));

    let relaxed = CholeskyOptions {
        relative_symmetry_threshold: 1e-6,
        ..CholeskyOptions::default()
    };
    assert!(CholeskyDecomposition::with_options(&m, relaxed).is_ok());
}

#[test]
fn test_not_positive_definite() {
    let m = RealMatrix::from_rows(vec![
        vec![14.0, 11.0, 13.0, 15.0, 24.0],
        vec![11.0, 34.0, 13.0, 8.0, 25.0],
        vec![13.0, 13.0, 14.0, 15.0, 21.0],
        vec![15.0, 8.0, 15.0, 18.0, 23.0],
        vec![24.0, 25.0, 21.0, 23.0, 45.0],
    ])
    .unwrap();
    assert!(matches!(
        CholeskyDecomposition::new(&m),
        Err(Error::NotPositiveDefinite { .. })
    ));

    let negative = RealMatrix::from_rows(vec![vec![-1.0]]).unwrap();
    assert_eq!(
        CholeskyDecomposition::new(&negative).unwrap_err(),
        Error::NotPositiveDefinite {
            index: 0,
            value: -1.0,
            threshold: 1e-10
        }
    );
}

#[test]
fn test_non_square() {
    assert!(matches!(
        CholeskyDecomposition::new(&RealMatrix::zeros(3, 2).unwrap()),
        Err(Error::NonSquare { .. })
    ));
}

#[test]
fn test_inverse_and_caching() {
    let m = random_spd_matrix(5, 17);
    let chol = CholeskyDecomposition::new(&m).unwrap();
    assert!(std::ptr::eq(chol.l(), chol.l()));
    assert!(chol.solver().is_non_singular());
    let inverse = chol.solver().inverse().unwrap();
    assert_matrix_close(
        &m.multiply(&inverse).unwrap(),
        &RealMatrix::identity(5).unwrap(),
        1e-12,
        "A · A⁻¹",
    );
}
