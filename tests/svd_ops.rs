//! Integration tests for singular value decomposition
//!
//! Tests verify:
//! - Reconstruction: A == U @ Σ @ Vᵀ for tall, square and wide matrices
//! - U, V orthogonal; singular values non-negative and descending
//! - Known singular values, rank, norm and condition number
//! - Pseudo-inverse, covariance and solving

use dense_linalg::prelude::*;

mod common;

use common::{
    assert_allclose_f64, assert_matrix_close, assert_orthogonal, big_singular, init_test_logging,
    random_matrix,
};

fn non_square() -> RealMatrix {
    RealMatrix::from_rows(vec![
        vec![-540.0, 963.0, -216.0],
        vec![-1730.0, -744.0, 1008.0],
        vec![-720.0, 1284.0, -288.0],
        vec![-360.0, 192.0, 1756.0],
    ])
    .unwrap()
    .scalar_multiply(1.0 / 625.0)
}

fn square() -> RealMatrix {
    RealMatrix::from_rows(vec![vec![24.0, 43.0], vec![57.0, 24.0]])
        .unwrap()
        .scalar_multiply(1.0 / 25.0)
}

#[test]
fn test_reconstruction() {
    init_test_logging();
    let matrices = vec![
        square(),
        non_square(),
        non_square().transpose(),
        big_singular(),
        random_matrix(7, 3, 61),
        random_matrix(3, 7, 62),
        random_matrix(6, 6, 63),
    ];
    for m in matrices {
        let [rows, cols] = m.shape();
        let svd = SingularValueDecomposition::new(&m).unwrap();
        assert_eq!(svd.u().shape(), [rows, rows]);
        assert_eq!(svd.s().shape(), [rows, cols]);
        assert_eq!(svd.v().shape(), [cols, cols]);

        let product = svd.u().multiply(svd.s()).unwrap().multiply(svd.vt()).unwrap();
        let msg = format!("U·Σ·Vᵀ for {rows}×{cols}");
        assert_matrix_close(&product, &m, 1e-13 * m.norm(), &msg);
        assert_orthogonal(svd.u(), 1e-13, "U");
        assert_orthogonal(svd.v(), 1e-13, "V");
        assert_eq!(svd.ut(), &svd.u().transpose());
        assert_eq!(svd.vt(), &svd.v().transpose());
        assert!(std::ptr::eq(svd.u(), svd.u()));
        assert!(std::ptr::eq(svd.s(), svd.s()));
        assert!(std::ptr::eq(svd.v(), svd.v()));

        let values = svd.singular_values();
        assert_eq!(values.len(), rows.min(cols));
        assert!(values.iter().all(|&s| s >= 0.0));
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }
}

#[test]
fn test_known_singular_values() {
    let svd = SingularValueDecomposition::new(&square()).unwrap();
    assert_allclose_f64(svd.singular_values(), &[3.0, 1.0], 0.0, 1e-14, "square");
    assert!((svd.condition_number() - 3.0).abs() < 1e-13);

    let svd = SingularValueDecomposition::new(&non_square()).unwrap();
    assert_allclose_f64(svd.singular_values(), &[4.0, 3.0, 2.0], 0.0, 1e-14, "non-square");
    assert!((svd.norm() - 4.0).abs() < 1e-14);
    assert!((svd.condition_number() - 2.0).abs() < 1e-13);
    assert!((svd.inverse_condition_number() - 0.5).abs() < 1e-13);

    // transposing does not change the spectrum
    let svd_t = SingularValueDecomposition::new(&non_square().transpose()).unwrap();
    assert_allclose_f64(svd_t.singular_values(), &[4.0, 3.0, 2.0], 0.0, 1e-14, "wide");
}

#[test]
fn test_rank() {
    assert_eq!(SingularValueDecomposition::new(&non_square()).unwrap().rank(), 3);
    assert_eq!(SingularValueDecomposition::new(&big_singular()).unwrap().rank(), 3);

    let rank_one = RealMatrix::from_rows(vec![
        vec![1.0, 2.0, 3.0],
        vec![2.0, 4.0, 6.0],
    ])
    .unwrap();
    let svd = SingularValueDecomposition::new(&rank_one).unwrap();
    assert_eq!(svd.rank(), 1);
    assert!(!svd.solver().is_non_singular());
}

#[test]
fn test_pseudo_inverse_penrose_conditions() {
    for m in [big_singular(), non_square(), random_matrix(3, 5, 71)] {
        let svd = SingularValueDecomposition::new(&m).unwrap();
        let pinv = svd.pseudo_inverse();
        assert_eq!(pinv.shape(), [m.cols(), m.rows()]);

        let a_pinv_a = m.multiply(pinv).unwrap().multiply(&m).unwrap();
        assert_matrix_close(&a_pinv_a, &m, 1e-10 * m.norm(), "A·A⁺·A");

        let pinv_a_pinv = pinv.multiply(&m).unwrap().multiply(pinv).unwrap();
        assert_matrix_close(&pinv_a_pinv, pinv, 1e-10 * pinv.norm(), "A⁺·A·A⁺");

        let a_pinv = m.multiply(pinv).unwrap();
        assert_matrix_close(&a_pinv, &a_pinv.transpose(), 1e-10, "A·A⁺ symmetric");
    }
}

#[test]
fn test_solve_least_squares() {
    let a = non_square();
    let b = [1.0, 2.0, 3.0, 4.0];
    let x_svd = SingularValueDecomposition::new(&a)
        .unwrap()
        .solver()
        .solve(&b)
        .unwrap();
    let x_qr = QrDecomposition::new(&a).unwrap().solver().solve(&b).unwrap();
    assert_allclose_f64(&x_svd, &x_qr, 0.0, 1e-13, "SVD vs QR least squares");
}

#[test]
fn test_solve_underdetermined_minimum_norm() {
    let a = RealMatrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
    let svd = SingularValueDecomposition::new(&a).unwrap();
    assert!(svd.solver().is_non_singular());
    let x = svd.solver().solve(&[5.0, 14.0]).unwrap();
    assert_allclose_f64(&a.operate(&x).unwrap(), &[5.0, 14.0], 0.0, 1e-13, "A x = b");

    // the minimum-norm solution has no component along the null space (1, -2, 1)
    let null_component = x[0] - 2.0 * x[1] + x[2];
    assert!(null_component.abs() < 1e-13);
}

#[test]
fn test_solve_singular() {
    let svd = SingularValueDecomposition::new(&big_singular()).unwrap();
    let solver = svd.solver();
    assert!(!solver.is_non_singular());
    assert_eq!(solver.solve(&[1.0; 4]), Err(Error::Singular));
    assert!(matches!(
        solver.solve(&[1.0; 3]),
        Err(Error::DimensionMismatch { .. })
    ));
}

#[test]
fn test_covariance() {
    let a = non_square();
    let svd = SingularValueDecomposition::new(&a).unwrap();
    let cov = svd.covariance(0.0).unwrap();

    // with every singular value retained, the covariance is (AᵀA)⁻¹
    let normal = a.transpose().multiply(&a).unwrap();
    assert_matrix_close(
        &cov.multiply(&normal).unwrap(),
        &RealMatrix::identity(3).unwrap(),
        1e-13,
        "cov · AᵀA",
    );

    // dropping σ = 2 keeps only the two largest directions
    let truncated = svd.covariance(2.5).unwrap();
    assert_eq!(truncated.shape(), [3, 3]);
    assert!(truncated.frobenius_norm() < cov.frobenius_norm());

    assert!(matches!(
        svd.covariance(5.0),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn test_iteration_budget() {
    let options = SvdOptions {
        max_iterations: 0,
        ..SvdOptions::default()
    };
    assert_eq!(
        SingularValueDecomposition::with_options(&square(), options).unwrap_err(),
        Error::NotConvergent { iterations: 0 }
    );
}
