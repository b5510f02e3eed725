//! Integration tests for LU decomposition
//!
//! Tests verify:
//! - Reconstruction: P @ A == L @ U
//! - Factor structure: L unit lower, U upper, P a permutation
//! - Determinant and solving against known results
//! - Singularity detection relative to the matrix norm
//! - Exact arithmetic through a rational element type

use dense_linalg::algorithm::linalg::LuSolver;
use dense_linalg::prelude::*;
use num_traits::{One, Zero};
use std::ops::{Add, Div, Mul, Neg, Sub};

mod common;

use common::{
    assert_matrix_close, big_singular, init_test_logging, random_matrix, random_well_conditioned,
};

fn test_matrix() -> RealMatrix {
    RealMatrix::from_rows(vec![
        vec![1.0, 2.0, 3.0],
        vec![2.0, 5.0, 3.0],
        vec![1.0, 0.0, 8.0],
    ])
    .unwrap()
}

// ============================================================================
// Real LU
// ============================================================================

#[test]
fn test_reconstruction() {
    init_test_logging();
    for (i, m) in [test_matrix(), random_matrix(6, 6, 3), random_matrix(9, 9, 4)]
        .iter()
        .enumerate()
    {
        let lu = LuDecomposition::new(m).unwrap();
        let pa = lu.p().unwrap().multiply(m).unwrap();
        let l_u = lu.l().unwrap().multiply(lu.u().unwrap()).unwrap();
        assert_matrix_close(&pa, &l_u, 1e-13 * m.norm(), &format!("P·A = L·U #{i}"));
    }
}

#[test]
fn test_factor_structure() {
    let lu = LuDecomposition::new(&random_matrix(5, 5, 9)).unwrap();
    let l = lu.l().unwrap();
    let u = lu.u().unwrap();
    let p = lu.p().unwrap();
    for i in 0..5 {
        assert_eq!(l.get(i, i).unwrap(), 1.0);
        for j in i + 1..5 {
            assert_eq!(l.get(i, j).unwrap(), 0.0);
            assert_eq!(u.get(j, i).unwrap(), 0.0);
        }
        let row = p.row(i).unwrap();
        assert_eq!(row.iter().filter(|&&v| v == 1.0).count(), 1);
        assert_eq!(row.iter().sum::<f64>(), 1.0);
        assert_eq!(p.get(i, lu.pivot()[i]).unwrap(), 1.0);
    }
}

#[test]
fn test_pivot_and_determinant() {
    let lu = LuDecomposition::new(&test_matrix()).unwrap();
    assert_eq!(lu.pivot(), &[1, 2, 0]);
    assert!((lu.determinant() + 1.0).abs() < 1e-12);
    assert!(!lu.is_singular());

    let id = LuDecomposition::new(&RealMatrix::identity(4).unwrap()).unwrap();
    assert_eq!(id.determinant(), 1.0);
}

#[test]
fn test_solve_matrix_known_result() {
    let lu = LuDecomposition::new(&test_matrix()).unwrap();
    let b = RealMatrix::from_rows(vec![vec![1.0, 0.0], vec![2.0, -5.0], vec![3.0, 1.0]]).unwrap();
    let expected =
        RealMatrix::from_rows(vec![vec![19.0, -71.0], vec![-6.0, 22.0], vec![-2.0, 9.0]]).unwrap();
    let solver = lu.solver();
    assert_matrix_close(&solver.solve_matrix(&b).unwrap(), &expected, 1e-13, "solve_matrix");

    let x = solver.solve_vector(&b.column_vector(0).unwrap()).unwrap();
    common::assert_allclose_f64(x.as_slice(), &[19.0, -6.0, -2.0], 0.0, 1e-13, "solve_vector");
}

#[test]
fn test_inverse() {
    let m = random_well_conditioned(6, 21);
    let inverse = LuDecomposition::new(&m).unwrap().solver().inverse().unwrap();
    assert_matrix_close(
        &m.multiply(&inverse).unwrap(),
        &RealMatrix::identity(6).unwrap(),
        1e-12,
        "A · A⁻¹",
    );
}

#[test]
fn test_dimension_mismatch() {
    let lu = LuDecomposition::new(&test_matrix()).unwrap();
    assert!(matches!(
        lu.solver().solve(&[1.0, 2.0]),
        Err(Error::DimensionMismatch { .. })
    ));
    assert!(matches!(
        lu.solver().solve_matrix(&RealMatrix::zeros(2, 2).unwrap()),
        Err(Error::DimensionMismatch { .. })
    ));
}

#[test]
fn test_non_square_rejected() {
    assert!(matches!(
        LuDecomposition::new(&RealMatrix::zeros(2, 3).unwrap()),
        Err(Error::NonSquare { rows: 2, cols: 3 })
    ));
}

#[test]
fn test_singular() {
    let lu = LuDecomposition::new(&big_singular()).unwrap();
    assert!(lu.is_singular());
    assert_eq!(lu.determinant(), 0.0);
    assert!(lu.l().is_none() && lu.u().is_none() && lu.p().is_none());

    let solver: LuSolver<'_> = lu.solver();
    assert!(!solver.is_non_singular());
    assert_eq!(solver.solve(&[1.0; 4]), Err(Error::Singular));
    assert_eq!(solver.inverse(), Err(Error::Singular));

    let repeated = RealMatrix::from_rows(vec![vec![2.0, 3.0], vec![2.0, 3.0]]).unwrap();
    assert!(LuDecomposition::new(&repeated).unwrap().is_singular());
}

#[test]
fn test_threshold_is_relative_to_norm() {
    let m = RealMatrix::from_rows(vec![
        vec![1.0, 2.0, 3.0],
        vec![2.0, 5.0, 3.0],
        vec![4.000001, 9.0, 9.0],
    ])
    .unwrap();
    let strict = LuOptions {
        singularity_threshold: 1e-5,
    };
    assert!(LuDecomposition::with_options(&m, strict).unwrap().is_singular());
    let loose = LuOptions {
        singularity_threshold: 1e-10,
    };
    assert!(!LuDecomposition::with_options(&m, loose).unwrap().is_singular());
    assert!(!LuDecomposition::new(&m).unwrap().is_singular());

    // scaling the matrix does not change the verdict
    let tiny = m.scalar_multiply(1e-20);
    assert!(!LuDecomposition::new(&tiny).unwrap().is_singular());
}

#[test]
fn test_cached_factors_are_shared() {
    let lu = LuDecomposition::new(&test_matrix()).unwrap();
    assert!(std::ptr::eq(lu.l().unwrap(), lu.l().unwrap()));
    assert!(std::ptr::eq(lu.u().unwrap(), lu.u().unwrap()));
    assert!(std::ptr::eq(lu.p().unwrap(), lu.p().unwrap()));
}

#[test]
fn test_snapshot_of_input() {
    let mut m = test_matrix();
    let lu = LuDecomposition::new(&m).unwrap();
    m.set(0, 0, 100.0).unwrap();
    assert!((lu.determinant() + 1.0).abs() < 1e-12);
}

// ============================================================================
// Exact LU over rationals
// ============================================================================

/// Minimal exact rational for exercising the field path
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fraction {
    num: i64,
    den: i64,
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a.abs() } else { gcd(b, a % b) }
}

impl Fraction {
    fn new(num: i64, den: i64) -> Self {
        assert_ne!(den, 0, "zero denominator");
        let g = gcd(num, den).max(1);
        let sign = if den < 0 { -1 } else { 1 };
        Self {
            num: sign * num / g,
            den: sign * den / g,
        }
    }

    fn int(v: i64) -> Self {
        Self::new(v, 1)
    }
}

impl Add for Fraction {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.num * rhs.den + rhs.num * self.den, self.den * rhs.den)
    }
}

impl Sub for Fraction {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self + -rhs
    }
}

impl Mul for Fraction {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.num * rhs.num, self.den * rhs.den)
    }
}

impl Div for Fraction {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::new(self.num * rhs.den, self.den * rhs.num)
    }
}

impl Neg for Fraction {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            num: -self.num,
            den: self.den,
        }
    }
}

impl Zero for Fraction {
    fn zero() -> Self {
        Self::int(0)
    }
    fn is_zero(&self) -> bool {
        self.num == 0
    }
}

impl One for Fraction {
    fn one() -> Self {
        Self::int(1)
    }
}

fn fraction_matrix(rows: &[&[i64]]) -> DenseMatrix<Fraction> {
    DenseMatrix::from_rows(
        rows.iter()
            .map(|r| r.iter().map(|&v| Fraction::int(v)).collect())
            .collect(),
    )
    .unwrap()
}

#[test]
fn test_exact_reconstruction_and_determinant() {
    let m = fraction_matrix(&[&[1, 2, 3], &[2, 5, 3], &[1, 0, 8]]);
    let lu: FieldLuDecomposition<Fraction> = LuDecomposition::new_exact(&m).unwrap();
    assert_eq!(lu.determinant(), Fraction::int(-1));

    let pa = lu.p().unwrap().multiply(&m).unwrap();
    let l_u = lu.l().unwrap().multiply(lu.u().unwrap()).unwrap();
    assert_eq!(pa, l_u);
}

#[test]
fn test_exact_first_nonzero_pivot() {
    // a zero leading entry forces a swap; a tiny one would not
    let m = fraction_matrix(&[&[0, 1], &[3, 4]]);
    let lu = LuDecomposition::new_exact(&m).unwrap();
    assert_eq!(lu.pivot(), &[1, 0]);
    assert_eq!(lu.determinant(), Fraction::int(-3));

    let m = fraction_matrix(&[&[1, 1], &[100, 4]]);
    assert_eq!(LuDecomposition::new_exact(&m).unwrap().pivot(), &[0, 1]);
}

#[test]
fn test_exact_solve() {
    let m = fraction_matrix(&[&[1, 2, 3], &[2, 5, 3], &[1, 0, 8]]);
    let lu = LuDecomposition::new_exact(&m).unwrap();
    let x = lu
        .solver()
        .solve(&[Fraction::int(14), Fraction::int(21), Fraction::int(25)])
        .unwrap();
    assert_eq!(x, vec![Fraction::int(1), Fraction::int(2), Fraction::int(3)]);

    let inverse = lu.solver().inverse().unwrap();
    assert_eq!(inverse.get(0, 0).unwrap(), Fraction::int(-40));
    assert_eq!(
        m.multiply(&inverse).unwrap(),
        DenseMatrix::<Fraction>::identity(3).unwrap()
    );
}

#[test]
fn test_exact_singular() {
    let m = fraction_matrix(&[&[2, 3], &[4, 6]]);
    let lu = LuDecomposition::new_exact(&m).unwrap();
    assert!(lu.is_singular());
    assert_eq!(lu.determinant(), Fraction::int(0));
    assert_eq!(
        lu.solver().solve(&[Fraction::int(1), Fraction::int(1)]),
        Err(Error::Singular)
    );
}
