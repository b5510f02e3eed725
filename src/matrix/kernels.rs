//! Matrix multiplication kernels
//!
//! Every kernel accumulates each output entry starting from zero in increasing
//! inner-index order with plain multiply then add. Simple and blocked storage
//! both route through [`multiply_accumulate`], so they agree bit for bit.

use crate::dtype::Element;

/// Accumulating matrix multiplication: C += A @ B
///
/// # Arguments
/// * `a` - Matrix A (m × k), row-major with leading dimension lda
/// * `b` - Matrix B (k × n), row-major with leading dimension ldb
/// * `out` - Matrix C (m × n), row-major with leading dimension ldc
/// * `m`, `n`, `k` - Matrix dimensions
/// * `lda`, `ldb`, `ldc` - Leading dimensions (row stride in elements)
#[inline]
#[allow(clippy::too_many_arguments)]
pub(crate) fn multiply_accumulate<T: Element>(
    a: &[T],
    b: &[T],
    out: &mut [T],
    m: usize,
    n: usize,
    k: usize,
    lda: usize,
    ldb: usize,
    ldc: usize,
) {
    debug_assert!(m == 0 || a.len() >= (m - 1) * lda + k);
    debug_assert!(k == 0 || b.len() >= (k - 1) * ldb + n);
    debug_assert!(m == 0 || out.len() >= (m - 1) * ldc + n);

    // ikj order: better cache locality for B
    for i in 0..m {
        let out_row = &mut out[i * ldc..i * ldc + n];
        for kk in 0..k {
            let a_val = &a[i * lda + kk];
            let b_row = &b[kk * ldb..kk * ldb + n];
            for (o, b_val) in out_row.iter_mut().zip(b_row) {
                let acc = std::mem::replace(o, T::zero());
                *o = acc + a_val.clone() * b_val.clone();
            }
        }
    }
}

/// Dense row-major multiplication: returns A @ B as a fresh buffer
pub(crate) fn multiply_row_major<T: Element>(
    a: &[T],
    b: &[T],
    m: usize,
    n: usize,
    k: usize,
) -> Vec<T> {
    let mut out = vec![T::zero(); m * n];
    multiply_accumulate(a, b, &mut out, m, n, k, k, n, n);
    out
}

/// Dot product accumulated from zero in index order
#[inline]
pub(crate) fn dot<'a, T: Element>(
    lhs: impl IntoIterator<Item = &'a T>,
    rhs: impl IntoIterator<Item = &'a T>,
) -> T {
    lhs.into_iter()
        .zip(rhs)
        .fold(T::zero(), |acc, (l, r)| acc + l.clone() * r.clone())
}
