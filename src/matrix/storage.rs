//! Storage strategies behind [`DenseMatrix`](super::DenseMatrix)
//!
//! Two layouts implement [`MatrixStorage`]:
//! - [`SimpleStorage`]: a single row-major buffer
//! - [`BlockedStorage`]: square tiles of [`BLOCK_SIZE`], each row-major
//!
//! The layout is picked by size at construction ([`StorageKind::for_shape`])
//! and is otherwise invisible: both layouts give identical results for every
//! operation.

use super::blocked::BlockedStorage;
use super::simple::SimpleStorage;
use super::visitor::Region;
use crate::dtype::Element;

/// Edge length of the square tiles used by blocked storage
pub const BLOCK_SIZE: usize = 52;

/// Matrices with more entries than this use blocked storage by default
pub const BLOCKED_THRESHOLD: usize = 4096;

/// Memory layout of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// One row-major buffer
    Simple,
    /// Square tiles of [`BLOCK_SIZE`] entries per side
    Blocked,
}

impl StorageKind {
    /// Layout used for a freshly created `rows × cols` matrix
    pub fn for_shape(rows: usize, cols: usize) -> Self {
        if rows.saturating_mul(cols) > BLOCKED_THRESHOLD {
            StorageKind::Blocked
        } else {
            StorageKind::Simple
        }
    }
}

/// Capability set shared by every storage layout
///
/// Index arguments are assumed valid: [`DenseMatrix`](super::DenseMatrix)
/// validates them before calling in.
pub(crate) trait MatrixStorage<T: Element>: Clone + Sized {
    /// Zero-filled storage
    fn zeros(rows: usize, cols: usize) -> Self;

    /// Storage holding the given row-major data
    fn from_row_major(rows: usize, cols: usize, data: &[T]) -> Self;

    /// Number of rows
    fn rows(&self) -> usize;

    /// Number of columns
    fn cols(&self) -> usize;

    /// Reference to one entry
    fn entry(&self, row: usize, col: usize) -> &T;

    /// Mutable reference to one entry
    fn entry_mut(&mut self, row: usize, col: usize) -> &mut T;

    /// Sub-rectangles of `region` in storage-friendly visiting order
    ///
    /// Walking each returned rectangle row-major, in sequence, visits every
    /// entry of `region` exactly once.
    fn optimized_regions(&self, region: Region) -> Vec<Region>;

    /// Product with another storage of the same layout
    fn multiply(&self, other: &Self) -> Self;

    /// Copy out in row-major order
    fn to_row_major(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.rows() * self.cols());
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                out.push(self.entry(row, col).clone());
            }
        }
        out
    }
}

/// Layout-tagged storage owned by a matrix
#[derive(Debug, Clone)]
pub(crate) enum Storage<T: Element> {
    Simple(SimpleStorage<T>),
    Blocked(BlockedStorage<T>),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Storage::Simple($s) => $body,
            Storage::Blocked($s) => $body,
        }
    };
}

impl<T: Element> Storage<T> {
    pub(crate) fn zeros(rows: usize, cols: usize, kind: StorageKind) -> Self {
        match kind {
            StorageKind::Simple => Storage::Simple(SimpleStorage::zeros(rows, cols)),
            StorageKind::Blocked => Storage::Blocked(BlockedStorage::zeros(rows, cols)),
        }
    }

    pub(crate) fn from_row_major(rows: usize, cols: usize, data: &[T], kind: StorageKind) -> Self {
        match kind {
            StorageKind::Simple => Storage::Simple(SimpleStorage::from_row_major(rows, cols, data)),
            StorageKind::Blocked => {
                Storage::Blocked(BlockedStorage::from_row_major(rows, cols, data))
            }
        }
    }

    pub(crate) fn kind(&self) -> StorageKind {
        match self {
            Storage::Simple(_) => StorageKind::Simple,
            Storage::Blocked(_) => StorageKind::Blocked,
        }
    }

    #[inline]
    pub(crate) fn rows(&self) -> usize {
        dispatch!(self, s => s.rows())
    }

    #[inline]
    pub(crate) fn cols(&self) -> usize {
        dispatch!(self, s => s.cols())
    }

    #[inline]
    pub(crate) fn entry(&self, row: usize, col: usize) -> &T {
        dispatch!(self, s => s.entry(row, col))
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self, row: usize, col: usize) -> &mut T {
        dispatch!(self, s => s.entry_mut(row, col))
    }

    pub(crate) fn optimized_regions(&self, region: Region) -> Vec<Region> {
        dispatch!(self, s => s.optimized_regions(region))
    }

    pub(crate) fn to_row_major(&self) -> Vec<T> {
        dispatch!(self, s => s.to_row_major())
    }

    /// Product of two storages; mixed layouts take the generic path
    pub(crate) fn multiply(&self, other: &Self) -> Self {
        match (self, other) {
            (Storage::Simple(a), Storage::Simple(b))
                if StorageKind::for_shape(a.rows(), b.cols()) == StorageKind::Simple =>
            {
                Storage::Simple(a.multiply(b))
            }
            (Storage::Blocked(a), Storage::Blocked(b))
                if StorageKind::for_shape(a.rows(), b.cols()) == StorageKind::Blocked =>
            {
                Storage::Blocked(a.multiply(b))
            }
            _ => self.multiply_generic(other),
        }
    }

    fn multiply_generic(&self, other: &Self) -> Self {
        let (m, k, n) = (self.rows(), self.cols(), other.cols());
        let mut out = Storage::zeros(m, n, StorageKind::for_shape(m, n));
        for i in 0..m {
            for j in 0..n {
                let mut sum = T::zero();
                for kk in 0..k {
                    sum = sum + self.entry(i, kk).clone() * other.entry(kk, j).clone();
                }
                *out.entry_mut(i, j) = sum;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_for_shape() {
        assert_eq!(StorageKind::for_shape(64, 64), StorageKind::Simple);
        assert_eq!(StorageKind::for_shape(64, 65), StorageKind::Blocked);
        assert_eq!(StorageKind::for_shape(1, 5000), StorageKind::Blocked);
    }

    #[test]
    fn test_mixed_layout_multiply_matches() {
        let data: Vec<f64> = (0..12).map(|v| v as f64 * 0.37 - 1.1).collect();
        let a_simple = Storage::from_row_major(3, 4, &data, StorageKind::Simple);
        let b_simple = Storage::from_row_major(4, 3, &data, StorageKind::Simple);
        let a_blocked = Storage::from_row_major(3, 4, &data, StorageKind::Blocked);
        let b_blocked = Storage::from_row_major(4, 3, &data, StorageKind::Blocked);

        let expected = a_simple.multiply(&b_simple).to_row_major();
        assert_eq!(a_blocked.multiply(&b_blocked).to_row_major(), expected);
        assert_eq!(a_simple.multiply(&b_blocked).to_row_major(), expected);
        assert_eq!(a_blocked.multiply(&b_simple).to_row_major(), expected);
    }
}
