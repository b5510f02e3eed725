//! Row-major storage in a single buffer

use super::kernels::multiply_row_major;
use super::storage::MatrixStorage;
use super::visitor::Region;
use crate::dtype::Element;

/// Row-major matrix storage
#[derive(Debug, Clone)]
pub(crate) struct SimpleStorage<T: Element> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Element> MatrixStorage<T> for SimpleStorage<T> {
    fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::zero(); rows * cols],
        }
    }

    fn from_row_major(rows: usize, cols: usize, data: &[T]) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self {
            rows,
            cols,
            data: data.to_vec(),
        }
    }

    #[inline]
    fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn entry(&self, row: usize, col: usize) -> &T {
        &self.data[row * self.cols + col]
    }

    #[inline]
    fn entry_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[row * self.cols + col]
    }

    fn optimized_regions(&self, region: Region) -> Vec<Region> {
        vec![region]
    }

    fn multiply(&self, other: &Self) -> Self {
        let (m, k, n) = (self.rows, self.cols, other.cols);
        Self {
            rows: m,
            cols: n,
            data: multiply_row_major(&self.data, &other.data, m, n, k),
        }
    }

    fn to_row_major(&self) -> Vec<T> {
        self.data.clone()
    }
}
