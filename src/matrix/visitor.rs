//! Visitor-based traversal of matrix entries
//!
//! A walk is described by two independent choices: a [`TraversalOrder`] and an
//! optional [`Region`]. Whatever the choice, every entry in the region is
//! handed to the visitor exactly once.
//!
//! Two visitor flavours share one per-cell contract:
//! - [`ChangingVisitor`] returns the replacement value for each entry
//! - [`PreservingVisitor`] only observes entries
//!
//! Closures implement both traits, so quick walks need no named type:
//!
//! ```
//! use dense_linalg::prelude::*;
//!
//! # fn main() -> dense_linalg::error::Result<()> {
//! let mut m = RealMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]])?;
//! m.walk_mut(TraversalOrder::RowMajor, &mut |_row: usize, _col: usize, v: f64| v * 10.0);
//! let mut total = 0.0;
//! m.walk(TraversalOrder::Optimized, &mut |_row: usize, _col: usize, v: &f64| total += *v);
//! assert_eq!(total, 100.0);
//! # Ok(())
//! # }
//! ```

use crate::dtype::Element;
use crate::error::{Axis, Error, Result};

/// Order in which a walk presents entries to its visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    /// Row by row, left to right
    #[default]
    RowMajor,
    /// Column by column, top to bottom
    ColumnMajor,
    /// Whatever order suits the storage layout best
    ///
    /// Row-major for simple storage, tile by tile for blocked storage.
    Optimized,
}

/// Inclusive rectangular range of entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// First row (inclusive)
    pub start_row: usize,
    /// Last row (inclusive)
    pub end_row: usize,
    /// First column (inclusive)
    pub start_col: usize,
    /// Last column (inclusive)
    pub end_col: usize,
}

impl Region {
    /// Create a region from inclusive bounds
    pub fn new(start_row: usize, end_row: usize, start_col: usize, end_col: usize) -> Self {
        Self {
            start_row,
            end_row,
            start_col,
            end_col,
        }
    }

    /// Region covering a whole `rows × cols` matrix
    pub fn full(rows: usize, cols: usize) -> Self {
        Self::new(0, rows - 1, 0, cols - 1)
    }

    /// Number of rows covered
    pub fn row_count(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    /// Number of columns covered
    pub fn col_count(&self) -> usize {
        self.end_col - self.start_col + 1
    }

    /// Number of entries covered
    pub fn len(&self) -> usize {
        self.row_count() * self.col_count()
    }

    /// Always false: a valid region covers at least one entry
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check the region against a `rows × cols` matrix
    pub fn validate(&self, rows: usize, cols: usize) -> Result<()> {
        check_index(Axis::Row, self.start_row, rows)?;
        check_index(Axis::Row, self.end_row, rows)?;
        check_index(Axis::Column, self.start_col, cols)?;
        check_index(Axis::Column, self.end_col, cols)?;
        if self.end_row < self.start_row {
            return Err(Error::InvalidRange {
                axis: Axis::Row,
                start: self.start_row,
                end: self.end_row,
            });
        }
        if self.end_col < self.start_col {
            return Err(Error::InvalidRange {
                axis: Axis::Column,
                start: self.start_col,
                end: self.end_col,
            });
        }
        Ok(())
    }

    /// Intersection with another region, if any
    pub(crate) fn intersect(&self, other: &Region) -> Option<Region> {
        let start_row = self.start_row.max(other.start_row);
        let end_row = self.end_row.min(other.end_row);
        let start_col = self.start_col.max(other.start_col);
        let end_col = self.end_col.min(other.end_col);
        (start_row <= end_row && start_col <= end_col)
            .then(|| Region::new(start_row, end_row, start_col, end_col))
    }
}

pub(crate) fn check_index(axis: Axis, index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(Error::index_out_of_range(axis, index, len));
    }
    Ok(())
}

/// Visitor that may replace every entry it sees
pub trait ChangingVisitor<T: Element> {
    /// Called once before the first entry
    fn start(&mut self, _rows: usize, _cols: usize, _region: Region) {}

    /// Visit one entry and return its new value
    fn visit(&mut self, row: usize, col: usize, value: T) -> T;

    /// Called once after the last entry; its value is returned by the walk
    fn end(&mut self) -> T {
        T::zero()
    }
}

/// Visitor that observes entries without modifying them
pub trait PreservingVisitor<T: Element> {
    /// Called once before the first entry
    fn start(&mut self, _rows: usize, _cols: usize, _region: Region) {}

    /// Visit one entry
    fn visit(&mut self, row: usize, col: usize, value: &T);

    /// Called once after the last entry; its value is returned by the walk
    fn end(&mut self) -> T {
        T::zero()
    }
}

impl<T: Element, F: FnMut(usize, usize, T) -> T> ChangingVisitor<T> for F {
    fn visit(&mut self, row: usize, col: usize, value: T) -> T {
        self(row, col, value)
    }
}

impl<T: Element, F: FnMut(usize, usize, &T)> PreservingVisitor<T> for F {
    fn visit(&mut self, row: usize, col: usize, value: &T) {
        self(row, col, value)
    }
}

/// Cell coordinates of `region` in the given plain order
///
/// `Optimized` is resolved by the storage before reaching this point, so it
/// is treated as row-major here.
pub(crate) fn cells(order: TraversalOrder, region: Region) -> impl Iterator<Item = (usize, usize)> {
    let start_row = region.start_row;
    let start_col = region.start_col;
    let row_count = region.row_count();
    let col_count = region.col_count();
    (0..region.len()).map(move |idx| match order {
        TraversalOrder::ColumnMajor => (start_row + idx % row_count, start_col + idx / row_count),
        TraversalOrder::RowMajor | TraversalOrder::Optimized => {
            (start_row + idx / col_count, start_col + idx % col_count)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_row_and_column_order() {
        let region = Region::new(1, 2, 0, 2);
        let rows: Vec<_> = cells(TraversalOrder::RowMajor, region).collect();
        assert_eq!(rows, vec![(1, 0), (1, 1), (1, 2), (2, 0), (2, 1), (2, 2)]);

        let cols: Vec<_> = cells(TraversalOrder::ColumnMajor, region).collect();
        assert_eq!(cols, vec![(1, 0), (2, 0), (1, 1), (2, 1), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_region_validation() {
        assert!(Region::new(0, 1, 0, 1).validate(2, 2).is_ok());
        assert_eq!(
            Region::new(0, 2, 0, 1).validate(2, 2),
            Err(Error::IndexOutOfRange {
                axis: Axis::Row,
                index: 2,
                min: 0,
                max: 1
            })
        );
        assert!(matches!(
            Region::new(0, 1, 1, 0).validate(2, 2),
            Err(Error::InvalidRange {
                axis: Axis::Column,
                ..
            })
        ));
    }

    #[test]
    fn test_intersect() {
        let a = Region::new(0, 51, 0, 51);
        let b = Region::new(10, 60, 40, 45);
        assert_eq!(a.intersect(&b), Some(Region::new(10, 51, 40, 45)));
        assert_eq!(a.intersect(&Region::new(52, 60, 0, 3)), None);
    }
}
