//! Dense matrices
//!
//! [`DenseMatrix`] is a rectangular grid of [`Element`]s with at least one row
//! and one column. Storage is either a single row-major buffer or a grid of
//! cache-sized tiles; the choice is made from the shape at construction and
//! never changes observable behavior.
//!
//! ```
//! use dense_linalg::prelude::*;
//!
//! # fn main() -> dense_linalg::error::Result<()> {
//! let a = RealMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]])?;
//! let b = RealMatrix::identity(2)?;
//! assert_eq!(a.multiply(&b)?, a);
//! assert_eq!(a.operate(&[1.0, 1.0])?, vec![3.0, 7.0]);
//! # Ok(())
//! # }
//! ```

mod blocked;
mod kernels;
mod ops;
mod real;
mod simple;
mod storage;
mod visitor;

pub(crate) use kernels::dot;
pub(crate) use visitor::check_index;
pub use storage::{BLOCK_SIZE, BLOCKED_THRESHOLD, StorageKind};
pub use visitor::{ChangingVisitor, PreservingVisitor, Region, TraversalOrder};

use crate::dtype::Element;
use crate::error::{Axis, Error, Result};
use crate::vector::DenseVector;
use storage::Storage;
use visitor::cells;

/// Dense matrix over an element type
#[derive(Debug, Clone)]
pub struct DenseMatrix<T: Element = f64> {
    storage: Storage<T>,
}

/// Equality compares shape and entries; the storage layout is ignored.
impl<T: Element> PartialEq for DenseMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape()
            && (0..self.rows())
                .all(|r| (0..self.cols()).all(|c| self.entry(r, c) == other.entry(r, c)))
    }
}

/// Dense matrix of `f64`
pub type RealMatrix = DenseMatrix<f64>;

// ============================================================================
// Construction
// ============================================================================

impl<T: Element> DenseMatrix<T> {
    /// Zero matrix with the layout chosen from its size
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Self::zeros_with_storage(rows, cols, StorageKind::for_shape(rows, cols))
    }

    /// Zero matrix with an explicit layout
    pub fn zeros_with_storage(rows: usize, cols: usize, kind: StorageKind) -> Result<Self> {
        validate_shape(rows, cols)?;
        Ok(Self {
            storage: Storage::zeros(rows, cols, kind),
        })
    }

    /// Matrix from row-major data
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        Self::from_row_major_with_storage(rows, cols, data, StorageKind::for_shape(rows, cols))
    }

    /// Matrix from row-major data with an explicit layout
    pub fn from_row_major_with_storage(
        rows: usize,
        cols: usize,
        data: Vec<T>,
        kind: StorageKind,
    ) -> Result<Self> {
        validate_shape(rows, cols)?;
        if data.len() != rows * cols {
            return Err(Error::dimension_mismatch(&[rows * cols], &[data.len()]));
        }
        Ok(Self {
            storage: Storage::from_row_major(rows, cols, &data, kind),
        })
    }

    /// Matrix from an array of rows
    ///
    /// Fails on empty input or rows of unequal length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let (m, n) = validate_rows(&rows)?;
        let data: Vec<T> = rows.into_iter().flatten().collect();
        Self::from_row_major(m, n, data)
    }

    /// Matrix from borrowed row slices
    pub fn from_row_slices(rows: &[&[T]]) -> Result<Self> {
        Self::from_rows(rows.iter().map(|r| r.to_vec()).collect())
    }

    /// `n × n` identity matrix
    ///
    /// Fails with [`Error::EmptyInput`] when `n` is zero.
    pub fn identity(n: usize) -> Result<Self> {
        validate_shape(n, n)?;
        Ok(Self::identity_of_order(n))
    }

    /// Identity for an order already known to be non-zero
    pub(crate) fn identity_of_order(n: usize) -> Self {
        let mut storage = Storage::zeros(n, n, StorageKind::for_shape(n, n));
        for i in 0..n {
            *storage.entry_mut(i, i) = T::one();
        }
        Self { storage }
    }

    /// Square matrix with `diagonal` on its main diagonal
    pub fn diagonal(diagonal: &[T]) -> Result<Self> {
        let n = diagonal.len();
        let mut out = Self::zeros(n, n)?;
        for (i, value) in diagonal.iter().enumerate() {
            *out.storage.entry_mut(i, i) = value.clone();
        }
        Ok(out)
    }

    /// `1 × n` matrix holding `row`
    pub fn row_vector_matrix(row: &[T]) -> Result<Self> {
        Self::from_row_major(1, row.len(), row.to_vec())
    }

    /// `n × 1` matrix holding `column`
    pub fn column_vector_matrix(column: &[T]) -> Result<Self> {
        Self::from_row_major(column.len(), 1, column.to_vec())
    }

    /// Copy of this matrix in the given layout
    pub fn to_storage(&self, kind: StorageKind) -> Self {
        if kind == self.storage_kind() {
            return self.clone();
        }
        Self {
            storage: Storage::from_row_major(self.rows(), self.cols(), &self.to_row_major(), kind),
        }
    }

    pub(crate) fn from_storage(storage: Storage<T>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    // Infallible constructor for shapes already known to be valid.
    pub(crate) fn filled_with(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut storage = Storage::zeros(rows, cols, StorageKind::for_shape(rows, cols));
        for row in 0..rows {
            for col in 0..cols {
                *storage.entry_mut(row, col) = f(row, col);
            }
        }
        Self { storage }
    }
}

fn validate_shape(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 {
        return Err(Error::EmptyInput { what: "matrix rows" });
    }
    if cols == 0 {
        return Err(Error::EmptyInput {
            what: "matrix columns",
        });
    }
    Ok(())
}

fn validate_rows<T>(rows: &[Vec<T>]) -> Result<(usize, usize)> {
    let first = rows.first().ok_or(Error::EmptyInput { what: "matrix rows" })?;
    let cols = first.len();
    if cols == 0 {
        return Err(Error::EmptyInput {
            what: "matrix columns",
        });
    }
    if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
        return Err(Error::RaggedRows {
            row,
            expected: cols,
            got: r.len(),
        });
    }
    Ok((rows.len(), cols))
}

// ============================================================================
// Entry access
// ============================================================================

impl<T: Element> DenseMatrix<T> {
    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.storage.rows()
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.storage.cols()
    }

    /// `[rows, cols]`
    pub fn shape(&self) -> [usize; 2] {
        [self.rows(), self.cols()]
    }

    /// Whether the matrix has as many rows as columns
    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    /// Layout of the underlying storage
    pub fn storage_kind(&self) -> StorageKind {
        self.storage.kind()
    }

    /// Entry at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.check_entry(row, col)?;
        Ok(self.storage.entry(row, col).clone())
    }

    /// Replace the entry at `(row, col)`
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.check_entry(row, col)?;
        *self.storage.entry_mut(row, col) = value;
        Ok(())
    }

    /// Add `increment` to the entry at `(row, col)`
    pub fn add_to_entry(&mut self, row: usize, col: usize, increment: T) -> Result<()> {
        self.check_entry(row, col)?;
        let entry = self.storage.entry_mut(row, col);
        *entry = entry.clone() + increment;
        Ok(())
    }

    /// Multiply the entry at `(row, col)` by `factor`
    pub fn multiply_entry(&mut self, row: usize, col: usize, factor: T) -> Result<()> {
        self.check_entry(row, col)?;
        let entry = self.storage.entry_mut(row, col);
        *entry = entry.clone() * factor;
        Ok(())
    }

    /// Unchecked entry reference; callers guarantee the indices
    #[inline]
    pub(crate) fn entry(&self, row: usize, col: usize) -> &T {
        self.storage.entry(row, col)
    }

    /// Copy of the data as an array of rows
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        (0..self.rows())
            .map(|row| (0..self.cols()).map(|col| self.entry(row, col).clone()).collect())
            .collect()
    }

    /// Copy of the data in row-major order
    pub fn to_row_major(&self) -> Vec<T> {
        self.storage.to_row_major()
    }

    fn check_entry(&self, row: usize, col: usize) -> Result<()> {
        check_index(Axis::Row, row, self.rows())?;
        check_index(Axis::Column, col, self.cols())
    }

    fn check_row(&self, row: usize) -> Result<()> {
        check_index(Axis::Row, row, self.rows())
    }

    fn check_column(&self, col: usize) -> Result<()> {
        check_index(Axis::Column, col, self.cols())
    }

    fn check_selection(&self, rows: &[usize], cols: &[usize]) -> Result<()> {
        if rows.is_empty() {
            return Err(Error::EmptyInput {
                what: "selected rows",
            });
        }
        if cols.is_empty() {
            return Err(Error::EmptyInput {
                what: "selected columns",
            });
        }
        for &row in rows {
            self.check_row(row)?;
        }
        for &col in cols {
            self.check_column(col)?;
        }
        Ok(())
    }
}

// ============================================================================
// Sub-matrices
// ============================================================================

impl<T: Element> DenseMatrix<T> {
    /// Contiguous sub-matrix over inclusive row and column ranges
    pub fn sub_matrix(
        &self,
        start_row: usize,
        end_row: usize,
        start_col: usize,
        end_col: usize,
    ) -> Result<Self> {
        let region = Region::new(start_row, end_row, start_col, end_col);
        region.validate(self.rows(), self.cols())?;
        Ok(Self::filled_with(region.row_count(), region.col_count(), |r, c| {
            self.entry(start_row + r, start_col + c).clone()
        }))
    }

    /// Sub-matrix made of the selected rows and columns, in the given order
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> Result<Self> {
        self.check_selection(rows, cols)?;
        Ok(Self::filled_with(rows.len(), cols.len(), |r, c| {
            self.entry(rows[r], cols[c]).clone()
        }))
    }

    /// Copy a contiguous sub-matrix into the top-left corner of `destination`
    ///
    /// `destination` must have at least as many rows and columns as the range.
    pub fn copy_sub_matrix(
        &self,
        start_row: usize,
        end_row: usize,
        start_col: usize,
        end_col: usize,
        destination: &mut [Vec<T>],
    ) -> Result<()> {
        let region = Region::new(start_row, end_row, start_col, end_col);
        region.validate(self.rows(), self.cols())?;
        check_destination(destination, region.row_count(), region.col_count())?;
        for (r, row) in (start_row..=end_row).enumerate() {
            for (c, col) in (start_col..=end_col).enumerate() {
                destination[r][c] = self.entry(row, col).clone();
            }
        }
        Ok(())
    }

    /// Copy selected rows and columns into the top-left corner of `destination`
    pub fn copy_selected(
        &self,
        rows: &[usize],
        cols: &[usize],
        destination: &mut [Vec<T>],
    ) -> Result<()> {
        self.check_selection(rows, cols)?;
        check_destination(destination, rows.len(), cols.len())?;
        for (r, &row) in rows.iter().enumerate() {
            for (c, &col) in cols.iter().enumerate() {
                destination[r][c] = self.entry(row, col).clone();
            }
        }
        Ok(())
    }

    /// Overwrite a block starting at `(row, col)` with `block`
    pub fn set_sub_matrix(&mut self, block: &[Vec<T>], row: usize, col: usize) -> Result<()> {
        let (height, width) = validate_rows(block)?;
        let region = Region::new(
            row,
            row.saturating_add(height - 1),
            col,
            col.saturating_add(width - 1),
        );
        region.validate(self.rows(), self.cols())?;
        for (r, values) in block.iter().enumerate() {
            for (c, value) in values.iter().enumerate() {
                *self.storage.entry_mut(row + r, col + c) = value.clone();
            }
        }
        Ok(())
    }
}

fn check_destination<T>(destination: &[Vec<T>], rows: usize, cols: usize) -> Result<()> {
    let too_small = destination.len() < rows || destination[..rows].iter().any(|r| r.len() < cols);
    if too_small {
        let got_cols = destination.first().map_or(0, Vec::len);
        return Err(Error::dimension_mismatch(&[rows, cols], &[destination.len(), got_cols]));
    }
    Ok(())
}

// ============================================================================
// Rows and columns
// ============================================================================

impl<T: Element> DenseMatrix<T> {
    /// Row `row` as an array
    pub fn row(&self, row: usize) -> Result<Vec<T>> {
        self.check_row(row)?;
        Ok((0..self.cols()).map(|col| self.entry(row, col).clone()).collect())
    }

    /// Column `col` as an array
    pub fn column(&self, col: usize) -> Result<Vec<T>> {
        self.check_column(col)?;
        Ok((0..self.rows()).map(|row| self.entry(row, col).clone()).collect())
    }

    /// Replace row `row`
    pub fn set_row(&mut self, row: usize, values: &[T]) -> Result<()> {
        self.check_row(row)?;
        if values.len() != self.cols() {
            return Err(Error::dimension_mismatch(&[1, self.cols()], &[1, values.len()]));
        }
        for (col, value) in values.iter().enumerate() {
            *self.storage.entry_mut(row, col) = value.clone();
        }
        Ok(())
    }

    /// Replace column `col`
    pub fn set_column(&mut self, col: usize, values: &[T]) -> Result<()> {
        self.check_column(col)?;
        if values.len() != self.rows() {
            return Err(Error::dimension_mismatch(&[self.rows(), 1], &[values.len(), 1]));
        }
        for (row, value) in values.iter().enumerate() {
            *self.storage.entry_mut(row, col) = value.clone();
        }
        Ok(())
    }

    /// Row `row` as a `1 × cols` matrix
    pub fn row_matrix(&self, row: usize) -> Result<Self> {
        Self::row_vector_matrix(&self.row(row)?)
    }

    /// Column `col` as a `rows × 1` matrix
    pub fn column_matrix(&self, col: usize) -> Result<Self> {
        Self::column_vector_matrix(&self.column(col)?)
    }

    /// Replace row `row` with a `1 × cols` matrix
    pub fn set_row_matrix(&mut self, row: usize, matrix: &Self) -> Result<()> {
        if matrix.rows() != 1 || matrix.cols() != self.cols() {
            return Err(Error::dimension_mismatch(&[1, self.cols()], &matrix.shape()));
        }
        self.set_row(row, &matrix.to_row_major())
    }

    /// Replace column `col` with a `rows × 1` matrix
    pub fn set_column_matrix(&mut self, col: usize, matrix: &Self) -> Result<()> {
        if matrix.cols() != 1 || matrix.rows() != self.rows() {
            return Err(Error::dimension_mismatch(&[self.rows(), 1], &matrix.shape()));
        }
        self.set_column(col, &matrix.to_row_major())
    }

    /// Row `row` as a vector
    pub fn row_vector(&self, row: usize) -> Result<DenseVector<T>> {
        Ok(DenseVector::from_vec(self.row(row)?))
    }

    /// Column `col` as a vector
    pub fn column_vector(&self, col: usize) -> Result<DenseVector<T>> {
        Ok(DenseVector::from_vec(self.column(col)?))
    }

    /// Replace row `row` with a vector
    pub fn set_row_vector(&mut self, row: usize, vector: &DenseVector<T>) -> Result<()> {
        self.set_row(row, vector.as_slice())
    }

    /// Replace column `col` with a vector
    pub fn set_column_vector(&mut self, col: usize, vector: &DenseVector<T>) -> Result<()> {
        self.set_column(col, vector.as_slice())
    }
}

// ============================================================================
// Traversal
// ============================================================================

impl<T: Element> DenseMatrix<T> {
    /// Visit every entry in `order`, replacing each with the visitor's result
    pub fn walk_mut<V: ChangingVisitor<T>>(&mut self, order: TraversalOrder, visitor: &mut V) -> T {
        let region = Region::full(self.rows(), self.cols());
        self.walk_validated_mut(order, region, visitor)
    }

    /// Visit every entry in `order` without modifying the matrix
    pub fn walk<V: PreservingVisitor<T>>(&self, order: TraversalOrder, visitor: &mut V) -> T {
        let region = Region::full(self.rows(), self.cols());
        self.walk_validated(order, region, visitor)
    }

    /// Visit the entries of `region` in `order`, replacing each one
    pub fn walk_region_mut<V: ChangingVisitor<T>>(
        &mut self,
        order: TraversalOrder,
        region: Region,
        visitor: &mut V,
    ) -> Result<T> {
        region.validate(self.rows(), self.cols())?;
        Ok(self.walk_validated_mut(order, region, visitor))
    }

    /// Visit the entries of `region` in `order` without modifying them
    pub fn walk_region<V: PreservingVisitor<T>>(
        &self,
        order: TraversalOrder,
        region: Region,
        visitor: &mut V,
    ) -> Result<T> {
        region.validate(self.rows(), self.cols())?;
        Ok(self.walk_validated(order, region, visitor))
    }

    fn walk_validated_mut<V: ChangingVisitor<T>>(
        &mut self,
        order: TraversalOrder,
        region: Region,
        visitor: &mut V,
    ) -> T {
        visitor.start(self.rows(), self.cols(), region);
        for part in self.traversal_parts(order, region) {
            for (row, col) in cells(order, part) {
                let entry = self.storage.entry_mut(row, col);
                let current = std::mem::replace(entry, T::zero());
                *entry = visitor.visit(row, col, current);
            }
        }
        visitor.end()
    }

    fn walk_validated<V: PreservingVisitor<T>>(
        &self,
        order: TraversalOrder,
        region: Region,
        visitor: &mut V,
    ) -> T {
        visitor.start(self.rows(), self.cols(), region);
        for part in self.traversal_parts(order, region) {
            for (row, col) in cells(order, part) {
                visitor.visit(row, col, self.entry(row, col));
            }
        }
        visitor.end()
    }

    fn traversal_parts(&self, order: TraversalOrder, region: Region) -> Vec<Region> {
        match order {
            TraversalOrder::Optimized => self.storage.optimized_regions(region),
            TraversalOrder::RowMajor | TraversalOrder::ColumnMajor => vec![region],
        }
    }
}
