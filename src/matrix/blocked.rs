//! Cache-blocked storage
//!
//! The matrix is cut into square tiles of [`BLOCK_SIZE`] entries per side.
//! Tiles are stored in row-major tile order and each tile is row-major
//! internally. Tiles on the bottom and right edges are truncated to the
//! matrix size, so no padding is stored.
//!
//! Multiplication works one output tile at a time, keeping three tiles hot
//! in cache. With the `rayon` feature, output tiles are computed in parallel;
//! each output entry still accumulates in increasing inner-index order, so
//! the result does not depend on the thread count.

use super::kernels::multiply_accumulate;
use super::storage::{BLOCK_SIZE, MatrixStorage};
use super::visitor::Region;
use crate::dtype::Element;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Tiled matrix storage
#[derive(Debug, Clone)]
pub(crate) struct BlockedStorage<T: Element> {
    rows: usize,
    cols: usize,
    block_rows: usize,
    block_cols: usize,
    blocks: Vec<Vec<T>>,
}

impl<T: Element> BlockedStorage<T> {
    /// Height of tiles in tile row `block_row`
    #[inline]
    fn block_height(&self, block_row: usize) -> usize {
        tile_extent(self.rows, block_row)
    }

    /// Width of tiles in tile column `block_col`
    #[inline]
    fn block_width(&self, block_col: usize) -> usize {
        tile_extent(self.cols, block_col)
    }

    #[inline]
    fn locate(&self, row: usize, col: usize) -> (usize, usize) {
        let block_row = row / BLOCK_SIZE;
        let block_col = col / BLOCK_SIZE;
        let offset = (row - block_row * BLOCK_SIZE) * self.block_width(block_col)
            + (col - block_col * BLOCK_SIZE);
        (block_row * self.block_cols + block_col, offset)
    }

    fn empty_tiles(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            block_rows: rows.div_ceil(BLOCK_SIZE),
            block_cols: cols.div_ceil(BLOCK_SIZE),
            blocks: Vec::new(),
        }
    }

    /// One output tile of `self @ other`
    fn product_tile(&self, other: &Self, block_row: usize, block_col: usize) -> Vec<T> {
        let height = self.block_height(block_row);
        let width = other.block_width(block_col);
        let mut tile = vec![T::zero(); height * width];
        for block_k in 0..self.block_cols {
            let depth = self.block_width(block_k);
            let a = &self.blocks[block_row * self.block_cols + block_k];
            let b = &other.blocks[block_k * other.block_cols + block_col];
            multiply_accumulate(a, b, &mut tile, height, width, depth, depth, width, width);
        }
        tile
    }
}

#[inline]
fn tile_extent(len: usize, block: usize) -> usize {
    BLOCK_SIZE.min(len - block * BLOCK_SIZE)
}

impl<T: Element> MatrixStorage<T> for BlockedStorage<T> {
    fn zeros(rows: usize, cols: usize) -> Self {
        let mut storage = Self::empty_tiles(rows, cols);
        for block_row in 0..storage.block_rows {
            let height = storage.block_height(block_row);
            for block_col in 0..storage.block_cols {
                let width = storage.block_width(block_col);
                storage.blocks.push(vec![T::zero(); height * width]);
            }
        }
        storage
    }

    fn from_row_major(rows: usize, cols: usize, data: &[T]) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        let mut storage = Self::empty_tiles(rows, cols);
        for block_row in 0..storage.block_rows {
            let height = storage.block_height(block_row);
            let row_start = block_row * BLOCK_SIZE;
            for block_col in 0..storage.block_cols {
                let width = storage.block_width(block_col);
                let col_start = block_col * BLOCK_SIZE;
                let mut tile = Vec::with_capacity(height * width);
                for row in row_start..row_start + height {
                    let begin = row * cols + col_start;
                    tile.extend_from_slice(&data[begin..begin + width]);
                }
                storage.blocks.push(tile);
            }
        }
        storage
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
        let (block, offset) = self.locate(row, col);
        &self.blocks[block][offset]
    }

    #[inline]
    fn entry_mut(&mut self, row: usize, col: usize) -> &mut T {
        let (block, offset) = self.locate(row, col);
        &mut self.blocks[block][offset]
    }

    fn optimized_regions(&self, region: Region) -> Vec<Region> {
        let mut regions = Vec::new();
        for block_row in region.start_row / BLOCK_SIZE..=region.end_row / BLOCK_SIZE {
            let row_start = block_row * BLOCK_SIZE;
            let row_end = row_start + self.block_height(block_row) - 1;
            for block_col in region.start_col / BLOCK_SIZE..=region.end_col / BLOCK_SIZE {
                let col_start = block_col * BLOCK_SIZE;
                let col_end = col_start + self.block_width(block_col) - 1;
                let tile = Region::new(row_start, row_end, col_start, col_end);
                if let Some(part) = tile.intersect(&region) {
                    regions.push(part);
                }
            }
        }
        regions
    }

    fn multiply(&self, other: &Self) -> Self {
        let mut out = Self::empty_tiles(self.rows, other.cols);
        let tile_count = out.block_rows * out.block_cols;
        let block_cols = out.block_cols;

        #[cfg(feature = "rayon")]
        {
            out.blocks = (0..tile_count)
                .into_par_iter()
                .map(|idx| self.product_tile(other, idx / block_cols, idx % block_cols))
                .collect();
        }

        #[cfg(not(feature = "rayon"))]
        {
            out.blocks = (0..tile_count)
                .map(|idx| self.product_tile(other, idx / block_cols, idx % block_cols))
                .collect();
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(rows: usize, cols: usize) -> Vec<f64> {
        (0..rows * cols).map(|v| (v % 17) as f64 - 8.5).collect()
    }

    #[test]
    fn test_edge_tiles_are_truncated() {
        let storage = BlockedStorage::<f64>::zeros(60, 110);
        assert_eq!(storage.block_rows, 2);
        assert_eq!(storage.block_cols, 3);
        assert_eq!(storage.blocks[0].len(), BLOCK_SIZE * BLOCK_SIZE);
        assert_eq!(storage.blocks[2].len(), BLOCK_SIZE * 6);
        assert_eq!(storage.blocks[5].len(), 8 * 6);
    }

    #[test]
    fn test_row_major_round_trip_through_tiles() {
        let data = ramp(70, 55);
        let storage = BlockedStorage::from_row_major(70, 55, &data);
        assert_eq!(storage.to_row_major(), data);
        assert_eq!(*storage.entry(69, 54), data[69 * 55 + 54]);
        assert_eq!(*storage.entry(52, 3), data[52 * 55 + 3]);
    }

    #[test]
    fn test_optimized_regions_cover_region_once() {
        let storage = BlockedStorage::<f64>::zeros(120, 120);
        let region = Region::new(10, 110, 50, 105);
        let parts = storage.optimized_regions(region);
        assert_eq!(parts.len(), 9);
        let covered: usize = parts.iter().map(Region::len).sum();
        assert_eq!(covered, region.len());
    }
}
