//! Dense vectors
//!
//! [`DenseVector`] is a thin owner of a `Vec<T>` with the element-wise,
//! inner-product and norm operations that decompositions and solvers need.
//! Unlike matrices, an empty vector is valid.

mod iter;

pub use iter::SparseIter;

use crate::dtype::Element;
use crate::error::{Axis, Error, Result};
use crate::matrix::{DenseMatrix, dot};

/// Dense vector over an element type
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DenseVector<T: Element = f64> {
    data: Vec<T>,
}

/// Dense vector of `f64`
pub type RealVector = DenseVector<f64>;

impl<T: Element> DenseVector<T> {
    /// Vector taking ownership of `data`
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Vector copying `data`
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Vector of `dim` zeros
    pub fn zeros(dim: usize) -> Self {
        Self::filled(dim, T::zero())
    }

    /// Vector of `dim` copies of `value`
    pub fn filled(dim: usize, value: T) -> Self {
        Self {
            data: vec![value; dim],
        }
    }

    /// Number of entries
    #[inline]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    /// Whether the vector has no entries
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Entry `index`
    pub fn get(&self, index: usize) -> Result<T> {
        self.check_index(index)?;
        Ok(self.data[index].clone())
    }

    /// Replace entry `index`
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        self.check_index(index)?;
        self.data[index] = value;
        Ok(())
    }

    /// Borrow the entries
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Take ownership of the entries
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Iterate over all entries
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterate over non-zero entries as `(index, value)` pairs
    pub fn sparse_iter(&self) -> SparseIter<'_, T> {
        SparseIter::new(&self.data)
    }

    // ========================================================================
    // Element-wise arithmetic
    // ========================================================================

    /// Entry-wise sum
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Entry-wise difference
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Entry-wise product
    pub fn ebe_multiply(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Entry-wise quotient
    pub fn ebe_divide(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a / b)
    }

    /// Add `scalar` to every entry
    pub fn map_add(&self, scalar: T) -> Self {
        self.map(|v| v + scalar.clone())
    }

    /// Multiply every entry by `scalar`
    pub fn map_multiply(&self, scalar: T) -> Self {
        self.map(|v| v * scalar.clone())
    }

    /// Apply `f` to every entry
    pub fn map(&self, f: impl FnMut(T) -> T) -> Self {
        Self {
            data: self.data.iter().cloned().map(f).collect(),
        }
    }

    /// Inner product
    pub fn dot(&self, other: &Self) -> Result<T> {
        self.check_same_dim(other)?;
        Ok(dot(&self.data, &other.data))
    }

    /// Outer product `self · otherᵀ`
    ///
    /// Fails if either vector is empty, since matrices have at least one row
    /// and column.
    pub fn outer_product(&self, other: &Self) -> Result<DenseMatrix<T>> {
        let (m, n) = (self.dim(), other.dim());
        let mut data = Vec::with_capacity(m * n);
        for a in &self.data {
            for b in &other.data {
                data.push(a.clone() * b.clone());
            }
        }
        DenseMatrix::from_row_major(m, n, data)
    }

    // ========================================================================
    // Structure
    // ========================================================================

    /// Concatenation `[self, other]`
    pub fn append(&self, other: &Self) -> Self {
        let mut data = self.data.clone();
        data.extend_from_slice(&other.data);
        Self { data }
    }

    /// Copy with `value` appended
    pub fn append_value(&self, value: T) -> Self {
        let mut data = self.data.clone();
        data.push(value);
        Self { data }
    }

    /// `len` entries starting at `index`
    pub fn sub_vector(&self, index: usize, len: usize) -> Result<Self> {
        self.check_span(index, len)?;
        Ok(Self::from_slice(&self.data[index..index + len]))
    }

    /// Overwrite entries starting at `index` with `values`
    pub fn set_sub_vector(&mut self, index: usize, values: &[T]) -> Result<()> {
        self.check_span(index, values.len())?;
        self.data[index..index + values.len()].clone_from_slice(values);
        Ok(())
    }

    fn zip_with(&self, other: &Self, mut f: impl FnMut(T, T) -> T) -> Result<Self> {
        self.check_same_dim(other)?;
        Ok(Self {
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| f(a.clone(), b.clone()))
                .collect(),
        })
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.dim() {
            return Err(Error::index_out_of_range(Axis::Entry, index, self.dim()));
        }
        Ok(())
    }

    fn check_span(&self, index: usize, len: usize) -> Result<()> {
        if len == 0 {
            return Ok(());
        }
        self.check_index(index)?;
        self.check_index(index.saturating_add(len - 1))
    }

    fn check_same_dim(&self, other: &Self) -> Result<()> {
        if self.dim() != other.dim() {
            return Err(Error::dimension_mismatch(&[self.dim()], &[other.dim()]));
        }
        Ok(())
    }
}

impl<T: Element> From<Vec<T>> for DenseVector<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<'a, T: Element> IntoIterator for &'a DenseVector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

// ============================================================================
// f64 norms and geometry
// ============================================================================

impl RealVector {
    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Sum of absolute values
    pub fn l1_norm(&self) -> f64 {
        self.data.iter().map(|v| v.abs()).sum()
    }

    /// Largest absolute value
    pub fn linf_norm(&self) -> f64 {
        self.data.iter().fold(0.0, |acc, v| acc.max(v.abs()))
    }

    /// Euclidean distance
    pub fn distance(&self, other: &Self) -> Result<f64> {
        Ok(self.subtract(other)?.norm())
    }

    /// Sum of absolute differences
    pub fn l1_distance(&self, other: &Self) -> Result<f64> {
        Ok(self.subtract(other)?.l1_norm())
    }

    /// Largest absolute difference
    pub fn linf_distance(&self, other: &Self) -> Result<f64> {
        Ok(self.subtract(other)?.linf_norm())
    }

    /// Vector scaled to unit Euclidean norm
    pub fn unit_vector(&self) -> Result<Self> {
        let norm = self.norm();
        if norm == 0.0 {
            return Err(Error::ZeroNorm);
        }
        Ok(self.map(|v| v / norm))
    }

    /// Scale in place to unit Euclidean norm
    pub fn unitize(&mut self) -> Result<()> {
        let norm = self.norm();
        if norm == 0.0 {
            return Err(Error::ZeroNorm);
        }
        self.data.iter_mut().for_each(|v| *v /= norm);
        Ok(())
    }

    /// Projection of `self` onto `onto`
    pub fn projection(&self, onto: &Self) -> Result<Self> {
        let denom = onto.dot(onto)?;
        if denom == 0.0 {
            return Err(Error::ZeroNorm);
        }
        Ok(onto.map_multiply(self.dot(onto)? / denom))
    }

    /// Cosine of the angle between two vectors
    pub fn cosine(&self, other: &Self) -> Result<f64> {
        let norms = self.norm() * other.norm();
        if norms == 0.0 {
            return Err(Error::ZeroNorm);
        }
        Ok(self.dot(other)? / norms)
    }

    /// Whether any entry is NaN
    pub fn is_nan(&self) -> bool {
        self.data.iter().any(|v| v.is_nan())
    }

    /// Whether any entry is infinite and none is NaN
    pub fn is_infinite(&self) -> bool {
        !self.is_nan() && self.data.iter().any(|v| v.is_infinite())
    }
}
