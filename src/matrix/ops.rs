//! Matrix arithmetic
//!
//! Every operation returns a new matrix; operands are never modified.

use super::{DenseMatrix, dot};
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::vector::DenseVector;

impl<T: Element> DenseMatrix<T> {
    /// Entry-wise sum `self + other`
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other)?;
        Ok(Self::filled_with(self.rows(), self.cols(), |r, c| {
            self.entry(r, c).clone() + other.entry(r, c).clone()
        }))
    }

    /// Entry-wise difference `self - other`
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other)?;
        Ok(Self::filled_with(self.rows(), self.cols(), |r, c| {
            self.entry(r, c).clone() - other.entry(r, c).clone()
        }))
    }

    /// Add `scalar` to every entry
    pub fn scalar_add(&self, scalar: T) -> Self {
        Self::filled_with(self.rows(), self.cols(), |r, c| {
            self.entry(r, c).clone() + scalar.clone()
        })
    }

    /// Multiply every entry by `scalar`
    pub fn scalar_multiply(&self, scalar: T) -> Self {
        Self::filled_with(self.rows(), self.cols(), |r, c| {
            self.entry(r, c).clone() * scalar.clone()
        })
    }

    /// Matrix product `self · other`
    ///
    /// `self` is `m × n`, `other` must be `n × p`; the result is `m × p`.
    pub fn multiply(&self, other: &Self) -> Result<Self> {
        if self.cols() != other.rows() {
            return Err(Error::dimension_mismatch(&self.shape(), &other.shape()));
        }
        Ok(Self::from_storage(self.storage().multiply(other.storage())))
    }

    /// Matrix product `other · self`
    pub fn pre_multiply_matrix(&self, other: &Self) -> Result<Self> {
        other.multiply(self)
    }

    /// `self` multiplied by itself `power` times
    ///
    /// Power zero is the identity.
    pub fn power(&self, power: u32) -> Result<Self> {
        if !self.is_square() {
            return Err(Error::NonSquare {
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        let mut result = Self::identity_of_order(self.rows());
        for _ in 0..power {
            result = result.multiply(self)?;
        }
        Ok(result)
    }

    /// Transpose
    pub fn transpose(&self) -> Self {
        Self::filled_with(self.cols(), self.rows(), |r, c| self.entry(c, r).clone())
    }

    /// Matrix-vector product `self · x`
    pub fn operate(&self, x: &[T]) -> Result<Vec<T>> {
        if x.len() != self.cols() {
            return Err(Error::dimension_mismatch(&[self.cols()], &[x.len()]));
        }
        Ok((0..self.rows())
            .map(|r| dot((0..self.cols()).map(|c| self.entry(r, c)), x))
            .collect())
    }

    /// Matrix-vector product with a [`DenseVector`]
    pub fn operate_vector(&self, x: &DenseVector<T>) -> Result<DenseVector<T>> {
        self.operate(x.as_slice()).map(DenseVector::from_vec)
    }

    /// Row-vector product `xᵀ · self`
    pub fn pre_multiply(&self, x: &[T]) -> Result<Vec<T>> {
        if x.len() != self.rows() {
            return Err(Error::dimension_mismatch(&[self.rows()], &[x.len()]));
        }
        Ok((0..self.cols())
            .map(|c| dot(x, (0..self.rows()).map(|r| self.entry(r, c))))
            .collect())
    }

    /// Row-vector product with a [`DenseVector`]
    pub fn pre_multiply_vector(&self, x: &DenseVector<T>) -> Result<DenseVector<T>> {
        self.pre_multiply(x.as_slice()).map(DenseVector::from_vec)
    }

    /// Sum of the diagonal entries
    pub fn trace(&self) -> Result<T> {
        if !self.is_square() {
            return Err(Error::NonSquare {
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok((0..self.rows()).fold(T::zero(), |acc, i| acc + self.entry(i, i).clone()))
    }

    fn check_same_shape(&self, other: &Self) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(Error::dimension_mismatch(&self.shape(), &other.shape()));
        }
        Ok(())
    }
}
