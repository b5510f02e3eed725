//! Iterator skipping zero entries

use crate::dtype::Element;

/// Iterator over the non-zero entries of a vector
///
/// Yields `(index, value)` pairs in increasing index order.
#[derive(Debug, Clone)]
pub struct SparseIter<'a, T: Element> {
    inner: std::iter::Enumerate<std::slice::Iter<'a, T>>,
}

impl<'a, T: Element> SparseIter<'a, T> {
    pub(crate) fn new(data: &'a [T]) -> Self {
        Self {
            inner: data.iter().enumerate(),
        }
    }
}

impl<'a, T: Element> Iterator for SparseIter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find(|(_, v)| !v.is_zero_element())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

#[cfg(test)]
mod tests {
    use crate::vector::RealVector;

    #[test]
    fn test_skips_zeros() {
        let v = RealVector::from_vec(vec![0.0, 1.5, 0.0, -0.0, 2.0, 0.0]);
        let entries: Vec<_> = v.sparse_iter().map(|(i, x)| (i, *x)).collect();
        assert_eq!(entries, vec![(1, 1.5), (4, 2.0)]);
        assert_eq!(RealVector::zeros(4).sparse_iter().count(), 0);
    }
}
