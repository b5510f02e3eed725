//! Scalar types supported by matrices and vectors
//!
//! Containers and the exact-arithmetic LU decomposition are generic over
//! [`Element`]. Floating-point decompositions work on `f64`.

mod element;

pub use element::Element;
