//! Numerical algorithms built on the dense containers
//!
//! - [`linalg`]: matrix decompositions and the solvers built on them

pub mod linalg;
