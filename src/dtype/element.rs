//! Element trait describing the scalar field a matrix is built over

use num_traits::{One, Zero};
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Trait for types that can be entries of a matrix or vector
///
/// The bounds describe a field: additive and multiplicative identities,
/// the four arithmetic operations, negation and equality. `f64` and `f32`
/// satisfy it, and so does any exact type such as a rational number,
/// which lets the LU decomposition run in exact arithmetic.
///
/// # Bounds
/// - `Clone + Send + Sync + 'static` - Basic trait requirements
/// - `Zero + One` - Field identities (num-traits)
/// - `Add + Sub + Mul + Div + Neg` - Arithmetic operations (Output = Self)
/// - `PartialEq` - Exact comparison, used by the first-nonzero pivot rule
///
/// The trait is blanket-implemented: any type meeting the bounds is an
/// element.
pub trait Element:
    Clone
    + Debug
    + PartialEq
    + Send
    + Sync
    + 'static
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Whether this value is the additive identity
    #[inline]
    fn is_zero_element(&self) -> bool {
        Zero::is_zero(self)
    }
}

impl<T> Element for T where
    T: Clone
        + Debug
        + PartialEq
        + Send
        + Sync
        + 'static
        + Zero
        + One
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + Div<Output = T>
        + Neg<Output = T>
{
}
