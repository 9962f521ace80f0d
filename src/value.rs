//! Knot value types.
use core::ops::{Add, Div, Mul, Sub};

use num_traits::{Float, Zero};

/// A value which can be interpolated over a real domain `T`.
///
/// Splines are linear in their knot values, so any type forming a vector
/// space over `T` qualifies, e.g. `f32`, `f64`, or `num_complex::Complex<T>`.
/// This trait is implemented automatically.
pub trait KnotValue<T: Float>:
    Copy
    + Zero
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<T, Output = Self>
    + Div<T, Output = Self>
{
}

impl<T, V> KnotValue<T> for V
where
    T: Float,
    V: Copy
        + Zero
        + Add<Output = V>
        + Sub<Output = V>
        + Mul<T, Output = V>
        + Div<T, Output = V>,
{
}
