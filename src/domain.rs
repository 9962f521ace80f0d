//! Knot abscissae.
//!
//! A domain is the immutable, strictly increasing sequence of knot positions
//! `u[0..n)` shared by every argument, spline and cospline built over it.
//! Interval lengths are computed once at construction.
//!
//! Two layouts are provided:
//! * [`Partition`], a rectilinear domain with arbitrary spacing, which uses
//!   a bisection search for interval lookup
//! * [`Linspace`], a regular domain with a constant step, which locates
//!   intervals in O(1) and enables the constant-spacing solver paths
//!
//! ```rust
//! use cospline::{Domain, Partition};
//!
//! let u = Partition::new(&[1.0, 2.0, 3.0, 4.0]).unwrap();
//! assert_eq!(u.index(2.5).unwrap(), 1);
//! assert_eq!(u.index(4.0).unwrap(), 2); // The last interval is closed
//! assert!(u.index(4.5).is_err());
//! ```
use alloc::vec::Vec;

use num_traits::{Float, NumCast};

use crate::SplineError;

/// Minimum number of knots of any domain.
pub const MIN_KNOTS: usize = 3;

/// An ordered sequence of strictly increasing knot abscissae.
pub trait Domain {
    /// The abscissa type
    type Real: Float;

    /// Number of knots.
    fn size(&self) -> usize;

    /// Abscissa of the `i`-th knot.
    fn at(&self, i: usize) -> Self::Real;

    /// Length of the `i`-th subinterval, `u[i + 1] - u[i]`.
    fn length(&self, i: usize) -> Self::Real;

    /// Index `i` of the subinterval such that `u[i] <= x < u[i + 1]`,
    /// or `n - 2` for `x == u[n - 1]`.
    ///
    /// # Errors
    /// * If `x` is lower than the first knot, greater than the last one, or NaN
    fn index(&self, x: Self::Real) -> Result<usize, SplineError>;

    /// Reciprocal length of the `i`-th subinterval.
    #[inline]
    fn inverse_length(&self, i: usize) -> Self::Real {
        self.length(i).recip()
    }

    /// The constant subinterval length, if the domain is regular.
    #[inline]
    fn step(&self) -> Option<Self::Real> {
        None
    }

    /// First abscissa.
    #[inline]
    fn front(&self) -> Self::Real {
        self.at(0)
    }

    /// Last abscissa.
    #[inline]
    fn back(&self) -> Self::Real {
        self.at(self.size() - 1)
    }

    /// Number of subintervals.
    #[inline]
    fn intervals(&self) -> usize {
        self.size() - 1
    }

    /// Fail unless `front() <= x <= back()`.
    #[inline]
    fn check_bounds(&self, x: Self::Real) -> Result<(), SplineError> {
        let (front, back) = (self.front(), self.back());
        // Written as a negation so that NaN is rejected as well
        if !(x >= front && x <= back) {
            return Err(SplineError::out_of_domain(x, front, back));
        }
        Ok(())
    }
}

/// A rectilinear domain, which may have uneven spacing.
#[derive(Clone, Debug, PartialEq)]
pub struct Partition<T: Float> {
    /// Knot positions
    u: Vec<T>,

    /// Subinterval lengths, size n - 1
    h: Vec<T>,

    /// Reciprocal subinterval lengths, size n - 1
    g: Vec<T>,
}

impl<T: Float> Partition<T> {
    /// Build a domain from knot abscissae, precomputing subinterval lengths in O(n).
    ///
    /// # Errors
    /// * If there are fewer than 3 knots
    /// * If any abscissa is not finite
    /// * If the abscissae are not strictly increasing
    pub fn new(u: &[T]) -> Result<Self, SplineError> {
        if u.len() < MIN_KNOTS {
            return Err(SplineError::InvalidDomain("Not enough knots (< 3)"));
        }
        if u.iter().any(|x| !x.is_finite()) {
            return Err(SplineError::InvalidDomain("Knot abscissae must be finite"));
        }

        let mut h = Vec::with_capacity(u.len() - 1);
        for w in u.windows(2) {
            let length = w[1] - w[0];
            if length <= T::zero() {
                return Err(SplineError::InvalidDomain(
                    "Knot abscissae must be strictly increasing",
                ));
            }
            h.push(length);
        }
        let g = h.iter().map(|&length| length.recip()).collect();

        Ok(Self {
            u: u.to_vec(),
            h,
            g,
        })
    }

    /// Knot abscissae.
    #[inline]
    pub fn knots(&self) -> &[T] {
        &self.u
    }

}

impl<T: Float> Domain for Partition<T> {
    type Real = T;

    #[inline]
    fn size(&self) -> usize {
        self.u.len()
    }

    #[inline]
    fn at(&self, i: usize) -> T {
        self.u[i]
    }

    #[inline]
    fn length(&self, i: usize) -> T {
        self.h[i]
    }

    #[inline]
    fn inverse_length(&self, i: usize) -> T {
        self.g[i]
    }

    #[inline]
    fn index(&self, x: T) -> Result<usize, SplineError> {
        self.check_bounds(x)?;

        // Number of knots lower than or equal to x, which is at least 1 after the bounds check.
        // Saturates to the last interval at the upper bound.
        let i = self.u.partition_point(|&u| u <= x) - 1;
        Ok(i.min(self.u.len() - 2))
    }
}

/// A regular domain, which has the same spacing between each knot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Linspace<T: Float> {
    front: T,
    step: T,
    inverse_step: T,
    size: usize,

    /// Last knot, kept as given rather than rebuilt from the step
    back: T,
}

impl<T: Float> Linspace<T> {
    /// Build a regular domain of `size` knots starting at `front`.
    ///
    /// # Errors
    /// * If there are fewer than 3 knots
    /// * If `front` is not finite
    /// * If `step` is not finite and positive
    pub fn new(front: T, step: T, size: usize) -> Result<Self, SplineError> {
        if size < MIN_KNOTS {
            return Err(SplineError::InvalidDomain("Not enough knots (< 3)"));
        }
        if !front.is_finite() {
            return Err(SplineError::InvalidDomain("Knot abscissae must be finite"));
        }
        if !(step.is_finite() && step > T::zero()) {
            return Err(SplineError::InvalidDomain(
                "Knot abscissae must be strictly increasing",
            ));
        }
        let intervals = <T as NumCast>::from(size - 1)
            .ok_or(SplineError::InvalidDomain("Unrepresentable number of knots"))?;
        let back = front + step * intervals;
        if !back.is_finite() {
            return Err(SplineError::InvalidDomain("Knot abscissae must be finite"));
        }
        Ok(Self {
            front,
            step,
            inverse_step: step.recip(),
            size,
            back,
        })
    }

    /// Build a regular domain of `size` knots from `front` to `back` inclusive.
    ///
    /// The last knot is exactly `back`, whatever the rounding of the step.
    ///
    /// # Errors
    /// * If the step cannot be built from the bounds
    pub fn from_bounds(front: T, back: T, size: usize) -> Result<Self, SplineError> {
        let intervals = <T as NumCast>::from(size.saturating_sub(1))
            .ok_or(SplineError::InvalidDomain("Unrepresentable number of knots"))?;
        let domain = Self::new(front, (back - front) / intervals, size)?;
        Ok(Self { back, ..domain })
    }
}

impl<T: Float> Domain for Linspace<T> {
    type Real = T;

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn at(&self, i: usize) -> T {
        if i == self.size - 1 {
            return self.back;
        }
        let i = <T as NumCast>::from(i).unwrap_or_else(T::nan); // Unrepresentable index poisons the result

        self.front + self.step * i
    }

    #[inline]
    fn length(&self, _i: usize) -> T {
        self.step
    }

    #[inline]
    fn inverse_length(&self, _i: usize) -> T {
        self.inverse_step
    }

    #[inline]
    fn index(&self, x: T) -> Result<usize, SplineError> {
        self.check_bounds(x)?;

        // Nominal location is non-negative after the bounds check,
        // and saturates to the last interval at the upper bound
        let floc = ((x - self.front) * self.inverse_step).floor();
        let mut i = <usize as NumCast>::from(floc)
            .unwrap_or(0)
            .min(self.size - 2);

        // The scaled offset may round across a knot
        if i + 2 < self.size && x >= self.at(i + 1) {
            i += 1;
        } else if i > 0 && x < self.at(i) {
            i -= 1;
        }
        Ok(i)
    }

    #[inline]
    fn step(&self) -> Option<T> {
        Some(self.step)
    }
}
