//! Error type shared by every fallible operation of the crate.
use num_traits::Float;
use thiserror::Error;

/// Errors returned by domain construction, argument binding and spline evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplineError {
    /// Too few knots, non-finite abscissae, or abscissae not strictly increasing
    #[error("invalid domain: {0}")]
    InvalidDomain(&'static str),

    /// An abscissa lies outside of the knot range (NaN included)
    #[error("abscissa {x} is outside of the domain [{front}, {back}]")]
    OutOfDomain { x: f64, front: f64, back: f64 },

    /// A coefficient required by an evaluation has not been solved since the
    /// last knot update, and the spline does not recompute on its own
    #[error("coefficient {0} is stale; solve the spline before evaluating it")]
    StaleCache(usize),

    /// Mismatched collection sizes
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Knot index past the end of the domain
    #[error("knot index {index} is out of bounds for {size} knots")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Argument bound to an interval which does not exist in this domain
    #[error("argument interval {index} does not fit a domain of {size} knots")]
    ForeignArgument { index: usize, size: usize },
}

impl SplineError {
    /// Build an [`SplineError::OutOfDomain`] from the real type of the domain.
    pub(crate) fn out_of_domain<T: Float>(x: T, front: T, back: T) -> Self {
        Self::OutOfDomain {
            x: x.to_f64().unwrap_or(f64::NAN),
            front: front.to_f64().unwrap_or(f64::NAN),
            back: back.to_f64().unwrap_or(f64::NAN),
        }
    }

    /// Check that a collection has the expected length.
    #[inline]
    pub(crate) fn check_len(expected: usize, got: usize) -> Result<(), Self> {
        if expected == got {
            Ok(())
        } else {
            Err(Self::DimensionMismatch { expected, got })
        }
    }
}
