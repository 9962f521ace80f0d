//! Coefficient solvers.
//!
//! A solver derives, from the domain and the knot values, the coefficients
//! which shape the spline between knots: second derivatives for C2 splines,
//! tangents for Hermite splines.
//!
//! Solvers are either global or local:
//! * Global solvers (the tridiagonal C2 solve) couple every coefficient
//!   to every knot value, so that any knot update requires a full solve
//! * Local solvers (finite-difference approximations) compute each coefficient
//!   from a few neighboring knot values, so that a knot update only affects
//!   the coefficients within some radius, which can be recomputed alone
use core::ops::Range;

use num_traits::Float;

use crate::{Basis, Domain, KnotValue};

pub mod c2;
pub mod hermite;

pub use c2::{C2Bounds, C2Solver, SolverKind};
pub use hermite::{Akima, HermiteSolver, Tangents};

/// Family of argument coefficients which the solved coefficients are meant for.
///
/// Kept apart from [`CoefficientSolver`] since it does not depend on the value type.
pub trait SolverBasis {
    type Basis: Basis;
}

/// Strategy which computes the coefficients of a spline from its knot values.
///
/// Every method takes coefficient buffers of the same size as the domain.
pub trait CoefficientSolver<T: Float, V: KnotValue<T>>: SolverBasis + Clone {
    /// Minimum number of knots.
    fn min_knots(&self) -> usize;

    /// Influence radius of a knot value: updating knot `i` affects coefficients
    /// `i - r..=i + r` only, or all coefficients if `None`.
    fn radius(&self) -> Option<usize>;

    /// Whether a subset of the coefficients can be recomputed alone.
    #[inline]
    fn supports_local_update(&self) -> bool {
        self.radius().is_some()
    }

    /// Compute every coefficient.
    fn solve<D: Domain<Real = T>>(&self, domain: &D, v: &[V], coefficients: &mut [V]);

    /// Recompute the coefficients in `range`.
    ///
    /// Global solvers cannot do better than a full solve, which is the default.
    #[inline]
    fn update<D: Domain<Real = T>>(
        &self,
        domain: &D,
        v: &[V],
        coefficients: &mut [V],
        range: Range<usize>,
    ) {
        let _ = range;
        self.solve(domain, v, coefficients);
    }

    /// Coefficients affected by an update of knot `i` among `n`.
    #[inline]
    fn zone(&self, n: usize, i: usize) -> Range<usize> {
        match self.radius() {
            Some(r) => i.saturating_sub(r)..(i + r + 1).min(n),
            None => 0..n,
        }
    }

    /// Knot values which influence an evaluation in subinterval `i` among `n` knots.
    #[inline]
    fn support(&self, n: usize, i: usize) -> Range<usize> {
        match self.radius() {
            Some(r) => i.saturating_sub(r)..(i + r + 2).min(n),
            None => 0..n,
        }
    }
}

/// Slope of the secant over subinterval `i`.
#[inline]
pub(crate) fn secant<D, V>(domain: &D, v: &[V], i: usize) -> V
where
    D: Domain,
    V: KnotValue<D::Real>,
{
    (v[i + 1] - v[i]) * domain.inverse_length(i)
}
