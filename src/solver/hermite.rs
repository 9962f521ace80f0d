//! Cubic Hermite splines: tangents from knot values.
//!
//! Tangents are estimated locally from the secant slopes `d[i]` of the
//! neighboring subintervals, so that a knot update only invalidates the
//! tangents of a few neighbors. The resulting splines are C1.
use core::ops::Range;

use num_traits::{Float, One, Zero};

use super::{secant, CoefficientSolver, SolverBasis};
use crate::domain::MIN_KNOTS;
use crate::{Domain, HermiteBasis, KnotValue};

/// Tangent estimation of cubic Hermite splines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tangents {
    /// Mean of the adjacent secant slopes
    #[default]
    FiniteDiff,

    /// Slope of the chord between the neighboring knots
    CatmullRom,
}

/// Coefficient solver of cubic Hermite splines with finite-difference tangents.
///
/// Both end tangents are the slope of the end subintervals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HermiteSolver(pub Tangents);

impl HermiteSolver {
    /// The tangent estimation.
    #[inline]
    pub fn tangents(&self) -> Tangents {
        self.0
    }

    #[inline]
    fn tangent<D, V>(&self, domain: &D, v: &[V], i: usize) -> V
    where
        D: Domain,
        V: KnotValue<D::Real>,
    {
        let n = v.len();
        if i == 0 {
            return secant(domain, v, 0);
        }
        if i == n - 1 {
            return secant(domain, v, n - 2);
        }
        match self.0 {
            Tangents::FiniteDiff => {
                let two = D::Real::one() + D::Real::one();
                (secant(domain, v, i - 1) + secant(domain, v, i)) / two
            }
            Tangents::CatmullRom => {
                (v[i + 1] - v[i - 1]) / (domain.length(i - 1) + domain.length(i))
            }
        }
    }
}

impl SolverBasis for HermiteSolver {
    type Basis = HermiteBasis;
}

impl<T: Float, V: KnotValue<T>> CoefficientSolver<T, V> for HermiteSolver {
    #[inline]
    fn min_knots(&self) -> usize {
        MIN_KNOTS
    }

    #[inline]
    fn radius(&self) -> Option<usize> {
        Some(1)
    }

    fn solve<D: Domain<Real = T>>(&self, domain: &D, v: &[V], d: &mut [V]) {
        self.update(domain, v, d, 0..v.len());
    }

    fn update<D: Domain<Real = T>>(&self, domain: &D, v: &[V], d: &mut [V], range: Range<usize>) {
        for i in range {
            d[i] = self.tangent(domain, v, i);
        }
    }
}

/// Coefficient solver of Akima splines, for real knot values.
///
/// Tangents are weighted means of the adjacent secant slopes, where each slope
/// is weighted by the variation of the slopes on the opposite side, which avoids
/// the overshoots of smoother splines near abrupt changes.
/// Two phantom slopes are extrapolated linearly beyond each end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Akima;

impl Akima {
    /// Secant slope `k` of the extended sequence, where `k` is shifted by 2
    /// so that slopes `0` and `1` are the left phantoms.
    #[inline]
    fn slope<D: Domain>(domain: &D, v: &[D::Real], k: usize) -> D::Real {
        let two = D::Real::one() + D::Real::one();
        let three = two + D::Real::one();
        let last = v.len() - 2;
        match k {
            0 => three * secant(domain, v, 0) - two * secant(domain, v, 1),
            1 => two * secant(domain, v, 0) - secant(domain, v, 1),
            k if k - 2 <= last => secant(domain, v, k - 2),
            k if k - 2 == last + 1 => two * secant(domain, v, last) - secant(domain, v, last - 1),
            _ => three * secant(domain, v, last) - two * secant(domain, v, last - 1),
        }
    }

    #[inline]
    fn tangent<D: Domain>(domain: &D, v: &[D::Real], i: usize) -> D::Real {
        // Slopes i - 2..=i + 1 of the unshifted sequence
        let [m0, m1, m2, m3] = [0, 1, 2, 3].map(|k| Self::slope(domain, v, i + k));
        let w1 = (m3 - m2).abs();
        let w2 = (m1 - m0).abs();
        let sum = w1 + w2;
        if sum == D::Real::zero() {
            (m1 + m2) / (D::Real::one() + D::Real::one())
        } else {
            (w1 * m1 + w2 * m2) / sum
        }
    }
}

impl SolverBasis for Akima {
    type Basis = HermiteBasis;
}

impl<T: Float> CoefficientSolver<T, T> for Akima {
    #[inline]
    fn min_knots(&self) -> usize {
        MIN_KNOTS
    }

    #[inline]
    fn radius(&self) -> Option<usize> {
        Some(2)
    }

    fn solve<D: Domain<Real = T>>(&self, domain: &D, v: &[T], d: &mut [T]) {
        self.update(domain, v, d, 0..v.len());
    }

    fn update<D: Domain<Real = T>>(&self, domain: &D, v: &[T], d: &mut [T], range: Range<usize>) {
        for i in range {
            d[i] = Self::tangent(domain, v, i);
        }
    }
}
