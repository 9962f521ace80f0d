//! Piecewise cubic Lagrange interpolation.
//!
//! Over each subinterval, the interpolant is the cubic polynomial through
//! the two bounding knots and their outer neighbors. It needs no solved
//! coefficients, so it is always up to date, and it is only C0 at the knots.
use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use log::debug;

use crate::{Arg, Basis, CachingPolicy, Domain, Interp1D, KnotValue, LagrangeBasis, SplineError};

/// A spline made of local cubic Lagrange polynomials.
#[derive(Debug)]
pub struct LagrangeSpline<'a, D, V> {
    domain: &'a D,
    v: Vec<V>,
}

impl<'a, D, V> LagrangeSpline<'a, D, V>
where
    D: Domain,
    V: KnotValue<D::Real>,
{
    /// Build a spline with null knot values.
    ///
    /// # Errors
    /// * If the domain has fewer than 4 knots
    pub fn new(domain: &'a D) -> Result<Self, SplineError> {
        let n = domain.size();
        if n < LagrangeBasis::min_knots() {
            return Err(SplineError::InvalidDomain("Not enough knots (< 4)"));
        }
        debug!("Lagrange spline with {n} knots");
        Ok(Self {
            domain,
            v: vec![V::zero(); n],
        })
    }

    /// Build a spline and assign its knot values.
    ///
    /// # Errors
    /// * If the domain has fewer than 4 knots
    /// * If the number of values is not the domain size
    pub fn with_values(domain: &'a D, v: &[V]) -> Result<Self, SplineError> {
        let mut spline = Self::new(domain)?;
        spline.assign(v)?;
        Ok(spline)
    }
}

impl<D, V: Clone> Clone for LagrangeSpline<'_, D, V> {
    fn clone(&self) -> Self {
        Self {
            domain: self.domain,
            v: self.v.clone(),
        }
    }
}

impl<D, V> Interp1D for LagrangeSpline<'_, D, V>
where
    D: Domain,
    V: KnotValue<D::Real>,
{
    type Real = D::Real;
    type Value = V;
    type Basis = LagrangeBasis;
    type Domain = D;

    #[inline]
    fn domain(&self) -> &D {
        self.domain
    }

    /// Knot values are used as is, which is equivalent to eager caching.
    #[inline]
    fn caching(&self) -> CachingPolicy {
        CachingPolicy::Eager
    }

    #[inline]
    fn knot_values(&self) -> &[V] {
        &self.v
    }

    #[inline]
    fn support(&self, arg: &Arg<D::Real, LagrangeBasis>) -> Range<usize> {
        let i = arg.index();
        i.saturating_sub(1)..(i + 3).min(self.v.len())
    }

    fn assign(&mut self, v: &[V]) -> Result<(), SplineError> {
        SplineError::check_len(self.v.len(), v.len())?;
        self.v.copy_from_slice(v);
        Ok(())
    }

    fn set(&mut self, i: usize, value: V) -> Result<(), SplineError> {
        let size = self.v.len();
        let knot = self
            .v
            .get_mut(i)
            .ok_or(SplineError::IndexOutOfBounds { index: i, size })?;
        *knot = value;
        Ok(())
    }

    #[inline]
    fn solve(&mut self) {}

    #[inline]
    fn eval_arg(&mut self, arg: &Arg<D::Real, LagrangeBasis>) -> Result<V, SplineError> {
        let i = arg.index();
        let size = self.v.len();
        if i == 0 || i + 2 >= size {
            return Err(SplineError::ForeignArgument { index: i, size });
        }
        let c = arg.coefficients();
        let v = &self.v[i - 1..i + 3];
        Ok(v[0] * c[0] + v[1] * c[1] + v[2] * c[2] + v[3] * c[3])
    }
}
