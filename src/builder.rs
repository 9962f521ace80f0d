//! Construction of splines sharing a domain and a configuration.
//!
//! A [`Builder`] owns a domain together with a coefficient solver and a
//! caching policy, and hands out arguments, splines, cosplines and bivariate
//! resamplers which borrow its domain.
//!
//! ```rust
//! use cospline::{Builder, C2Solver, CachingPolicy, Interp1D, Partition};
//!
//! let builder = Builder::natural(Partition::new(&[0.0, 1.0, 2.0, 3.0]).unwrap())
//!     .with_solver(C2Solver::approximate())
//!     .with_caching(CachingPolicy::Eager);
//!
//! let mut spline = builder.spline_with(&[0.0, 1.0, 2.0, 3.0]).unwrap();
//! assert_eq!(spline.eval_one(1.5).unwrap(), 1.5);
//!
//! let mut cospline = builder.cospline(&[0.5, 2.5]).unwrap();
//! assert_eq!(cospline.eval_alloc(&[3.0, 3.0, 3.0, 3.0]).unwrap(), vec![3.0, 3.0]);
//! ```
use num_traits::Float;

use crate::solver::{CoefficientSolver, SolverBasis};
use crate::{
    Arg, Args, BiCospline, C2Solver, CachingPolicy, Cospline, Domain, Interp1D, KnotValue,
    Partition, Spline, SplineError,
};

/// Configuration of the splines built over a domain.
#[derive(Clone, Debug, PartialEq)]
pub struct Builder<D, S> {
    domain: D,
    solver: S,
    caching: CachingPolicy,
}

impl<D: Domain> Builder<D, C2Solver> {
    /// Natural cubic splines with lazy caching.
    pub fn natural(domain: D) -> Self {
        Self::new(domain, C2Solver::natural(), CachingPolicy::Lazy)
    }
}

impl<D: Domain, S: SolverBasis + Clone> Builder<D, S> {
    /// Splines over `domain` with coefficients from `solver`,
    /// recomputed according to `caching`.
    pub fn new(domain: D, solver: S, caching: CachingPolicy) -> Self {
        Self {
            domain,
            solver,
            caching,
        }
    }

    /// Replace the caching policy.
    pub fn with_caching(self, caching: CachingPolicy) -> Self {
        Self { caching, ..self }
    }

    /// Replace the coefficient solver.
    pub fn with_solver<R: SolverBasis + Clone>(self, solver: R) -> Builder<D, R> {
        Builder {
            domain: self.domain,
            solver,
            caching: self.caching,
        }
    }

    #[inline]
    pub fn domain(&self) -> &D {
        &self.domain
    }

    #[inline]
    pub fn solver(&self) -> &S {
        &self.solver
    }

    #[inline]
    pub fn caching(&self) -> CachingPolicy {
        self.caching
    }

    /// Bind an abscissa to the domain.
    ///
    /// # Errors
    /// * If `x` is out of the domain
    pub fn arg(&self, x: D::Real) -> Result<Arg<D::Real, S::Basis>, SplineError> {
        Arg::new(&self.domain, x)
    }

    /// Bind a batch of abscissae to the domain.
    ///
    /// # Errors
    /// * If any abscissa is out of the domain
    pub fn args(&self, x: &[D::Real]) -> Result<Args<D::Real, S::Basis>, SplineError> {
        Args::new(&self.domain, x)
    }

    /// A spline with null knot values.
    ///
    /// # Errors
    /// * If the domain is too small for the solver
    pub fn spline<V>(&self) -> Result<Spline<'_, D, V, S>, SplineError>
    where
        V: KnotValue<D::Real>,
        S: CoefficientSolver<D::Real, V>,
    {
        Spline::new(&self.domain, self.solver.clone(), self.caching)
    }

    /// A spline with knot values `v`.
    ///
    /// # Errors
    /// * If the domain is too small for the solver
    /// * If the number of values is not the domain size
    pub fn spline_with<V>(&self, v: &[V]) -> Result<Spline<'_, D, V, S>, SplineError>
    where
        V: KnotValue<D::Real>,
        S: CoefficientSolver<D::Real, V>,
    {
        Spline::with_values(&self.domain, self.solver.clone(), self.caching, v)
    }

    /// A cospline bound to abscissae `x`.
    ///
    /// # Errors
    /// * If the domain is too small for the solver
    /// * If any abscissa is out of the domain
    pub fn cospline<V>(&self, x: &[D::Real]) -> Result<Cospline<Spline<'_, D, V, S>>, SplineError>
    where
        V: KnotValue<D::Real>,
        S: CoefficientSolver<D::Real, V>,
    {
        Cospline::new(self.spline()?, x)
    }

    /// A bivariate resampler over the domains of `self` along axis 0
    /// and `axis1` along axis 1.
    ///
    /// # Errors
    /// * If either domain is too small for its solver
    /// * If any coordinate is out of the domain of its axis
    #[allow(clippy::type_complexity)]
    pub fn bicospline<'a, V, D1, S1>(
        &'a self,
        axis1: &'a Builder<D1, S1>,
        trajectory: &[[D::Real; 2]],
    ) -> Result<BiCospline<Spline<'a, D, V, S>, Spline<'a, D1, V, S1>>, SplineError>
    where
        V: KnotValue<D::Real>,
        S: CoefficientSolver<D::Real, V>,
        D1: Domain<Real = D::Real>,
        S1: CoefficientSolver<D::Real, V>,
    {
        BiCospline::new(self.spline()?, axis1.spline()?, trajectory)
    }
}

/// Evaluate the natural cubic spline through knots `(u, v)` at abscissae `x`.
///
/// # Errors
/// * If the knot abscissae do not make a valid domain
/// * If the lengths of `u` and `v`, or of `x` and `out`, differ
/// * If any abscissa is out of the domain
pub fn interp<T, V>(u: &[T], v: &[V], x: &[T], out: &mut [V]) -> Result<(), SplineError>
where
    T: Float,
    V: KnotValue<T>,
{
    let domain = Partition::new(u)?;
    let mut spline = Spline::with_values(&domain, C2Solver::natural(), CachingPolicy::Eager, v)?;
    spline.eval(x, out)
}

/// Evaluate the natural cubic spline through knots `(u, v)` at abscissae `x`,
/// allocating for the output values for convenience.
///
/// # Errors
/// * On the same conditions as [`interp`]
pub fn interp_alloc<T, V>(u: &[T], v: &[V], x: &[T]) -> Result<alloc::vec::Vec<V>, SplineError>
where
    T: Float,
    V: KnotValue<T>,
{
    let domain = Partition::new(u)?;
    let mut spline = Spline::with_values(&domain, C2Solver::natural(), CachingPolicy::Eager, v)?;
    spline.eval_alloc(x)
}
