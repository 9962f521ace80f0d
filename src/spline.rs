//! One-dimensional spline evaluation with cached coefficients.
//!
//! A [`Spline`] owns the knot values and the coefficients solved from them
//! over a borrowed [`Domain`]. Evaluation combines both with the blending
//! coefficients of an [`Arg`]:
//!
//! ```text
//! y = v[i] * c[0] + v[i + 1] * c[1] + z[i] * c[2] + z[i + 1] * c[3]
//! ```
//!
//! Coefficients are refreshed according to the [`CachingPolicy`] of the spline.
//! Evaluation takes `&mut self`, since a lazy spline memoizes the coefficients
//! it recomputes on read.
//!
//! ```rust
//! use cospline::{C2Solver, CachingPolicy, Interp1D, Partition, Spline};
//!
//! let u = Partition::new(&[1.0, 2.0, 3.0, 4.0]).unwrap();
//! let v: [f64; 4] = [10.0, 20.0, 30.0, 40.0];
//! let mut spline =
//!     Spline::with_values(&u, C2Solver::natural(), CachingPolicy::Lazy, &v).unwrap();
//!
//! let y = spline.eval_alloc(&[1.1, 2.5, 3.9]).unwrap();
//! assert!((y[1] - 25.0).abs() < 1e-12);
//!
//! // Knot updates invalidate the coefficients, which are solved again on the next read
//! spline.set(3, 80.0).unwrap();
//! assert!(spline.eval_one(3.5).unwrap() > 40.0);
//! ```
use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use log::{debug, trace};
use num_traits::{Float, Zero};

use crate::cache::Validity;
use crate::solver::{CoefficientSolver, SolverBasis};
use crate::{Arg, Args, Basis, CachingPolicy, Domain, KnotValue, SplineError};

/// A one-dimensional interpolator over fixed knot abscissae and mutable knot values.
pub trait Interp1D {
    /// Abscissa type
    type Real: Float;

    /// Knot value type
    type Value: KnotValue<Self::Real>;

    /// Family of the arguments the interpolator is evaluated at
    type Basis: Basis;

    /// Knot abscissae
    type Domain: Domain<Real = Self::Real>;

    /// Knot abscissae.
    fn domain(&self) -> &Self::Domain;

    /// When the coefficients are recomputed.
    fn caching(&self) -> CachingPolicy;

    /// Knot values.
    fn knot_values(&self) -> &[Self::Value];

    /// Range of knots whose values influence the evaluation at `arg`.
    fn support(&self, arg: &Arg<Self::Real, Self::Basis>) -> Range<usize>;

    /// Replace every knot value.
    ///
    /// # Errors
    /// * If the number of values is not the domain size
    fn assign(&mut self, v: &[Self::Value]) -> Result<(), SplineError>;

    /// Replace the value of knot `i`.
    ///
    /// # Errors
    /// * If `i` is not a knot index
    fn set(&mut self, i: usize, value: Self::Value) -> Result<(), SplineError>;

    /// Bring every stale coefficient up to date.
    fn solve(&mut self);

    /// Evaluate at a precomputed argument.
    ///
    /// # Errors
    /// * If the argument was built over a larger domain
    /// * If a needed coefficient is stale under the manual policy
    fn eval_arg(&mut self, arg: &Arg<Self::Real, Self::Basis>) -> Result<Self::Value, SplineError>;

    /// Bind an abscissa to the domain.
    ///
    /// # Errors
    /// * If `x` is out of the domain
    #[inline]
    fn arg(&self, x: Self::Real) -> Result<Arg<Self::Real, Self::Basis>, SplineError> {
        Arg::new(self.domain(), x)
    }

    /// Bind a batch of abscissae to the domain.
    ///
    /// # Errors
    /// * If any abscissa is out of the domain
    #[inline]
    fn args(&self, x: &[Self::Real]) -> Result<Args<Self::Real, Self::Basis>, SplineError> {
        Args::new(self.domain(), x)
    }

    /// Evaluate at a batch of precomputed arguments.
    ///
    /// # Errors
    /// * If the output length does not match the number of arguments
    /// * On the same conditions as [`Interp1D::eval_arg`]
    #[inline]
    fn eval_args(
        &mut self,
        args: &Args<Self::Real, Self::Basis>,
        out: &mut [Self::Value],
    ) -> Result<(), SplineError> {
        SplineError::check_len(args.len(), out.len())?;
        for (arg, y) in args.iter().zip(out.iter_mut()) {
            *y = self.eval_arg(&arg)?;
        }
        Ok(())
    }

    /// Evaluate at an abscissa.
    ///
    /// # Errors
    /// * If `x` is out of the domain
    /// * If a needed coefficient is stale under the manual policy
    #[inline]
    fn eval_one(&mut self, x: Self::Real) -> Result<Self::Value, SplineError> {
        let arg = self.arg(x)?;
        self.eval_arg(&arg)
    }

    /// Evaluate at a set of abscissae.
    ///
    /// # Errors
    /// * If the output length does not match the number of abscissae
    /// * If any abscissa is out of the domain
    /// * If a needed coefficient is stale under the manual policy
    #[inline]
    fn eval(&mut self, x: &[Self::Real], out: &mut [Self::Value]) -> Result<(), SplineError> {
        SplineError::check_len(x.len(), out.len())?;
        for (&xi, y) in x.iter().zip(out.iter_mut()) {
            *y = self.eval_one(xi)?;
        }
        Ok(())
    }

    /// Evaluate at a set of abscissae, allocating for the output values for convenience.
    ///
    /// # Errors
    /// * On the same conditions as [`Interp1D::eval`]
    #[inline]
    fn eval_alloc(&mut self, x: &[Self::Real]) -> Result<Vec<Self::Value>, SplineError> {
        let mut out = vec![Self::Value::zero(); x.len()];
        self.eval(x, &mut out)?;
        Ok(out)
    }
}

/// A spline whose coefficients are derived from its knot values by a [`CoefficientSolver`].
pub struct Spline<'a, D: Domain, V, S> {
    domain: &'a D,
    solver: S,
    caching: CachingPolicy,

    /// Knot values
    v: Vec<V>,

    /// Solved coefficients, one per knot
    z: Vec<V>,

    validity: Validity,
}

impl<'a, D, V, S> Spline<'a, D, V, S>
where
    D: Domain,
    V: KnotValue<D::Real>,
    S: CoefficientSolver<D::Real, V>,
{
    /// Build a spline with null knot values, whose coefficients are all valid.
    ///
    /// # Errors
    /// * If the domain is too small for the solver or its basis
    pub fn new(domain: &'a D, solver: S, caching: CachingPolicy) -> Result<Self, SplineError> {
        let n = domain.size();
        let min_knots = solver.min_knots().max(S::Basis::min_knots());
        if n < min_knots {
            return Err(SplineError::InvalidDomain(
                "Not enough knots for the spline method",
            ));
        }
        debug!("Spline with {n} knots, {caching:?} caching");

        Ok(Self {
            domain,
            solver,
            caching,
            v: vec![V::zero(); n],
            z: vec![V::zero(); n],
            validity: Validity::valid(n),
        })
    }

    /// Build a spline and assign its knot values.
    ///
    /// # Errors
    /// * If the domain is too small for the solver or its basis
    /// * If the number of values is not the domain size
    pub fn with_values(
        domain: &'a D,
        solver: S,
        caching: CachingPolicy,
        v: &[V],
    ) -> Result<Self, SplineError> {
        let mut spline = Self::new(domain, solver, caching)?;
        spline.assign(v)?;
        Ok(spline)
    }

    /// The coefficient solver.
    #[inline]
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Whether the coefficient of knot `i` is up to date.
    ///
    /// Knots outside the domain have no coefficient, and are never up to date.
    #[inline]
    pub fn is_valid(&self, i: usize) -> bool {
        self.validity.is_valid(i)
    }

    /// Coefficient of knot `i`, which is recomputed first under the lazy policy if stale.
    ///
    /// # Errors
    /// * If `i` is not a knot index
    /// * If the coefficient is stale under the manual policy
    pub fn coefficient(&mut self, i: usize) -> Result<V, SplineError> {
        let n = self.v.len();
        if i >= n {
            return Err(SplineError::IndexOutOfBounds { index: i, size: n });
        }
        self.refresh(i..i + 1)?;
        Ok(self.z[i])
    }

    /// Make the coefficients in `range` valid, or fail under the manual policy.
    #[inline]
    fn refresh(&mut self, range: Range<usize>) -> Result<(), SplineError> {
        if self.validity.is_range_valid(range.clone()) {
            return Ok(());
        }
        match self.caching {
            CachingPolicy::Manual => match self.validity.first_stale(range) {
                Some(i) => Err(SplineError::StaleCache(i)),
                None => Ok(()),
            },
            CachingPolicy::Eager | CachingPolicy::Lazy => {
                trace!("Lazy coefficient refresh over {range:?}");
                self.recompute(range);
                Ok(())
            }
        }
    }

    /// Recompute the stale coefficients in `range`,
    /// or all of them if the solver does not support local updates.
    fn recompute(&mut self, range: Range<usize>) {
        if self.solver.supports_local_update() {
            for run in self.validity.stale_runs(range) {
                trace!("Local coefficient update over {run:?}");
                self.solver
                    .update(self.domain, &self.v, &mut self.z, run.clone());
                self.validity.validate(run);
            }
        } else {
            trace!("Full coefficient solve over {} knots", self.v.len());
            self.solver.solve(self.domain, &self.v, &mut self.z);
            self.validity.validate_all();
        }
    }

    #[inline]
    fn check_arg(&self, index: usize) -> Result<(), SplineError> {
        let n = self.v.len();
        if index + 1 >= n {
            return Err(SplineError::ForeignArgument { index, size: n });
        }
        Ok(())
    }

    #[inline]
    fn blend(&self, i: usize, c: [D::Real; 4]) -> V {
        self.v[i] * c[0] + self.v[i + 1] * c[1] + self.z[i] * c[2] + self.z[i + 1] * c[3]
    }
}

impl<D: Domain, V: Clone, S: Clone> Clone for Spline<'_, D, V, S> {
    fn clone(&self) -> Self {
        Self {
            domain: self.domain,
            solver: self.solver.clone(),
            caching: self.caching,
            v: self.v.clone(),
            z: self.z.clone(),
            validity: self.validity.clone(),
        }
    }
}

impl<D: Domain, V: core::fmt::Debug, S: core::fmt::Debug> core::fmt::Debug
    for Spline<'_, D, V, S>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Spline")
            .field("size", &self.v.len())
            .field("solver", &self.solver)
            .field("caching", &self.caching)
            .field("v", &self.v)
            .field("z", &self.z)
            .finish()
    }
}

impl<'a, D, V, S> Interp1D for Spline<'a, D, V, S>
where
    D: Domain,
    V: KnotValue<D::Real>,
    S: CoefficientSolver<D::Real, V>,
{
    type Real = D::Real;
    type Value = V;
    type Basis = <S as SolverBasis>::Basis;
    type Domain = D;

    #[inline]
    fn domain(&self) -> &D {
        self.domain
    }

    #[inline]
    fn caching(&self) -> CachingPolicy {
        self.caching
    }

    #[inline]
    fn knot_values(&self) -> &[V] {
        &self.v
    }

    #[inline]
    fn support(&self, arg: &Arg<D::Real, Self::Basis>) -> Range<usize> {
        self.solver.support(self.v.len(), arg.index())
    }

    fn assign(&mut self, v: &[V]) -> Result<(), SplineError> {
        SplineError::check_len(self.v.len(), v.len())?;
        self.v.copy_from_slice(v);
        match self.caching {
            CachingPolicy::Eager => {
                trace!("Full coefficient solve over {} knots", v.len());
                self.solver.solve(self.domain, &self.v, &mut self.z);
                self.validity.validate_all();
            }
            CachingPolicy::Lazy | CachingPolicy::Manual => self.validity.invalidate_all(),
        }
        Ok(())
    }

    fn set(&mut self, i: usize, value: V) -> Result<(), SplineError> {
        let n = self.v.len();
        if i >= n {
            return Err(SplineError::IndexOutOfBounds { index: i, size: n });
        }
        self.v[i] = value;
        let zone = self.solver.zone(n, i);
        match self.caching {
            CachingPolicy::Eager => {
                trace!("Coefficient update over {zone:?}");
                self.solver.update(self.domain, &self.v, &mut self.z, zone);
            }
            CachingPolicy::Lazy | CachingPolicy::Manual => self.validity.invalidate(zone),
        }
        Ok(())
    }

    fn solve(&mut self) {
        if !self.validity.is_all_valid() {
            self.recompute(0..self.v.len());
        }
    }

    #[inline]
    fn eval_arg(&mut self, arg: &Arg<D::Real, Self::Basis>) -> Result<V, SplineError> {
        let i = arg.index();
        self.check_arg(i)?;
        self.refresh(i..i + 2)?;
        Ok(self.blend(i, arg.coefficients()))
    }

    fn eval_args(
        &mut self,
        args: &Args<D::Real, Self::Basis>,
        out: &mut [V],
    ) -> Result<(), SplineError> {
        SplineError::check_len(args.len(), out.len())?;
        let (index, c) = args.columns();
        for &i in index {
            self.check_arg(i)?;
            self.refresh(i..i + 2)?;
        }

        for k in 0..index.len() {
            let i = index[k];
            out[k] = self.blend(i, [c[0][k], c[1][k], c[2][k], c[3][k]]);
        }
        Ok(())
    }
}
