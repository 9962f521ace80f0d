//! Splines with fixed arguments and varying knot values.
//!
//! A [`Cospline`] is the dual of a spline: it binds the abscissae once,
//! and is then called on successive sets of knot values. The interval
//! searches and blending coefficients of the arguments are computed at
//! construction only.
//!
//! ```rust
//! use cospline::{C2Solver, CachingPolicy, Cospline, Partition, Spline};
//!
//! let u = Partition::new(&[1.0, 2.0, 3.0, 4.0]).unwrap();
//! let spline = Spline::new(&u, C2Solver::natural(), CachingPolicy::Lazy).unwrap();
//! let mut cospline = Cospline::new(spline, &[1.1, 2.5, 3.9]).unwrap();
//!
//! for scale in [1.0_f64, 2.0, 10.0] {
//!     let v = [1.0 * scale, 2.0 * scale, 3.0 * scale, 4.0 * scale];
//!     let y = cospline.eval_alloc(&v).unwrap();
//!     assert!((y[1] - 2.5 * scale).abs() < 1e-12);
//! }
//! ```
use alloc::vec;
use alloc::vec::Vec;

use log::debug;
use num_traits::Zero;

use crate::{Args, CachingPolicy, Domain, Interp1D, SplineError};

type SplineArgs<S> = Args<<S as Interp1D>::Real, <S as Interp1D>::Basis>;

/// A spline evaluated at a fixed set of arguments.
pub struct Cospline<S: Interp1D> {
    spline: S,
    args: SplineArgs<S>,
}

impl<S: Interp1D> Cospline<S> {
    /// Bind the abscissae `x` to the domain of `spline`.
    ///
    /// # Errors
    /// * If any abscissa is out of the domain
    pub fn new(spline: S, x: &[S::Real]) -> Result<Self, SplineError> {
        let args = spline.args(x)?;
        Ok(Self::from_args(spline, args))
    }

    /// Use arguments which were already bound to the domain of `spline`.
    pub fn from_args(spline: S, args: SplineArgs<S>) -> Self {
        debug!(
            "Cospline with {} knots and {} arguments",
            spline.domain().size(),
            args.len()
        );
        Self { spline, args }
    }

    /// Replace the abscissae.
    ///
    /// # Errors
    /// * If any abscissa is out of the domain, in which case the arguments are unchanged
    pub fn assign(&mut self, x: &[S::Real]) -> Result<(), SplineError> {
        self.args = self.spline.args(x)?;
        Ok(())
    }

    /// The underlying spline, which holds the last knot values.
    #[inline]
    pub fn spline(&self) -> &S {
        &self.spline
    }

    /// The bound arguments.
    #[inline]
    pub fn args(&self) -> &SplineArgs<S> {
        &self.args
    }

    /// Number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether there are no arguments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Evaluate the spline of knot values `v` at the bound arguments.
    ///
    /// Manually cached splines are solved before evaluation.
    ///
    /// # Errors
    /// * If the number of knot values is not the domain size
    /// * If the output length does not match the number of arguments
    pub fn eval(&mut self, v: &[S::Value], out: &mut [S::Value]) -> Result<(), SplineError> {
        SplineError::check_len(self.args.len(), out.len())?;
        self.spline.assign(v)?;
        if self.spline.caching() == CachingPolicy::Manual {
            self.spline.solve();
        }
        self.spline.eval_args(&self.args, out)
    }

    /// Evaluate the spline of knot values `v` at the bound arguments,
    /// allocating for the output values for convenience.
    ///
    /// # Errors
    /// * On the same conditions as [`Cospline::eval`]
    pub fn eval_alloc(&mut self, v: &[S::Value]) -> Result<Vec<S::Value>, SplineError> {
        let mut out = vec![S::Value::zero(); self.args.len()];
        self.eval(v, &mut out)?;
        Ok(out)
    }
}

impl<S: Interp1D + Clone> Clone for Cospline<S>
where
    SplineArgs<S>: Clone,
{
    fn clone(&self) -> Self {
        Self {
            spline: self.spline.clone(),
            args: self.args.clone(),
        }
    }
}
