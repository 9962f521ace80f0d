//! Cubic spline interpolation with cached coefficients.
//!
//! Spline evaluation is split into independently cached components:
//! * The [`Domain`] of knot abscissae, with its precomputed subinterval lengths
//! * The [`Arg`]uments, which bind abscissae to subintervals and precompute
//!   their blending coefficients
//! * The coefficients solved from the knot values by a [`CoefficientSolver`],
//!   which are kept up to date according to a [`CachingPolicy`]
//!
//! so that workloads which vary a single input avoid recomputing the others:
//! a [`Spline`] is evaluated at varying arguments over fixed knot values,
//! while a [`Cospline`] is evaluated at fixed arguments over varying knot values,
//! and a [`BiCospline`] resamples varying grids along a fixed trajectory.
//!
//! | solver | basis | coefficients | locality |
//! |---|---|---|---|
//! | [`C2Solver`] with [`SolverKind::Solve`] | [`C2Basis`] | second derivatives, natural or not-a-knot | global |
//! | [`C2Solver`] with [`SolverKind::Approximate`] | [`C2Basis`] | approximate second derivatives | radius 1 |
//! | [`HermiteSolver`] | [`HermiteBasis`] | finite-difference or Catmull-Rom tangents | radius 1 |
//! | [`Akima`] | [`HermiteBasis`] | Akima tangents, real values only | radius 2 |
//! | ([`LagrangeSpline`]) | [`LagrangeBasis`] | none | 4 knots |
//!
//! Knot values may be of any type forming a vector space over the abscissae,
//! such as `f64` or `num_complex::Complex<f64>`.
//!
//! ```rust
//! use cospline::interp_alloc;
//!
//! let y = interp_alloc(&[1.0, 2.0, 3.0, 4.0], &[10.0_f64, 20.0, 30.0, 40.0], &[1.1, 2.5, 3.9]).unwrap();
//! assert!((y[2] - 39.0).abs() < 1e-12);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
// These "needless" range loops are a significant speedup
#![allow(clippy::needless_range_loop)]

extern crate alloc;

pub mod argument;
pub mod bivariate;
pub mod builder;
pub mod cache;
pub mod cospline;
pub mod domain;
pub mod error;
pub mod lagrange;
pub mod solver;
pub mod spline;
pub mod value;

#[cfg(feature = "std")]
pub mod utils;

#[cfg(all(test, feature = "std"))]
pub(crate) mod testing;

pub use argument::{Arg, Args, Basis, C2Basis, HermiteBasis, LagrangeBasis};
pub use bivariate::BiCospline;
pub use builder::{interp, interp_alloc, Builder};
pub use cache::CachingPolicy;
pub use cospline::Cospline;
pub use domain::{Domain, Linspace, Partition};
pub use error::SplineError;
pub use lagrange::LagrangeSpline;
pub use solver::{
    Akima, C2Bounds, C2Solver, CoefficientSolver, HermiteSolver, SolverBasis, SolverKind,
    Tangents,
};
pub use spline::{Interp1D, Spline};
pub use value::KnotValue;
