//! Separable bivariate resampling along a fixed trajectory.
//!
//! A [`BiCospline`] resamples successive grids of knot values, over the
//! tensor product of two domains, at a fixed set of points. Interpolation
//! is separable: one spline along axis 0 per knot of axis 1, then a single
//! spline along axis 1 through the values of the former at each point.
//!
//! At construction, every point marks the knots which support it in an
//! occupancy mask: the support of its axis-0 argument times the support of
//! its axis-1 argument. Only masked knots are fed to the axis-0 splines, and
//! only the axis-1 knots which support a point are evaluated for it, so that
//! the cost of a resampling is bounded by the trajectory length rather than
//! the grid size when the splines are local. Global splines are supported
//! by the whole axis, and are fed every knot.
//!
//! Knot values are flat and C-ordered: knot `(i0, i1)` is at `i0 * n1 + i1`.
//!
//! ```rust
//! use cospline::{BiCospline, C2Solver, CachingPolicy, Partition, Spline};
//!
//! let u0 = Partition::new(&[1.0, 2.0, 3.0, 4.0]).unwrap();
//! let u1 = Partition::new(&[1.0, 10.0, 100.0, 1000.0]).unwrap();
//! let spline0 = Spline::new(&u0, C2Solver::natural(), CachingPolicy::Lazy).unwrap();
//! let spline1 = Spline::new(&u1, C2Solver::natural(), CachingPolicy::Lazy).unwrap();
//! let mut resampler = BiCospline::new(spline0, spline1, &[[2.5, 20.0]]).unwrap();
//!
//! let v: Vec<f64> = (0..16).map(|k| u0.knots()[k / 4] * u1.knots()[k % 4]).collect();
//! let y = resampler.eval_alloc(&v).unwrap();
//! assert!((y[0] - 50.0).abs() < 1e-9);
//! ```
use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use log::debug;
use num_traits::Zero;

use crate::{Args, CachingPolicy, Domain, Interp1D, SplineError};

/// A separable bivariate spline evaluated at a fixed set of points.
pub struct BiCospline<S0: Interp1D, S1: Interp1D> {
    /// One axis-0 spline per axis-1 knot
    splines0: Vec<S0>,
    spline1: S1,

    args0: Args<S0::Real, S0::Basis>,
    args1: Args<S1::Real, S1::Basis>,

    /// Axis-1 knots needed by each point
    windows1: Vec<Range<usize>>,

    /// Masked axis-0 knots of each axis-1 knot
    rows: Vec<Vec<usize>>,

    /// Scratch values of an axis-0 column and of the axis-1 knots
    column: Vec<S0::Value>,
    knots1: Vec<S0::Value>,
}

impl<S0, S1> BiCospline<S0, S1>
where
    S0: Interp1D + Clone,
    S1: Interp1D<Real = S0::Real, Value = S0::Value>,
{
    /// Bind a trajectory of `(x0, x1)` points to the domains of `spline0` and `spline1`.
    ///
    /// `spline0` is a template which is cloned for each knot of axis 1;
    /// its knot values are irrelevant.
    ///
    /// # Errors
    /// * If any coordinate is out of the domain of its axis
    pub fn new(
        spline0: S0,
        spline1: S1,
        trajectory: &[[S0::Real; 2]],
    ) -> Result<Self, SplineError> {
        let n0 = spline0.domain().size();
        let n1 = spline1.domain().size();

        let mut args0 = Args::new(spline0.domain(), &[])?;
        let mut args1 = Args::new(spline1.domain(), &[])?;
        let mut windows1 = Vec::with_capacity(trajectory.len());
        let mut mask = vec![false; n0 * n1];
        for &[x0, x1] in trajectory {
            let arg0 = spline0.arg(x0)?;
            let arg1 = spline1.arg(x1)?;
            let window1 = spline1.support(&arg1);
            for i0 in spline0.support(&arg0) {
                mask[i0 * n1 + window1.start..i0 * n1 + window1.end].fill(true);
            }
            args0.push(arg0);
            args1.push(arg1);
            windows1.push(window1);
        }

        let rows: Vec<Vec<usize>> = (0..n1)
            .map(|i1| (0..n0).filter(|&i0| mask[i0 * n1 + i1]).collect())
            .collect();
        let occupancy: usize = rows.iter().map(Vec::len).sum();
        debug!(
            "Bivariate cospline with {n0}x{n1} knots, {} points, {occupancy} masked knots",
            trajectory.len()
        );

        let column = spline0.knot_values().to_vec();
        let knots1 = spline1.knot_values().to_vec();
        Ok(Self {
            splines0: vec![spline0; n1],
            spline1,
            args0,
            args1,
            windows1,
            rows,
            column,
            knots1,
        })
    }

    /// Number of knots along each axis.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.column.len(), self.knots1.len())
    }

    /// Number of trajectory points.
    #[inline]
    pub fn len(&self) -> usize {
        self.args0.len()
    }

    /// Whether the trajectory is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args0.is_empty()
    }

    /// Number of masked knots, which are the knots fed to the axis-0 splines.
    pub fn occupancy(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Whether knot `(i0, i1)` supports any trajectory point.
    pub fn is_masked(&self, i0: usize, i1: usize) -> bool {
        self.rows
            .get(i1)
            .is_some_and(|rows| rows.binary_search(&i0).is_ok())
    }

    /// Resample the grid of knot values `v` along the trajectory.
    ///
    /// # Errors
    /// * If the number of knot values is not `n0 * n1`
    /// * If the output length does not match the trajectory length
    pub fn eval(&mut self, v: &[S0::Value], out: &mut [S0::Value]) -> Result<(), SplineError> {
        let (n0, n1) = self.shape();
        SplineError::check_len(n0 * n1, v.len())?;
        SplineError::check_len(self.args0.len(), out.len())?;

        // Feed the masked knots to the axis-0 splines
        for (i1, (spline, rows)) in self.splines0.iter_mut().zip(&self.rows).enumerate() {
            if rows.len() == n0 {
                for i0 in 0..n0 {
                    self.column[i0] = v[i0 * n1 + i1];
                }
                spline.assign(&self.column)?;
            } else {
                for &i0 in rows {
                    spline.set(i0, v[i0 * n1 + i1])?;
                }
            }
            if spline.caching() == CachingPolicy::Manual {
                spline.solve();
            }
        }

        // Interpolate along axis 0 then axis 1 at each point
        let points = self.args0.iter().zip(self.args1.iter());
        for ((arg0, arg1), (window1, y)) in points.zip(self.windows1.iter().zip(out.iter_mut())) {
            for i1 in window1.clone() {
                self.knots1[i1] = self.splines0[i1].eval_arg(&arg0)?;
            }
            if window1.len() == n1 {
                self.spline1.assign(&self.knots1)?;
            } else {
                for i1 in window1.clone() {
                    self.spline1.set(i1, self.knots1[i1])?;
                }
            }
            if self.spline1.caching() == CachingPolicy::Manual {
                self.spline1.solve();
            }
            *y = self.spline1.eval_arg(&arg1)?;
        }
        Ok(())
    }

    /// Resample the grid of knot values `v` along the trajectory,
    /// allocating for the output values for convenience.
    ///
    /// # Errors
    /// * On the same conditions as [`BiCospline::eval`]
    pub fn eval_alloc(&mut self, v: &[S0::Value]) -> Result<Vec<S0::Value>, SplineError> {
        let mut out = vec![S0::Value::zero(); self.len()];
        self.eval(v, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::BiCospline;
    use crate::testing::{randn, rng_fixed_seed};
    use crate::utils::{linspace, sample_grid};
    use crate::{
        C2Solver, CachingPolicy, Domain, HermiteSolver, Interp1D, LagrangeSpline, Linspace,
        Partition, Spline, SplineError,
    };
    use approx::assert_abs_diff_eq;
    use ndarray::Array2;
    use num_complex::Complex;

    /// Full tensor evaluation: every knot of every column, then every axis-1 knot.
    fn tensor_eval<S0, S1>(spline0: &mut S0, spline1: &mut S1, v: &[f64], x: [f64; 2]) -> f64
    where
        S0: Interp1D<Real = f64, Value = f64>,
        S1: Interp1D<Real = f64, Value = f64>,
    {
        let n0 = spline0.domain().size();
        let n1 = spline1.domain().size();
        let mut knots1 = vec![0.0; n1];
        for i1 in 0..n1 {
            let column: Vec<f64> = (0..n0).map(|i0| v[i0 * n1 + i1]).collect();
            spline0.assign(&column).unwrap();
            spline0.solve();
            knots1[i1] = spline0.eval_one(x[0]).unwrap();
        }
        spline1.assign(&knots1).unwrap();
        spline1.solve();
        spline1.eval_one(x[1]).unwrap()
    }

    #[test]
    fn test_product_fixture() {
        let u0 = Partition::new(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        let u1 = Partition::new(&[1.0, 10.0, 100.0, 1000.0]).unwrap();
        let v = Array2::from_shape_fn((4, 4), |(j0, j1)| (j0 + 1) as f64 * 10f64.powi(j1 as i32));
        let v = v.as_slice().unwrap();
        let trajectory = [[1.1, 2.0], [2.5, 20.0], [3.9, 50.0]];

        for solver in [C2Solver::natural(), C2Solver::approximate()] {
            for caching in [
                CachingPolicy::Eager,
                CachingPolicy::Lazy,
                CachingPolicy::Manual,
            ] {
                let spline0 = Spline::new(&u0, solver, caching).unwrap();
                let spline1 = Spline::new(&u1, solver, caching).unwrap();
                let mut resampler = BiCospline::new(spline0, spline1, &trajectory).unwrap();
                let y = resampler.eval_alloc(v).unwrap();

                for (p, [x0, x1]) in trajectory.iter().enumerate() {
                    assert_abs_diff_eq!(y[p], x0 * x1, epsilon = 1e-9);

                    // Bounding box of the four nearest knots
                    let i0 = u0.index(*x0).unwrap();
                    let i1 = u1.index(*x1).unwrap();
                    let corners = [
                        v[i0 * 4 + i1],
                        v[i0 * 4 + i1 + 1],
                        v[(i0 + 1) * 4 + i1],
                        v[(i0 + 1) * 4 + i1 + 1],
                    ];
                    let lo = corners.iter().cloned().fold(f64::INFINITY, f64::min);
                    let hi = corners.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                    assert!(lo <= y[p] && y[p] <= hi);
                }
            }
        }
    }

    #[test]
    fn test_separable_trigonometric() {
        let half_pi = core::f64::consts::FRAC_PI_2;
        let u0 = Linspace::from_bounds(0.0, 2.0 * half_pi, 20).unwrap();
        let u1 = Linspace::from_bounds(-half_pi, half_pi, 20).unwrap();
        let x0: Vec<f64> = (0..20).map(|i| u0.at(i)).collect();
        let x1: Vec<f64> = (0..20).map(|i| u1.at(i)).collect();
        let f = |a: f64, b: f64| a.sin() * b.cos();
        let v = sample_grid(&x0, &x1, f);

        let t0 = linspace(0.05, 3.0, 37);
        let t1 = linspace(-1.5, 1.4, 37);
        let trajectory: Vec<[f64; 2]> = t0.iter().zip(&t1).map(|(&a, &b)| [a, b]).collect();

        let spline0 = Spline::new(&u0, C2Solver::natural(), CachingPolicy::Lazy).unwrap();
        let spline1 = Spline::new(&u1, C2Solver::natural(), CachingPolicy::Lazy).unwrap();
        let mut resampler = BiCospline::new(spline0, spline1, &trajectory).unwrap();
        assert_eq!(resampler.occupancy(), 400);
        let y = resampler.eval_alloc(&v).unwrap();

        // Second derivatives of `f` are bounded by 1, so the grid values bracket
        // each output up to the bilinear error and the interpolation error
        let (h0, h1) = (u0.length(0), u1.length(0));
        let slack = (h0 * h0 + h1 * h1) / 8.0 + 1e-4;
        for (p, &[a, b]) in trajectory.iter().enumerate() {
            assert_abs_diff_eq!(y[p], f(a, b), epsilon = 1e-4);

            let i0 = u0.index(a).unwrap();
            let i1 = u1.index(b).unwrap();
            let corners = [
                v[i0 * 20 + i1],
                v[i0 * 20 + i1 + 1],
                v[(i0 + 1) * 20 + i1],
                v[(i0 + 1) * 20 + i1 + 1],
            ];
            let lo = corners.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = corners.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert!(lo - slack <= y[p] && y[p] <= hi + slack);
        }

        // Complex grids resample their real and imaginary parts independently
        let g = |a: f64, b: f64| a.cos() * b.sin();
        let w = sample_grid(&x0, &x1, g);
        let z: Vec<Complex<f64>> = v.iter().zip(&w).map(|(&re, &im)| Complex::new(re, im)).collect();
        let spline0: Spline<_, Complex<f64>, _> =
            Spline::new(&u0, C2Solver::natural(), CachingPolicy::Lazy).unwrap();
        let spline1 = Spline::new(&u1, C2Solver::natural(), CachingPolicy::Lazy).unwrap();
        let mut complex = BiCospline::new(spline0, spline1, &trajectory).unwrap();
        let yz = complex.eval_alloc(&z).unwrap();
        let yw = resampler.eval_alloc(&w).unwrap();
        for p in 0..trajectory.len() {
            assert_abs_diff_eq!(yz[p].re, y[p], epsilon = 1e-12);
            assert_abs_diff_eq!(yz[p].im, yw[p], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_masked_matches_tensor() {
        let mut rng = rng_fixed_seed();
        let u0 = Partition::new(&[0.0, 0.5, 1.5, 2.0, 3.0, 4.5, 5.0, 6.0]).unwrap();
        let u1 = Linspace::new(-2.0, 0.5, 9).unwrap();
        let trajectory = [[0.7, -1.9], [2.2, 0.1], [2.3, 0.2], [5.9, 2.0]];

        let hermite = HermiteSolver::default();
        let approximate = C2Solver::approximate();
        let mut resamplers = (
            BiCospline::new(
                Spline::new(&u0, hermite, CachingPolicy::Lazy).unwrap(),
                Spline::new(&u1, approximate, CachingPolicy::Manual).unwrap(),
                &trajectory,
            )
            .unwrap(),
            BiCospline::new(
                LagrangeSpline::new(&u0).unwrap(),
                Spline::new(&u1, hermite, CachingPolicy::Eager).unwrap(),
                &trajectory,
            )
            .unwrap(),
        );
        // Only the neighborhoods of the points are masked
        assert!(resamplers.0.occupancy() < 8 * 9);
        assert!(resamplers.0.is_masked(2, 4));
        assert!(!resamplers.0.is_masked(7, 0));
        assert!(!resamplers.0.is_masked(0, 9));

        // Successive grids are resampled independently of the previous ones
        for _ in 0..3 {
            let v = randn::<f64>(&mut rng, 8 * 9);

            let y = resamplers.0.eval_alloc(&v).unwrap();
            let mut full0 = Spline::new(&u0, hermite, CachingPolicy::Lazy).unwrap();
            let mut full1 = Spline::new(&u1, approximate, CachingPolicy::Manual).unwrap();
            for (p, &x) in trajectory.iter().enumerate() {
                let expected = tensor_eval(&mut full0, &mut full1, &v, x);
                assert_abs_diff_eq!(y[p], expected, epsilon = 1e-12);
            }

            let y = resamplers.1.eval_alloc(&v).unwrap();
            let mut full0 = LagrangeSpline::new(&u0).unwrap();
            let mut full1 = Spline::new(&u1, hermite, CachingPolicy::Eager).unwrap();
            for (p, &x) in trajectory.iter().enumerate() {
                let expected = tensor_eval(&mut full0, &mut full1, &v, x);
                assert_abs_diff_eq!(y[p], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_occupancy() {
        let u0 = Partition::new(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let u1 = Partition::new(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let local = HermiteSolver::default();
        let spline0: Spline<_, f64, _> = Spline::new(&u0, local, CachingPolicy::Lazy).unwrap();
        let spline1: Spline<_, f64, _> = Spline::new(&u1, local, CachingPolicy::Lazy).unwrap();

        // A point in the middle is supported by a 4x4 window
        let resampler = BiCospline::new(spline0.clone(), spline1.clone(), &[[3.5, 2.5]]).unwrap();
        assert_eq!(resampler.occupancy(), 16);
        assert_eq!(resampler.shape(), (7, 7));
        assert!(resampler.is_masked(2, 1) && resampler.is_masked(5, 4));
        assert!(!resampler.is_masked(1, 1) && !resampler.is_masked(2, 5));

        // Windows are clipped at the corners
        let resampler = BiCospline::new(spline0.clone(), spline1.clone(), &[[0.5, 6.0]]).unwrap();
        assert_eq!(resampler.occupancy(), 9);

        let global: Spline<_, f64, _> =
            Spline::new(&u1, C2Solver::natural(), CachingPolicy::Lazy).unwrap();
        let resampler = BiCospline::new(spline0, global, &[[3.5, 2.5]]).unwrap();
        assert_eq!(resampler.occupancy(), 4 * 7);
    }

    #[test]
    fn test_errors() {
        let u = Partition::new(&[0.0, 1.0, 2.0, 3.0]).unwrap();
        let spline: Spline<_, f64, _> =
            Spline::new(&u, C2Solver::natural(), CachingPolicy::Lazy).unwrap();
        assert!(matches!(
            BiCospline::new(spline.clone(), spline.clone(), &[[1.0, 3.5]]),
            Err(SplineError::OutOfDomain { .. })
        ));

        let mut resampler = BiCospline::new(spline.clone(), spline, &[[1.0, 2.0]]).unwrap();
        assert_eq!(resampler.len(), 1);
        assert_eq!(
            resampler.eval_alloc(&[0.0; 15]),
            Err(SplineError::DimensionMismatch {
                expected: 16,
                got: 15
            })
        );
        let mut out = [0.0; 2];
        assert!(resampler.eval(&[0.0; 16], &mut out).is_err());
    }
}
