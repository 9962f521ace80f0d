//! C2 cubic splines: second derivatives from knot values.
//!
//! The coefficients are stored divided by 6, which is the scaling the
//! [`C2Basis`] weights expect. With `h[i]` the subinterval lengths and
//! `d[i]` the secant slopes, continuity of the first derivative at every
//! inner knot yields the tridiagonal system
//!
//! ```text
//! h[i-1] z[i-1] + 2 (h[i-1] + h[i]) z[i] + h[i] z[i+1] = d[i] - d[i-1],  0 < i < n - 1
//! ```
//!
//! closed by the boundary conditions of [`C2Bounds`], and solved in O(n)
//! with the Thomas algorithm. The approximate variant drops the coupling
//! between neighbors instead, which trades smoothness for locality.
use alloc::vec::Vec;
use core::ops::Range;

use num_traits::{Float, One};

use super::{secant, CoefficientSolver, SolverBasis};
use crate::domain::MIN_KNOTS;
use crate::{C2Basis, Domain, KnotValue};

/// Boundary conditions of a C2 spline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum C2Bounds {
    /// Null second derivative at both ends
    #[default]
    Natural,

    /// Continuous third derivative at the second and penultimate knots,
    /// i.e. the first and last two subintervals share a cubic
    NotAKnot,
}

/// How the second derivatives are obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SolverKind {
    /// Exact solution of the tridiagonal system
    Solve(C2Bounds),

    /// Diagonal approximation of the natural system, local to each knot
    Approximate,
}

impl Default for SolverKind {
    fn default() -> Self {
        Self::Solve(C2Bounds::Natural)
    }
}

/// Coefficient solver of C2 cubic splines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct C2Solver(pub SolverKind);

impl C2Solver {
    /// Natural cubic spline.
    pub const fn natural() -> Self {
        Self(SolverKind::Solve(C2Bounds::Natural))
    }

    /// Not-a-knot cubic spline.
    pub const fn not_a_knot() -> Self {
        Self(SolverKind::Solve(C2Bounds::NotAKnot))
    }

    /// Locally approximated natural cubic spline.
    pub const fn approximate() -> Self {
        Self(SolverKind::Approximate)
    }

    /// The solving algorithm.
    #[inline]
    pub fn kind(&self) -> SolverKind {
        self.0
    }
}

impl SolverBasis for C2Solver {
    type Basis = C2Basis;
}

impl<T: Float, V: KnotValue<T>> CoefficientSolver<T, V> for C2Solver {
    #[inline]
    fn min_knots(&self) -> usize {
        match self.0 {
            SolverKind::Solve(C2Bounds::NotAKnot) => 4,
            _ => MIN_KNOTS,
        }
    }

    #[inline]
    fn radius(&self) -> Option<usize> {
        match self.0 {
            SolverKind::Solve(_) => None,
            SolverKind::Approximate => Some(1),
        }
    }

    fn solve<D: Domain<Real = T>>(&self, domain: &D, v: &[V], z: &mut [V]) {
        match self.0 {
            SolverKind::Solve(C2Bounds::Natural) => match domain.step() {
                Some(h) => solve_natural_regular(h, v, z),
                None => solve_natural(domain, v, z),
            },
            SolverKind::Solve(C2Bounds::NotAKnot) => solve_not_a_knot(domain, v, z),
            SolverKind::Approximate => approximate(domain, v, z, 0..v.len()),
        }
    }

    fn update<D: Domain<Real = T>>(&self, domain: &D, v: &[V], z: &mut [V], range: Range<usize>) {
        match self.0 {
            SolverKind::Solve(_) => self.solve(domain, v, z),
            SolverKind::Approximate => approximate(domain, v, z, range),
        }
    }
}

/// Solve a tridiagonal system in place with the Thomas algorithm.
///
/// `row(k)` returns the sub-diagonal, diagonal and super-diagonal entries of row `k`;
/// the sub-diagonal of the first row and the super-diagonal of the last one are ignored.
/// `x` holds the right-hand side on entry and the solution on exit.
///
/// The elimination has no pivoting, which is sound for the diagonally dominant
/// natural system and for the not-a-knot system of strictly increasing knots.
fn thomas<T, V, F>(row: F, x: &mut [V])
where
    T: Float,
    V: KnotValue<T>,
    F: Fn(usize) -> [T; 3],
{
    let m = x.len();
    if m == 0 {
        return;
    }

    // Forward elimination, keeping the modified diagonal
    let mut diag = Vec::with_capacity(m);
    let [_, b, mut c_prev] = row(0);
    diag.push(b);
    for k in 1..m {
        let [a, b, c] = row(k);
        let w = a / diag[k - 1];
        diag.push(b - w * c_prev);
        x[k] = x[k] - x[k - 1] * w;
        c_prev = c;
    }

    // Back substitution
    x[m - 1] = x[m - 1] / diag[m - 1];
    for k in (0..m - 1).rev() {
        let [_, _, c] = row(k);
        x[k] = (x[k] - x[k + 1] * c) / diag[k];
    }
}

/// Right-hand side of the inner rows, `d[i] - d[i-1]`.
#[inline]
fn curvature<D, V>(domain: &D, v: &[V], z: &mut [V])
where
    D: Domain,
    V: KnotValue<D::Real>,
{
    let n = v.len();
    let mut d_prev = secant(domain, v, 0);
    for i in 1..n - 1 {
        let d = secant(domain, v, i);
        z[i] = d - d_prev;
        d_prev = d;
    }
}

fn solve_natural<D, V>(domain: &D, v: &[V], z: &mut [V])
where
    D: Domain,
    V: KnotValue<D::Real>,
{
    let n = v.len();
    let two = D::Real::one() + D::Real::one();
    curvature(domain, v, z);
    z[0] = V::zero();
    z[n - 1] = V::zero();

    // Unknown k is the coefficient of knot k + 1
    let row = |k: usize| {
        let (h0, h1) = (domain.length(k), domain.length(k + 1));
        [h0, two * (h0 + h1), h1]
    };
    thomas(row, &mut z[1..n - 1]);
}

/// Natural system divided through by the constant step `h`.
fn solve_natural_regular<T, V>(h: T, v: &[V], z: &mut [V])
where
    T: Float,
    V: KnotValue<T>,
{
    let n = v.len();
    let one = T::one();
    let four = (one + one) * (one + one);
    let h2 = h * h;
    for i in 1..n - 1 {
        z[i] = (v[i + 1] - v[i] - v[i] + v[i - 1]) / h2;
    }
    z[0] = V::zero();
    z[n - 1] = V::zero();
    thomas(|_| [one, four, one], &mut z[1..n - 1]);
}

fn solve_not_a_knot<D, V>(domain: &D, v: &[V], z: &mut [V])
where
    D: Domain,
    V: KnotValue<D::Real>,
{
    let n = v.len();
    let m = n - 2; // Last inner knot
    let two = D::Real::one() + D::Real::one();
    curvature(domain, v, z);

    // The end coefficients are eliminated from the first and last inner rows
    let row = |k: usize| {
        let i = k + 1;
        let (h0, h1) = (domain.length(i - 1), domain.length(i));
        let [mut a, mut b, mut c] = [h0, two * (h0 + h1), h1];
        if i == 1 {
            b = b + h0 * (h0 + h1) / h1;
            c = c - h0 * h0 / h1;
        }
        if i == m {
            a = a - h1 * h1 / h0;
            b = b + h1 * (h0 + h1) / h0;
        }
        [a, b, c]
    };
    thomas(row, &mut z[1..n - 1]);

    let (h0, h1) = (domain.length(0), domain.length(1));
    z[0] = (z[1] * (h0 + h1) - z[2] * h0) / h1;
    let (h0, h1) = (domain.length(m - 1), domain.length(m));
    z[n - 1] = (z[m] * (h0 + h1) - z[m - 1] * h1) / h0;
}

/// Diagonal approximation, which assumes each coefficient equals its neighbors.
fn approximate<D, V>(domain: &D, v: &[V], z: &mut [V], range: Range<usize>)
where
    D: Domain,
    V: KnotValue<D::Real>,
{
    let n = v.len();
    let three = D::Real::one() + D::Real::one() + D::Real::one();
    for i in range {
        z[i] = if i == 0 || i == n - 1 {
            V::zero()
        } else {
            let sum = domain.length(i - 1) + domain.length(i);
            (secant(domain, v, i) - secant(domain, v, i - 1)) / (three * sum)
        };
    }
}

#[cfg(test)]
mod test {
    use super::{C2Bounds, C2Solver, SolverKind};
    use crate::solver::CoefficientSolver;
    use crate::testing::{dense_natural, randn, random_knots, rng_fixed_seed};
    use crate::{Domain, Linspace, Partition};
    use approx::assert_abs_diff_eq;

    fn solve<D: Domain<Real = f64>>(solver: C2Solver, u: &D, v: &[f64]) -> Vec<f64> {
        let mut z = vec![f64::NAN; v.len()];
        CoefficientSolver::<f64, f64>::solve(&solver, u, v, &mut z);
        z
    }

    #[test]
    fn test_natural_matches_dense() {
        let mut rng = rng_fixed_seed();
        for n in [3, 4, 5, 12, 40] {
            let u = random_knots(&mut rng, -1.0, n);
            let v = randn::<f64>(&mut rng, n);

            let z = solve(C2Solver::natural(), &Partition::new(&u).unwrap(), &v);
            let expected = dense_natural(&u, &v);
            for i in 0..n {
                assert_abs_diff_eq!(z[i], expected[i], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_natural_regular_path() {
        let regular = Linspace::new(-1.0, 0.3, 9).unwrap();
        let knots: Vec<f64> = (0..9).map(|i| regular.at(i)).collect();
        let rectilinear = Partition::new(&knots).unwrap();
        let v: Vec<f64> = knots.iter().map(|x| x.exp() * x.sin()).collect();

        let fast = solve(C2Solver::natural(), &regular, &v);
        let general = solve(C2Solver::natural(), &rectilinear, &v);
        for i in 0..9 {
            assert_abs_diff_eq!(fast[i], general[i], epsilon = 1e-9);
        }
        assert_eq!((fast[0], fast[8]), (0.0, 0.0));
    }

    #[test]
    fn test_natural_linear_data() {
        // Straight lines have no curvature
        let u = Partition::new(&[0.0, 1.5, 2.0, 4.0, 7.0]).unwrap();
        let v = [1.0, 4.0, 5.0, 9.0, 15.0];
        for z in solve(C2Solver::natural(), &u, &v) {
            assert_abs_diff_eq!(z, 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_not_a_knot_cubic() {
        // Not-a-knot splines reproduce cubics, whose second derivative divided by 6 is x + 1/3
        let f = |x: f64| x * x * x + x * x - 2.0 * x + 1.0;
        let u = Partition::new(&[-2.0, -0.5, 0.0, 1.0, 2.5, 3.0]).unwrap();
        let v: Vec<f64> = (0..6).map(|i| f(u.at(i))).collect();
        let z = solve(C2Solver::not_a_knot(), &u, &v);
        for i in 0..6 {
            assert_abs_diff_eq!(z[i], u.at(i) + 1.0 / 3.0, epsilon = 1e-10);
        }

        // Smallest supported domain
        let u = Partition::new(&[0.0, 1.0, 3.0, 4.0]).unwrap();
        let v: Vec<f64> = (0..4).map(|i| f(u.at(i))).collect();
        let z = solve(C2Solver::not_a_knot(), &u, &v);
        for i in 0..4 {
            assert_abs_diff_eq!(z[i], u.at(i) + 1.0 / 3.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_approximate_is_local() {
        let u = Partition::new(&[0.0, 1.0, 2.0, 4.0, 5.0, 7.0]).unwrap();
        let solver = C2Solver::approximate();
        let mut v = [0.0, 1.0, -1.0, 2.0, 0.5, 3.0];
        let mut z = vec![0.0; 6];
        CoefficientSolver::<f64, f64>::solve(&solver, &u, &v, &mut z);
        assert_eq!((z[0], z[5]), (0.0, 0.0));
        // d = [1, -2, 1.5, -1.5, 1.25], h = [1, 1, 2, 1, 2]
        assert_abs_diff_eq!(z[1], (-2.0 - 1.0) / 6.0, epsilon = 1e-15);
        assert_abs_diff_eq!(z[3], (-1.5 - 1.5) / 9.0, epsilon = 1e-15);

        // Updating the zone of a knot matches a full solve
        v[2] = 4.0;
        let zone = CoefficientSolver::<f64, f64>::zone(&solver, 6, 2);
        assert_eq!(zone, 1..4);
        CoefficientSolver::<f64, f64>::update(&solver, &u, &v, &mut z, zone);
        assert_eq!(z, solve(solver, &u, &v));
    }

    #[test]
    fn test_solver_properties() {
        let natural = C2Solver::default();
        assert_eq!(natural.kind(), SolverKind::Solve(C2Bounds::Natural));
        assert_eq!(CoefficientSolver::<f64, f64>::min_knots(&natural), 3);
        assert_eq!(CoefficientSolver::<f64, f64>::radius(&natural), None);
        assert!(!CoefficientSolver::<f64, f64>::supports_local_update(&natural));
        assert_eq!(CoefficientSolver::<f64, f64>::zone(&natural, 5, 2), 0..5);

        let not_a_knot = C2Solver::not_a_knot();
        assert_eq!(CoefficientSolver::<f64, f64>::min_knots(&not_a_knot), 4);

        let approximate = C2Solver::approximate();
        assert!(CoefficientSolver::<f64, f64>::supports_local_update(&approximate));
        assert_eq!(CoefficientSolver::<f64, f64>::support(&approximate, 8, 0), 0..3);
        assert_eq!(CoefficientSolver::<f64, f64>::support(&approximate, 8, 3), 2..6);
        assert_eq!(CoefficientSolver::<f64, f64>::support(&approximate, 8, 6), 5..8);
    }
}
