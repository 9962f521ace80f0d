//! Spline arguments.
//!
//! An argument binds an abscissa `x` to its containing subinterval `i` of a
//! domain, and precomputes the four blending coefficients which weight the
//! knot values and the solved coefficients in the evaluation
//!
//! ```text
//! y = v[i] * c[0] + v[i + 1] * c[1] + s[i] * c[2] + s[i + 1] * c[3]
//! ```
//!
//! The coefficients depend on the family of the spline, which is encoded
//! as a [`Basis`] type parameter so that an argument built for one family
//! cannot be fed to another.
//!
//! Building an argument costs an interval search and a few divisions;
//! retaining arguments across evaluations amortizes it when the abscissae
//! are fixed while the knot values change.
use alloc::vec::Vec;
use core::marker::PhantomData;

use num_traits::{Float, One};

use crate::domain::MIN_KNOTS;
use crate::{Domain, SplineError};

/// A family of blending coefficients.
pub trait Basis: Copy {
    /// Minimum number of knots for the basis to be defined.
    #[inline]
    fn min_knots() -> usize {
        MIN_KNOTS
    }

    /// Index of the subinterval the argument is bound to.
    ///
    /// # Errors
    /// * If `x` is out of the domain
    #[inline]
    fn locate<D: Domain>(domain: &D, x: D::Real) -> Result<usize, SplineError> {
        domain.index(x)
    }

    /// Blending coefficients for abscissa `x` in subinterval `i`.
    fn weights<D: Domain>(domain: &D, i: usize, x: D::Real) -> [D::Real; 4];
}

/// Coefficients of a C2 cubic spline, which weight the knot values and the
/// second derivatives divided by 6.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct C2Basis;

impl Basis for C2Basis {
    #[inline]
    fn weights<D: Domain>(domain: &D, i: usize, x: D::Real) -> [D::Real; 4] {
        let h = domain.length(i);
        let left = x - domain.at(i);
        let right = h - left;
        let cv0 = right * domain.inverse_length(i);
        let cv1 = D::Real::one() - cv0;
        let cs0 = right * (right * cv0 - h);
        let cs1 = left * (left * cv1 - h);
        [cv0, cv1, cs0, cs1]
    }
}

/// Coefficients of a cubic Hermite spline, which weight the knot values
/// and the tangents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HermiteBasis;

impl Basis for HermiteBasis {
    #[inline]
    fn weights<D: Domain>(domain: &D, i: usize, x: D::Real) -> [D::Real; 4] {
        let one = D::Real::one();
        let two = one + one;
        let three = two + one;

        let h = domain.length(i);
        let t = (x - domain.at(i)) * domain.inverse_length(i);
        let s = one - t;
        let t2 = t * t;
        let s2 = s * s;

        let cv0 = (one + two * t) * s2;
        let cv1 = t2 * (three - two * t);
        let cd0 = h * t * s2;
        let cd1 = -h * t2 * s;
        [cv0, cv1, cd0, cd1]
    }
}

/// Lagrange weights of the cubic polynomial through knots `i - 1..=i + 2`.
///
/// The first and last subintervals have no such window, so the argument
/// is bound to the next and previous subintervals respectively.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LagrangeBasis;

impl Basis for LagrangeBasis {
    #[inline]
    fn min_knots() -> usize {
        4
    }

    #[inline]
    fn locate<D: Domain>(domain: &D, x: D::Real) -> Result<usize, SplineError> {
        let n = domain.size();
        if n < Self::min_knots() {
            return Err(SplineError::InvalidDomain("Not enough knots (< 4)"));
        }
        Ok(domain.index(x)?.clamp(1, n - 3))
    }

    #[inline]
    fn weights<D: Domain>(domain: &D, i: usize, x: D::Real) -> [D::Real; 4] {
        let u = [
            domain.at(i - 1),
            domain.at(i),
            domain.at(i + 1),
            domain.at(i + 2),
        ];
        let mut l = [D::Real::one(); 4];
        for j in 0..4 {
            for k in 0..4 {
                if j != k {
                    l[j] = l[j] * (x - u[k]) / (u[j] - u[k]);
                }
            }
        }
        l
    }
}

/// An abscissa bound to a domain subinterval, with precomputed coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arg<T, B> {
    /// Subinterval index
    index: usize,

    /// Blending coefficients
    c: [T; 4],

    basis: PhantomData<B>,
}

impl<T: Float, B: Basis> Arg<T, B> {
    /// Bind `x` to `domain`.
    ///
    /// # Errors
    /// * If `x` is out of the domain
    /// * If the domain is too small for the basis
    #[inline]
    pub fn new<D: Domain<Real = T>>(domain: &D, x: T) -> Result<Self, SplineError> {
        let index = B::locate(domain, x)?;
        Ok(Self {
            index,
            c: B::weights(domain, index, x),
            basis: PhantomData,
        })
    }
}

impl<T: Copy, B> Arg<T, B> {
    /// Index of the subinterval.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Blending coefficients, in the order of the evaluation formula.
    #[inline]
    pub fn coefficients(&self) -> [T; 4] {
        self.c
    }
}

/// A batch of arguments over a common domain, stored column-wise.
#[derive(Clone, Debug, PartialEq)]
pub struct Args<T, B> {
    index: Vec<usize>,
    c: [Vec<T>; 4],
    basis: PhantomData<B>,
}

impl<T: Float, B: Basis> Args<T, B> {
    /// Bind every abscissa of `x` to `domain`.
    ///
    /// # Errors
    /// * If any abscissa is out of the domain
    pub fn new<D: Domain<Real = T>>(domain: &D, x: &[T]) -> Result<Self, SplineError> {
        let mut args = Self {
            index: Vec::with_capacity(x.len()),
            c: core::array::from_fn(|_| Vec::with_capacity(x.len())),
            basis: PhantomData,
        };
        for &xi in x {
            args.push(Arg::new(domain, xi)?);
        }
        Ok(args)
    }
}

impl<T: Copy, B> Args<T, B> {
    /// Append an argument.
    pub fn push(&mut self, arg: Arg<T, B>) {
        self.index.push(arg.index);
        for j in 0..4 {
            self.c[j].push(arg.c[j]);
        }
    }

    /// Number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the batch is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Subinterval indices.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.index
    }

    /// The `k`-th argument.
    #[inline]
    pub fn get(&self, k: usize) -> Option<Arg<T, B>> {
        let index = *self.index.get(k)?;
        Some(Arg {
            index,
            c: [self.c[0][k], self.c[1][k], self.c[2][k], self.c[3][k]],
            basis: PhantomData,
        })
    }

    /// Iterate over the arguments.
    pub fn iter(&self) -> impl Iterator<Item = Arg<T, B>> + '_ {
        (0..self.len()).filter_map(move |k| self.get(k))
    }

    /// Coefficient columns, in the order of the evaluation formula.
    #[inline]
    pub(crate) fn columns(&self) -> (&[usize], [&[T]; 4]) {
        (
            &self.index,
            [&self.c[0], &self.c[1], &self.c[2], &self.c[3]],
        )
    }
}
