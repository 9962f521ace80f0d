//! Convenience methods for constructing abscissae and knot grids in a way that echoes,
//! but does not exactly match, methods common in scripting languages.
use itertools::Itertools;
use num_traits::Float;

/// Generates evenly spaced values from start to stop,
/// including the endpoint, which is exactly `stop`.
pub fn linspace<T>(start: T, stop: T, n: usize) -> Vec<T>
where
    T: Float,
{
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let dx: T = (stop - start) / T::from(n - 1).unwrap_or_else(T::nan);
            let mut out: Vec<T> = (0..n)
                .map(|i| start + T::from(i).unwrap_or_else(T::nan) * dx)
                .collect();
            out[n - 1] = stop;
            out
        }
    }
}

/// Samples `f` on the tensor grid of `x0` and `x1` in C ordering
/// (f(x0[0], x1[0]), f(x0[0], x1[1]), ..., f(x0[n0 - 1], x1[n1 - 1])),
/// which is the knot layout of bivariate resamplers.
pub fn sample_grid<T, V, F>(x0: &[T], x1: &[T], f: F) -> Vec<V>
where
    T: Float,
    F: Fn(T, T) -> V,
{
    x0.iter()
        .cartesian_product(x1.iter())
        .map(|(&a, &b)| f(a, b))
        .collect()
}
