use rand::Rng;
use rand::SeedableRng;
use rand::distr::StandardUniform;
use rand::rngs::StdRng;

/// Fixed random seed to support repeatable testing
const SEED: [u8; 32] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6,
    5, 4, 3, 2, 1,
];

/// Get a random number generator with a const seed for repeatable testing
pub fn rng_fixed_seed() -> StdRng {
    StdRng::from_seed(SEED)
}

/// Generate `n` random numbers using provided generator
pub fn randn<T>(rng: &mut StdRng, n: usize) -> Vec<T>
where
    StandardUniform: rand::distr::Distribution<T>,
{
    std::iter::repeat_with(|| rng.random::<T>())
        .take(n)
        .collect()
}

/// Generate `n` strictly increasing knots starting at `start`,
/// with random steps in `[0.1, 1.1)`
pub fn random_knots(rng: &mut StdRng, start: f64, n: usize) -> Vec<f64> {
    let mut x = start;
    randn::<f64>(rng, n)
        .into_iter()
        .enumerate()
        .map(|(i, step)| {
            if i > 0 {
                x += step + 0.1;
            }
            x
        })
        .collect()
}

/// Second derivatives of the natural cubic spline through `(u, v)`, divided by 6.
///
/// The system is assembled as a dense matrix and solved by Gaussian elimination
/// with partial pivoting, independently of the tridiagonal solver.
pub fn dense_natural(u: &[f64], v: &[f64]) -> Vec<f64> {
    let n = u.len();
    let h: Vec<f64> = u.windows(2).map(|w| w[1] - w[0]).collect();
    let mut a = vec![vec![0.0; n + 1]; n];
    a[0][0] = 1.0;
    a[n - 1][n - 1] = 1.0;
    for i in 1..n - 1 {
        a[i][i - 1] = h[i - 1];
        a[i][i] = 2.0 * (h[i - 1] + h[i]);
        a[i][i + 1] = h[i];
        a[i][n] = (v[i + 1] - v[i]) / h[i] - (v[i] - v[i - 1]) / h[i - 1];
    }

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&p, &q| a[p][col].abs().total_cmp(&a[q][col].abs()))
            .unwrap();
        a.swap(col, pivot);
        for r in col + 1..n {
            let f = a[r][col] / a[col][col];
            for c in col..=n {
                a[r][c] -= f * a[col][c];
            }
        }
    }

    let mut z = vec![0.0; n];
    for r in (0..n).rev() {
        let mut acc = a[r][n];
        for c in r + 1..n {
            acc -= a[r][c] * z[c];
        }
        z[r] = acc / a[r][r];
    }
    z
}

/// Natural cubic spline through `(u, v)` evaluated at `x` from dense-solved coefficients.
pub fn dense_natural_eval(u: &[f64], v: &[f64], x: f64) -> f64 {
    let z = dense_natural(u, v);
    let n = u.len();
    let i = (0..n - 1).rev().find(|&i| u[i] <= x).unwrap_or(0).min(n - 2);
    let h = u[i + 1] - u[i];
    let a = (u[i + 1] - x) / h;
    let b = (x - u[i]) / h;
    a * v[i] + b * v[i + 1] + ((a * a * a - a) * z[i] + (b * b * b - b) * z[i + 1]) * h * h
}
