//! Coefficient caching policies and validity tracking.
//!
//! Knot values and solved coefficients are stored side by side in a spline.
//! Whenever a knot value changes, the coefficients it influences become stale.
//! The caching policy decides when they are brought up to date:
//!
//! | policy | on knot update | on evaluation of a stale coefficient |
//! |---|---|---|
//! | [`CachingPolicy::Eager`] | recompute the influenced coefficients | (never stale) |
//! | [`CachingPolicy::Lazy`] | mark the influenced coefficients stale | recompute, then evaluate |
//! | [`CachingPolicy::Manual`] | mark the influenced coefficients stale | fail with [`StaleCache`](crate::SplineError::StaleCache) |
//!
//! Lazy caching suits frequent updates with sparse evaluations.
//! Manual caching suits batches of updates followed by batches of evaluations.
use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

/// When the coefficients of a spline are recomputed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CachingPolicy {
    /// Recompute on every knot update
    Eager,

    /// Recompute on the first read after an update
    #[default]
    Lazy,

    /// Recompute only when explicitly solved
    Manual,
}

/// Per-knot validity flags of a coefficient buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Validity {
    /// Whether each coefficient is up to date
    valid: Vec<bool>,

    /// Number of stale coefficients
    stale: usize,
}

impl Validity {
    /// All `n` coefficients up to date.
    pub fn valid(n: usize) -> Self {
        Self {
            valid: vec![true; n],
            stale: 0,
        }
    }

    /// Whether coefficient `i` exists and is up to date.
    #[inline]
    pub fn is_valid(&self, i: usize) -> bool {
        self.valid.get(i).copied().unwrap_or(false)
    }

    #[inline]
    pub fn is_all_valid(&self) -> bool {
        self.stale == 0
    }

    /// Whether every coefficient in `range` is up to date.
    #[inline]
    pub fn is_range_valid(&self, range: Range<usize>) -> bool {
        self.stale == 0 || self.valid[range].iter().all(|&v| v)
    }

    /// First stale coefficient in `range`, if any.
    #[inline]
    pub fn first_stale(&self, range: Range<usize>) -> Option<usize> {
        if self.stale == 0 {
            return None;
        }
        let start = range.start;
        self.valid[range].iter().position(|&v| !v).map(|k| start + k)
    }

    /// Maximal runs of consecutive stale coefficients in `range`.
    pub fn stale_runs(&self, range: Range<usize>) -> Vec<Range<usize>> {
        let mut runs = Vec::new();
        if self.stale == 0 {
            return runs;
        }
        let mut start = None;
        for i in range.clone() {
            match (self.valid[i], start) {
                (false, None) => start = Some(i),
                (true, Some(s)) => {
                    runs.push(s..i);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(s..range.end);
        }
        runs
    }

    pub fn invalidate(&mut self, range: Range<usize>) {
        for v in &mut self.valid[range] {
            if *v {
                *v = false;
                self.stale += 1;
            }
        }
    }

    pub fn invalidate_all(&mut self) {
        self.valid.fill(false);
        self.stale = self.valid.len();
    }

    pub fn validate(&mut self, range: Range<usize>) {
        for v in &mut self.valid[range] {
            if !*v {
                *v = true;
                self.stale -= 1;
            }
        }
    }

    pub fn validate_all(&mut self) {
        self.valid.fill(true);
        self.stale = 0;
    }
}
