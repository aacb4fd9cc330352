use serde::{Deserialize, Serialize};

use crate::errors::CaimError;

/// One piece of a column's observed value range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
    pub lower_closed: bool,
    pub upper_closed: bool,
}

impl Interval {
    pub fn contains(&self, x: f64) -> bool {
        let above = if self.lower_closed {
            x >= self.lower
        } else {
            x > self.lower
        };
        let below = if self.upper_closed {
            x <= self.upper
        } else {
            x < self.upper
        };
        above && below
    }
}

/// An ordered set of contiguous, non-overlapping intervals covering the
/// observed range of one column.
///
/// A fresh scheme is a single closed interval `[min, max]`. Every accepted
/// boundary splits exactly one interval in two, so the interval count only
/// ever grows. Intervals are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscretizationScheme {
    intervals: Vec<Interval>,
}

impl DiscretizationScheme {
    /// One closed interval spanning the observed range. `min == max` is
    /// legal and models a column with a single distinct value.
    pub fn new(min: f64, max: f64) -> Self {
        debug_assert!(min <= max);
        DiscretizationScheme {
            intervals: vec![Interval {
                lower: min,
                upper: max,
                lower_closed: true,
                upper_closed: true,
            }],
        }
    }

    pub fn min(&self) -> f64 {
        self.intervals[0].lower
    }

    pub fn max(&self) -> f64 {
        self.intervals[self.intervals.len() - 1].upper
    }

    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// The inserted boundaries, ascending, without the outer `min`/`max`.
    pub fn cut_points(&self) -> Vec<f64> {
        self.intervals[1..].iter().map(|iv| iv.lower).collect()
    }

    /// Split the interval containing `v` into `[lo, v)` and `[v, hi]`, the
    /// right piece inheriting the original upper inclusivity.
    ///
    /// Requires `min < v < max` and that `v` is not already a boundary;
    /// violating either is a caller contract bug and fails with
    /// [`CaimError::IllegalBoundary`].
    pub fn insert_bound(&mut self, v: f64) -> Result<(), CaimError> {
        if !(v > self.min() && v < self.max()) {
            return Err(CaimError::IllegalBoundary { value: v });
        }
        let idx = self.interval_index_of(v);
        let old = self.intervals[idx];
        if v == old.lower {
            return Err(CaimError::IllegalBoundary { value: v });
        }
        self.intervals[idx] = Interval {
            lower: old.lower,
            upper: v,
            lower_closed: old.lower_closed,
            upper_closed: false,
        };
        self.intervals.insert(
            idx + 1,
            Interval {
                lower: v,
                upper: old.upper,
                lower_closed: true,
                upper_closed: old.upper_closed,
            },
        );
        Ok(())
    }

    /// Index of the interval containing `x`.
    ///
    /// Values outside `[min, max]` are clamped into the first or last
    /// interval. On training data this cannot happen since the range is the
    /// column's own; application-time data may lie outside it and lands in
    /// the nearest boundary interval. `x` must not be NaN.
    pub fn interval_index_of(&self, x: f64) -> usize {
        debug_assert!(!x.is_nan());
        let past = self.intervals.partition_point(|iv| iv.lower <= x);
        past.saturating_sub(1)
    }
}
