use std::collections::HashMap;

use crate::scheme::DiscretizationScheme;

/// Immutable class-label table for one column.
///
/// Labels are stored ascending and indices are dense, so sorting rows by
/// class index is the same as sorting by label. One table is built per
/// column and owned by the driver; nothing here is shared or static.
#[derive(Debug, Clone)]
pub struct ClassTable {
    labels: Vec<String>,
    index: HashMap<String, u32>,
}

impl ClassTable {
    pub fn from_observed<'a, I>(observed: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut labels: Vec<String> = observed.into_iter().map(|s| s.to_string()).collect();
        labels.sort();
        labels.dedup();
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i as u32))
            .collect();
        ClassTable { labels, index }
    }

    pub fn index_of(&self, label: &str) -> Option<u32> {
        self.index.get(label).copied()
    }

    pub fn label(&self, idx: u32) -> &str {
        &self.labels[idx as usize]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Interval-by-class contingency counts for one tentative scheme.
///
/// Built fresh by a single pass over the usable pairs each time a candidate
/// insertion is scored; nothing is updated incrementally, so the CAIM value
/// is always the from-scratch one.
#[derive(Debug)]
pub struct QuantaMatrix {
    counts: Vec<u64>,
    n_intervals: usize,
    n_classes: usize,
}

impl QuantaMatrix {
    pub fn count(scheme: &DiscretizationScheme, pairs: &[(f64, u32)], n_classes: usize) -> Self {
        let n_intervals = scheme.interval_count();
        let mut counts = vec![0u64; n_intervals * n_classes];
        for &(v, c) in pairs {
            let r = scheme.interval_index_of(v);
            counts[r * n_classes + c as usize] += 1;
        }
        QuantaMatrix {
            counts,
            n_intervals,
            n_classes,
        }
    }

    pub fn count_at(&self, interval: usize, class: usize) -> u64 {
        self.counts[interval * self.n_classes + class]
    }

    pub fn interval_total(&self, interval: usize) -> u64 {
        self.counts[interval * self.n_classes..(interval + 1) * self.n_classes]
            .iter()
            .sum()
    }

    /// The Kurgan–Cios criterion:
    /// `(1/R) * sum_r max_c(count[r][c])^2 / total_r`.
    ///
    /// Intervals with no observations contribute 0 to the sum, never NaN.
    /// Dividing by the interval count R penalizes fragmentation.
    pub fn caim(&self) -> f64 {
        let mut sum = 0.0;
        for r in 0..self.n_intervals {
            let row = &self.counts[r * self.n_classes..(r + 1) * self.n_classes];
            let total: u64 = row.iter().sum();
            if total == 0 {
                continue;
            }
            let max = row.iter().copied().max().unwrap_or(0);
            sum += (max * max) as f64 / total as f64;
        }
        sum / self.n_intervals as f64
    }
}
