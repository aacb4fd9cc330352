use std::collections::HashMap;

use log::debug;
use rayon::prelude::*;

use crate::candidates::{generate_candidates, CandidatePolicy};
use crate::errors::CaimError;
use crate::model::{CaimModel, ColumnModel};
use crate::monitor::ProgressMonitor;
use crate::quanta::{ClassTable, QuantaMatrix};
use crate::scheme::DiscretizationScheme;

/// Table collaborator: hands out numeric columns by name. NaN cells are
/// missing values. Storage and iteration of actual tables live outside
/// this crate.
pub trait ColumnSource {
    fn numeric_column(&self, name: &str) -> Option<&[f64]>;
}

impl ColumnSource for HashMap<String, Vec<f64>> {
    fn numeric_column(&self, name: &str) -> Option<&[f64]> {
        self.get(name).map(|v| v.as_slice())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CaimConfig {
    pub policy: CandidatePolicy,
    /// Sort strategy hint for candidate generation; performance only.
    pub sort_in_memory: bool,
    /// Score the candidates of one iteration on a rayon pool. The result
    /// is bit-identical to the sequential pass.
    pub parallel: bool,
}

impl Default for CaimConfig {
    fn default() -> Self {
        CaimConfig {
            policy: CandidatePolicy::Exhaustive,
            sort_in_memory: true,
            parallel: false,
        }
    }
}

/// Greedy CAIM search over one or more columns.
///
/// Each column is fit independently: candidate boundaries are generated
/// from the sorted column, then the boundary whose insertion maximizes the
/// CAIM criterion is accepted one at a time until no candidate improves the
/// score and the scheme has at least as many intervals as there are class
/// labels. The search never backtracks; accepted candidates leave the list
/// for good, rejected ones are reconsidered against the grown scheme in the
/// next iteration.
pub struct CaimDiscretizer {
    config: CaimConfig,
    pub model: Option<CaimModel>,
}

impl CaimDiscretizer {
    pub fn new(config: CaimConfig) -> Self {
        CaimDiscretizer {
            config,
            model: None,
        }
    }

    /// Fit every included column against the shared class column. Fails as
    /// a whole on the first column error; nothing is stored unless every
    /// column succeeds.
    pub fn fit<S, M>(
        &mut self,
        source: &S,
        included: &[String],
        class_labels: &[Option<String>],
        monitor: &M,
    ) -> Result<&CaimModel, CaimError>
    where
        S: ColumnSource,
        M: ProgressMonitor,
    {
        self.model = None;
        // Configuration problems surface before any search work begins.
        for name in included {
            if source.numeric_column(name).is_none() {
                return Err(CaimError::UnknownColumn {
                    column: name.clone(),
                });
            }
        }
        let mut columns = Vec::with_capacity(included.len());
        for (i, name) in included.iter().enumerate() {
            monitor.check_cancelled()?;
            monitor.report_progress(
                i as f64 / included.len() as f64,
                &format!("discretizing column '{}'", name),
            );
            let values = source
                .numeric_column(name)
                .ok_or_else(|| CaimError::UnknownColumn {
                    column: name.clone(),
                })?;
            columns.push(self.fit_column(name, values, class_labels, monitor)?);
        }
        monitor.report_progress(1.0, "discretization finished");
        Ok(self.model.get_or_insert(CaimModel::new(columns)))
    }

    /// Fit a single column. This is the per-column search engine; it holds
    /// no state on `self` and can run for several columns concurrently.
    pub fn fit_column<M: ProgressMonitor>(
        &self,
        name: &str,
        values: &[f64],
        class_labels: &[Option<String>],
        monitor: &M,
    ) -> Result<ColumnModel, CaimError> {
        if values.len() != class_labels.len() {
            return Err(CaimError::LengthMismatch {
                column: name.to_string(),
                values: values.len(),
                labels: class_labels.len(),
            });
        }
        let classes = ClassTable::from_observed(
            values
                .iter()
                .zip(class_labels)
                .filter_map(|(v, l)| if v.is_nan() { None } else { l.as_deref() }),
        );
        let pairs: Vec<(f64, u32)> = values
            .iter()
            .zip(class_labels)
            .filter_map(|(&v, l)| match (v.is_nan(), l) {
                (false, Some(l)) => classes.index_of(l).map(|c| (v, c)),
                _ => None,
            })
            .collect();
        if pairs.is_empty() {
            return Err(CaimError::EmptyColumn {
                column: name.to_string(),
            });
        }

        let (mut candidates, stats) =
            generate_candidates(self.config.policy, &pairs, self.config.sort_in_memory);
        debug!(
            "column '{}': {} usable rows, {} class labels, {} candidate boundaries",
            name,
            stats.rows,
            classes.len(),
            candidates.len()
        );

        let mut scheme = DiscretizationScheme::new(stats.min, stats.max);
        let mut global_caim = 0.0_f64;
        loop {
            monitor.check_cancelled()?;
            let snapshot: Vec<(usize, f64)> = candidates.iter().collect();
            if snapshot.is_empty() {
                break;
            }
            let scores = self.score_candidates(&scheme, &snapshot, &pairs, classes.len())?;
            let best = index_of_best(&scores);
            let (best_id, best_value) = snapshot[best];
            let current_caim = scores[best];
            // Accept while the score improves, or while the scheme has not
            // yet explored one interval per class label.
            if current_caim > global_caim || scheme.interval_count() < classes.len() {
                scheme.insert_bound(best_value)?;
                candidates.remove(best_id);
                global_caim = current_caim;
                debug!(
                    "column '{}': accepted boundary {} (caim {:.6}, {} intervals)",
                    name,
                    best_value,
                    global_caim,
                    scheme.interval_count()
                );
            } else {
                break;
            }
        }
        debug!(
            "column '{}': converged at {} intervals (caim {:.6})",
            name,
            scheme.interval_count(),
            global_caim
        );
        Ok(ColumnModel::with_index_labels(name, scheme))
    }

    /// Project a fitted column back onto raw values, replacing each one
    /// with its interval label.
    pub fn transform(&self, name: &str, values: &[f64]) -> Result<Vec<Option<String>>, CaimError> {
        let model = self.model.as_ref().ok_or(CaimError::NotFitted)?;
        model.project_column(name, values)
    }

    /// Score every remaining candidate against a tentative copy of the
    /// current scheme. Results come back in candidate-list order whether or
    /// not they were computed on the pool, so the tie-break downstream is
    /// identical either way.
    fn score_candidates(
        &self,
        scheme: &DiscretizationScheme,
        snapshot: &[(usize, f64)],
        pairs: &[(f64, u32)],
        n_classes: usize,
    ) -> Result<Vec<f64>, CaimError> {
        let score_one = |&(_, value): &(usize, f64)| -> Result<f64, CaimError> {
            let mut tentative = scheme.clone();
            tentative.insert_bound(value)?;
            Ok(QuantaMatrix::count(&tentative, pairs, n_classes).caim())
        };
        if self.config.parallel {
            snapshot.par_iter().map(score_one).collect()
        } else {
            snapshot.iter().map(score_one).collect()
        }
    }
}

/// Position of the maximum score. Strict comparison keeps the earliest
/// candidate on ties, which fixes which scheme a run converges to.
fn index_of_best(scores: &[f64]) -> usize {
    let mut best = 0;
    for i in 1..scores.len() {
        if scores[i] > scores[best] {
            best = i;
        }
    }
    best
}
