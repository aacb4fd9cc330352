use crate::utils::nan_safe_compare;

const NIL: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct CandidateNode {
    value: f64,
    prev: usize,
    next: usize,
}

/// Ordered list of candidate boundary values for one column.
///
/// The nodes live in an arena and are linked through indices, so removing
/// an accepted candidate is O(1) while walking the remaining candidates in
/// ascending order stays O(n). Node 0 is a sentinel sitting below every
/// real value; it is never yielded and never removed.
#[derive(Debug, Clone)]
pub struct CandidateList {
    nodes: Vec<CandidateNode>,
    tail: usize,
    len: usize,
}

impl CandidateList {
    pub fn new() -> Self {
        CandidateList {
            nodes: vec![CandidateNode {
                value: f64::NEG_INFINITY,
                prev: NIL,
                next: NIL,
            }],
            tail: 0,
            len: 0,
        }
    }

    /// Append a candidate. Values must arrive in strictly increasing order.
    pub fn push_back(&mut self, value: f64) -> usize {
        debug_assert!(value > self.nodes[self.tail].value);
        let id = self.nodes.len();
        self.nodes.push(CandidateNode {
            value,
            prev: self.tail,
            next: NIL,
        });
        self.nodes[self.tail].next = id;
        self.tail = id;
        self.len += 1;
        id
    }

    /// Unlink the node in O(1). Ids come from `push_back` or `iter`; a node
    /// may only be removed once and is never re-inserted.
    pub fn remove(&mut self, id: usize) {
        debug_assert!(id != 0 && id < self.nodes.len());
        let CandidateNode { prev, next, .. } = self.nodes[id];
        debug_assert!(prev != NIL, "candidate removed twice");
        self.nodes[prev].next = next;
        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }
        self.nodes[id].prev = NIL;
        self.nodes[id].next = NIL;
        self.len -= 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remaining candidates in ascending order, sentinel excluded.
    pub fn iter(&self) -> CandidateIter<'_> {
        CandidateIter {
            list: self,
            cur: self.nodes[0].next,
        }
    }
}

impl Default for CandidateList {
    fn default() -> Self {
        CandidateList::new()
    }
}

pub struct CandidateIter<'a> {
    list: &'a CandidateList,
    cur: usize,
}

impl<'a> Iterator for CandidateIter<'a> {
    type Item = (usize, f64);

    fn next(&mut self) -> Option<(usize, f64)> {
        if self.cur == NIL {
            return None;
        }
        let id = self.cur;
        let node = self.list.nodes[id];
        self.cur = node.next;
        Some((id, node.value))
    }
}

/// How candidate boundaries are generated from the sorted column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidatePolicy {
    /// Every midpoint between adjacent distinct values is a candidate.
    Exhaustive,
    /// Only midpoints adjacent to an observed class-label change are
    /// candidates; a non-strict subset of the exhaustive set.
    ClassOptimized,
}

/// Range statistics of the usable rows, gathered while sorting.
#[derive(Debug, Clone, Copy)]
pub struct ColumnStats {
    pub min: f64,
    pub max: f64,
    pub rows: usize,
}

/// Build the candidate list for one column from its usable
/// (value, class-index) pairs. `pairs` must be non-empty and free of NaN;
/// missing rows are the caller's problem to filter.
///
/// `sort_in_memory` picks the sort strategy (unstable in-place vs. stable)
/// and only affects performance, never the candidate set.
pub fn generate_candidates(
    policy: CandidatePolicy,
    pairs: &[(f64, u32)],
    sort_in_memory: bool,
) -> (CandidateList, ColumnStats) {
    debug_assert!(!pairs.is_empty());
    let mut sorted = pairs.to_vec();
    match policy {
        CandidatePolicy::Exhaustive => {
            // Secondary order is irrelevant here.
            if sort_in_memory {
                sorted.sort_unstable_by(|a, b| nan_safe_compare(&a.0, &b.0));
            } else {
                sorted.sort_by(|a, b| nan_safe_compare(&a.0, &b.0));
            }
        }
        CandidatePolicy::ClassOptimized => {
            // Ties broken by class index, which follows ascending label
            // order, so the walk below is deterministic.
            if sort_in_memory {
                sorted.sort_unstable_by(|a, b| nan_safe_compare(&a.0, &b.0).then(a.1.cmp(&b.1)));
            } else {
                sorted.sort_by(|a, b| nan_safe_compare(&a.0, &b.0).then(a.1.cmp(&b.1)));
            }
        }
    }
    let stats = ColumnStats {
        min: sorted[0].0,
        max: sorted[sorted.len() - 1].0,
        rows: sorted.len(),
    };
    let mut list = CandidateList::new();
    match policy {
        CandidatePolicy::Exhaustive => {
            let mut prev_val = sorted[0].0;
            for &(v, _) in &sorted[1..] {
                if v > prev_val {
                    list.push_back((prev_val + v) / 2.0);
                    prev_val = v;
                }
            }
        }
        CandidatePolicy::ClassOptimized => {
            let (mut prev_val, mut prev_class) = sorted[0];
            // A midpoint reached with no class change since the last emitted
            // boundary is deferred, not dropped: if the run it opens turns
            // out to contain more than one class label, it still separates
            // a pure region from a mixed one and must be materialized.
            let mut pending: Option<f64> = None;
            let mut class_changed = false;
            for &(v, c) in &sorted[1..] {
                if c != prev_class {
                    class_changed = true;
                    if v == prev_val {
                        // Label flipped inside a run of equal values; the
                        // deferred boundary opening this run is load-bearing.
                        if let Some(p) = pending.take() {
                            list.push_back(p);
                        }
                    }
                    prev_class = c;
                }
                if v > prev_val {
                    let mid = (prev_val + v) / 2.0;
                    if class_changed {
                        list.push_back(mid);
                        class_changed = false;
                        // Any older deferred midpoint is superseded: no class
                        // change was seen anywhere in the run it opened.
                        pending = None;
                    } else {
                        pending = Some(mid);
                    }
                    prev_val = v;
                }
            }
        }
    }
    (list, stats)
}

#[cfg(test)]
mod test {
    use super::*;

    fn values(list: &CandidateList) -> Vec<f64> {
        list.iter().map(|(_, v)| v).collect()
    }

    fn pairs(vals: &[f64], classes: &[u32]) -> Vec<(f64, u32)> {
        vals.iter().copied().zip(classes.iter().copied()).collect()
    }

    #[test]
    fn test_list_push_iter_remove() {
        let mut list = CandidateList::new();
        let a = list.push_back(1.5);
        let b = list.push_back(2.5);
        let c = list.push_back(7.0);
        assert_eq!(list.len(), 3);
        assert_eq!(values(&list), vec![1.5, 2.5, 7.0]);

        list.remove(b);
        assert_eq!(values(&list), vec![1.5, 7.0]);
        list.remove(c);
        assert_eq!(values(&list), vec![1.5]);
        list.remove(a);
        assert!(list.is_empty());
        assert_eq!(values(&list), Vec::<f64>::new());
    }

    #[test]
    fn test_list_remove_tail_then_walk() {
        let mut list = CandidateList::new();
        list.push_back(0.5);
        let tail = list.push_back(3.5);
        list.remove(tail);
        assert_eq!(values(&list), vec![0.5]);
    }

    #[test]
    fn test_exhaustive_midpoints() {
        let p = pairs(&[4.0, 1.0, 2.0, 2.0, 3.0], &[0, 0, 1, 0, 1]);
        let (list, stats) = generate_candidates(CandidatePolicy::Exhaustive, &p, true);
        assert_eq!(values(&list), vec![1.5, 2.5, 3.5]);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.rows, 5);
    }

    #[test]
    fn test_strictly_increasing() {
        let p = pairs(
            &[13.0, 1.0, 11.0, 2.0, 10.0, 3.0, 12.0, 4.0],
            &[1, 0, 1, 0, 1, 0, 1, 0],
        );
        for policy in [CandidatePolicy::Exhaustive, CandidatePolicy::ClassOptimized] {
            let (list, _) = generate_candidates(policy, &p, true);
            let vals = values(&list);
            assert!(vals.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_class_optimized_single_change_point() {
        // One class change, between 4 and 10: both policies agree on 7.0
        // being a candidate, the optimized policy proposes nothing else.
        let p = pairs(
            &[1.0, 2.0, 3.0, 4.0, 10.0, 11.0, 12.0, 13.0],
            &[0, 0, 0, 0, 1, 1, 1, 1],
        );
        let (exhaustive, _) = generate_candidates(CandidatePolicy::Exhaustive, &p, true);
        let (optimized, _) = generate_candidates(CandidatePolicy::ClassOptimized, &p, true);
        assert_eq!(
            values(&exhaustive),
            vec![1.5, 2.5, 3.5, 7.0, 10.5, 11.5, 12.5]
        );
        assert_eq!(values(&optimized), vec![7.0]);
    }

    #[test]
    fn test_class_optimized_skips_pure_crossings() {
        let p = pairs(&[1.0, 2.0, 3.0], &[0, 0, 1]);
        let (optimized, _) = generate_candidates(CandidatePolicy::ClassOptimized, &p, true);
        assert_eq!(values(&optimized), vec![2.5]);
    }

    #[test]
    fn test_class_optimized_deferred_boundary_materialized() {
        // The 1|2 crossing sees no class change yet, but the run of 2s is
        // mixed, so its opening midpoint must be emitted after all.
        let p = pairs(&[1.0, 2.0, 2.0, 3.0], &[0, 0, 1, 1]);
        let (optimized, _) = generate_candidates(CandidatePolicy::ClassOptimized, &p, true);
        assert_eq!(values(&optimized), vec![1.5, 2.5]);

        // Same at the end of the column, with no crossing left to trigger it.
        let p = pairs(&[1.0, 2.0, 2.0], &[0, 0, 1]);
        let (optimized, _) = generate_candidates(CandidatePolicy::ClassOptimized, &p, true);
        assert_eq!(values(&optimized), vec![1.5]);
    }

    #[test]
    fn test_class_optimized_superseded_deferral_dropped() {
        // The change sits exactly at the 2|3 crossing; the stale midpoint
        // from the 1|2 crossing is not class-adjacent and stays out.
        let p = pairs(&[1.0, 2.0, 3.0, 3.0], &[0, 0, 1, 2]);
        let (optimized, _) = generate_candidates(CandidatePolicy::ClassOptimized, &p, true);
        assert_eq!(values(&optimized), vec![2.5]);
    }

    #[test]
    fn test_class_optimized_is_subset() {
        let vals = [5.0, 5.0, 3.0, 8.0, 8.0, 1.0, 9.5, 3.0, 7.0, 2.0];
        let classes = [0u32, 1, 0, 1, 1, 0, 1, 1, 0, 0];
        let p = pairs(&vals, &classes);
        let (exhaustive, _) = generate_candidates(CandidatePolicy::Exhaustive, &p, true);
        let (optimized, _) = generate_candidates(CandidatePolicy::ClassOptimized, &p, true);
        let all = values(&exhaustive);
        assert!(values(&optimized).iter().all(|v| all.contains(v)));
    }

    #[test]
    fn test_sort_strategy_does_not_change_candidates() {
        let vals = [5.0, 5.0, 3.0, 8.0, 8.0, 1.0, 9.5, 3.0, 7.0, 2.0];
        let classes = [0u32, 1, 0, 1, 1, 0, 1, 1, 0, 0];
        let p = pairs(&vals, &classes);
        for policy in [CandidatePolicy::Exhaustive, CandidatePolicy::ClassOptimized] {
            let (in_memory, _) = generate_candidates(policy, &p, true);
            let (external, _) = generate_candidates(policy, &p, false);
            assert_eq!(values(&in_memory), values(&external));
        }
    }

    #[test]
    fn test_single_distinct_value_yields_no_candidates() {
        let p = pairs(&[5.0, 5.0, 5.0], &[0, 1, 0]);
        let (list, stats) = generate_candidates(CandidatePolicy::Exhaustive, &p, true);
        assert!(list.is_empty());
        assert_eq!(stats.min, 5.0);
        assert_eq!(stats.max, 5.0);
    }
}
