//! Ordered storage for surviving minimizer records.
//!
//! Records are kept in a `BTreeMap` sorted by `(lower_bound, seq)`, where
//! `seq` is the insertion sequence. Purging everything above a new best bound
//! is then a single `split_off` at the bound.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::types::Minimizer;

/// Ordering key: lower bound first, insertion sequence as tie-breaker.
#[derive(Debug, Clone, Copy)]
struct CandidateKey {
    lower_bound: f64,
    seq: u64,
}

impl CandidateKey {
    fn new(lower_bound: f64, seq: u64) -> Self {
        // Adding +0.0 folds -0.0 into +0.0 so equal bounds compare equal.
        Self {
            lower_bound: lower_bound + 0.0,
            seq,
        }
    }
}

impl PartialEq for CandidateKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CandidateKey {}

impl PartialOrd for CandidateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CandidateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lower_bound
            .total_cmp(&other.lower_bound)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Minimizer records ordered by lower bound.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    records: BTreeMap<CandidateKey, Minimizer>,
    next_seq: u64,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, m: Minimizer) {
        let key = CandidateKey::new(m.lower_bound, self.next_seq);
        self.next_seq += 1;
        self.records.insert(key, m);
    }

    /// Remove every record whose lower bound is strictly greater than
    /// `bound`. Returns the number of records removed.
    pub fn purge_above(&mut self, bound: f64) -> usize {
        // First key past every record with lower_bound <= bound.
        let cut = CandidateKey::new(bound, u64::MAX);
        let removed = self.records.split_off(&cut);
        removed.len()
    }

    /// Move every record of `other` into `self`, keeping the lower-bound
    /// order. Ties keep `self`'s records first.
    pub fn merge(&mut self, other: CandidateSet) {
        for m in other.records.into_values() {
            self.insert(m);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ascending lower-bound order.
    pub fn iter(&self) -> impl Iterator<Item = &Minimizer> {
        self.records.values()
    }

    /// The record with the smallest lower bound.
    pub fn first(&self) -> Option<&Minimizer> {
        self.records.values().next()
    }

    pub fn into_vec(self) -> Vec<Minimizer> {
        self.records.into_values().collect()
    }
}

impl Extend<Minimizer> for CandidateSet {
    fn extend<I: IntoIterator<Item = Minimizer>>(&mut self, iter: I) {
        for m in iter {
            self.insert(m);
        }
    }
}

impl FromIterator<Minimizer> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = Minimizer>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;
    use crate::types::SearchBox;

    fn record(lo: f64, hi: f64) -> Minimizer {
        let b = SearchBox::new(Interval::new(0.0, 1.0), Interval::new(0.0, 1.0));
        Minimizer::new(b, Interval::new(lo, hi))
    }

    #[test]
    fn test_ordered_by_lower_bound() {
        let set: CandidateSet = [record(3.0, 4.0), record(1.0, 9.0), record(2.0, 2.5)]
            .into_iter()
            .collect();
        let lows: Vec<f64> = set.iter().map(|m| m.lower_bound).collect();
        assert_eq!(lows, vec![1.0, 2.0, 3.0]);
        assert_eq!(set.first().map(|m| m.upper_bound), Some(9.0));
    }

    #[test]
    fn test_duplicates_kept() {
        let mut set = CandidateSet::new();
        set.insert(record(1.0, 2.0));
        set.insert(record(1.0, 2.0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_purge_is_strict() {
        let mut set: CandidateSet = [record(1.0, 5.0), record(3.0, 5.0), record(3.5, 5.0), record(10.0, 11.0)]
            .into_iter()
            .collect();
        let removed = set.purge_above(3.0);
        assert_eq!(removed, 2);
        let lows: Vec<f64> = set.iter().map(|m| m.lower_bound).collect();
        assert_eq!(lows, vec![1.0, 3.0]);
    }

    #[test]
    fn test_purge_keeps_signed_zero() {
        let mut set = CandidateSet::new();
        set.insert(record(0.0, 1.0));
        assert_eq!(set.purge_above(-0.0), 0);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_purge_infinite_bound_keeps_all() {
        let mut set: CandidateSet = [record(1.0, 2.0), record(1e300, 1e301)].into_iter().collect();
        assert_eq!(set.purge_above(f64::INFINITY), 0);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut a: CandidateSet = [record(1.0, 2.0), record(4.0, 5.0)].into_iter().collect();
        let b: CandidateSet = [record(0.5, 2.0), record(3.0, 5.0)].into_iter().collect();
        a.merge(b);
        let lows: Vec<f64> = a.into_vec().iter().map(|m| m.lower_bound).collect();
        assert_eq!(lows, vec![0.5, 1.0, 3.0, 4.0]);
    }

    #[test]
    fn test_empty() {
        let set = CandidateSet::new();
        assert!(set.is_empty());
        assert!(set.first().is_none());
    }
}
