//! Sum bucket fragments into a sparse series.
//!
//! Fragments may arrive in any order and from any number of events; each
//! bucket keeps the sum of every fragment that maps to it.

use super::regularizer::DenseSeries;
use super::splitter::BucketFragment;
use chrono::NaiveDateTime;
use log::debug;
use std::collections::BTreeMap;

/// Bucket start -> summed quantity, only for buckets that received a fragment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseSeries {
    buckets: BTreeMap<NaiveDateTime, f64>,
}

impl SparseSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, bucket_start: &NaiveDateTime) -> Option<f64> {
        self.buckets.get(bucket_start).copied()
    }

    /// Buckets in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.buckets.iter().map(|(ts, q)| (*ts, *q))
    }

    pub fn first_bucket(&self) -> Option<NaiveDateTime> {
        self.buckets.keys().next().copied()
    }

    pub fn last_bucket(&self) -> Option<NaiveDateTime> {
        self.buckets.keys().next_back().copied()
    }

    pub fn total(&self) -> f64 {
        self.buckets.values().sum()
    }
}

impl FromIterator<BucketFragment> for SparseSeries {
    fn from_iter<I: IntoIterator<Item = BucketFragment>>(iter: I) -> Self {
        let mut buckets: BTreeMap<NaiveDateTime, f64> = BTreeMap::new();
        for fragment in iter {
            *buckets.entry(fragment.bucket_start).or_insert(0.0) += fragment.partial_quantity;
        }
        Self { buckets }
    }
}

impl FromIterator<(NaiveDateTime, f64)> for SparseSeries {
    /// Build from `(bucket, quantity)` pairs, summing duplicate buckets
    fn from_iter<I: IntoIterator<Item = (NaiveDateTime, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(bucket_start, partial_quantity)| BucketFragment {
                bucket_start,
                partial_quantity,
            })
            .collect()
    }
}

impl From<&DenseSeries> for SparseSeries {
    fn from(dense: &DenseSeries) -> Self {
        dense.iter().map(|p| (p.bucket_start, p.quantity)).collect()
    }
}

/// Aggregate fragments by bucket
///
/// **Public** - main entry point for the aggregator
///
/// # Returns
/// Sparse series; empty when no fragments are supplied
pub fn aggregate_fragments<I>(fragments: I) -> SparseSeries
where
    I: IntoIterator<Item = BucketFragment>,
{
    let sparse: SparseSeries = fragments.into_iter().collect();
    debug!("Aggregated fragments into {} buckets", sparse.len());
    sparse
}
