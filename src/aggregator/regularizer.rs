//! Expand a sparse series into a dense, gap-free series.
//!
//! The output covers every bucket from the first to the last observed bucket,
//! stepped by the granularity. Buckets with no fragments are filled with 0.0.

use super::buckets::SparseSeries;
use super::granularity::Granularity;
use crate::utils::error::SeriesError;
use chrono::NaiveDateTime;
use log::{debug, warn};

/// One row of a dense series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketValue {
    pub bucket_start: NaiveDateTime,
    pub quantity: f64,
}

/// Contiguous series at a fixed granularity
///
/// Bucket starts are strictly increasing, spaced exactly one granularity
/// apart, with no duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseSeries {
    granularity: Granularity,
    points: Vec<BucketValue>,
}

impl DenseSeries {
    pub fn empty(granularity: Granularity) -> Self {
        Self {
            granularity,
            points: Vec::new(),
        }
    }

    /// Build from points that are already contiguous
    ///
    /// # Errors
    /// * `SeriesError::OutOfOrder` - a bucket does not follow its predecessor
    /// * `SeriesError::Gap` - two buckets are not one granularity apart
    pub fn from_points(
        granularity: Granularity,
        points: Vec<BucketValue>,
    ) -> Result<Self, SeriesError> {
        check_contiguous(&points, granularity)?;
        Ok(Self {
            granularity,
            points,
        })
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn points(&self) -> &[BucketValue] {
        &self.points
    }

    pub fn into_points(self) -> Vec<BucketValue> {
        self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BucketValue> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_bucket(&self) -> Option<NaiveDateTime> {
        self.points.first().map(|p| p.bucket_start)
    }

    pub fn last_bucket(&self) -> Option<NaiveDateTime> {
        self.points.last().map(|p| p.bucket_start)
    }

    pub fn quantities(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.quantity).collect()
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.quantity).sum()
    }
}

impl<'a> IntoIterator for &'a DenseSeries {
    type Item = &'a BucketValue;
    type IntoIter = std::slice::Iter<'a, BucketValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Regularize a sparse series onto the full bucket range
///
/// **Public** - main entry point for the regularizer
///
/// # Arguments
/// * `sparse` - Aggregated buckets, normally aligned to `granularity`
/// * `granularity` - Step between output buckets
///
/// Keys off the granularity grid are folded into the bucket containing them.
///
/// # Returns
/// Dense series of length `(last - first) / granularity + 1`, or an empty
/// series when `sparse` is empty.
pub fn regularize(sparse: &SparseSeries, granularity: Granularity) -> DenseSeries {
    let misaligned = sparse
        .iter()
        .filter(|(ts, _)| granularity.truncate(*ts) != *ts)
        .count();

    if misaligned > 0 {
        warn!(
            "{} buckets are not aligned to {}; folding them into their containing buckets",
            misaligned, granularity
        );
        let aligned: SparseSeries = sparse
            .iter()
            .map(|(ts, q)| (granularity.truncate(ts), q))
            .collect();
        return regularize(&aligned, granularity);
    }

    let (Some(lo), Some(hi)) = (sparse.first_bucket(), sparse.last_bucket()) else {
        debug!("Nothing to regularize, returning empty series");
        return DenseSeries::empty(granularity);
    };

    let expected = granularity.steps_between(lo, hi) as usize + 1;
    let mut points = Vec::with_capacity(expected);

    let mut cursor = Some(lo);
    while let Some(bucket_start) = cursor.filter(|ts| *ts <= hi) {
        points.push(BucketValue {
            bucket_start,
            quantity: sparse.get(&bucket_start).unwrap_or(0.0),
        });
        cursor = granularity.next(bucket_start);
    }

    debug!(
        "Regularized {} observed buckets into {} contiguous buckets",
        sparse.len(),
        points.len()
    );

    DenseSeries {
        granularity,
        points,
    }
}

/// Verify ordering, uniqueness and spacing of a series
fn check_contiguous(points: &[BucketValue], granularity: Granularity) -> Result<(), SeriesError> {
    for pair in points.windows(2) {
        let (prev, next) = (pair[0].bucket_start, pair[1].bucket_start);
        if next <= prev {
            return Err(SeriesError::OutOfOrder { prev, next });
        }
        if granularity.next(prev) != Some(next) {
            return Err(SeriesError::Gap {
                prev,
                next,
                step: granularity,
            });
        }
    }
    Ok(())
}
