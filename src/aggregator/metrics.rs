//! Summary statistics for a dense series.

use super::regularizer::{BucketValue, DenseSeries};
use crate::utils::config::QUANTITY_EPSILON;
use chrono::NaiveDateTime;

/// Summary of a dense series
///
/// **Public** - returned from summarize_series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSummary {
    /// Number of buckets in the series
    pub bucket_count: usize,

    /// Buckets whose quantity is zero (gap-filled or genuinely idle)
    pub empty_buckets: usize,

    /// Sum of all quantities
    pub total_quantity: f64,

    /// Mean quantity per bucket
    pub mean_quantity: f64,

    /// Bucket with the largest quantity
    pub peak: Option<BucketValue>,

    pub first_bucket: Option<NaiveDateTime>,
    pub last_bucket: Option<NaiveDateTime>,
}

impl SeriesSummary {
    /// Share of buckets that carry a non-zero quantity, in percent
    pub fn coverage_percentage(&self) -> f64 {
        if self.bucket_count == 0 {
            return 0.0;
        }
        (self.bucket_count - self.empty_buckets) as f64 / self.bucket_count as f64 * 100.0
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and the `--summary` flag
    pub fn summary(&self) -> String {
        let peak = self
            .peak
            .map(|p| format!("{:.3} at {}", p.quantity, p.bucket_start))
            .unwrap_or_else(|| "n/a".to_string());

        format!(
            "Buckets: {} | Empty: {} | Coverage: {:.1}% | Total: {:.3} | Mean: {:.3} | Peak: {}",
            self.bucket_count,
            self.empty_buckets,
            self.coverage_percentage(),
            self.total_quantity,
            self.mean_quantity,
            peak
        )
    }
}

/// Calculate summary statistics for a dense series
pub fn summarize_series(series: &DenseSeries) -> SeriesSummary {
    if series.is_empty() {
        return SeriesSummary::default();
    }

    let bucket_count = series.len();
    let total_quantity = series.total();
    let empty_buckets = series
        .iter()
        .filter(|p| p.quantity.abs() <= QUANTITY_EPSILON)
        .count();
    let peak = series
        .iter()
        .copied()
        .max_by(|a, b| a.quantity.total_cmp(&b.quantity));

    SeriesSummary {
        bucket_count,
        empty_buckets,
        total_quantity,
        mean_quantity: total_quantity / bucket_count as f64,
        peak,
        first_bucket: series.first_bucket(),
        last_bucket: series.last_bucket(),
    }
}
