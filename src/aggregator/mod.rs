//! Bucketing of interval events into a regular time series.
//!
//! This module transforms validated events into:
//! - Per-bucket fragments (splitter)
//! - A sparse series of summed buckets (buckets)
//! - A dense, gap-filled series (regularizer)
//! - Summary statistics (metrics)

pub mod buckets;
pub mod granularity;
pub mod metrics;
pub mod regularizer;
pub mod splitter;

// Re-export main types and functions
pub use buckets::{aggregate_fragments, SparseSeries};
pub use granularity::Granularity;
pub use metrics::{summarize_series, SeriesSummary};
pub use regularizer::{regularize, BucketValue, DenseSeries};
pub use splitter::{split_event, split_events, BucketFragment, Fragments, ZeroDurationPolicy};

use crate::parser::Event;
use crate::utils::error::ConversionError;
use log::{debug, warn};

/// Parameters of one bucketing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketingConfig {
    pub granularity: Granularity,
    pub zero_duration: ZeroDurationPolicy,
}

impl BucketingConfig {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            ..Default::default()
        }
    }

    pub fn with_zero_duration(mut self, policy: ZeroDurationPolicy) -> Self {
        self.zero_duration = policy;
        self
    }
}

/// Convert events into a dense series
///
/// **Public** - main entry point for the whole pipeline
///
/// Runs splitter, aggregator and regularizer in sequence. Pure: no I/O and no
/// shared state, so independent collections can be processed in parallel.
///
/// # Errors
/// * `ConversionError::ZeroDuration` - zero-duration event under `Reject`
///
/// An empty event collection yields an empty series.
pub fn bucketize(events: &[Event], config: &BucketingConfig) -> Result<DenseSeries, ConversionError> {
    let zero_duration = events.iter().filter(|e| e.is_zero_duration()).count();

    match config.zero_duration {
        ZeroDurationPolicy::Reject => {
            if let Some(index) = events.iter().position(Event::is_zero_duration) {
                return Err(ConversionError::ZeroDuration {
                    index,
                    row: events[index].row(),
                });
            }
        }
        ZeroDurationPolicy::Drop if zero_duration > 0 => {
            warn!("Dropping {} zero-duration events", zero_duration);
        }
        _ => {}
    }

    if !config.granularity.divides_day() {
        warn!(
            "Granularity {} does not divide a day; buckets are aligned to the Unix epoch",
            config.granularity
        );
    }

    debug!(
        "Bucketing {} events at {} ({} zero-duration, policy {})",
        events.len(),
        config.granularity,
        zero_duration,
        config.zero_duration
    );

    let fragments = split_events(events, config.granularity, config.zero_duration);
    let sparse = aggregate_fragments(fragments);

    Ok(regularize(&sparse, config.granularity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{read_events_from, IngestOptions};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_bucketize_end_to_end() {
        let events = vec![
            Event::new(at(0, 30), at(1, 30), 10.0).unwrap(),
            Event::new(at(4, 0), at(4, 30), 1.0).unwrap(),
        ];

        let dense = bucketize(&events, &BucketingConfig::default()).unwrap();

        assert_eq!(
            dense.quantities(),
            vec![5.0, 5.0, 0.0, 0.0, 1.0]
        );
        assert_eq!(dense.first_bucket(), Some(at(0, 0)));
        assert_eq!(dense.last_bucket(), Some(at(4, 0)));
    }

    #[test]
    fn test_bucketize_empty() {
        let dense = bucketize(&[], &BucketingConfig::default()).unwrap();
        assert!(dense.is_empty());
    }

    #[test]
    fn test_bucketize_zero_duration_policies() {
        let events = vec![
            Event::new(at(1, 0), at(2, 0), 2.0).unwrap(),
            Event::new(at(3, 15), at(3, 15), 4.0).unwrap(),
        ];

        let allocate = bucketize(&events, &BucketingConfig::default()).unwrap();
        assert_eq!(allocate.quantities(), vec![2.0, 0.0, 4.0]);

        let drop_config = BucketingConfig::default().with_zero_duration(ZeroDurationPolicy::Drop);
        let dropped = bucketize(&events, &drop_config).unwrap();
        assert_eq!(dropped.quantities(), vec![2.0]);

        let reject_config =
            BucketingConfig::default().with_zero_duration(ZeroDurationPolicy::Reject);
        assert_eq!(
            bucketize(&events, &reject_config),
            Err(ConversionError::ZeroDuration {
                index: 1,
                row: None
            })
        );
    }

    #[test]
    fn test_rejected_zero_duration_names_source_row() {
        let csv = "Start,End,Energy\n\
                   2024-01-01 01:00:00,2024-01-01 02:00:00,2\n\
                   2024-01-01 03:15:00,2024-01-01 03:15:00,4\n";
        let events = read_events_from(csv.as_bytes(), &IngestOptions::default()).unwrap();
        let config = BucketingConfig::default().with_zero_duration(ZeroDurationPolicy::Reject);

        let err = bucketize(&events, &config).unwrap_err();

        assert_eq!(
            err,
            ConversionError::ZeroDuration {
                index: 1,
                row: Some(3)
            }
        );
        assert!(err.to_string().starts_with("Event at row 3 "));
    }

    #[test]
    fn test_bucketize_widest_granularity() {
        let widest = Granularity::from_seconds(chrono::TimeDelta::MAX.num_seconds()).unwrap();
        let events = vec![Event::new(at(1, 0), at(2, 0), 3.0).unwrap()];

        let dense = bucketize(&events, &BucketingConfig::new(widest)).unwrap();

        assert_eq!(dense.quantities(), vec![3.0]);
    }

    #[test]
    fn test_bucketize_daily() {
        let events = vec![Event::new(at(12, 0), at(12, 0) + chrono::TimeDelta::hours(24), 24.0).unwrap()];
        let config = BucketingConfig::new("1d".parse().unwrap());

        let dense = bucketize(&events, &config).unwrap();

        assert_eq!(dense.quantities(), vec![12.0, 12.0]);
    }
}
