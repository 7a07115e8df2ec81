//! Interval Bucketer
//!
//! Converts irregular interval events (start, end, accumulated quantity)
//! into a regular fixed-granularity time series. Each event's quantity is
//! spread over the calendar buckets it overlaps in proportion to the time
//! spent in each, buckets are summed, and the range is gap-filled with zeros.
//!
//! ## Getting Started
//!
//! ```bash
//! interval-bucketer convert --input caltech.csv --output caltech_hourly.csv
//! ```
//!
//! Or from Rust:
//!
//! ```ignore
//! let events = read_events("caltech.csv", &IngestOptions::default())?;
//! let series = bucketize(&events, &BucketingConfig::default())?;
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;

pub use aggregator::{bucketize, BucketingConfig, DenseSeries, Granularity, ZeroDurationPolicy};
pub use parser::{read_events, Event, IngestOptions};
