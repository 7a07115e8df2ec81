//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::aggregator::Granularity;
use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors that can occur while ingesting event records
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Malformed record at row {row}: field '{field}' value '{value}': {reason}")]
    MalformedInput {
        row: u64,
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid interval at row {row}: end {end} is before start {start}")]
    InvalidInterval {
        row: u64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when parsing a bucket width
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GranularityError {
    #[error("Granularity is empty")]
    Empty,

    #[error("Unknown granularity unit '{0}' (expected s, min, h or d)")]
    UnknownUnit(String),

    #[error("Invalid granularity multiplier: {0}")]
    InvalidMultiplier(String),

    #[error("Granularity must be positive")]
    NonPositive,

    #[error("Granularity of {0} seconds exceeds the representable time range")]
    OutOfRange(i64),
}

/// Errors that can occur when parsing a single timestamp
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("empty timestamp")]
    Empty,

    #[error("does not match format '{format}': {source}")]
    FormatMismatch {
        format: String,
        source: chrono::ParseError,
    },

    #[error("unrecognized timestamp format")]
    Unrecognized,
}

/// Errors that can occur when a series is not contiguous
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("bucket {next} does not follow {prev} in ascending order")]
    OutOfOrder {
        prev: NaiveDateTime,
        next: NaiveDateTime,
    },

    #[error("gap between {prev} and {next} (expected step {step})")]
    Gap {
        prev: NaiveDateTime,
        next: NaiveDateTime,
        step: Granularity,
    },
}

/// Errors that can occur while bucketing a validated event collection
#[derive(Error, Debug, PartialEq)]
pub enum ConversionError {
    #[error(
        "{} has zero duration and zero-duration events are rejected",
        record_label(.index, .row)
    )]
    ZeroDuration { index: usize, row: Option<u64> },
}

/// Name a record by its source row when known, else by its position
fn record_label(index: &usize, row: &Option<u64>) -> String {
    match row {
        Some(row) => format!("Event at row {}", row),
        None => format!("Event {}", index),
    }
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    #[error("Invalid series: {0}")]
    Discontinuous(#[from] SeriesError),
}
