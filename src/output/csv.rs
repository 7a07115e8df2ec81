//! Dense series CSV writer and reader.
//!
//! Output has exactly two columns, bucket timestamp and quantity, with a
//! header row and rows in ascending bucket order.

use super::{file_size, prepare_output_path};
use crate::aggregator::{BucketValue, DenseSeries, Granularity};
use crate::parser::parse_timestamp;
use crate::utils::config::{DEFAULT_TIME_HEADER, DEFAULT_VALUE_HEADER, OUTPUT_TIMESTAMP_FORMAT};
use crate::utils::error::OutputError;
use csv::StringRecord;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Header names for series files
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub time_header: String,
    pub value_header: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            time_header: DEFAULT_TIME_HEADER.to_string(),
            value_header: DEFAULT_VALUE_HEADER.to_string(),
        }
    }
}

/// Write a dense series to a CSV file
///
/// **Public** - main entry point for CSV output
///
/// # Errors
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its parent cannot be created
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::Csv` - CSV encoding error
pub fn write_series(
    series: &DenseSeries,
    output_path: impl AsRef<Path>,
    options: &OutputOptions,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing series to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path)?;
    write_series_to(series, BufWriter::new(file), options)?;

    info!(
        "Series written successfully ({} rows, {} bytes)",
        series.len(),
        file_size(output_path)
    );

    Ok(())
}

/// Write a dense series to any writer
pub fn write_series_to<W: Write>(
    series: &DenseSeries,
    writer: W,
    options: &OutputOptions,
) -> Result<(), OutputError> {
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record([options.time_header.as_str(), options.value_header.as_str()])?;

    for point in series {
        let bucket = point.bucket_start.format(OUTPUT_TIMESTAMP_FORMAT).to_string();
        let quantity = point.quantity.to_string();
        writer.write_record([bucket.as_str(), quantity.as_str()])?;
    }

    writer.flush()?;
    Ok(())
}

/// Read a dense series back from a CSV file
///
/// Used by the validate and export commands. The file must be ordered,
/// duplicate-free and gap-free at `granularity`.
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::InvalidSeries` - Missing columns or bad values
/// * `OutputError::Discontinuous` - Buckets out of order or with gaps
pub fn read_series(
    input_path: impl AsRef<Path>,
    granularity: Granularity,
    options: &OutputOptions,
) -> Result<DenseSeries, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading series from: {}", input_path.display());

    let file = File::open(input_path)?;
    let series = read_series_from(file, granularity, options)?;

    debug!("Series loaded: {} buckets", series.len());

    Ok(series)
}

/// Read a dense series from any CSV source
pub fn read_series_from<R: Read>(
    source: R,
    granularity: Granularity,
    options: &OutputOptions,
) -> Result<DenseSeries, OutputError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let time_idx = column(&headers, &options.time_header)?;
    let value_idx = column(&headers, &options.value_header)?;

    let mut points = Vec::new();
    let mut record = StringRecord::new();

    while reader.read_record(&mut record)? {
        let row = record.position().map(|p| p.line()).unwrap_or(0);

        let raw_time = record.get(time_idx).unwrap_or_default();
        let bucket_start = parse_timestamp(raw_time, None).map_err(|reason| {
            OutputError::InvalidSeries(format!("row {}: '{}': {}", row, raw_time, reason))
        })?;

        let raw_value = record.get(value_idx).unwrap_or_default();
        let quantity = raw_value.parse::<f64>().map_err(|e| {
            OutputError::InvalidSeries(format!("row {}: '{}': {}", row, raw_value, e))
        })?;

        points.push(BucketValue {
            bucket_start,
            quantity,
        });
    }

    Ok(DenseSeries::from_points(granularity, points)?)
}

fn column(headers: &StringRecord, name: &str) -> Result<usize, OutputError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| OutputError::InvalidSeries(format!("missing column '{}'", name)))
}
