//! CSV event ingestion.
//!
//! Reads interval records from a delimited source and validates every row
//! before any bucketing happens. The first bad row aborts ingestion: a
//! partially converted dataset is worse than a hard failure.

use super::schema::{Event, EventViolation};
use super::timestamp::parse_timestamp;
use crate::utils::config::{DEFAULT_END_COLUMN, DEFAULT_QUANTITY_COLUMN, DEFAULT_START_COLUMN};
use crate::utils::error::IngestError;
use csv::StringRecord;
use log::{debug, info};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column names and timestamp format used when reading events
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub start_column: String,
    pub end_column: String,
    pub quantity_column: String,

    /// Explicit chrono format; `None` means auto-detect
    pub timestamp_format: Option<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            start_column: DEFAULT_START_COLUMN.to_string(),
            end_column: DEFAULT_END_COLUMN.to_string(),
            quantity_column: DEFAULT_QUANTITY_COLUMN.to_string(),
            timestamp_format: None,
        }
    }
}

/// Positions of the required columns in the header row
struct ColumnIndex {
    start: usize,
    end: usize,
    quantity: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, options: &IngestOptions) -> Result<Self, IngestError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| IngestError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            start: find(&options.start_column)?,
            end: find(&options.end_column)?,
            quantity: find(&options.quantity_column)?,
        })
    }
}

/// Read all events from a CSV file
///
/// # Errors
/// * `IngestError::Io` - file cannot be opened
/// * `IngestError::MissingColumn` - a required header is absent
/// * `IngestError::MalformedInput` - a timestamp or quantity does not parse
/// * `IngestError::InvalidInterval` - a record ends before it starts
pub fn read_events(
    input_path: impl AsRef<Path>,
    options: &IngestOptions,
) -> Result<Vec<Event>, IngestError> {
    let input_path = input_path.as_ref();

    info!("Reading events from: {}", input_path.display());

    let file = File::open(input_path)?;
    let events = read_events_from(file, options)?;

    info!("Read {} events", events.len());

    Ok(events)
}

/// Read all events from any CSV source
pub fn read_events_from<R: Read>(
    source: R,
    options: &IngestOptions,
) -> Result<Vec<Event>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers, options)?;

    let mut events = Vec::new();
    let mut record = StringRecord::new();

    while reader.read_record(&mut record)? {
        let row = record.position().map(|p| p.line()).unwrap_or(0);
        events.push(parse_record(&record, row, &columns, options)?);
    }

    debug!("Parsed {} event records", events.len());

    Ok(events)
}

/// Convert one CSV record into a validated event
fn parse_record(
    record: &StringRecord,
    row: u64,
    columns: &ColumnIndex,
    options: &IngestOptions,
) -> Result<Event, IngestError> {
    let format = options.timestamp_format.as_deref();

    let start_raw = field(record, row, columns.start, &options.start_column)?;
    let start = parse_timestamp(start_raw, format)
        .map_err(|e| malformed(row, &options.start_column, start_raw, e.to_string()))?;

    let end_raw = field(record, row, columns.end, &options.end_column)?;
    let end = parse_timestamp(end_raw, format)
        .map_err(|e| malformed(row, &options.end_column, end_raw, e.to_string()))?;

    let quantity_raw = field(record, row, columns.quantity, &options.quantity_column)?;
    let quantity = quantity_raw.parse::<f64>().map_err(|e| {
        malformed(row, &options.quantity_column, quantity_raw, e.to_string())
    })?;

    let event = Event::new(start, end, quantity).map_err(|violation| match violation {
        EventViolation::EndBeforeStart => IngestError::InvalidInterval { row, start, end },
        EventViolation::NonFiniteQuantity => malformed(
            row,
            &options.quantity_column,
            quantity_raw,
            violation.to_string(),
        ),
    })?;

    Ok(event.with_row(row))
}

fn field<'a>(
    record: &'a StringRecord,
    row: u64,
    index: usize,
    name: &str,
) -> Result<&'a str, IngestError> {
    record
        .get(index)
        .ok_or_else(|| malformed(row, name, "", "field missing from record".to_string()))
}

fn malformed(row: u64, field: &str, value: &str, reason: String) -> IngestError {
    IngestError::MalformedInput {
        row,
        field: field.to_string(),
        value: value.to_string(),
        reason,
    }
}
