//! JSON-lines dataset export.
//!
//! Writes one object per series and line, in the layout sequence-model
//! toolkits expect:
//! `{"target": [...], "start": "2024-01-01T00:00:00", "feat_static_cat": [0], "item_id": 0}`

use super::{file_size, prepare_output_path};
use crate::aggregator::DenseSeries;
use crate::utils::error::OutputError;
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Start timestamps are written in ISO-8601 without offset
const DATASET_START_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One line of a JSON-lines dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    /// Quantities of the series, one per bucket
    pub target: Vec<f64>,

    /// Timestamp of the first bucket
    pub start: String,

    /// Static category, the series index
    pub feat_static_cat: Vec<usize>,

    pub item_id: usize,
}

/// Build dataset entries from a collection of series
///
/// Each series keeps its position in `series` as its item id. `start`
/// overrides every series' own first bucket. Empty series are skipped unless
/// a start override is given.
pub fn dataset_entries(series: &[DenseSeries], start: Option<NaiveDateTime>) -> Vec<DatasetEntry> {
    series
        .iter()
        .enumerate()
        .filter_map(|(idx, s)| {
            let Some(first) = start.or_else(|| s.first_bucket()) else {
                warn!("Skipping empty series {}", idx);
                return None;
            };

            Some(DatasetEntry {
                target: s.quantities(),
                start: first.format(DATASET_START_FORMAT).to_string(),
                feat_static_cat: vec![idx],
                item_id: idx,
            })
        })
        .collect()
}

/// Write dataset entries as JSON lines
///
/// **Public** - main entry point for dataset export
///
/// # Errors
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
pub fn write_dataset(
    entries: &[DatasetEntry],
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing dataset to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path)?;
    write_dataset_to(entries, BufWriter::new(file))?;

    info!(
        "Dataset written successfully ({} series, {} bytes)",
        entries.len(),
        file_size(output_path)
    );

    Ok(())
}

/// Write dataset entries to any writer, one JSON object per line
pub fn write_dataset_to<W: Write>(entries: &[DatasetEntry], mut writer: W) -> Result<(), OutputError> {
    for entry in entries {
        serde_json::to_writer(&mut writer, entry)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a JSON-lines dataset
///
/// Blank lines are ignored.
pub fn read_dataset(input_path: impl AsRef<Path>) -> Result<Vec<DatasetEntry>, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading dataset from: {}", input_path.display());

    let reader = BufReader::new(File::open(input_path)?);
    let mut entries = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(&line)?);
    }

    Ok(entries)
}
