//! Export command implementation.
//!
//! Reads dense series CSV files and writes them as a JSON-lines dataset,
//! one line per input file.

use super::models::ExportArgs;
use crate::output::{dataset_entries, read_series, write_dataset};
use anyhow::{Context, Result};
use log::info;

/// Execute the export command
///
/// # Returns
/// Number of series written
pub fn execute_export(args: ExportArgs) -> Result<usize> {
    info!(
        "Exporting {} series to {}",
        args.inputs.len(),
        args.output.display()
    );

    let series = args
        .inputs
        .iter()
        .map(|path| {
            read_series(path, args.granularity, &args.output_options)
                .with_context(|| format!("Failed to read series from {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let entries = dataset_entries(&series, args.start);

    write_dataset(&entries, &args.output).context("Failed to write dataset")?;

    info!("✓ Dataset written to: {}", args.output.display());

    Ok(entries.len())
}
