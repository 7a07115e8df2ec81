use crate::aggregator::{summarize_series, Granularity};
use crate::output::{read_series, OutputOptions};
use anyhow::Result;
use std::path::PathBuf;

/// Validate a dense series CSV file
pub fn validate_series_file(
    file_path: PathBuf,
    granularity: Granularity,
    options: &OutputOptions,
) -> Result<()> {
    println!("Validating series: {}", file_path.display());

    let series = read_series(&file_path, granularity, options)?;
    let summary = summarize_series(&series);

    println!("✓ Valid dense series");
    println!("  Granularity: {}", granularity);
    match (summary.first_bucket, summary.last_bucket) {
        (Some(first), Some(last)) => println!("  Range: {} .. {}", first, last),
        _ => println!("  Range: (empty)"),
    }
    println!("  {}", summary.summary());

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Interval Bucketer v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Redistributes interval event quantities into regular time series.");
}
