//! Convert command implementation.
//!
//! The convert command:
//! 1. Reads and validates events from CSV
//! 2. Splits, aggregates and regularizes them
//! 3. Writes the dense series to CSV

use super::models::ConvertArgs;
use crate::aggregator::{bucketize, summarize_series, BucketingConfig, SeriesSummary};
use crate::output::{write_series, OutputOptions};
use crate::parser::{read_events, IngestOptions};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

/// Execute the convert command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable or malformed input
/// * Zero-duration events under the reject policy
/// * File write errors
pub fn execute_convert(args: ConvertArgs) -> Result<SeriesSummary> {
    let start_time = Instant::now();

    info!(
        "Converting {} at {} granularity",
        args.input.display(),
        args.bucketing.granularity
    );

    let summary = convert_file(
        &args.input,
        &args.output,
        &args.bucketing,
        &args.ingest,
        &args.output_options,
    )?;

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("SERIES SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Input:       {}", args.input.display());
        println!("Output:      {}", args.output.display());
        println!("Granularity: {}", args.bucketing.granularity);
        if let (Some(first), Some(last)) = (summary.first_bucket, summary.last_bucket) {
            println!("Range:       {} .. {}", first, last);
        }
        println!("{}", summary.summary());
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Conversion completed in {:.2}s", elapsed.as_secs_f64());

    Ok(summary)
}

/// Run one file through ingestion, bucketing and output
///
/// **Public** - shared by convert and batch
pub fn convert_file(
    input: &Path,
    output: &Path,
    bucketing: &BucketingConfig,
    ingest: &IngestOptions,
    output_options: &OutputOptions,
) -> Result<SeriesSummary> {
    info!("Step 1/3: Reading events...");
    let events = read_events(input, ingest)
        .with_context(|| format!("Failed to read events from {}", input.display()))?;

    info!("Step 2/3: Bucketing {} events...", events.len());
    let series = bucketize(&events, bucketing)
        .with_context(|| format!("Failed to bucket events from {}", input.display()))?;

    let summary = summarize_series(&series);
    info!("Series: {}", summary.summary());

    let input_total: f64 = events.iter().map(|e| e.quantity()).sum();
    debug!(
        "Quantity in: {:.6}, quantity out: {:.6}",
        input_total, summary.total_quantity
    );

    info!("Step 3/3: Writing series...");
    write_series(&series, output, output_options)
        .with_context(|| format!("Failed to write series to {}", output.display()))?;

    info!("✓ Series written to: {}", output.display());

    Ok(summary)
}

/// Validate convert arguments
///
/// **Public** - can be called before execute_convert for early validation
pub fn validate_args(args: &ConvertArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    if args.output.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    if args.input == args.output {
        anyhow::bail!("Output path must differ from input path");
    }

    let ingest = &args.ingest;
    for (what, name) in [
        ("start", &ingest.start_column),
        ("end", &ingest.end_column),
        ("quantity", &ingest.quantity_column),
    ] {
        if name.trim().is_empty() {
            anyhow::bail!("The {} column name cannot be empty", what);
        }
    }

    if args.output_options.time_header == args.output_options.value_header {
        anyhow::bail!("Output time and value headers must differ");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_input(dir: &Path) -> PathBuf {
        let path = dir.join("events.csv");
        fs::write(
            &path,
            "Start,End,Energy\n\
             2024-01-01 00:30:00,2024-01-01 01:30:00,10\n\
             2024-01-01 03:10:00,2024-01-01 03:40:00,2\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_execute_convert_writes_dense_series() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let output = dir.path().join("out/events_hourly.csv");

        let args = ConvertArgs {
            input,
            output: output.clone(),
            ..Default::default()
        };
        validate_args(&args).unwrap();
        let summary = execute_convert(args).unwrap();

        assert_eq!(summary.bucket_count, 4);
        assert_eq!(summary.total_quantity, 12.0);

        let written = fs::read_to_string(output).unwrap();
        assert_eq!(
            written,
            "Hour,Energy\n\
             2024-01-01 00:00:00,5\n\
             2024-01-01 01:00:00,5\n\
             2024-01-01 02:00:00,0\n\
             2024-01-01 03:00:00,2\n"
        );
    }

    #[test]
    fn test_validate_args_missing_input() {
        let args = ConvertArgs {
            input: PathBuf::from("does/not/exist.csv"),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_same_input_and_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let args = ConvertArgs {
            input: input.clone(),
            output: input,
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_empty_column_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = ConvertArgs {
            input: write_input(dir.path()),
            output: dir.path().join("out.csv"),
            ..Default::default()
        };
        args.ingest.quantity_column = "  ".to_string();
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_convert_aborts_on_bad_row_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.csv");
        fs::write(
            &input,
            "Start,End,Energy\n2024-01-01 02:00:00,2024-01-01 01:00:00,1\n",
        )
        .unwrap();
        let output = dir.path().join("bad_hourly.csv");

        let args = ConvertArgs {
            input,
            output: output.clone(),
            ..Default::default()
        };

        assert!(execute_convert(args).is_err());
        assert!(!output.exists());
    }
}
