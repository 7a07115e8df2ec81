//! Batch command implementation.
//!
//! Converts a list of named datasets, each through its own isolated
//! pipeline. The first failing dataset aborts the batch.

use super::convert::convert_file;
use super::models::BatchArgs;
use crate::aggregator::SeriesSummary;
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

/// Execute the batch command
///
/// # Returns
/// Dataset names paired with their series summaries, in input order
pub fn execute_batch(args: BatchArgs) -> Result<Vec<(String, SeriesSummary)>> {
    let start_time = Instant::now();

    info!(
        "Batch converting {} datasets from {}",
        args.datasets.len(),
        args.input_dir.display()
    );

    let mut results = Vec::with_capacity(args.datasets.len());

    for (i, dataset) in args.datasets.iter().enumerate() {
        info!("[{}/{}] Dataset '{}'", i + 1, args.datasets.len(), dataset);

        let summary = convert_file(
            &args.input_path(dataset),
            &args.output_path(dataset),
            &args.bucketing,
            &args.ingest,
            &args.output_options,
        )
        .with_context(|| format!("Dataset '{}' failed", dataset))?;

        results.push((dataset.clone(), summary));
    }

    info!(
        "Batch completed: {} datasets in {:.2}s",
        results.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(results)
}

/// Validate batch arguments
pub fn validate_batch_args(args: &BatchArgs) -> Result<()> {
    if args.datasets.is_empty() {
        anyhow::bail!("At least one dataset name is required");
    }

    for dataset in &args.datasets {
        if dataset.trim().is_empty() {
            anyhow::bail!("Dataset names cannot be empty");
        }
        if dataset.contains(|c: char| c == '/' || c == '\\') {
            anyhow::bail!("Dataset name '{}' must not contain path separators", dataset);
        }
    }

    if !args.input_dir.is_dir() {
        anyhow::bail!("Input directory not found: {}", args.input_dir.display());
    }

    if args.suffix.is_empty() && args.input_dir == args.output_dir {
        anyhow::bail!("An empty suffix would overwrite the input files");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn test_batch_paths() {
        let args = BatchArgs {
            datasets: vec!["caltech".to_string()],
            input_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("out"),
            ..Default::default()
        };
        assert_eq!(args.input_path("caltech"), PathBuf::from("data/caltech.csv"));
        assert_eq!(args.output_path("caltech"), PathBuf::from("out/caltech_hourly.csv"));
    }

    #[test]
    fn test_execute_batch_converts_each_dataset() {
        let dir = tempfile::tempdir().unwrap();
        for (name, energy) in [("sap", "3"), ("boulder", "7")] {
            fs::write(
                dir.path().join(format!("{}.csv", name)),
                format!("Start,End,Energy\n2024-01-01 00:00:00,2024-01-01 01:00:00,{}\n", energy),
            )
            .unwrap();
        }

        let args = BatchArgs {
            datasets: vec!["sap".to_string(), "boulder".to_string()],
            input_dir: dir.path().to_path_buf(),
            output_dir: dir.path().join("hourly"),
            ..Default::default()
        };
        validate_batch_args(&args).unwrap();

        let results = execute_batch(args).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "sap");
        assert_eq!(results[1].1.total_quantity, 7.0);
        assert!(dir.path().join("hourly/boulder_hourly.csv").exists());
    }

    #[test]
    fn test_execute_batch_missing_dataset_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = BatchArgs {
            datasets: vec!["missing".to_string()],
            input_dir: dir.path().to_path_buf(),
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert!(execute_batch(args).is_err());
    }

    #[test]
    fn test_validate_batch_args() {
        let dir = tempfile::tempdir().unwrap();
        let base = BatchArgs {
            datasets: vec!["a".to_string()],
            input_dir: dir.path().to_path_buf(),
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert!(validate_batch_args(&base).is_ok());

        let no_datasets = BatchArgs {
            datasets: Vec::new(),
            ..base.clone()
        };
        assert!(validate_batch_args(&no_datasets).is_err());

        let with_separator = BatchArgs {
            datasets: vec!["../a".to_string()],
            ..base.clone()
        };
        assert!(validate_batch_args(&with_separator).is_err());

        let overwrite = BatchArgs {
            suffix: String::new(),
            ..base
        };
        assert!(validate_batch_args(&overwrite).is_err());
    }
}
