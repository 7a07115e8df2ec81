use crate::aggregator::{BucketingConfig, Granularity};
use crate::output::OutputOptions;
use crate::parser::IngestOptions;
use crate::utils::config::DEFAULT_OUTPUT_SUFFIX;
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Arguments for the convert command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    /// Input CSV with one event per row
    pub input: PathBuf,

    /// Output CSV for the dense series
    pub output: PathBuf,

    /// Bucket width and zero-duration handling
    pub bucketing: BucketingConfig,

    /// Column names and timestamp format of the input
    pub ingest: IngestOptions,

    /// Header names of the output
    pub output_options: OutputOptions,

    /// Print series summary to stdout
    pub print_summary: bool,
}

impl Default for ConvertArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("events.csv"),
            output: PathBuf::from("events_hourly.csv"),
            bucketing: BucketingConfig::default(),
            ingest: IngestOptions::default(),
            output_options: OutputOptions::default(),
            print_summary: false,
        }
    }
}

/// Arguments for the batch command
#[derive(Debug, Clone)]
pub struct BatchArgs {
    /// Dataset names; each maps to `<input_dir>/<name>.csv`
    pub datasets: Vec<String>,

    pub input_dir: PathBuf,
    pub output_dir: PathBuf,

    /// Appended to the dataset name for the output file
    pub suffix: String,

    pub bucketing: BucketingConfig,
    pub ingest: IngestOptions,
    pub output_options: OutputOptions,
}

impl Default for BatchArgs {
    fn default() -> Self {
        Self {
            datasets: Vec::new(),
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            bucketing: BucketingConfig::default(),
            ingest: IngestOptions::default(),
            output_options: OutputOptions::default(),
        }
    }
}

impl BatchArgs {
    pub fn input_path(&self, dataset: &str) -> PathBuf {
        self.input_dir.join(format!("{}.csv", dataset))
    }

    pub fn output_path(&self, dataset: &str) -> PathBuf {
        self.output_dir.join(format!("{}{}.csv", dataset, self.suffix))
    }
}

/// Arguments for the export command
#[derive(Debug, Clone)]
pub struct ExportArgs {
    /// Dense series CSV files, one series each
    pub inputs: Vec<PathBuf>,

    /// JSON-lines output
    pub output: PathBuf,

    /// Granularity the inputs were produced at
    pub granularity: Granularity,

    /// Overrides each series' first bucket as the `start` field
    pub start: Option<NaiveDateTime>,

    pub output_options: OutputOptions,
}

impl Default for ExportArgs {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: PathBuf::from("dataset.json"),
            granularity: Granularity::default(),
            start: None,
            output_options: OutputOptions::default(),
        }
    }
}
