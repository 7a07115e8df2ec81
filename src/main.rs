//! Interval Bucketer CLI
//!
//! Turns interval event logs into regular, gap-filled time series.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use interval_bucketer::aggregator::{BucketingConfig, Granularity, ZeroDurationPolicy};
use interval_bucketer::commands::{
    display_version, execute_batch, execute_convert, execute_export, validate_args,
    validate_batch_args, validate_series_file, BatchArgs, ConvertArgs, ExportArgs,
};
use interval_bucketer::output::OutputOptions;
use interval_bucketer::parser::{parse_timestamp, IngestOptions};
use interval_bucketer::utils::config::{
    DEFAULT_END_COLUMN, DEFAULT_GRANULARITY, DEFAULT_OUTPUT_SUFFIX, DEFAULT_QUANTITY_COLUMN,
    DEFAULT_START_COLUMN, DEFAULT_TIME_HEADER, DEFAULT_VALUE_HEADER,
};

/// Interval Bucketer - regularize interval event logs
#[derive(Parser, Debug)]
#[command(name = "interval-bucketer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Options shared by every command that buckets events
#[derive(Args, Debug)]
struct BucketingOpts {
    /// Bucket width, e.g. 1h, 15min, 1d
    #[arg(short, long, env = "BUCKETER_GRANULARITY", default_value = DEFAULT_GRANULARITY)]
    granularity: Granularity,

    /// Handling of events whose start equals their end (allocate, drop, reject)
    #[arg(long, default_value = "allocate")]
    zero_duration: ZeroDurationPolicy,

    /// Explicit chrono format for input timestamps (auto-detect if omitted)
    #[arg(long, env = "BUCKETER_TIMESTAMP_FORMAT")]
    timestamp_format: Option<String>,

    /// Input column holding the event start
    #[arg(long, default_value = DEFAULT_START_COLUMN)]
    start_column: String,

    /// Input column holding the event end
    #[arg(long, default_value = DEFAULT_END_COLUMN)]
    end_column: String,

    /// Input column holding the event quantity
    #[arg(long, default_value = DEFAULT_QUANTITY_COLUMN)]
    quantity_column: String,

    #[command(flatten)]
    headers: HeaderOpts,
}

/// Header names of dense series files
#[derive(Args, Debug)]
struct HeaderOpts {
    /// Header of the bucket timestamp column
    #[arg(long, default_value = DEFAULT_TIME_HEADER)]
    time_header: String,

    /// Header of the quantity column
    #[arg(long, default_value = DEFAULT_VALUE_HEADER)]
    value_header: String,
}

impl BucketingOpts {
    fn bucketing(&self) -> BucketingConfig {
        BucketingConfig::new(self.granularity).with_zero_duration(self.zero_duration)
    }

    fn ingest(&self) -> IngestOptions {
        IngestOptions {
            start_column: self.start_column.clone(),
            end_column: self.end_column.clone(),
            quantity_column: self.quantity_column.clone(),
            timestamp_format: self.timestamp_format.clone(),
        }
    }
}

impl HeaderOpts {
    fn output_options(&self) -> OutputOptions {
        OutputOptions {
            time_header: self.time_header.clone(),
            value_header: self.value_header.clone(),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert one events CSV into a dense series CSV
    Convert {
        /// Events CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the dense series
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        opts: BucketingOpts,

        /// Print series summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Convert several named datasets (<input-dir>/<name>.csv)
    Batch {
        /// Dataset names
        #[arg(required = true, num_args = 1..)]
        datasets: Vec<String>,

        /// Directory containing <name>.csv files
        #[arg(long, default_value = ".")]
        input_dir: PathBuf,

        /// Directory for converted files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Suffix appended to each dataset name in the output file name
        #[arg(long, default_value = DEFAULT_OUTPUT_SUFFIX)]
        suffix: String,

        #[command(flatten)]
        opts: BucketingOpts,
    },

    /// Export dense series CSVs as a JSON-lines dataset
    Export {
        /// Dense series CSV files, one series each
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Output JSON-lines file
        #[arg(short, long, default_value = "dataset.json")]
        output: PathBuf,

        /// Granularity the series were produced at
        #[arg(short, long, default_value = DEFAULT_GRANULARITY)]
        granularity: Granularity,

        /// Start timestamp to write for every series (default: each series' first bucket)
        #[arg(long)]
        start: Option<String>,

        #[command(flatten)]
        headers: HeaderOpts,
    },

    /// Check that a dense series CSV is ordered and gap-free
    Validate {
        /// Path to dense series CSV
        #[arg(short, long)]
        file: PathBuf,

        /// Expected granularity
        #[arg(short, long, default_value = DEFAULT_GRANULARITY)]
        granularity: Granularity,

        #[command(flatten)]
        headers: HeaderOpts,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Convert {
            input,
            output,
            opts,
            summary,
        } => {
            let args = ConvertArgs {
                input,
                output,
                bucketing: opts.bucketing(),
                ingest: opts.ingest(),
                output_options: opts.headers.output_options(),
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_convert(args)?;
        }

        Commands::Batch {
            datasets,
            input_dir,
            output_dir,
            suffix,
            opts,
        } => {
            let args = BatchArgs {
                datasets,
                input_dir,
                output_dir,
                suffix,
                bucketing: opts.bucketing(),
                ingest: opts.ingest(),
                output_options: opts.headers.output_options(),
            };

            validate_batch_args(&args)?;

            for (name, summary) in execute_batch(args)? {
                println!("{:<16} {}", name, summary.summary());
            }
        }

        Commands::Export {
            inputs,
            output,
            granularity,
            start,
            headers,
        } => {
            let start = start
                .as_deref()
                .map(|s| parse_timestamp(s, None))
                .transpose()
                .context("Invalid --start timestamp")?;

            let written = execute_export(ExportArgs {
                inputs,
                output,
                granularity,
                start,
                output_options: headers.output_options(),
            })?;

            println!("Exported {} series", written);
        }

        Commands::Validate {
            file,
            granularity,
            headers,
        } => {
            validate_series_file(file, granularity, &headers.output_options())?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
