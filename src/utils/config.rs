//! Configuration and constants for the CLI.

/// Default bucket width
pub const DEFAULT_GRANULARITY: &str = "1h";

// Input column names (as exported by the charging-session datasets)
pub const DEFAULT_START_COLUMN: &str = "Start";
pub const DEFAULT_END_COLUMN: &str = "End";
pub const DEFAULT_QUANTITY_COLUMN: &str = "Energy";

// Output header names
pub const DEFAULT_TIME_HEADER: &str = "Hour";
pub const DEFAULT_VALUE_HEADER: &str = "Energy";

/// Suffix appended to dataset names by the batch command
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_hourly";

/// Serialized form of bucket timestamps in output files
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Naive formats tried, in order, when no explicit timestamp format is given.
/// RFC 3339 and RFC 2822 are tried before these.
pub const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only fallback (midnight)
pub const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Tolerance used when comparing summed quantities
pub const QUANTITY_EPSILON: f64 = 1e-9;

pub const SECONDS_PER_DAY: i64 = 86_400;
