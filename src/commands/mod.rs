//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod batch;
pub mod convert;
pub mod export;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use batch::{execute_batch, validate_batch_args};
pub use convert::{convert_file, execute_convert, validate_args};
pub use export::execute_export;
pub use models::{BatchArgs, ConvertArgs, ExportArgs};
pub use utils::{display_version, validate_series_file};
