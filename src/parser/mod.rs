//! Event parsing and schema definitions.
//!
//! This module handles:
//! - The validated `Event` model
//! - Timestamp auto-detection
//! - Reading event records from CSV

pub mod events;
pub mod schema;
pub mod timestamp;

// Re-export main types
pub use events::{read_events, read_events_from, IngestOptions};
pub use schema::{Event, EventViolation};
pub use timestamp::parse_timestamp;
