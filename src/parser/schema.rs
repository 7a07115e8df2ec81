//! Event model shared by ingestion and bucketing.
//!
//! An `Event` is one interval record: a start, an end, and the quantity
//! accumulated over `[start, end)`.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single interval event
///
/// Fields are private so that `start <= end` and a finite quantity always hold
/// once an `Event` exists. Deserialization goes through `Event::new` as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent", into = "RawEvent")]
pub struct Event {
    start: NaiveDateTime,
    end: NaiveDateTime,
    quantity: f64,
    row: Option<u64>,
}

/// Unchecked wire form of an event
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawEvent {
    start: NaiveDateTime,
    end: NaiveDateTime,
    quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    row: Option<u64>,
}

/// Why an event could not be constructed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventViolation {
    #[error("end is before start")]
    EndBeforeStart,

    #[error("quantity is not finite")]
    NonFiniteQuantity,
}

impl Event {
    /// Create a new event, checking the interval and quantity
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        quantity: f64,
    ) -> Result<Self, EventViolation> {
        if end < start {
            return Err(EventViolation::EndBeforeStart);
        }
        if !quantity.is_finite() {
            return Err(EventViolation::NonFiniteQuantity);
        }
        Ok(Self {
            start,
            end,
            quantity,
            row: None,
        })
    }

    /// Attach the source line the event was read from
    pub fn with_row(mut self, row: u64) -> Self {
        self.row = Some(row);
        self
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Source line, when the event came from a file
    pub fn row(&self) -> Option<u64> {
        self.row
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// True when `start == end`
    pub fn is_zero_duration(&self) -> bool {
        self.start == self.end
    }
}

impl TryFrom<RawEvent> for Event {
    type Error = EventViolation;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let event = Event::new(raw.start, raw.end, raw.quantity)?;
        Ok(match raw.row {
            Some(row) => event.with_row(row),
            None => event,
        })
    }
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        Self {
            start: event.start,
            end: event.end,
            quantity: event.quantity,
            row: event.row,
        }
    }
}
