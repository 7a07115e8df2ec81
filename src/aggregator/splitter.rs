//! Split interval events into per-bucket fragments.
//!
//! An event covering `[start, end)` is walked bucket by bucket. Each bucket it
//! touches receives a share of the event's quantity proportional to the time
//! the event spends inside that bucket.
//!
//! Example: 10 units over 00:30..01:30 at hourly width yields
//! `(00:00, 5.0)` and `(01:00, 5.0)`.

use super::granularity::Granularity;
use crate::parser::Event;
use chrono::{NaiveDateTime, TimeDelta};
use std::fmt;
use std::str::FromStr;

/// Share of one event's quantity attributed to one bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketFragment {
    /// Aligned start of the bucket
    pub bucket_start: NaiveDateTime,

    /// Quantity attributed to this bucket
    pub partial_quantity: f64,
}

/// What to do with events whose start equals their end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroDurationPolicy {
    /// Put the full quantity in the bucket containing `start`
    #[default]
    AllocateToStart,

    /// Emit nothing for the event
    Drop,

    /// Fail the conversion. Checked by `bucketize`; the splitter itself
    /// emits nothing for such events.
    Reject,
}

impl FromStr for ZeroDurationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allocate" | "allocate-to-start" => Ok(Self::AllocateToStart),
            "drop" => Ok(Self::Drop),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown zero-duration policy '{}' (expected allocate, drop or reject)",
                other
            )),
        }
    }
}

impl fmt::Display for ZeroDurationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AllocateToStart => "allocate",
            Self::Drop => "drop",
            Self::Reject => "reject",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Walking(NaiveDateTime),
    Single(NaiveDateTime),
    Done,
}

/// Lazy sequence of fragments for a single event
///
/// **Public** - returned by `split_event`
#[derive(Debug, Clone)]
pub struct Fragments {
    state: State,
    end: NaiveDateTime,
    quantity: f64,
    total_seconds: f64,
    granularity: Granularity,
}

impl Iterator for Fragments {
    type Item = BucketFragment;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Done => None,

            State::Single(bucket_start) => {
                self.state = State::Done;
                Some(BucketFragment {
                    bucket_start,
                    partial_quantity: self.quantity,
                })
            }

            State::Walking(current) => {
                if current >= self.end {
                    self.state = State::Done;
                    return None;
                }

                // truncate never moves forward, so the overlap starts at the cursor
                let bucket_start = self.granularity.truncate(current);
                let bucket_end = self.granularity.next(bucket_start);
                let overlap_end = bucket_end.map_or(self.end, |be| be.min(self.end));

                let overlap = as_seconds(overlap_end - current);
                let partial_quantity = self.quantity * overlap / self.total_seconds;

                self.state = bucket_end.map_or(State::Done, State::Walking);

                Some(BucketFragment {
                    bucket_start,
                    partial_quantity,
                })
            }
        }
    }
}

/// Split one event into bucket fragments
///
/// **Public** - main entry point for the splitter
///
/// # Arguments
/// * `event` - Validated event
/// * `granularity` - Bucket width
/// * `policy` - Handling of zero-duration events
///
/// # Returns
/// Lazy iterator whose partial quantities sum to the event's quantity
/// (up to floating-point rounding), except for dropped zero-duration events.
pub fn split_event(
    event: &Event,
    granularity: Granularity,
    policy: ZeroDurationPolicy,
) -> Fragments {
    let state = if event.is_zero_duration() {
        match policy {
            ZeroDurationPolicy::AllocateToStart => {
                State::Single(granularity.truncate(event.start()))
            }
            ZeroDurationPolicy::Drop | ZeroDurationPolicy::Reject => State::Done,
        }
    } else {
        State::Walking(event.start())
    };

    Fragments {
        state,
        end: event.end(),
        quantity: event.quantity(),
        total_seconds: as_seconds(event.duration()),
        granularity,
    }
}

/// Split every event and chain the fragments together
pub fn split_events<'a>(
    events: &'a [Event],
    granularity: Granularity,
    policy: ZeroDurationPolicy,
) -> impl Iterator<Item = BucketFragment> + 'a {
    events
        .iter()
        .flat_map(move |event| split_event(event, granularity, policy))
}

/// Duration as fractional seconds, keeping sub-second precision
fn as_seconds(delta: TimeDelta) -> f64 {
    delta.num_microseconds().map_or_else(
        || delta.num_milliseconds() as f64 / 1_000.0,
        |us| us as f64 / 1_000_000.0,
    )
}
