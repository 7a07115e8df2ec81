//! Bucket width and bucket alignment.
//!
//! Buckets are aligned to whole multiples of the width counted from
//! 1970-01-01T00:00:00. For widths that divide a day this is the usual
//! calendar alignment (top of the hour, quarter hour, midnight).

use crate::utils::config::SECONDS_PER_DAY;
use crate::utils::error::GranularityError;
use chrono::{DateTime, NaiveDateTime, TimeDelta};
use std::fmt;
use std::str::FromStr;

/// Fixed bucket width, in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Granularity {
    seconds: i64,
}

impl Granularity {
    /// Width must be positive and representable as a `TimeDelta`
    pub fn from_seconds(seconds: i64) -> Result<Self, GranularityError> {
        if seconds <= 0 {
            return Err(GranularityError::NonPositive);
        }
        if TimeDelta::try_seconds(seconds).is_none() {
            return Err(GranularityError::OutOfRange(seconds));
        }
        Ok(Self { seconds })
    }

    pub const fn hourly() -> Self {
        Self { seconds: 3_600 }
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn as_delta(&self) -> TimeDelta {
        // In range for every value `from_seconds` accepts
        TimeDelta::try_seconds(self.seconds).unwrap_or(TimeDelta::MAX)
    }

    /// Whether buckets line up with midnight every day
    pub fn divides_day(&self) -> bool {
        SECONDS_PER_DAY % self.seconds == 0
    }

    /// Start of the bucket containing `ts`
    pub fn truncate(&self, ts: NaiveDateTime) -> NaiveDateTime {
        let secs = ts.and_utc().timestamp();
        let floored = secs - secs.rem_euclid(self.seconds);
        // Unrepresentable only at the lower bound of the calendar
        DateTime::from_timestamp(floored, 0).map_or(NaiveDateTime::MIN, |dt| dt.naive_utc())
    }

    /// Start of the bucket following the one starting at `bucket_start`
    pub fn next(&self, bucket_start: NaiveDateTime) -> Option<NaiveDateTime> {
        bucket_start.checked_add_signed(self.as_delta())
    }

    /// Number of whole buckets between two aligned bucket starts
    pub fn steps_between(&self, lo: NaiveDateTime, hi: NaiveDateTime) -> i64 {
        (hi - lo).num_seconds() / self.seconds
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Self::hourly()
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.seconds {
            s if s % SECONDS_PER_DAY == 0 => write!(f, "{}d", s / SECONDS_PER_DAY),
            s if s % 3_600 == 0 => write!(f, "{}h", s / 3_600),
            s if s % 60 == 0 => write!(f, "{}min", s / 60),
            s => write!(f, "{}s", s),
        }
    }
}

impl FromStr for Granularity {
    type Err = GranularityError;

    /// Parse pandas-style frequency strings such as `1h`, `15min`, `30s`, `D`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(GranularityError::Empty);
        }

        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, unit) = s.split_at(split);

        let multiplier: i64 = if digits.is_empty() {
            1
        } else {
            digits
                .parse()
                .map_err(|_| GranularityError::InvalidMultiplier(digits.to_string()))?
        };

        let unit_seconds = match unit.trim() {
            "s" | "S" | "sec" => 1,
            "min" | "m" | "T" => 60,
            "h" | "H" => 3_600,
            "d" | "D" => SECONDS_PER_DAY,
            other => return Err(GranularityError::UnknownUnit(other.to_string())),
        };

        let seconds = multiplier
            .checked_mul(unit_seconds)
            .ok_or_else(|| GranularityError::InvalidMultiplier(digits.to_string()))?;

        Self::from_seconds(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_parse_units() {
        assert_eq!("1h".parse::<Granularity>().unwrap().seconds(), 3_600);
        assert_eq!("H".parse::<Granularity>().unwrap().seconds(), 3_600);
        assert_eq!("15min".parse::<Granularity>().unwrap().seconds(), 900);
        assert_eq!("30s".parse::<Granularity>().unwrap().seconds(), 30);
        assert_eq!("1d".parse::<Granularity>().unwrap().seconds(), 86_400);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Granularity>(), Err(GranularityError::Empty));
        assert_eq!("0h".parse::<Granularity>(), Err(GranularityError::NonPositive));
        assert_eq!(
            "3w".parse::<Granularity>(),
            Err(GranularityError::UnknownUnit("w".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_width_beyond_time_range() {
        assert_eq!(
            "9999999999999999s".parse::<Granularity>(),
            Err(GranularityError::OutOfRange(9_999_999_999_999_999))
        );
        assert_eq!(
            Granularity::from_seconds(i64::MAX),
            Err(GranularityError::OutOfRange(i64::MAX))
        );
    }

    #[test]
    fn test_widest_accepted_width_has_delta() {
        let widest = TimeDelta::MAX.num_seconds();
        let g = Granularity::from_seconds(widest).unwrap();
        assert_eq!(g.as_delta().num_seconds(), widest);
        assert_eq!(g.next(ts(1, 0, 0, 0)), None);
    }

    #[test]
    fn test_display_round_trips_common_widths() {
        for text in ["1h", "15min", "30s", "1d", "2h"] {
            let g: Granularity = text.parse().unwrap();
            assert_eq!(g.to_string(), text);
        }
    }

    #[test]
    fn test_truncate_hourly_zeroes_sub_hour_fields() {
        let g = Granularity::hourly();
        let with_nanos = ts(1, 13, 47, 12)
            .checked_add_signed(TimeDelta::milliseconds(250))
            .unwrap();
        assert_eq!(g.truncate(with_nanos), ts(1, 13, 0, 0));
        assert_eq!(g.truncate(ts(1, 13, 0, 0)), ts(1, 13, 0, 0));
    }

    #[test]
    fn test_truncate_quarter_hour_and_day() {
        let quarter: Granularity = "15min".parse().unwrap();
        assert_eq!(quarter.truncate(ts(2, 8, 44, 59)), ts(2, 8, 30, 0));

        let day: Granularity = "1d".parse().unwrap();
        assert_eq!(day.truncate(ts(2, 8, 44, 59)), ts(2, 0, 0, 0));
    }

    #[test]
    fn test_truncate_before_epoch() {
        let g = Granularity::hourly();
        let early = NaiveDate::from_ymd_opt(1969, 12, 31)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(1969, 12, 31)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        assert_eq!(g.truncate(early), expected);
    }

    #[test]
    fn test_divides_day() {
        assert!(Granularity::hourly().divides_day());
        assert!(!"7h".parse::<Granularity>().unwrap().divides_day());
    }

    #[test]
    fn test_steps_between() {
        let g = Granularity::hourly();
        assert_eq!(g.steps_between(ts(1, 0, 0, 0), ts(1, 3, 0, 0)), 3);
        assert_eq!(g.next(ts(1, 23, 0, 0)), Some(ts(2, 0, 0, 0)));
    }
}
