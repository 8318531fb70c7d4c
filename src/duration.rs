//! ISO-8601 duration decoding
//!
//! The metadata provider reports video lengths as ISO-8601 durations
//! (`PT4M13S`, `PT1H2M`, `P1DT2H`). This module turns them into whole seconds.
//!
//! # Conversion
//!
//! Calendar components use fixed factors: a year is 365 days and a month is
//! 30 days. Weeks fold into days.
//!
//! # Out of range
//!
//! Anything with a non-zero day (or week) component is a livestream or other
//! long-form recording. Those are reported as [`DecodedDuration::OutOfRange`]
//! instead of a number so the caller cannot add them into the resolved total
//! by accident.
//!
//! # Example
//!
//! ```
//! use watchtime::duration::{decode, DecodedDuration};
//!
//! assert_eq!(decode("PT10M"), DecodedDuration::Seconds(600));
//! assert_eq!(decode("P1DT2H"), DecodedDuration::OutOfRange);
//! ```

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;
const SECS_PER_MONTH: u64 = 30 * SECS_PER_DAY;
const SECS_PER_YEAR: u64 = 365 * SECS_PER_DAY;

/// Result of decoding one duration string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedDuration {
    /// In-range duration in whole seconds
    Seconds(u64),
    /// Day component present and non-zero
    OutOfRange,
    /// Input does not start with the `P` designator
    Unrecognized,
}

impl DecodedDuration {
    /// Seconds for resolved values, `None` otherwise
    pub fn seconds(&self) -> Option<u64> {
        match self {
            Self::Seconds(s) => Some(*s),
            _ => None,
        }
    }

    /// `(seconds, out_of_range)` pair; out-of-range values report 0 seconds
    pub fn as_pair(&self) -> (u64, bool) {
        match self {
            Self::Seconds(s) => (*s, false),
            Self::OutOfRange => (0, true),
            Self::Unrecognized => (0, false),
        }
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange)
    }
}

/// Individual components of a parsed duration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationComponents {
    pub years: u64,
    pub months: u64,
    pub weeks: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationComponents {
    /// Parse the components of `P[nY][nM][nW][nD][T[nH][nM][nS]]`
    ///
    /// Returns `None` when the designator is missing. Numeric parts that fail
    /// to parse (overflow, stray characters) count as zero, and fractional
    /// parts are truncated.
    pub fn parse(encoded: &str) -> Option<Self> {
        let body = encoded.trim().strip_prefix('P')?;

        let mut parts = Self::default();
        let mut in_time = false;
        let mut number = String::new();

        for ch in body.chars() {
            match ch {
                'T' => {
                    in_time = true;
                    number.clear();
                }
                '0'..='9' | '.' | ',' => number.push(ch),
                unit => {
                    let value = parse_component(&number);
                    number.clear();
                    match (in_time, unit) {
                        (false, 'Y') => parts.years = value,
                        (false, 'M') => parts.months = value,
                        (false, 'W') => parts.weeks = value,
                        (false, 'D') => parts.days = value,
                        (true, 'H') => parts.hours = value,
                        (true, 'M') => parts.minutes = value,
                        (true, 'S') => parts.seconds = value,
                        _ => {}
                    }
                }
            }
        }

        Some(parts)
    }

    /// Total length in seconds, saturating on overflow
    pub fn total_seconds(&self) -> u64 {
        let days = self.weeks.saturating_mul(7).saturating_add(self.days);
        self.years
            .saturating_mul(SECS_PER_YEAR)
            .saturating_add(self.months.saturating_mul(SECS_PER_MONTH))
            .saturating_add(days.saturating_mul(SECS_PER_DAY))
            .saturating_add(self.hours.saturating_mul(SECS_PER_HOUR))
            .saturating_add(self.minutes.saturating_mul(SECS_PER_MINUTE))
            .saturating_add(self.seconds)
    }

    /// Whether this duration spans one or more whole days
    pub fn spans_days(&self) -> bool {
        self.days > 0 || self.weeks > 0
    }
}

fn parse_component(digits: &str) -> u64 {
    let integral = digits.split(['.', ',']).next().unwrap_or("");
    integral.parse().unwrap_or(0)
}

/// Decode an ISO-8601 duration string
pub fn decode(encoded: &str) -> DecodedDuration {
    match DurationComponents::parse(encoded) {
        None => DecodedDuration::Unrecognized,
        Some(parts) if parts.spans_days() => DecodedDuration::OutOfRange,
        Some(parts) => DecodedDuration::Seconds(parts.total_seconds()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_minutes_and_seconds() {
        assert_eq!(decode("PT4M13S"), DecodedDuration::Seconds(253));
        assert_eq!(decode("PT10M"), DecodedDuration::Seconds(600));
        assert_eq!(decode("PT45S"), DecodedDuration::Seconds(45));
    }

    #[test]
    fn test_decode_hours() {
        assert_eq!(decode("PT1H"), DecodedDuration::Seconds(3600));
        assert_eq!(decode("PT2H3M4S"), DecodedDuration::Seconds(7384));
    }

    #[test]
    fn test_month_vs_minute_disambiguation() {
        // M before T is months, after T is minutes
        assert_eq!(decode("P1M"), DecodedDuration::Seconds(SECS_PER_MONTH));
        assert_eq!(decode("PT1M"), DecodedDuration::Seconds(60));
        assert_eq!(decode("P1MT1M"), DecodedDuration::Seconds(SECS_PER_MONTH + 60));
    }

    #[test]
    fn test_year_factor() {
        assert_eq!(decode("P1Y"), DecodedDuration::Seconds(365 * 86_400));
    }

    #[test]
    fn test_zero_and_absent_components() {
        assert_eq!(decode("P"), DecodedDuration::Seconds(0));
        assert_eq!(decode("PT"), DecodedDuration::Seconds(0));
        assert_eq!(decode("PT0S"), DecodedDuration::Seconds(0));
        assert_eq!(decode("P0D"), DecodedDuration::Seconds(0));
        assert_eq!(decode("PT0S").as_pair(), (0, false));
    }

    #[test]
    fn test_non_zero_day_is_out_of_range() {
        assert_eq!(decode("P1DT2H"), DecodedDuration::OutOfRange);
        assert_eq!(decode("P3D"), DecodedDuration::OutOfRange);
        assert_eq!(decode("P1DT2H").as_pair(), (0, true));
        assert!(decode("P2W").is_out_of_range());
    }

    #[test]
    fn test_malformed_components_are_zero() {
        // Overflowing number parses as zero
        assert_eq!(decode("PT99999999999999999999999S"), DecodedDuration::Seconds(0));
        // Unit with no number
        assert_eq!(decode("PTM30S"), DecodedDuration::Seconds(30));
    }

    #[test]
    fn test_fractional_seconds_truncated() {
        assert_eq!(decode("PT1M1.5S"), DecodedDuration::Seconds(61));
    }

    #[test]
    fn test_missing_designator_is_unrecognized() {
        assert_eq!(decode(""), DecodedDuration::Unrecognized);
        assert_eq!(decode("10:00"), DecodedDuration::Unrecognized);
        assert_eq!(decode("").seconds(), None);
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(decode("  PT5S \n"), DecodedDuration::Seconds(5));
    }
}
