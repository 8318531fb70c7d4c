//! Watch time formatting
//!
//! Durations are carried around as whole seconds. These helpers turn them
//! into the compact form printed in reports.

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Format a number of seconds as days, hours, minutes and seconds
///
/// Zero components are left out.
///
/// # Examples
///
/// ```
/// use watchtime::util::time::format_watch_time;
///
/// assert_eq!(format_watch_time(0), "0s");
/// assert_eq!(format_watch_time(61), "1m 1s");
/// assert_eq!(format_watch_time(6000), "1h 40m");
/// assert_eq!(format_watch_time(90000), "1d 1h");
/// ```
pub fn format_watch_time(seconds: u64) -> String {
    if seconds == 0 {
        return "0s".to_string();
    }

    let parts = [
        (seconds / DAY, "d"),
        (seconds % DAY / HOUR, "h"),
        (seconds % HOUR / MINUTE, "m"),
        (seconds % MINUTE, "s"),
    ];

    parts
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format fractional seconds, e.g. an average duration
pub fn format_seconds_f64(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0s".to_string();
    }
    format_watch_time(seconds.round() as u64)
}

/// Format a count with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (count, c) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result.chars().rev().collect()
}
