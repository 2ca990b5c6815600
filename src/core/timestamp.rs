//! Header timestamp formats
//!
//! A logger picks one [`TimeFormat`] at construction and every record header
//! uses it. Per-field timestamps take an arbitrary strftime string instead,
//! see [`crate::Record::time`].

use super::buffer::{append_padded, append_two_digits};
use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Closed set of header time representations
///
/// # Examples
///
/// ```
/// use fieldlog::TimeFormat;
/// use chrono::{Local, TimeZone};
///
/// let now = Local.with_ymd_and_hms(2023, 7, 14, 21, 8, 20).unwrap();
/// let mut buf = Vec::new();
/// TimeFormat::HumanReadable.append(&mut buf, &now);
/// assert_eq!(buf, b"2023-07-14 21:08:20");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    /// `2023-07-14 21:08:20`
    HumanReadable,

    /// `2023-07-14 21:08:20.212`
    #[default]
    HumanReadableMs,

    /// `1689340100`
    UnixSeconds,

    /// `1689340100123`
    UnixMillis,
}

impl TimeFormat {
    /// Numeric formats are written bare, the others as strings
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimeFormat::UnixSeconds | TimeFormat::UnixMillis)
    }

    /// Append `now` in this format, without quoting
    pub fn append<Tz: TimeZone>(&self, buf: &mut Vec<u8>, now: &DateTime<Tz>) {
        match self {
            TimeFormat::HumanReadable => append_human_readable(buf, now),
            TimeFormat::HumanReadableMs => {
                append_human_readable(buf, now);
                buf.push(b'.');
                // leap seconds report 1000+ ms; clamp to keep three digits
                append_padded(buf, now.timestamp_subsec_millis().min(999), 3);
            }
            TimeFormat::UnixSeconds => {
                let _ = write!(buf, "{}", now.timestamp());
            }
            TimeFormat::UnixMillis => {
                let _ = write!(buf, "{}", now.timestamp_millis());
            }
        }
    }

    /// Get a description of this format
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            TimeFormat::HumanReadable => "human readable (2023-07-14 21:08:20)",
            TimeFormat::HumanReadableMs => "human readable with milliseconds (2023-07-14 21:08:20.212)",
            TimeFormat::UnixSeconds => "Unix timestamp in seconds (1689340100)",
            TimeFormat::UnixMillis => "Unix timestamp in milliseconds (1689340100123)",
        }
    }
}

fn append_human_readable<Tz: TimeZone>(buf: &mut Vec<u8>, now: &DateTime<Tz>) {
    append_padded(buf, now.year().max(0) as u32, 4);
    buf.push(b'-');
    append_two_digits(buf, now.month());
    buf.push(b'-');
    append_two_digits(buf, now.day());
    buf.push(b' ');
    append_two_digits(buf, now.hour());
    buf.push(b':');
    append_two_digits(buf, now.minute());
    buf.push(b':');
    append_two_digits(buf, now.second());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn fixed_datetime() -> DateTime<Utc> {
        // 2023-07-14 21:08:20.212 UTC
        Utc.with_ymd_and_hms(2023, 7, 14, 21, 8, 20)
            .single()
            .expect("valid datetime")
            + Duration::milliseconds(212)
    }

    fn render(format: TimeFormat) -> String {
        let mut buf = Vec::new();
        format.append(&mut buf, &fixed_datetime());
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_human_readable_format() {
        assert_eq!(render(TimeFormat::HumanReadable), "2023-07-14 21:08:20");
    }

    #[test]
    fn test_human_readable_ms_format() {
        assert_eq!(render(TimeFormat::HumanReadableMs), "2023-07-14 21:08:20.212");
    }

    #[test]
    fn test_unix_formats() {
        assert_eq!(render(TimeFormat::UnixSeconds), "1689368900");
        assert_eq!(render(TimeFormat::UnixMillis), "1689368900212");
    }

    #[test]
    fn test_padding_of_small_fields() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single().unwrap();
        let mut buf = Vec::new();
        TimeFormat::HumanReadableMs.append(&mut buf, &dt);
        assert_eq!(String::from_utf8(buf).unwrap(), "2024-01-02 03:04:05.000");
    }

    #[test]
    fn test_is_numeric() {
        assert!(!TimeFormat::HumanReadable.is_numeric());
        assert!(!TimeFormat::HumanReadableMs.is_numeric());
        assert!(TimeFormat::UnixSeconds.is_numeric());
        assert!(TimeFormat::UnixMillis.is_numeric());
    }

    #[test]
    fn test_default_and_serde() {
        assert_eq!(TimeFormat::default(), TimeFormat::HumanReadableMs);
        let json = serde_json::to_string(&TimeFormat::UnixMillis).unwrap();
        assert_eq!(json, "\"unix_millis\"");
        let parsed: TimeFormat = serde_json::from_str("\"human_readable\"").unwrap();
        assert_eq!(parsed, TimeFormat::HumanReadable);
    }
}
