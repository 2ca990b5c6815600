//! Record framing for the supported output formats
//!
//! - Json: `{"time":"2023-07-14 21:08:20.212","level":"debug","n":42,"msg":"hello"}`
//! - Text: `2023-07-14 21:08:20.212 debug n=42 msg=hello`
//!
//! Values are rendered identically in both formats except for strings, which
//! the text format writes bare when they are unambiguous.

use super::buffer::{append_escaped, append_fast, is_clean};
use super::log_level::Level;
use super::timestamp::TimeFormat;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format of a logger, fixed at construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line (default)
    #[default]
    Json,

    /// `<time> <level> key=value ...`
    Text,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        }
    }

    /// Write the record header: timestamp then level
    pub(crate) fn open_record<Tz: TimeZone>(
        &self,
        buf: &mut Vec<u8>,
        level: Level,
        now: &DateTime<Tz>,
        time_format: TimeFormat,
    ) {
        match self {
            OutputFormat::Json => {
                buf.extend_from_slice(b"{\"time\":");
                if time_format.is_numeric() {
                    time_format.append(buf, now);
                } else {
                    buf.push(b'"');
                    time_format.append(buf, now);
                    buf.push(b'"');
                }
                buf.extend_from_slice(b",\"level\":\"");
                buf.extend_from_slice(level.as_str().as_bytes());
                buf.push(b'"');
            }
            OutputFormat::Text => {
                time_format.append(buf, now);
                buf.push(b' ');
                buf.extend_from_slice(level.as_str().as_bytes());
            }
        }
    }

    /// Write the separator and key of the next field
    pub(crate) fn append_key(&self, buf: &mut Vec<u8>, key: &str) {
        self.key_with(buf, key, append_escaped);
    }

    /// Like [`OutputFormat::append_key`] for keys known to need no escaping
    pub(crate) fn append_fast_key(&self, buf: &mut Vec<u8>, key: &str) {
        self.key_with(buf, key, append_fast);
    }

    fn key_with(&self, buf: &mut Vec<u8>, key: &str, write: fn(&mut Vec<u8>, &[u8])) {
        match self {
            OutputFormat::Json => {
                buf.extend_from_slice(b",\"");
                write(buf, key.as_bytes());
                buf.extend_from_slice(b"\":");
            }
            OutputFormat::Text => {
                buf.push(b' ');
                write(buf, key.as_bytes());
                buf.push(b'=');
            }
        }
    }

    /// Write a string value, escaping as needed
    pub(crate) fn append_str_value(&self, buf: &mut Vec<u8>, value: &[u8]) {
        if *self == OutputFormat::Text && is_bare_text(value) {
            buf.extend_from_slice(value);
            return;
        }
        buf.push(b'"');
        append_escaped(buf, value);
        buf.push(b'"');
    }

    /// Write a string value the caller guarantees needs no escaping
    pub(crate) fn append_fast_str_value(&self, buf: &mut Vec<u8>, value: &[u8]) {
        if *self == OutputFormat::Text
            && !value.is_empty()
            && !value.iter().any(|&b| b == b' ' || b == b'=')
        {
            buf.extend_from_slice(value);
            return;
        }
        buf.push(b'"');
        append_fast(buf, value);
        buf.push(b'"');
    }

    /// Close the record and terminate the line
    pub(crate) fn close_record(&self, buf: &mut Vec<u8>) {
        if *self == OutputFormat::Json {
            buf.push(b'}');
        }
        buf.push(b'\n');
    }
}

/// Text values may go unquoted when they cannot be confused with the
/// surrounding `key=value` syntax
fn is_bare_text(value: &[u8]) -> bool {
    !value.is_empty() && value.iter().all(|&b| is_clean(b) && b != b' ' && b != b'=')
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            _ => Err(format!("Invalid output format: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn header(format: OutputFormat, time_format: TimeFormat) -> String {
        let now = Utc.with_ymd_and_hms(2023, 7, 14, 21, 8, 20).single().unwrap();
        let mut buf = Vec::new();
        format.open_record(&mut buf, Level::Debug, &now, time_format);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_json_header() {
        assert_eq!(
            header(OutputFormat::Json, TimeFormat::HumanReadable),
            r#"{"time":"2023-07-14 21:08:20","level":"debug""#
        );
        assert_eq!(
            header(OutputFormat::Json, TimeFormat::UnixSeconds),
            r#"{"time":1689368900,"level":"debug""#
        );
    }

    #[test]
    fn test_text_header() {
        assert_eq!(
            header(OutputFormat::Text, TimeFormat::HumanReadableMs),
            "2023-07-14 21:08:20.000 debug"
        );
    }

    #[test]
    fn test_keys() {
        let mut buf = Vec::new();
        OutputFormat::Json.append_key(&mut buf, "a\"b");
        OutputFormat::Text.append_key(&mut buf, "k");
        assert_eq!(String::from_utf8(buf).unwrap(), r#","a\"b": k="#);
    }

    #[test]
    fn test_text_string_quoting() {
        let render = |v: &str| {
            let mut buf = Vec::new();
            OutputFormat::Text.append_str_value(&mut buf, v.as_bytes());
            String::from_utf8(buf).unwrap()
        };
        assert_eq!(render("value1"), "value1");
        assert_eq!(render("value 2"), r#""value 2""#);
        assert_eq!(render("a=b"), r#""a=b""#);
        assert_eq!(render(""), r#""""#);
        assert_eq!(render("line\nbreak"), r#""line\nbreak""#);
    }

    #[test]
    fn test_json_string_always_quoted() {
        let mut buf = Vec::new();
        OutputFormat::Json.append_str_value(&mut buf, b"value1");
        assert_eq!(buf, br#""value1""#);
    }

    #[test]
    fn test_close_record() {
        let mut json = Vec::new();
        OutputFormat::Json.close_record(&mut json);
        assert_eq!(json, b"}\n");

        let mut text = Vec::new();
        OutputFormat::Text.close_record(&mut text);
        assert_eq!(text, b"\n");
    }

    #[test]
    fn test_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("logfmt".parse::<OutputFormat>().is_err());
    }
}
