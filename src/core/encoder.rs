//! Record encoder: one record's byte buffer plus the metadata sinks need
//!
//! The encoder renders every field straight into its buffer in the logger's
//! [`OutputFormat`]; there is no intermediate field list. Field order is call
//! order and duplicate keys are kept.

use super::buffer::{append_seq, append_str_seq, Primitive, Seq};
use super::log_level::Level;
use super::output_format::OutputFormat;
use super::timestamp::TimeFormat;
use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::sync::Arc;

/// Initial buffer capacity of a freshly allocated encoder
pub const INITIAL_CAPACITY: usize = 512;

/// Error returned by a [`MarshalFn`]
pub type MarshalError = Box<dyn std::error::Error + Send + Sync>;

/// Renders the value of an `any` field as JSON bytes
pub type MarshalFn =
    Arc<dyn Fn(&serde_json::Value) -> std::result::Result<Vec<u8>, MarshalError> + Send + Sync>;

/// The marshal function used unless one is injected: compact `serde_json`
pub fn default_marshal() -> MarshalFn {
    Arc::new(|value: &serde_json::Value| {
        serde_json::to_vec(value).map_err(MarshalError::from)
    })
}

/// Stateful serializer for a single record
///
/// # Examples
///
/// ```
/// use fieldlog::{Encoder, Level, OutputFormat, TimeFormat};
/// use chrono::Local;
///
/// let mut encoder = Encoder::new(OutputFormat::Text);
/// encoder.begin(Level::Info, Local::now(), true, TimeFormat::UnixSeconds);
/// encoder.int64("n", 42);
/// encoder.str("who", "world");
/// encoder.msg("hello");
/// encoder.finish();
///
/// let line = String::from_utf8(encoder.as_bytes().to_vec()).unwrap();
/// assert!(line.ends_with(" info n=42 who=world msg=hello\n"));
/// ```
pub struct Encoder {
    format: OutputFormat,
    buf: Vec<u8>,
    level: Level,
    now: DateTime<Local>,
    omit_empty: bool,
    time_format: TimeFormat,
    marshal: MarshalFn,
    // reused for `fmt`/`time` output that needs escaping afterwards
    scratch: String,
}

macro_rules! scalar_fields {
    ($($scalar:ident, $seq:ident: $t:ty;)*) => {
        $(
            #[doc = concat!("Append a `", stringify!($t), "` field")]
            pub fn $scalar(&mut self, key: &str, value: $t) {
                self.key(key);
                value.append_to(&mut self.buf);
            }

            #[doc = concat!("Append a `", stringify!($t), "` sequence field")]
            pub fn $seq<'s>(&mut self, key: &str, values: impl Into<Seq<'s, $t>>) {
                let values = values.into();
                if self.skip_empty(values.is_empty()) {
                    return;
                }
                self.key(key);
                append_seq(&mut self.buf, values);
            }
        )*
    };
}

impl Encoder {
    /// Create an empty encoder using the default marshal function
    pub fn new(format: OutputFormat) -> Self {
        Self::with_marshal(format, default_marshal())
    }

    pub fn with_marshal(format: OutputFormat, marshal: MarshalFn) -> Self {
        Self {
            format,
            buf: Vec::with_capacity(INITIAL_CAPACITY),
            level: Level::Info,
            now: Local::now(),
            omit_empty: true,
            time_format: TimeFormat::default(),
            marshal,
            scratch: String::new(),
        }
    }

    /// Reset the buffer, keeping its capacity, and write the record header
    pub fn begin(
        &mut self,
        level: Level,
        now: DateTime<Local>,
        omit_empty: bool,
        time_format: TimeFormat,
    ) {
        self.level = level;
        self.now = now;
        self.omit_empty = omit_empty;
        self.time_format = time_format;
        self.buf.clear();
        self.format
            .open_record(&mut self.buf, level, &self.now, time_format);
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Creation time of the record, used by sinks for rotation
    #[inline]
    pub fn now(&self) -> &DateTime<Local> {
        &self.now
    }

    #[inline]
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    #[inline]
    pub fn omit_empty(&self) -> bool {
        self.omit_empty
    }

    #[inline]
    pub fn time_format(&self) -> TimeFormat {
        self.time_format
    }

    /// Bytes written so far
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Toggle empty-value suppression for the rest of the record
    pub fn set_omit_empty(&mut self, omit_empty: bool) {
        self.omit_empty = omit_empty;
    }

    #[inline]
    fn skip_empty(&self, empty: bool) -> bool {
        self.omit_empty && empty
    }

    #[inline]
    fn key(&mut self, key: &str) {
        self.format.append_key(&mut self.buf, key);
    }

    pub fn str(&mut self, key: &str, value: &str) {
        self.str_bytes(key, value.as_bytes());
    }

    /// String field from raw bytes; invalid UTF-8 is replaced with U+FFFD
    pub fn str_bytes(&mut self, key: &str, value: &[u8]) {
        if self.skip_empty(value.is_empty()) {
            return;
        }
        self.key(key);
        self.format.append_str_value(&mut self.buf, value);
    }

    /// String field copied without escaping. Both `key` and `value` must be
    /// free of control characters, quotes and backslashes.
    pub fn fast_str(&mut self, key: &str, value: &str) {
        if self.skip_empty(value.is_empty()) {
            return;
        }
        self.format.append_fast_key(&mut self.buf, key);
        self.format
            .append_fast_str_value(&mut self.buf, value.as_bytes());
    }

    pub fn strs<'s, S: AsRef<str> + 's>(&mut self, key: &str, values: impl Into<Seq<'s, S>>) {
        let values = values.into();
        if self.skip_empty(values.is_empty()) {
            return;
        }
        self.key(key);
        append_str_seq(&mut self.buf, values);
    }

    scalar_fields! {
        bool, bools: bool;
        int8, ints8: i8;
        int16, ints16: i16;
        int32, ints32: i32;
        int64, ints64: i64;
        int, ints: isize;
        uint8, uints8: u8;
        uint16, uints16: u16;
        uint32, uints32: u32;
        uint64, uints64: u64;
        uint, uints: usize;
        float32, floats32: f32;
        float64, floats64: f64;
    }

    /// Formatted text field, the result of `format_args!`
    pub fn fmt(&mut self, key: &str, args: fmt::Arguments<'_>) {
        if let Some(literal) = args.as_str() {
            self.str(key, literal);
            return;
        }
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        // a failing Display impl keeps whatever it wrote before failing
        let _ = scratch.write_fmt(args);
        self.str(key, &scratch);
        self.scratch = scratch;
    }

    /// Pre-encoded JSON copied verbatim; nil or empty input renders `null`
    pub fn raw_json<'s>(&mut self, key: &str, json: impl Into<Seq<'s, u8>>) {
        let json = json.into();
        if self.skip_empty(json.is_empty()) {
            return;
        }
        self.key(key);
        match json.as_slice() {
            Some(bytes) if !bytes.is_empty() => self.buf.extend_from_slice(bytes),
            _ => self.buf.extend_from_slice(b"null"),
        }
    }

    /// Name of the type of `value`
    pub fn type_of<T: ?Sized>(&mut self, key: &str, _value: &T) {
        self.str(key, std::any::type_name::<T>());
    }

    /// Timestamp rendered with a strftime `format`
    pub fn time<Tz>(&mut self, key: &str, time: &DateTime<Tz>, format: &str)
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        if write!(scratch, "{}", time.format(format)).is_err() {
            scratch.clear();
            scratch.push_str("invalid time format: ");
            scratch.push_str(format);
        }
        self.key(key);
        self.format
            .append_str_value(&mut self.buf, scratch.as_bytes());
        self.scratch = scratch;
    }

    /// Any serializable value, rendered through the marshal function. A
    /// failure is recorded in the field instead of the value.
    pub fn any<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let marshaled = serde_json::to_value(value)
            .map_err(MarshalError::from)
            .and_then(|value| (self.marshal)(&value));
        match marshaled {
            Ok(bytes) => {
                self.key(key);
                self.buf.extend_from_slice(&bytes);
            }
            Err(e) => {
                let message = format!("marshaling error: {}", e);
                self.str(key, &message);
            }
        }
    }

    /// Add the `msg` field when `text` is not empty
    pub fn msg(&mut self, text: &str) {
        if !text.is_empty() {
            self.str("msg", text);
        }
    }

    /// Add a formatted `msg` field, subject to omit-empty
    pub fn msgf(&mut self, args: fmt::Arguments<'_>) {
        self.fmt("msg", args);
    }

    /// Append the closing syntax and line terminator
    pub fn finish(&mut self) {
        self.format.close_record(&mut self.buf);
    }
}

impl fmt::Debug for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("now", &self.now)
            .field("omit_empty", &self.omit_empty)
            .field("time_format", &self.time_format)
            .field("len", &self.buf.len())
            .field("capacity", &self.buf.capacity())
            .finish_non_exhaustive()
    }
}
