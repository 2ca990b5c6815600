//! Fluent record handle
//!
//! A [`Record`] is returned by [`Logger::debug`](crate::Logger::debug) and
//! friends. Field methods take and return it by value so calls chain; a
//! terminal method (`msg`, `msgf`, `go` or `send`) consumes it and hands the
//! finished line to the sink. Every method on [`Record::Disabled`] is a no-op.

use super::buffer::Seq;
use super::encoder::Encoder;
use super::error::Result;
use super::log_level::Level;
use super::logger::Shared;
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// One log record under construction
///
/// # Example
///
/// ```
/// use fieldlog::{Logger, MemorySink};
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder().sink(sink.clone()).build().unwrap();
///
/// logger
///     .info()
///     .str("user", "cuisw")
///     .int64("age", 18)
///     .strs("tags", &["a", "b"])
///     .msg("signed in");
///
/// let line = sink.lines().pop().unwrap();
/// assert!(line.ends_with(r#""user":"cuisw","age":18,"tags":["a","b"],"msg":"signed in"}"#));
/// ```
#[must_use = "a record is only written by msg, msgf, go or send"]
pub enum Record<'a> {
    Active(ActiveRecord<'a>),

    /// The level is outside the logger's mask
    Disabled,
}

/// An enabled record: a pooled encoder plus the logger that dispatches it
pub struct ActiveRecord<'a> {
    // `None` only after dispatch took it
    encoder: Option<Box<Encoder>>,
    shared: &'a Shared,
}

impl<'a> ActiveRecord<'a> {
    pub(crate) fn new(encoder: Box<Encoder>, shared: &'a Shared) -> Self {
        Self {
            encoder: Some(encoder),
            shared,
        }
    }

    fn dispatch(mut self, message: &str, report: bool) -> Result<usize> {
        match self.encoder.take() {
            Some(encoder) => self.shared.dispatch(encoder, message, report),
            None => Ok(0),
        }
    }
}

impl Drop for ActiveRecord<'_> {
    fn drop(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            self.shared.pool().release(encoder);
        }
    }
}

impl fmt::Debug for ActiveRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveRecord")
            .field("encoder", &self.encoder)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Active(active) => f.debug_tuple("Active").field(active).finish(),
            Record::Disabled => f.write_str("Disabled"),
        }
    }
}

macro_rules! record_scalar_fields {
    ($($scalar:ident, $seq:ident: $t:ty;)*) => {
        $(
            #[doc = concat!("Append a `", stringify!($t), "` field")]
            pub fn $scalar(self, key: &str, value: $t) -> Self {
                self.apply(|e| e.$scalar(key, value))
            }

            #[doc = concat!("Append a `", stringify!($t), "` sequence field")]
            pub fn $seq<'s>(self, key: &str, values: impl Into<Seq<'s, $t>>) -> Self {
                let values = values.into();
                self.apply(|e| e.$seq(key, values))
            }
        )*
    };
}

impl<'a> Record<'a> {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Record::Active(_))
    }

    /// Level of an enabled record
    pub fn level(&self) -> Option<Level> {
        self.encoder().map(Encoder::level)
    }

    /// Bytes rendered so far, `None` when disabled
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.encoder().map(Encoder::as_bytes)
    }

    fn encoder(&self) -> Option<&Encoder> {
        match self {
            Record::Active(active) => active.encoder.as_deref(),
            Record::Disabled => None,
        }
    }

    #[inline]
    fn apply(mut self, f: impl FnOnce(&mut Encoder)) -> Self {
        if let Record::Active(active) = &mut self {
            if let Some(encoder) = active.encoder.as_deref_mut() {
                f(encoder);
            }
        }
        self
    }

    /// Toggle empty-value suppression for the fields that follow
    pub fn omit_empty(self, omit_empty: bool) -> Self {
        self.apply(|e| e.set_omit_empty(omit_empty))
    }

    pub fn str(self, key: &str, value: &str) -> Self {
        self.apply(|e| e.str(key, value))
    }

    /// String field from raw bytes; invalid UTF-8 is replaced with U+FFFD
    pub fn str_bytes(self, key: &str, value: &[u8]) -> Self {
        self.apply(|e| e.str_bytes(key, value))
    }

    /// String field copied without escaping; see [`Encoder::fast_str`]
    pub fn fast_str(self, key: &str, value: &str) -> Self {
        self.apply(|e| e.fast_str(key, value))
    }

    pub fn strs<'s, S: AsRef<str> + 's>(self, key: &str, values: impl Into<Seq<'s, S>>) -> Self {
        let values = values.into();
        self.apply(|e| e.strs(key, values))
    }

    record_scalar_fields! {
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

    /// Formatted text field, e.g. `.fmt("addr", format_args!("{}:{}", host, port))`
    pub fn fmt(self, key: &str, args: fmt::Arguments<'_>) -> Self {
        self.apply(|e| e.fmt(key, args))
    }

    /// Pre-encoded JSON copied verbatim
    pub fn raw_json<'s>(self, key: &str, json: impl Into<Seq<'s, u8>>) -> Self {
        let json = json.into();
        self.apply(|e| e.raw_json(key, json))
    }

    pub fn type_of<T: ?Sized>(self, key: &str, value: &T) -> Self {
        self.apply(|e| e.type_of(key, value))
    }

    /// Timestamp field rendered with a strftime `format`
    pub fn time<Tz>(self, key: &str, time: &DateTime<Tz>, format: &str) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.apply(|e| e.time(key, time, format))
    }

    /// Any serializable value, rendered by the logger's marshal function
    pub fn any<T: Serialize + ?Sized>(self, key: &str, value: &T) -> Self {
        self.apply(|e| e.any(key, value))
    }

    /// Add `msg` (when `text` is not empty) and write the record
    pub fn msg(self, text: &str) {
        if let Record::Active(active) = self.apply(|e| e.msg(text)) {
            let _ = active.dispatch(text, true);
        }
    }

    /// Add a formatted `msg` and write the record
    ///
    /// `args` is formatted exactly once. Fatal and Panic records keep the
    /// rendered text for their level action.
    pub fn msgf(self, args: fmt::Arguments<'_>) {
        let needs_text = matches!(self.level(), Some(Level::Fatal | Level::Panic));
        if !needs_text {
            if let Record::Active(active) = self.apply(|e| e.msgf(args)) {
                let _ = active.dispatch("", true);
            }
            return;
        }

        let text: Cow<'_, str> = match args.as_str() {
            Some(literal) => Cow::Borrowed(literal),
            None => Cow::Owned(args.to_string()),
        };
        if let Record::Active(active) = self.apply(|e| e.str("msg", &text)) {
            let _ = active.dispatch(&text, true);
        }
    }

    /// Write the record without a message
    pub fn go(self) {
        if let Record::Active(active) = self {
            let _ = active.dispatch("", true);
        }
    }

    /// Write the record without a message and return the sink's outcome.
    /// Errors go to the caller instead of the logger's write-error hook.
    pub fn send(self) -> Result<usize> {
        match self {
            Record::Active(active) => active.dispatch("", false),
            Record::Disabled => Ok(0),
        }
    }
}
