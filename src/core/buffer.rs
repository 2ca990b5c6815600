//! Primitive appenders that render values straight into a byte buffer
//!
//! Nothing here allocates beyond growing the target `Vec<u8>`. All string
//! output is JSON-escaped; the record framing (braces, keys, separators) lives
//! in [`crate::core::output_format`].

use std::io::Write;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// `true` for bytes that can be copied into a JSON string unchanged
static NO_ESCAPE: [bool; 256] = build_no_escape_table();

const fn build_no_escape_table() -> [bool; 256] {
    let mut table = [false; 256];
    let mut i = 0x20;
    while i <= 0x7e {
        table[i] = i != b'"' as usize && i != b'\\' as usize;
        i += 1;
    }
    table
}

/// Whether `b` needs no escaping inside a JSON string
#[inline]
pub(crate) fn is_clean(b: u8) -> bool {
    NO_ESCAPE[b as usize]
}

/// Append `s` with JSON string escaping, without the surrounding quotes.
///
/// The common case of a string with nothing to escape is a single bulk copy.
/// Once an unclean byte is found the rest of the input is escaped run by run.
pub fn append_escaped(buf: &mut Vec<u8>, s: &[u8]) {
    for (i, &b) in s.iter().enumerate() {
        if !is_clean(b) {
            append_escaped_slow(buf, s, i);
            return;
        }
    }
    buf.extend_from_slice(s);
}

/// Append `s` verbatim. The caller guarantees it contains nothing to escape.
#[inline]
pub fn append_fast(buf: &mut Vec<u8>, s: &[u8]) {
    buf.extend_from_slice(s);
}

fn append_escaped_slow(buf: &mut Vec<u8>, s: &[u8], mut i: usize) {
    let mut start = 0;
    while i < s.len() {
        let b = s[i];
        if b >= 0x80 {
            match utf8_sequence_len(&s[i..]) {
                Some(size) => {
                    i += size;
                }
                None => {
                    buf.extend_from_slice(&s[start..i]);
                    buf.extend_from_slice(b"\\ufffd");
                    i += 1;
                    start = i;
                }
            }
            continue;
        }
        if is_clean(b) {
            i += 1;
            continue;
        }

        buf.extend_from_slice(&s[start..i]);
        match b {
            b'"' | b'\\' => buf.extend_from_slice(&[b'\\', b]),
            0x08 => buf.extend_from_slice(b"\\b"),
            0x0c => buf.extend_from_slice(b"\\f"),
            b'\n' => buf.extend_from_slice(b"\\n"),
            b'\r' => buf.extend_from_slice(b"\\r"),
            b'\t' => buf.extend_from_slice(b"\\t"),
            _ => buf.extend_from_slice(&[
                b'\\',
                b'u',
                b'0',
                b'0',
                HEX[(b >> 4) as usize],
                HEX[(b & 0xf) as usize],
            ]),
        }
        i += 1;
        start = i;
    }
    buf.extend_from_slice(&s[start..]);
}

/// Length of the UTF-8 sequence at the start of `rest`, or `None` when the
/// leading bytes are not a valid encoding.
fn utf8_sequence_len(rest: &[u8]) -> Option<usize> {
    let chunk = &rest[..rest.len().min(4)];
    let valid = match std::str::from_utf8(chunk) {
        Ok(s) => s,
        Err(e) => std::str::from_utf8(&chunk[..e.valid_up_to()]).unwrap_or_default(),
    };
    valid.chars().next().map(char::len_utf8)
}

/// Append `v` as a two-digit, zero-padded decimal. `v` must be below 100.
#[inline]
pub(crate) fn append_two_digits(buf: &mut Vec<u8>, v: u32) {
    buf.push(b'0' + (v / 10) as u8);
    buf.push(b'0' + (v % 10) as u8);
}

/// Append `v` zero-padded to at least `width` digits
pub(crate) fn append_padded(buf: &mut Vec<u8>, mut v: u32, width: usize) {
    let mut digits = [b'0'; 10];
    let mut pos = digits.len();
    while v >= 10 || digits.len() - pos + 1 < width {
        pos -= 1;
        digits[pos] = b'0' + (v % 10) as u8;
        v /= 10;
    }
    pos -= 1;
    digits[pos] = b'0' + v as u8;
    buf.extend_from_slice(&digits[pos..]);
}

/// Append a float, mapping non-finite values to quoted sentinels
pub fn append_f64(buf: &mut Vec<u8>, v: f64) {
    if v.is_nan() {
        buf.extend_from_slice(b"\"NaN\"");
    } else if v == f64::INFINITY {
        buf.extend_from_slice(b"\"+Inf\"");
    } else if v == f64::NEG_INFINITY {
        buf.extend_from_slice(b"\"-Inf\"");
    } else {
        // Display gives the shortest round-trip digits and never an exponent
        let _ = write!(buf, "{}", v);
    }
}

/// Same as [`append_f64`] at `f32` precision
pub fn append_f32(buf: &mut Vec<u8>, v: f32) {
    if v.is_nan() {
        buf.extend_from_slice(b"\"NaN\"");
    } else if v == f32::INFINITY {
        buf.extend_from_slice(b"\"+Inf\"");
    } else if v == f32::NEG_INFINITY {
        buf.extend_from_slice(b"\"-Inf\"");
    } else {
        let _ = write!(buf, "{}", v);
    }
}

/// A value that renders itself as one JSON scalar
pub trait Primitive {
    fn append_to(&self, buf: &mut Vec<u8>);
}

macro_rules! impl_integer_primitive {
    ($($t:ty),*) => {
        $(
            impl Primitive for $t {
                #[inline]
                fn append_to(&self, buf: &mut Vec<u8>) {
                    let _ = write!(buf, "{}", self);
                }
            }
        )*
    };
}

impl_integer_primitive!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Primitive for bool {
    #[inline]
    fn append_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(if *self { b"true" } else { b"false" });
    }
}

impl Primitive for f32 {
    #[inline]
    fn append_to(&self, buf: &mut Vec<u8>) {
        append_f32(buf, *self);
    }
}

impl Primitive for f64 {
    #[inline]
    fn append_to(&self, buf: &mut Vec<u8>) {
        append_f64(buf, *self);
    }
}

/// Quoted, escaped JSON string
pub(crate) struct Quoted<'a>(pub &'a [u8]);

impl Primitive for Quoted<'_> {
    fn append_to(&self, buf: &mut Vec<u8>) {
        buf.push(b'"');
        append_escaped(buf, self.0);
        buf.push(b'"');
    }
}

/// A possibly-nil sequence of field values.
///
/// `None` is the nil sequence and renders as `null`; an empty slice renders
/// as `[]`.
///
/// # Examples
///
/// ```
/// use fieldlog::Seq;
///
/// let nil: Seq<'_, i32> = Seq::nil();
/// let empty: Seq<'_, i32> = Seq::from(&[][..]);
/// assert!(nil.is_nil());
/// assert!(!empty.is_nil());
/// assert!(nil.is_empty() && empty.is_empty());
/// ```
#[derive(Debug)]
pub struct Seq<'a, T>(Option<&'a [T]>);

impl<'a, T> Seq<'a, T> {
    pub const fn nil() -> Self {
        Seq(None)
    }

    pub const fn is_nil(&self) -> bool {
        self.0.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.0.map_or(true, <[T]>::is_empty)
    }

    pub const fn as_slice(&self) -> Option<&'a [T]> {
        self.0
    }
}

impl<T> Clone for Seq<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Seq<'_, T> {}

impl<'a, T> From<&'a [T]> for Seq<'a, T> {
    fn from(v: &'a [T]) -> Self {
        Seq(Some(v))
    }
}

impl<'a, T> From<&'a Vec<T>> for Seq<'a, T> {
    fn from(v: &'a Vec<T>) -> Self {
        Seq(Some(v.as_slice()))
    }
}

impl<'a, T, const N: usize> From<&'a [T; N]> for Seq<'a, T> {
    fn from(v: &'a [T; N]) -> Self {
        Seq(Some(v.as_slice()))
    }
}

impl<'a, T> From<Option<&'a [T]>> for Seq<'a, T> {
    fn from(v: Option<&'a [T]>) -> Self {
        Seq(v)
    }
}

impl<'a, T> From<Option<&'a Vec<T>>> for Seq<'a, T> {
    fn from(v: Option<&'a Vec<T>>) -> Self {
        Seq(v.map(Vec::as_slice))
    }
}

/// Append a bracketed, comma-joined list, `[]` when empty or `null` when nil
pub fn append_seq<T: Primitive>(buf: &mut Vec<u8>, vals: Seq<'_, T>) {
    append_seq_with(buf, vals, |buf, v| v.append_to(buf));
}

/// Like [`append_seq`] for strings, each element quoted and escaped
pub fn append_str_seq<S: AsRef<str>>(buf: &mut Vec<u8>, vals: Seq<'_, S>) {
    append_seq_with(buf, vals, |buf, v| Quoted(v.as_ref().as_bytes()).append_to(buf));
}

fn append_seq_with<T>(buf: &mut Vec<u8>, vals: Seq<'_, T>, mut each: impl FnMut(&mut Vec<u8>, &T)) {
    let Some(vals) = vals.as_slice() else {
        buf.extend_from_slice(b"null");
        return;
    };
    buf.push(b'[');
    for (i, v) in vals.iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        each(buf, v);
    }
    buf.push(b']');
}
