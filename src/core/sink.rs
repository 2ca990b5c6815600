//! Sink trait for record destinations

use super::{error::Result, log_level::Level};
use chrono::{DateTime, Local};
use std::sync::Arc;

/// Destination of finished records
///
/// `write` receives one complete line (terminator included) together with
/// the record's level and creation time, which sinks use for routing and
/// rotation. Implementations serialise concurrent writes themselves.
///
/// # Example
///
/// ```
/// use fieldlog::{Level, Result, Sink};
/// use chrono::{DateTime, Local};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// struct CountingSink(AtomicUsize);
///
/// impl Sink for CountingSink {
///     fn write(&self, _level: Level, _now: &DateTime<Local>, bytes: &[u8]) -> Result<usize> {
///         self.0.fetch_add(bytes.len(), Ordering::Relaxed);
///         Ok(bytes.len())
///     }
///
///     fn name(&self) -> &str {
///         "counting"
///     }
/// }
/// ```
pub trait Sink: Send + Sync {
    /// Write one record, returning the number of bytes accepted
    fn write(&self, level: Level, now: &DateTime<Local>, bytes: &[u8]) -> Result<usize>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn write(&self, level: Level, now: &DateTime<Local>, bytes: &[u8]) -> Result<usize> {
        (**self).write(level, now, bytes)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&self, level: Level, now: &DateTime<Local>, bytes: &[u8]) -> Result<usize> {
        (**self).write(level, now, bytes)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
