//! Encoder reuse
//!
//! A bounded channel doubles as a lock-free free list: `try_recv` takes an
//! idle encoder, `try_send` returns one. When the channel is empty a fresh
//! encoder is allocated; when it is full the returned encoder is dropped.

use super::encoder::{Encoder, MarshalFn};
use super::log_level::Level;
use super::metrics::PoolMetrics;
use super::output_format::OutputFormat;
use super::timestamp::TimeFormat;
use chrono::{DateTime, Local};
use crossbeam_channel::{bounded, Receiver, Sender};

/// Encoders whose buffer grew beyond this are not returned to the pool
pub const MAX_POOLED_CAPACITY: usize = 16 * 1024;

/// Default number of idle encoders kept per logger
pub const DEFAULT_POOL_CAPACITY: usize = 256;

/// Per-logger pool of idle encoders
///
/// # Examples
///
/// ```
/// use fieldlog::{EncoderPool, Level, OutputFormat, TimeFormat, default_marshal};
/// use chrono::Local;
///
/// let pool = EncoderPool::new(OutputFormat::Json, 4, default_marshal());
/// let encoder = pool.acquire(Level::Info, Local::now(), true, TimeFormat::UnixSeconds);
/// pool.release(encoder);
///
/// let again = pool.acquire(Level::Warn, Local::now(), true, TimeFormat::UnixSeconds);
/// assert_eq!(again.level(), Level::Warn);
/// assert_eq!(pool.metrics().hits(), 1);
/// ```
pub struct EncoderPool {
    format: OutputFormat,
    idle_tx: Sender<Box<Encoder>>,
    idle_rx: Receiver<Box<Encoder>>,
    marshal: MarshalFn,
    metrics: PoolMetrics,
}

impl EncoderPool {
    /// Create a pool holding at most `capacity` idle encoders. A capacity of
    /// zero disables reuse.
    pub fn new(format: OutputFormat, capacity: usize, marshal: MarshalFn) -> Self {
        let (idle_tx, idle_rx) = bounded(capacity);
        Self {
            format,
            idle_tx,
            idle_rx,
            marshal,
            metrics: PoolMetrics::new(),
        }
    }

    #[inline]
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Take an idle encoder, or allocate one, and write the record header
    pub fn acquire(
        &self,
        level: Level,
        now: DateTime<Local>,
        omit_empty: bool,
        time_format: TimeFormat,
    ) -> Box<Encoder> {
        let mut encoder = match self.idle_rx.try_recv() {
            Ok(encoder) => {
                self.metrics.record_hit();
                encoder
            }
            Err(_) => {
                self.metrics.record_miss();
                Box::new(Encoder::with_marshal(self.format, self.marshal.clone()))
            }
        };
        encoder.begin(level, now, omit_empty, time_format);
        encoder
    }

    /// Return an encoder for reuse, unless it grew past
    /// [`MAX_POOLED_CAPACITY`] or the pool is full
    pub fn release(&self, encoder: Box<Encoder>) {
        if encoder.capacity() > MAX_POOLED_CAPACITY {
            self.metrics.record_oversized();
            return;
        }
        if self.idle_tx.try_send(encoder).is_err() {
            self.metrics.record_overflow();
        }
    }

    /// Number of encoders currently idle in the pool
    pub fn idle(&self) -> usize {
        self.idle_rx.len()
    }

    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }
}

impl std::fmt::Debug for EncoderPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncoderPool")
            .field("format", &self.format)
            .field("idle", &self.idle())
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoder::default_marshal;

    fn pool(capacity: usize) -> EncoderPool {
        EncoderPool::new(OutputFormat::Json, capacity, default_marshal())
    }

    fn acquire(pool: &EncoderPool) -> Box<Encoder> {
        pool.acquire(Level::Info, Local::now(), true, TimeFormat::HumanReadable)
    }

    #[test]
    fn test_reused_encoder_starts_clean() {
        let pool = pool(2);
        let mut encoder = acquire(&pool);
        encoder.str("stale", "value");
        pool.release(encoder);

        let encoder = acquire(&pool);
        let text = String::from_utf8_lossy(encoder.as_bytes()).into_owned();
        assert!(!text.contains("stale"));
        assert!(text.starts_with("{\"time\":"));
        assert_eq!(pool.metrics().hits(), 1);
        assert_eq!(pool.metrics().misses(), 1);
    }

    #[test]
    fn test_oversized_encoder_is_dropped() {
        let pool = pool(2);
        let mut encoder = acquire(&pool);
        encoder.str("big", &"x".repeat(MAX_POOLED_CAPACITY + 1));
        assert!(encoder.capacity() > MAX_POOLED_CAPACITY);
        pool.release(encoder);

        assert_eq!(pool.idle(), 0);
        assert_eq!(pool.metrics().oversized(), 1);
    }

    #[test]
    fn test_encoder_at_guard_is_kept() {
        let pool = pool(2);
        let mut encoder = acquire(&pool);
        encoder.str("medium", &"x".repeat(4 * 1024));
        assert!(encoder.capacity() <= MAX_POOLED_CAPACITY);
        pool.release(encoder);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_full_pool_drops_extra_encoders() {
        let pool = pool(1);
        let a = acquire(&pool);
        let b = acquire(&pool);
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.idle(), 1);
        assert_eq!(pool.metrics().overflow(), 1);
    }

    #[test]
    fn test_zero_capacity_never_reuses() {
        let pool = pool(0);
        let encoder = acquire(&pool);
        pool.release(encoder);
        let _ = acquire(&pool);
        assert_eq!(pool.metrics().hits(), 0);
        assert_eq!(pool.metrics().misses(), 2);
    }
}
