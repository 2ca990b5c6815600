//! Logger metrics for observability
//!
//! Counters for written and failed records plus encoder pool reuse.

use std::sync::atomic::{AtomicU64, Ordering};

/// Record-level counters for a logger
///
/// # Example
///
/// ```
/// use fieldlog::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_written(64);
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.records_written(), 1);
/// assert_eq!(metrics.bytes_written(), 64);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records handed to the sink successfully
    records_written: AtomicU64,

    /// Bytes the sink reported as written
    bytes_written: AtomicU64,

    /// Records the sink failed to write
    write_failures: AtomicU64,

    /// Records requested at a level outside the mask
    disabled_records: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            records_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            disabled_records: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn disabled_records(&self) -> u64 {
        self.disabled_records.load(Ordering::Relaxed)
    }

    /// Record a successful write of `bytes` bytes
    #[inline]
    pub fn record_written(&self, bytes: usize) {
        self.records_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_disabled(&self) -> u64 {
        self.disabled_records.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed writes as a percentage (0.0 - 100.0) of attempted writes
    ///
    /// Returns 0.0 if nothing has been written.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures() as f64;
        let total = self.records_written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.records_written.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.disabled_records.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            records_written: AtomicU64::new(self.records_written()),
            bytes_written: AtomicU64::new(self.bytes_written()),
            write_failures: AtomicU64::new(self.write_failures()),
            disabled_records: AtomicU64::new(self.disabled_records()),
        }
    }
}

/// Encoder pool counters
#[derive(Debug)]
pub struct PoolMetrics {
    /// Acquisitions served by a pooled encoder
    hits: AtomicU64,

    /// Acquisitions that allocated a new encoder
    misses: AtomicU64,

    /// Encoders discarded on release for exceeding the capacity guard
    oversized: AtomicU64,

    /// Encoders discarded on release because the pool was full
    overflow: AtomicU64,
}

impl PoolMetrics {
    pub const fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            oversized: AtomicU64::new(0),
            overflow: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn oversized(&self) -> u64 {
        self.oversized.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn overflow(&self) -> u64 {
        self.overflow.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_oversized(&self) {
        self.oversized.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_overflow(&self) {
        self.overflow.fetch_add(1, Ordering::Relaxed);
    }

    /// Share of acquisitions served from the pool (0.0 - 100.0)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 {
            0.0
        } else {
            (hits / total) * 100.0
        }
    }
}

impl Default for PoolMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PoolMetrics {
    fn clone(&self) -> Self {
        Self {
            hits: AtomicU64::new(self.hits()),
            misses: AtomicU64::new(self.misses()),
            oversized: AtomicU64::new(self.oversized()),
            overflow: AtomicU64::new(self.overflow()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.records_written(), 0);
        assert_eq!(metrics.bytes_written(), 0);
        assert_eq!(metrics.write_failures(), 0);
        assert_eq!(metrics.disabled_records(), 0);
    }

    #[test]
    fn test_record_written_counts_bytes() {
        let metrics = LoggerMetrics::new();
        metrics.record_written(10);
        metrics.record_written(32);
        assert_eq!(metrics.records_written(), 2);
        assert_eq!(metrics.bytes_written(), 42);
    }

    #[test]
    fn test_failure_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..100 {
            metrics.record_written(1);
        }
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..10 {
            metrics.record_write_failure();
        }
        let rate = metrics.failure_rate();
        assert!(rate > 9.0 && rate < 10.0, "Failure rate was {}", rate);
    }

    #[test]
    fn test_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_written(5);
        metrics.record_disabled();
        metrics.record_write_failure();

        metrics.reset();

        assert_eq!(metrics.records_written(), 0);
        assert_eq!(metrics.disabled_records(), 0);
        assert_eq!(metrics.write_failures(), 0);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let metrics = LoggerMetrics::new();
        metrics.record_disabled();

        let snapshot = metrics.clone();
        metrics.record_disabled();
        assert_eq!(metrics.disabled_records(), 2);
        assert_eq!(snapshot.disabled_records(), 1);
    }

    #[test]
    fn test_pool_hit_rate() {
        let metrics = PoolMetrics::new();
        assert_eq!(metrics.hit_rate(), 0.0);
        metrics.record_miss();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        assert_eq!(metrics.hit_rate(), 75.0);
    }
}
