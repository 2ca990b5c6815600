//! Main logger implementation

use super::{
    config::LoggerConfig,
    encoder::{default_marshal, Encoder, MarshalFn},
    error::Result,
    hooks::{self, DisabledCallback, LevelAction, WriteErrorHook},
    log_level::{Level, LevelMask},
    metrics::{LoggerMetrics, PoolMetrics},
    output_format::OutputFormat,
    pool::EncoderPool,
    record::{ActiveRecord, Record},
    sink::Sink,
    timestamp::TimeFormat,
};
use chrono::Local;
use std::fmt;
use std::sync::Arc;

/// Leveled structured logger
///
/// Cheap to clone; clones share the pool, sink, hooks and metrics.
///
/// # Example
///
/// ```
/// use fieldlog::{Level, Logger, MemorySink};
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder()
///     .levels(Level::Info | Level::Warn | Level::Error)
///     .sink(sink.clone())
///     .build()
///     .unwrap();
///
/// logger.debug().msg("dropped");
/// logger.info().int64("n", 42).msg("hello");
///
/// assert_eq!(sink.records().len(), 1);
/// assert_eq!(logger.metrics().disabled_records(), 1);
/// ```
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
}

/// State shared by every clone of a logger and borrowed by its records
pub(crate) struct Shared {
    config: LoggerConfig,
    pool: EncoderPool,
    sink: Arc<dyn Sink>,
    metrics: LoggerMetrics,
    on_fatal: LevelAction,
    on_panic: LevelAction,
    on_disabled: Option<DisabledCallback>,
    on_write_error: Option<WriteErrorHook>,
}

impl Shared {
    #[inline]
    pub(crate) fn pool(&self) -> &EncoderPool {
        &self.pool
    }

    /// Finish the record, write it, recycle the encoder, then run the
    /// severity action. Write errors reach the hook only when `report` is set.
    pub(crate) fn dispatch(
        &self,
        mut encoder: Box<Encoder>,
        message: &str,
        report: bool,
    ) -> Result<usize> {
        encoder.finish();
        let level = encoder.level();
        let result = self.sink.write(level, encoder.now(), encoder.as_bytes());
        match &result {
            Ok(written) => self.metrics.record_written(*written),
            Err(e) => {
                self.metrics.record_write_failure();
                if report {
                    if let Some(hook) = &self.on_write_error {
                        hook(self.sink.name(), e);
                    }
                }
            }
        }
        self.pool.release(encoder);

        let action = match level {
            Level::Fatal => &self.on_fatal,
            Level::Panic => &self.on_panic,
            _ => return result,
        };
        action(level, message);
        result
    }
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Start a record at `level`. A level outside the mask notifies the
    /// disabled callback and yields [`Record::Disabled`].
    pub fn record(&self, level: Level) -> Record<'_> {
        let shared = &*self.shared;
        if !shared.config.levels.contains(level) {
            shared.metrics.record_disabled();
            if let Some(callback) = &shared.on_disabled {
                callback(level);
            }
            return Record::Disabled;
        }
        let encoder = shared.pool.acquire(
            level,
            Local::now(),
            shared.config.omit_empty,
            shared.config.time_format,
        );
        Record::Active(ActiveRecord::new(encoder, shared))
    }

    pub fn debug(&self) -> Record<'_> {
        self.record(Level::Debug)
    }

    pub fn info(&self) -> Record<'_> {
        self.record(Level::Info)
    }

    pub fn warn(&self) -> Record<'_> {
        self.record(Level::Warn)
    }

    pub fn error(&self) -> Record<'_> {
        self.record(Level::Error)
    }

    /// Start a Fatal record; the fatal action runs once it is written
    pub fn fatal(&self) -> Record<'_> {
        self.record(Level::Fatal)
    }

    /// Start a Panic record; the panic action runs once it is written
    pub fn panic(&self) -> Record<'_> {
        self.record(Level::Panic)
    }

    #[inline]
    pub fn is_enabled(&self, level: Level) -> bool {
        self.shared.config.levels.contains(level)
    }

    pub fn levels(&self) -> LevelMask {
        self.shared.config.levels
    }

    pub fn format(&self) -> OutputFormat {
        self.shared.config.format
    }

    pub fn time_format(&self) -> TimeFormat {
        self.shared.config.time_format
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.shared.config
    }

    pub fn sink_name(&self) -> &str {
        self.shared.sink.name()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    pub fn pool_metrics(&self) -> &PoolMetrics {
        self.shared.pool.metrics()
    }

    pub fn flush(&self) -> Result<()> {
        self.shared.sink.flush()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.shared.config)
            .field("sink", &self.shared.sink.name())
            .field("pool", &self.shared.pool)
            .field("metrics", &self.shared.metrics)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Logger`]
///
/// Without an explicit sink the logger writes to stdout. Fatal records exit
/// the process with status 1 and Panic records unwind, unless replaced with
/// [`LoggerBuilder::on_fatal`] / [`LoggerBuilder::on_panic`].
///
/// # Example
/// ```
/// use fieldlog::prelude::*;
///
/// let logger = Logger::builder()
///     .format(OutputFormat::Text)
///     .levels(LevelMask::at_least(Level::Info))
///     .time_format(TimeFormat::UnixMillis)
///     .sink(MemorySink::new())
///     .on_fatal(hooks::ignore())
///     .on_write_error(hooks::stderr_reporter())
///     .build()
///     .unwrap();
///
/// assert!(!logger.is_enabled(Level::Debug));
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    sink: Option<Arc<dyn Sink>>,
    marshal: Option<MarshalFn>,
    on_fatal: LevelAction,
    on_panic: LevelAction,
    on_disabled: Option<DisabledCallback>,
    on_write_error: Option<WriteErrorHook>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            sink: None,
            marshal: None,
            on_fatal: hooks::exit_process(),
            on_panic: hooks::unwind(),
            on_disabled: None,
            on_write_error: None,
        }
    }

    /// Replace every logger-wide setting at once
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn levels(mut self, levels: impl Into<LevelMask>) -> Self {
        self.config.levels = levels.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_format(mut self, time_format: TimeFormat) -> Self {
        self.config.time_format = time_format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn omit_empty(mut self, omit_empty: bool) -> Self {
        self.config.omit_empty = omit_empty;
        self
    }

    /// Number of idle encoders kept for reuse; zero disables pooling
    #[must_use = "builder methods return a new value"]
    pub fn pool_capacity(mut self, capacity: usize) -> Self {
        self.config.pool_capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Use a sink that is also held elsewhere
    #[must_use = "builder methods return a new value"]
    pub fn shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replace the function rendering `any` fields
    #[must_use = "builder methods return a new value"]
    pub fn marshal_fn(mut self, marshal: MarshalFn) -> Self {
        self.marshal = Some(marshal);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn on_fatal(mut self, action: LevelAction) -> Self {
        self.on_fatal = action;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn on_panic(mut self, action: LevelAction) -> Self {
        self.on_panic = action;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn on_disabled(mut self, callback: DisabledCallback) -> Self {
        self.on_disabled = Some(callback);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn on_write_error(mut self, hook: WriteErrorHook) -> Self {
        self.on_write_error = Some(hook);
        self
    }

    /// Validate the configuration and build the Logger
    pub fn build(self) -> Result<Logger> {
        self.config.validate()?;
        let sink = match self.sink {
            Some(sink) => sink,
            None => default_sink()?,
        };
        let marshal = self.marshal.unwrap_or_else(default_marshal);
        let pool = EncoderPool::new(self.config.format, self.config.pool_capacity, marshal);

        Ok(Logger {
            shared: Arc::new(Shared {
                config: self.config,
                pool,
                sink,
                metrics: LoggerMetrics::new(),
                on_fatal: self.on_fatal,
                on_panic: self.on_panic,
                on_disabled: self.on_disabled,
                on_write_error: self.on_write_error,
            }),
        })
    }
}

#[cfg(feature = "console")]
fn default_sink() -> Result<Arc<dyn Sink>> {
    Ok(Arc::new(crate::sinks::ConsoleSink::stdout()))
}

#[cfg(not(feature = "console"))]
fn default_sink() -> Result<Arc<dyn Sink>> {
    Err(super::error::LoggerError::config(
        "logger",
        "no sink configured and the 'console' feature is disabled",
    ))
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
