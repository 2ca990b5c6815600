//! # fieldlog
//!
//! A leveled, structured event logger. A record is built through a fluent
//! field API, rendered straight into a JSON or text line and handed to a
//! sink.
//!
//! ## Features
//!
//! - **Zero intermediate representation**: fields are encoded as they are added
//! - **Pooled encoders**: record buffers are reused across calls
//! - **Sinks**: console, daily or append-mode files, one file per level, HTTP POST
//! - **Thread Safe**: a `Logger` is `Clone + Send + Sync`
//!
//! ```
//! use fieldlog::prelude::*;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder()
//!     .time_format(TimeFormat::UnixSeconds)
//!     .sink(sink.clone())
//!     .build()
//!     .unwrap();
//!
//! logger.debug().int("n", 42).msg("hello");
//! assert!(sink.lines()[0].ends_with(r#","level":"debug","n":42,"msg":"hello"}"#));
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::hooks;
    pub use crate::core::{
        FileSinkConfig, FileStoreMode, HttpSinkConfig, Level, LevelMask, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, LoggerMetrics, OutputFormat, Record, Result, Seq, Sink,
        TimeFormat,
    };
    pub use crate::sinks::MemorySink;
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    #[cfg(feature = "file")]
    pub use crate::sinks::{FileSink, LevelFileSink};
    #[cfg(feature = "http")]
    pub use crate::sinks::HttpSink;
}

pub use crate::core::hooks;
pub use crate::core::{
    default_marshal, ActiveRecord, DisabledCallback, Encoder, EncoderPool, FileSinkConfig,
    FileStoreMode, HttpSinkConfig, Level, LevelAction, LevelMask, Logger, LoggerBuilder,
    LoggerConfig, LoggerError, LoggerMetrics, MarshalError, MarshalFn, OutputFormat, PoolMetrics,
    Primitive, Record, Result, Seq, Sink, TimeFormat, WriteErrorHook, DEFAULT_POOL_CAPACITY,
    MAX_POOLED_CAPACITY,
};
pub use sinks::MemorySink;
#[cfg(feature = "console")]
pub use sinks::ConsoleSink;
#[cfg(feature = "file")]
pub use sinks::{FileSink, LevelFileSink};
#[cfg(feature = "http")]
pub use sinks::HttpSink;
