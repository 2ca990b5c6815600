//! Core logger types and traits

pub mod buffer;
pub mod config;
pub mod encoder;
pub mod error;
pub mod hooks;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod pool;
pub mod record;
pub mod sink;
pub mod timestamp;

pub use buffer::{Primitive, Seq};
pub use config::{FileSinkConfig, FileStoreMode, HttpSinkConfig, LoggerConfig};
pub use encoder::{default_marshal, Encoder, MarshalError, MarshalFn};
pub use error::{LoggerError, Result};
pub use hooks::{DisabledCallback, LevelAction, WriteErrorHook};
pub use log_level::{Level, LevelMask};
pub use logger::{Logger, LoggerBuilder};
pub use metrics::{LoggerMetrics, PoolMetrics};
pub use output_format::OutputFormat;
pub use pool::{EncoderPool, DEFAULT_POOL_CAPACITY, MAX_POOLED_CAPACITY};
pub use record::{ActiveRecord, Record};
pub use sink::Sink;
pub use timestamp::TimeFormat;
