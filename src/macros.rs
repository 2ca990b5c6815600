//! Logging macros for message-only records.
//!
//! Each macro starts a record at its level and terminates it with a formatted
//! `msg`, like `println!` does for stdout. Records that also carry fields use
//! the fluent API directly.
//!
//! # Examples
//!
//! ```
//! use fieldlog::prelude::*;
//! use fieldlog::info;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder().sink(sink.clone()).build().unwrap();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! assert!(sink.lines()[1].ends_with(r#""msg":"Server listening on port 8080"}"#));
//! ```

/// Log a formatted message at a given level.
///
/// # Examples
///
/// ```
/// # use fieldlog::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
/// use fieldlog::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.record($level).msgf(::std::format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use fieldlog::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
/// use fieldlog::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a fatal-level message, then run the logger's fatal action.
///
/// # Examples
///
/// ```
/// # use fieldlog::prelude::*;
/// let logger = Logger::builder()
///     .sink(MemorySink::new())
///     .on_fatal(hooks::ignore())
///     .build()
///     .unwrap();
///
/// use fieldlog::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}
