//! Callbacks the logger runs around dispatch
//!
//! The core never exits or unwinds on its own. Severity actions for Fatal and
//! Panic records are [`LevelAction`]s; the builder installs [`exit_process`]
//! and [`unwind`] unless told otherwise.

use super::error::LoggerError;
use super::log_level::Level;
use std::sync::Arc;

/// Runs after a Fatal or Panic record was written, with its message
pub type LevelAction = Arc<dyn Fn(Level, &str) + Send + Sync>;

/// Runs when a record is requested at a level outside the mask
pub type DisabledCallback = Arc<dyn Fn(Level) + Send + Sync>;

/// Runs when a sink rejects a record, with the sink name and the error
///
/// # Example
///
/// ```
/// use fieldlog::WriteErrorHook;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// let failures = Arc::new(AtomicU64::new(0));
/// let counter = Arc::clone(&failures);
/// let hook: WriteErrorHook = Arc::new(move |_sink, _err| {
///     counter.fetch_add(1, Ordering::Relaxed);
/// });
/// ```
pub type WriteErrorHook = Arc<dyn Fn(&str, &LoggerError) + Send + Sync>;

/// Exit status used by [`exit_process`]
pub const FATAL_EXIT_CODE: i32 = 1;

/// Terminate the process with [`FATAL_EXIT_CODE`]
pub fn exit_process() -> LevelAction {
    Arc::new(|_level: Level, _message: &str| std::process::exit(FATAL_EXIT_CODE))
}

/// Unwind the calling thread with the record's message as payload
pub fn unwind() -> LevelAction {
    Arc::new(|_level: Level, message: &str| {
        std::panic::panic_any(message.to_string())
    })
}

/// Do nothing; useful to keep Fatal records from ending the process
pub fn ignore() -> LevelAction {
    Arc::new(|_level: Level, _message: &str| {})
}

/// Report sink failures on stderr
pub fn stderr_reporter() -> WriteErrorHook {
    Arc::new(|sink: &str, err: &LoggerError| {
        eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", sink, err);
    })
}
