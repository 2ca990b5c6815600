//! Sink implementations

pub mod memory;

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "file")]
pub mod level_file;
#[cfg(feature = "file")]
mod rotation;

pub use memory::MemorySink;

#[cfg(feature = "console")]
pub use console::ConsoleSink;
#[cfg(feature = "file")]
pub use file::FileSink;
#[cfg(feature = "http")]
pub use http::HttpSink;
#[cfg(feature = "file")]
pub use level_file::LevelFileSink;

pub use crate::core::Sink;
