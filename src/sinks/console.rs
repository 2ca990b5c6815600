//! Console sink implementation

use crate::core::{Level, Result, Sink};
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::io::{self, Write};

/// Writes every record to one stream, stdout unless configured otherwise
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
    name: &'static str,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::named(Box::new(io::stdout()), "console")
    }

    pub fn stderr() -> Self {
        Self::named(Box::new(io::stderr()), "console:stderr")
    }

    /// Write to an arbitrary stream, e.g. a pipe or a `Vec<u8>` in tests
    ///
    /// # Example
    ///
    /// ```
    /// use fieldlog::{ConsoleSink, Level, Sink};
    /// use chrono::Local;
    ///
    /// let sink = ConsoleSink::with_writer(std::io::sink());
    /// assert_eq!(sink.write(Level::Info, &Local::now(), b"line\n").unwrap(), 5);
    /// ```
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self::named(Box::new(writer), "console:writer")
    }

    fn named(out: Box<dyn Write + Send>, name: &'static str) -> Self {
        Self {
            out: Mutex::new(out),
            name,
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Sink for ConsoleSink {
    fn write(&self, _level: Level, _now: &DateTime<Local>, bytes: &[u8]) -> Result<usize> {
        // one lock per record keeps lines from interleaving
        let mut out = self.out.lock();
        out.write_all(bytes)?;
        Ok(bytes.len())
    }

    fn flush(&self) -> Result<()> {
        self.out.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        self.name
    }
}
