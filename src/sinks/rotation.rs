//! Date-rotated log files shared by the file sinks
//!
//! A [`RotatingFile`] owns at most one open descriptor. In daily mode the
//! record's local date picks the file; when it differs from the open file's
//! date the old file is closed before the new one is opened. Append mode keeps
//! one file for the sink's lifetime.

use crate::core::{FileSinkConfig, FileStoreMode, Level, LoggerError, Result};
use chrono::{DateTime, Local, NaiveDate};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Run an I/O operation again for as long as it is interrupted by a signal
pub(crate) fn retry_interrupted<T>(mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    loop {
        match op() {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    retry_interrupted(|| OpenOptions::new().create(true).append(true).open(path))
}

/// Write all of `bytes`, returning how many were written
fn write_all_counted(file: &mut File, bytes: &[u8]) -> io::Result<usize> {
    let mut written = 0;
    while written < bytes.len() {
        match retry_interrupted(|| file.write(&bytes[written..]))? {
            0 => return Err(io::Error::new(io::ErrorKind::WriteZero, "failed to write log record")),
            n => written += n,
        }
    }
    Ok(written)
}

/// Create the log directory, failing construction when it cannot exist
pub(crate) fn create_log_dir(dir: &Path) -> Result<()> {
    retry_interrupted(|| fs::create_dir_all(dir)).map_err(|e| {
        LoggerError::io_operation(
            "create log directory",
            format!("Failed to create directory '{}'", dir.display()),
            e,
        )
    })
}

/// File names of one rotating stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileNaming {
    prefix: Option<String>,
    level: Option<Level>,
}

impl FileNaming {
    /// The stream carrying every level
    pub(crate) fn mixed(prefix: Option<String>) -> Self {
        Self { prefix, level: None }
    }

    /// The stream of a single level
    pub(crate) fn level(prefix: Option<String>, level: Level) -> Self {
        Self {
            prefix,
            level: Some(level),
        }
    }

    /// `<prefix->?<level->?YYYY-MM-DD.log`
    pub(crate) fn daily(&self, date: NaiveDate) -> String {
        let mut name = String::new();
        if let Some(prefix) = &self.prefix {
            name.push_str(prefix);
            name.push('-');
        }
        if let Some(level) = self.level {
            name.push_str(level.as_str());
            name.push('-');
        }
        name.push_str(&date.format("%Y-%m-%d").to_string());
        name.push_str(".log");
        name
    }

    /// `<prefix->?<level>.log`, or `<prefix>.log` / `tlog.log` without a level
    pub(crate) fn append(&self) -> String {
        match (&self.prefix, self.level) {
            (Some(prefix), Some(level)) => format!("{}-{}.log", prefix, level),
            (None, Some(level)) => format!("{}.log", level),
            (Some(prefix), None) => format!("{}.log", prefix),
            (None, None) => "tlog.log".to_string(),
        }
    }
}

#[derive(Debug)]
struct OpenFile {
    file: File,
    path: PathBuf,
    // `None` in append mode
    date: Option<NaiveDate>,
}

/// One rotating log stream behind its own lock
#[derive(Debug)]
pub(crate) struct RotatingFile {
    dir: PathBuf,
    naming: FileNaming,
    mode: FileStoreMode,
    compress_rotated: bool,
    current: Mutex<Option<OpenFile>>,
}

impl RotatingFile {
    pub(crate) fn new(config: &FileSinkConfig, naming: FileNaming) -> Self {
        Self {
            dir: config.dir.clone(),
            naming,
            mode: config.mode,
            compress_rotated: config.compress_rotated,
            current: Mutex::new(None),
        }
    }

    /// Open the append-mode file now instead of on the first write
    pub(crate) fn open_now(&self) -> Result<()> {
        let mut current = self.current.lock();
        if current.is_none() {
            let open = self.open_append_file().map_err(|e| {
                LoggerError::io_operation(
                    "open log file",
                    format!("Failed to open '{}'", self.dir.join(self.naming.append()).display()),
                    e,
                )
            })?;
            *current = Some(open);
        }
        Ok(())
    }

    fn open_append_file(&self) -> io::Result<OpenFile> {
        let path = self.dir.join(self.naming.append());
        let file = open_append(&path)?;
        Ok(OpenFile {
            file,
            path,
            date: None,
        })
    }

    pub(crate) fn write(&self, now: &DateTime<Local>, bytes: &[u8]) -> Result<usize> {
        let mut current = self.current.lock();
        match self.mode {
            FileStoreMode::DailySplit => self.rotate_to(&mut current, now.date_naive())?,
            FileStoreMode::AppendOneFile => {
                if current.is_none() {
                    *current = Some(self.open_append_file()?);
                }
            }
        }
        let open = current
            .as_mut()
            .ok_or_else(|| LoggerError::other("log file is not open"))?;
        Ok(write_all_counted(&mut open.file, bytes)?)
    }

    /// Make `current` the file of `date`, closing any other file first
    fn rotate_to(&self, current: &mut Option<OpenFile>, date: NaiveDate) -> Result<()> {
        if current.as_ref().map_or(false, |open| open.date == Some(date)) {
            return Ok(());
        }

        if let Some(old) = current.take() {
            let OpenFile {
                file,
                path,
                date: old_date,
            } = old;
            drop(file);
            // records stamped with an earlier date reopen the old file; only
            // a forward move retires it
            if self.compress_rotated && old_date.map_or(false, |d| d < date) {
                compress_rotated_file(&path);
            }
        }

        let path = self.dir.join(self.naming.daily(date));
        let file = open_append(&path)?;
        *current = Some(OpenFile {
            file,
            path,
            date: Some(date),
        });
        Ok(())
    }

    pub(crate) fn flush(&self) -> Result<()> {
        if let Some(open) = self.current.lock().as_mut() {
            retry_interrupted(|| open.file.flush())?;
        }
        Ok(())
    }

    /// Path of the currently open file, if any
    pub(crate) fn current_path(&self) -> Option<PathBuf> {
        self.current.lock().as_ref().map(|open| open.path.clone())
    }
}

fn compress_rotated_file(path: &Path) {
    if let Err(e) = compress_file(path) {
        eprintln!("[WARN] Failed to compress rotated log file {}: {}", path.display(), e);
    }
}

/// Gzip `path` into `path.gz` and remove the original
///
/// An existing archive gets a new gzip member appended, which gzip readers
/// decode as one concatenated stream. The original is only removed once the
/// archive is complete.
pub(crate) fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, BufWriter};

    let mut gz_name = path.as_os_str().to_owned();
    gz_name.push(".gz");
    let gz_path = PathBuf::from(gz_name);

    let input = retry_interrupted(|| File::open(path)).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = open_append(&gz_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open archive: {}", gz_path.display()),
            e,
        )
    })?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    io::copy(&mut reader, &mut encoder).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        )
    })?;
    let mut output = encoder.finish().map_err(|e| {
        LoggerError::io_operation("compress log file", "Failed to finish compression", e)
    })?;
    output.flush().map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to flush archive: {}", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[WARN] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }
    Ok(())
}
