//! Single-file sink implementation

use super::rotation::{create_log_dir, FileNaming, RotatingFile};
use crate::core::{FileSinkConfig, FileStoreMode, Level, Result, Sink};
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Writes every level to one file stream
///
/// In [`FileStoreMode::AppendOneFile`] the file is `<prefix>.log` (or
/// `tlog.log`) and is opened at construction. In
/// [`FileStoreMode::DailySplit`] each record goes to
/// `<prefix->?YYYY-MM-DD.log` for its local date, opened on first use.
///
/// # Example
///
/// ```no_run
/// use fieldlog::{FileSink, FileSinkConfig, Logger};
///
/// let sink = FileSink::new(FileSinkConfig::new("/var/log/app").with_prefix("api")).unwrap();
/// let logger = Logger::builder().sink(sink).build().unwrap();
/// logger.info().msg("started");
/// ```
#[derive(Debug)]
pub struct FileSink {
    file: RotatingFile,
    config: FileSinkConfig,
}

impl FileSink {
    /// Create the directory and, in append mode, open the file
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid, the directory cannot
    /// be created or the append-mode file cannot be opened
    pub fn new(config: FileSinkConfig) -> Result<Self> {
        config.validate()?;
        create_log_dir(&config.dir)?;

        let file = RotatingFile::new(&config, FileNaming::mixed(config.prefix.clone()));
        if config.mode == FileStoreMode::AppendOneFile {
            file.open_now()?;
        }
        Ok(Self { file, config })
    }

    pub fn config(&self) -> &FileSinkConfig {
        &self.config
    }

    /// Path of the file currently written to
    #[must_use]
    pub fn current_path(&self) -> Option<PathBuf> {
        self.file.current_path()
    }
}

impl Sink for FileSink {
    fn write(&self, _level: Level, now: &DateTime<Local>, bytes: &[u8]) -> Result<usize> {
        self.file.write(now, bytes)
    }

    fn flush(&self) -> Result<()> {
        self.file.flush()
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_append_mode_opens_at_construction() {
        let dir = tempdir().unwrap();
        let config = FileSinkConfig::new(dir.path()).with_mode(FileStoreMode::AppendOneFile);
        let sink = FileSink::new(config).unwrap();

        let path = dir.path().join("tlog.log");
        assert!(path.exists());
        assert_eq!(sink.current_path(), Some(path.clone()));

        sink.write(Level::Info, &Local::now(), b"{\"level\":\"info\"}\n").unwrap();
        sink.write(Level::Error, &Local::now(), b"{\"level\":\"error\"}\n").unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_daily_mode_opens_lazily() {
        let dir = tempdir().unwrap();
        let sink = FileSink::new(FileSinkConfig::new(dir.path()).with_prefix("svc")).unwrap();
        assert_eq!(sink.current_path(), None);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

        let now = Local.with_ymd_and_hms(2023, 7, 14, 21, 8, 20).unwrap();
        assert_eq!(sink.write(Level::Debug, &now, b"x\n").unwrap(), 2);
        assert!(dir.path().join("svc-2023-07-14.log").exists());
    }

    #[test]
    fn test_creates_nested_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        FileSink::new(FileSinkConfig::new(&nested)).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_invalid_directory_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();
        let err = FileSink::new(FileSinkConfig::new(blocker.join("logs"))).unwrap_err();
        assert!(matches!(err, crate::core::LoggerError::IoOperation { .. }));
    }

    #[test]
    fn test_invalid_config_fails() {
        let dir = tempdir().unwrap();
        let err = FileSink::new(FileSinkConfig::new(dir.path()).with_prefix("a/b")).unwrap_err();
        assert!(err.is_config());
    }
}
