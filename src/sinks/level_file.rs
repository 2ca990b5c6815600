//! Per-level file sink implementation

use super::rotation::{create_log_dir, FileNaming, RotatingFile};
use crate::core::{FileSinkConfig, Level, Result, Sink};
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Routes each record to the file stream of its level
///
/// Every level has its own lock and rotation state, so writers of different
/// levels never contend. Files are named `<prefix->?<level>-YYYY-MM-DD.log`
/// in daily mode and `<prefix->?<level>.log` in append mode, and are opened
/// on the first record of their level.
#[derive(Debug)]
pub struct LevelFileSink {
    // indexed by `Level::index`
    files: [RotatingFile; 6],
    config: FileSinkConfig,
}

impl LevelFileSink {
    /// Create the directory; files are opened lazily
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the directory cannot
    /// be created
    pub fn new(config: FileSinkConfig) -> Result<Self> {
        config.validate()?;
        create_log_dir(&config.dir)?;

        let files = Level::ALL
            .map(|level| RotatingFile::new(&config, FileNaming::level(config.prefix.clone(), level)));
        Ok(Self { files, config })
    }

    pub fn config(&self) -> &FileSinkConfig {
        &self.config
    }

    /// Path of the file currently open for `level`
    #[must_use]
    pub fn current_path(&self, level: Level) -> Option<PathBuf> {
        self.files[level.index()].current_path()
    }
}

impl Sink for LevelFileSink {
    fn write(&self, level: Level, now: &DateTime<Local>, bytes: &[u8]) -> Result<usize> {
        self.files[level.index()].write(now, bytes)
    }

    fn flush(&self) -> Result<()> {
        for file in &self.files {
            file.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "level_file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FileStoreMode;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_routes_by_level() {
        let dir = tempdir().unwrap();
        let sink = LevelFileSink::new(FileSinkConfig::new(dir.path()).with_prefix("app")).unwrap();
        let now = Local.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();

        sink.write(Level::Info, &now, b"i1\n").unwrap();
        sink.write(Level::Error, &now, b"e1\n").unwrap();
        sink.write(Level::Info, &now, b"i2\n").unwrap();

        let info = fs::read_to_string(dir.path().join("app-info-2024-05-01.log")).unwrap();
        let error = fs::read_to_string(dir.path().join("app-error-2024-05-01.log")).unwrap();
        assert_eq!(info, "i1\ni2\n");
        assert_eq!(error, "e1\n");
        assert!(sink.current_path(Level::Debug).is_none());
    }

    #[test]
    fn test_levels_rotate_independently() {
        let dir = tempdir().unwrap();
        let sink = LevelFileSink::new(FileSinkConfig::new(dir.path())).unwrap();
        let day1 = Local.with_ymd_and_hms(2024, 5, 1, 23, 0, 0).unwrap();
        let day2 = Local.with_ymd_and_hms(2024, 5, 2, 1, 0, 0).unwrap();

        sink.write(Level::Warn, &day1, b"w\n").unwrap();
        sink.write(Level::Debug, &day2, b"d\n").unwrap();

        assert_eq!(
            sink.current_path(Level::Warn),
            Some(dir.path().join("warn-2024-05-01.log"))
        );
        assert_eq!(
            sink.current_path(Level::Debug),
            Some(dir.path().join("debug-2024-05-02.log"))
        );
    }

    #[test]
    fn test_append_mode_names() {
        let dir = tempdir().unwrap();
        let config = FileSinkConfig::new(dir.path()).with_mode(FileStoreMode::AppendOneFile);
        let sink = LevelFileSink::new(config).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

        for level in Level::ALL {
            sink.write(level, &Local::now(), b"x\n").unwrap();
        }
        for level in Level::ALL {
            assert!(dir.path().join(format!("{}.log", level)).exists());
        }
        sink.flush().unwrap();
    }
}
