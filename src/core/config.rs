//! Logger and sink configuration
//!
//! Plain serde structs with defaults. Every constructor that consumes one
//! calls `validate` first, so invalid values are rejected instead of being
//! replaced by defaults.

use super::error::{LoggerError, Result};
use super::log_level::LevelMask;
use super::output_format::OutputFormat;
use super::pool::DEFAULT_POOL_CAPACITY;
use super::timestamp::TimeFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logger-wide settings
///
/// # Example
///
/// ```
/// use fieldlog::{Level, LoggerConfig, OutputFormat};
///
/// let config = LoggerConfig::from_json_str(
///     r#"{"format": "text", "levels": 12, "time_format": "unix_millis"}"#,
/// ).unwrap();
/// assert_eq!(config.format, OutputFormat::Text);
/// assert!(config.levels.contains(Level::Warn));
/// assert!(config.omit_empty);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub format: OutputFormat,

    /// Enabled levels
    pub levels: LevelMask,

    /// Header timestamp format
    pub time_format: TimeFormat,

    /// Initial omit-empty flag of every record
    pub omit_empty: bool,

    /// Idle encoders kept for reuse
    pub pool_capacity: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            levels: LevelMask::ALL,
            time_format: TimeFormat::HumanReadableMs,
            omit_empty: true,
            pool_capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}

impl LoggerConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.levels.is_empty() {
            return Err(LoggerError::config("levels", "at least one level must be enabled"));
        }
        Ok(())
    }
}

/// How a file sink lays out its files over time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStoreMode {
    /// One file per local calendar day, switched on the first write of a new day
    #[default]
    DailySplit,

    /// One file appended to for the sink's lifetime
    AppendOneFile,
}

/// Settings shared by the single-file and per-level file sinks
///
/// # Example
///
/// ```
/// use fieldlog::{FileSinkConfig, FileStoreMode};
///
/// let config = FileSinkConfig::new("/var/log/app")
///     .with_prefix("api")
///     .with_mode(FileStoreMode::AppendOneFile);
/// assert!(config.validate().is_ok());
/// assert!(FileSinkConfig::new("logs").with_prefix("a/b").validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSinkConfig {
    /// Directory holding the log files, created when missing
    pub dir: PathBuf,

    /// Optional file name prefix, joined with `-`
    pub prefix: Option<String>,

    pub mode: FileStoreMode,

    /// Gzip a daily file once the date has moved past it
    pub compress_rotated: bool,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            prefix: None,
            mode: FileStoreMode::DailySplit,
            compress_rotated: false,
        }
    }
}

impl FileSinkConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_mode(mut self, mode: FileStoreMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress_rotated = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.dir.as_os_str().is_empty() {
            return Err(LoggerError::config("file sink", "directory must not be empty"));
        }
        if let Some(prefix) = &self.prefix {
            if prefix.is_empty() {
                return Err(LoggerError::config("file sink", "prefix must not be empty"));
            }
            if prefix.contains(['/', '\\']) {
                return Err(LoggerError::config(
                    "file sink",
                    format!("prefix '{}' must not contain a path separator", prefix),
                ));
            }
        }
        #[cfg(not(feature = "file"))]
        if self.compress_rotated {
            return Err(LoggerError::config(
                "file sink",
                "compression requires the 'file' feature",
            ));
        }
        Ok(())
    }
}

/// Default overall timeout of one HTTP POST
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 3000;

/// Settings of the HTTP POST sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSinkConfig {
    /// Endpoint, `http[s]://host[:port][/path]`
    pub url: String,

    /// Overall deadline of one POST, connect to response status
    #[serde(default = "default_http_timeout")]
    pub timeout_ms: u64,
}

fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}

impl HttpSinkConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(LoggerError::config("http sink", "url must not be empty"));
        }
        let rest = self
            .url
            .strip_prefix("http://")
            .or_else(|| self.url.strip_prefix("https://"))
            .ok_or_else(|| {
                LoggerError::config(
                    "http sink",
                    format!("unsupported url '{}', expected http:// or https://", self.url),
                )
            })?;
        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if host.is_empty() || host.contains('@') {
            return Err(LoggerError::config(
                "http sink",
                format!("invalid host in url '{}'", self.url),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(LoggerError::config("http sink", "timeout must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::Level;

    #[test]
    fn test_logger_config_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.levels, LevelMask::ALL);
        assert_eq!(config.time_format, TimeFormat::HumanReadableMs);
        assert!(config.omit_empty);
        assert_eq!(config.pool_capacity, DEFAULT_POOL_CAPACITY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_mask_rejected() {
        let config = LoggerConfig {
            levels: LevelMask::NONE,
            ..LoggerConfig::default()
        };
        assert!(config.validate().unwrap_err().is_config());
        assert!(LoggerConfig::from_json_str(r#"{"levels": 0}"#).is_err());
    }

    #[test]
    fn test_from_json_str() {
        let config = LoggerConfig::from_json_str(
            r#"{"format":"text","levels":3,"omit_empty":false,"pool_capacity":8}"#,
        )
        .unwrap();
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.levels, Level::Debug | Level::Info);
        assert!(!config.omit_empty);
        assert_eq!(config.pool_capacity, 8);
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        assert!(matches!(
            LoggerConfig::from_json_str("{"),
            Err(LoggerError::Json(_))
        ));
        assert!(LoggerConfig::from_json_str(r#"{"format":"xml"}"#).is_err());
        assert!(LoggerConfig::from_json_str(r#"{"levels":64}"#).is_err());
        assert!(LoggerConfig::from_json_str(r#"{"colour":true}"#).is_err());
    }

    #[test]
    fn test_file_config_validation() {
        assert!(FileSinkConfig::default().validate().is_ok());
        assert!(FileSinkConfig::new("").validate().is_err());
        assert!(FileSinkConfig::new("logs").with_prefix("").validate().is_err());
        assert!(FileSinkConfig::new("logs").with_prefix("a\\b").validate().is_err());
        assert!(FileSinkConfig::new("logs").with_prefix("api").validate().is_ok());
    }

    #[test]
    fn test_file_config_serde() {
        let config: FileSinkConfig =
            serde_json::from_str(r#"{"dir":"/tmp/x","mode":"append_one_file"}"#).unwrap();
        assert_eq!(config.dir, PathBuf::from("/tmp/x"));
        assert_eq!(config.mode, FileStoreMode::AppendOneFile);
        assert_eq!(config.prefix, None);
        assert!(!config.compress_rotated);
    }

    #[test]
    fn test_http_config_validation() {
        assert!(HttpSinkConfig::new("http://127.0.0.1:8080/logs").validate().is_ok());
        assert!(HttpSinkConfig::new("").validate().is_err());
        assert!(HttpSinkConfig::new("https://logs.example.com/ingest").validate().is_ok());
        assert!(HttpSinkConfig::new("ftp://example.com").validate().is_err());
        assert!(HttpSinkConfig::new("https:///nohost").validate().is_err());
        assert!(HttpSinkConfig::new("http://h").with_timeout_ms(0).validate().is_err());

        let config: HttpSinkConfig = serde_json::from_str(r#"{"url":"http://h/"}"#).unwrap();
        assert_eq!(config.timeout_ms, DEFAULT_HTTP_TIMEOUT_MS);
    }
}
