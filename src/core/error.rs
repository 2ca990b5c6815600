//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error returned unmodified from the write path
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration document could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// The HTTP endpoint answered with a non-2xx status
    #[error("HTTP sink '{url}' answered with status {status}")]
    HttpStatus { url: String, status: u16 },

    /// The HTTP exchange failed before a status was read
    #[error("HTTP sink '{url}' failed: {message}")]
    Http { url: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn http(url: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Http {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        LoggerError::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Whether this error was raised while validating configuration
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, LoggerError::InvalidConfiguration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("FileSink", "log directory is empty");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(err.is_config());

        let err = LoggerError::http_status("http://127.0.0.1/logs", 503);
        assert!(matches!(err, LoggerError::HttpStatus { status: 503, .. }));
        assert!(!err.is_config());
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::config("LoggerConfig", "no severity level enabled");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for LoggerConfig: no severity level enabled"
        );

        let err = LoggerError::http_status("http://localhost:8080/ingest", 500);
        assert_eq!(
            err.to_string(),
            "HTTP sink 'http://localhost:8080/ingest' answered with status 500"
        );

        let err = LoggerError::http("http://localhost:8080/ingest", "connection refused");
        assert_eq!(
            err.to_string(),
            "HTTP sink 'http://localhost:8080/ingest' failed: connection refused"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("create log directory", "cannot create 'logs'", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("create log directory"));
        assert!(err.to_string().contains("cannot create 'logs'"));
    }

    #[test]
    fn test_io_error_passes_through() {
        let io_err = std::io::Error::new(std::io::ErrorKind::WriteZero, "disk full");
        let err: LoggerError = io_err.into();
        match err {
            LoggerError::Io(inner) => assert_eq!(inner.kind(), std::io::ErrorKind::WriteZero),
            other => panic!("unexpected error: {other}"),
        }
    }
}
