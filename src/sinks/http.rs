//! HTTP POST sink
//!
//! Every record is sent as the body of one `POST` to the configured
//! `http://` or `https://` URL. Connections are not kept between records.
//! Failures are returned to the caller; nothing is retried or queued.

use crate::core::{HttpSinkConfig, Level, LoggerError, Result, Sink};
use chrono::{DateTime, Local};
use std::time::Duration;

/// Posts each record to a remote endpoint
///
/// # Example
///
/// ```no_run
/// use fieldlog::{HttpSink, HttpSinkConfig, Logger};
///
/// let sink = HttpSink::new(HttpSinkConfig::new("https://collector.local/ingest")).unwrap();
/// let logger = Logger::builder().sink(sink).build().unwrap();
/// logger.error().str("component", "billing").msg("payment rejected");
/// ```
pub struct HttpSink {
    config: HttpSinkConfig,
    agent: ureq::Agent,
    timeout: Duration,
}

impl HttpSink {
    /// Validate the configuration and build the client; no connection is made
    ///
    /// # Errors
    ///
    /// Returns error if the URL is missing, not `http://` or `https://`, has
    /// no host, or the timeout is zero
    pub fn new(config: HttpSinkConfig) -> Result<Self> {
        config.validate()?;
        let timeout = Duration::from_millis(config.timeout_ms);
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .max_idle_connections(0)
            .build();
        Ok(Self {
            config,
            agent,
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `body` and return the response status
    fn post(&self, body: &[u8]) -> Result<u16> {
        let response = self
            .agent
            .post(&self.config.url)
            .set("Content-Type", "application/json")
            .send_bytes(body);
        match response {
            Ok(response) => Ok(response.status()),
            Err(ureq::Error::Status(status, _)) => Ok(status),
            Err(ureq::Error::Transport(transport)) => {
                Err(LoggerError::http(&self.config.url, transport.to_string()))
            }
        }
    }
}

impl std::fmt::Debug for HttpSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSink")
            .field("url", &self.config.url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Sink for HttpSink {
    fn write(&self, _level: Level, _now: &DateTime<Local>, bytes: &[u8]) -> Result<usize> {
        let status = self.post(bytes)?;
        if (200..300).contains(&status) {
            Ok(bytes.len())
        } else {
            Err(LoggerError::http_status(&self.config.url, status))
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Accept one request, hand it to the test and answer with `response`
    fn serve_once(response: &'static str) -> (String, mpsc::Receiver<(String, Vec<u8>)>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/ingest", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut head = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
                head.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();
            reader.get_mut().write_all(response.as_bytes()).unwrap();
            tx.send((head, body)).unwrap();
        });
        (url, rx)
    }

    #[test]
    fn test_https_url_builds_sink() {
        let sink = HttpSink::new(HttpSinkConfig::new("https://collector.example.com/v1/logs")).unwrap();
        assert_eq!(sink.url(), "https://collector.example.com/v1/logs");
        assert_eq!(sink.timeout(), Duration::from_millis(3000));
        assert_eq!(sink.name(), "http");
    }

    #[test]
    fn test_post_sends_exact_bytes() {
        let (url, rx) = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
        let sink = HttpSink::new(HttpSinkConfig::new(url)).unwrap();
        let body = b"{\"level\":\"info\",\"msg\":\"hi\"}\n";

        assert_eq!(sink.write(Level::Info, &Local::now(), body).unwrap(), body.len());

        let (head, received) = rx.recv().unwrap();
        assert!(head.starts_with("POST /ingest HTTP/1.1\r\n"));
        assert!(head.contains("Content-Type: application/json\r\n"));
        assert_eq!(received, body);
    }

    #[test]
    fn test_non_2xx_is_an_error() {
        let (url, _rx) = serve_once("HTTP/1.1 503 Service Unavailable\r\n\r\n");
        let sink = HttpSink::new(HttpSinkConfig::new(url)).unwrap();
        let err = sink.write(Level::Error, &Local::now(), b"{}\n").unwrap_err();
        assert!(matches!(err, LoggerError::HttpStatus { status: 503, .. }));
    }

    #[test]
    fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let sink = HttpSink::new(HttpSinkConfig::new(url).with_timeout_ms(200)).unwrap();

        let started = std::time::Instant::now();
        let err = sink.write(Level::Info, &Local::now(), b"{}\n").unwrap_err();
        assert!(matches!(err, LoggerError::Http { .. }));
        assert!(started.elapsed() < Duration::from_secs(3));
        drop(listener);
    }

    #[test]
    fn test_refused_connection_is_an_error() {
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let sink = HttpSink::new(HttpSinkConfig::new(format!("http://{}/", addr))).unwrap();
        assert!(sink.write(Level::Info, &Local::now(), b"{}\n").is_err());
    }

    #[test]
    fn test_invalid_config() {
        assert!(HttpSink::new(HttpSinkConfig::new("")).unwrap_err().is_config());
        assert!(HttpSink::new(HttpSinkConfig::new("ftp://x")).unwrap_err().is_config());
        assert!(HttpSink::new(HttpSinkConfig::new("http:///nohost")).unwrap_err().is_config());
    }
}
