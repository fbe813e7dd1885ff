// src/utils/error.rs
use serde_json;
use std::io;
use thiserror::Error;
use url;

/// Main error type for the monitor
///
/// Covers everything that can go wrong while loading configuration,
/// querying a miner or forwarding a report to the collector. Only the
/// configuration and identity file variants are ever fatal; the rest are
/// logged by the scheduler and absorbed by the next cycle.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Standard I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Configuration file or parameter errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A key the monitor cannot run without is absent from the config file
    #[error("Missing required config field: {0}")]
    MissingField(&'static str),

    /// The miner's TCP endpoint refused or failed the connection
    #[error("Network connection error: {0}")]
    ConnectionError(String),

    /// The miner accepted the connection but the response could not be read
    #[error("Network read error: {0}")]
    ReadError(String),

    /// The miner's HTTP endpoint returned nothing usable
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// None of the leading lines of the HTTP body look like a JSON object
    #[error("No report line found in response from {0}")]
    NoReportLine(String),

    /// Posting the report to the collector failed
    #[error("Transport error: {0}")]
    TransportError(String),

    /// A network call ran past the configured timeout
    #[error("Timed out after {0}s")]
    Timeout(u64),
}

impl MonitorError {
    /// Legacy sentinel string a failed poll maps onto
    ///
    /// Connection failures yield `"err"`, an HTTP body without a report line
    /// yields `"nil"` and every other polling failure yields the empty string.
    pub fn sentinel(&self) -> &'static str {
        match self {
            MonitorError::ConnectionError(_) => "err",
            MonitorError::NoReportLine(_) => "nil",
            _ => "",
        }
    }

    /// Whether this error should stop the process
    ///
    /// Only startup-time file I/O is fatal.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MonitorError::IoError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(MonitorError::ConnectionError("refused".into()), "err"; "connect")]
    #[test_case(MonitorError::NoReportLine("http://miner".into()), "nil"; "no json line")]
    #[test_case(MonitorError::EmptyResponse("http://miner".into()), ""; "empty body")]
    #[test_case(MonitorError::ReadError("eof".into()), ""; "read")]
    fn sentinels(err: MonitorError, expected: &str) {
        assert_eq!(err.sentinel(), expected);
    }

    #[test]
    fn only_io_is_fatal() {
        let io = MonitorError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(io.is_fatal());
        assert!(!MonitorError::MissingField("miner").is_fatal());
        assert!(!MonitorError::TransportError("down".into()).is_fatal());
    }
}
