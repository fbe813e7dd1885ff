// src/miner/http.rs
//! Claymore HTTP status page adapter
//!
//! Scans the leading lines of the page for the report object.

use crate::utils::error::MonitorError;
use reqwest::Client;
use std::time::Duration;

/// How many leading lines of the status page may hold the report
pub const SCAN_LINES: usize = 5;

/// Client for a miner that publishes its report on an HTTP status page
///
/// The page is plain text; one of its first lines is the report object,
/// already in nine-slot form. It is forwarded as-is without validation.
pub struct ClaymoreHttpClient {
    /// Status page URL
    url: String,
    /// HTTP client for fetching the page
    client: Client,
}

impl ClaymoreHttpClient {
    /// Creates a new ClaymoreHttpClient
    ///
    /// # Arguments
    /// * `url` - Status page URL (the `miner` config key)
    /// * `timeout` - Optional limit for each fetch
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, MonitorError> {
        // The miner sits on the local network; never route it through a proxy
        let mut builder = Client::builder().no_proxy();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ClaymoreHttpClient {
            url: url.into(),
            client: builder.build()?,
        })
    }

    /// Fetches the status page and extracts the report line
    ///
    /// # Errors
    /// - `HttpError` / `EmptyResponse` if the page could not be fetched or is empty
    /// - `NoReportLine` if none of the leading lines is a JSON object
    pub async fn poll(&self) -> Result<String, MonitorError> {
        let body = self.client.get(&self.url).send().await?.text().await?;
        if body.is_empty() {
            return Err(MonitorError::EmptyResponse(self.url.clone()));
        }

        find_report_line(&body)
            .map(str::to_string)
            .ok_or_else(|| MonitorError::NoReportLine(self.url.clone()))
    }
}

/// Picks the last of the first [`SCAN_LINES`] lines that opens a JSON object.
pub fn find_report_line(body: &str) -> Option<&str> {
    body.lines()
        .take(SCAN_LINES)
        .filter(|line| line.starts_with('{'))
        .last()
}
