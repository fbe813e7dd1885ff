// src/report/transport.rs
//! Delivery of reports to the remote collector.

use crate::utils::error::MonitorError;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Body posted to the collector
///
/// The payload is the already-serialized report, sent as a JSON string.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    /// Node identifier
    #[serde(rename = "Id")]
    pub id: &'a str,
    /// Serialized canonical report
    #[serde(rename = "Data")]
    pub data: &'a str,
}

/// Forwards reports to the remote collection endpoint
pub struct Reporter {
    /// Collector URL, as configured
    url: String,
    /// Node identifier stamped on every envelope
    node_id: String,
    /// HTTP client for posting reports
    client: Client,
}

impl Reporter {
    /// Creates a new Reporter
    ///
    /// # Arguments
    /// * `url` - Collector endpoint (the `gae` config key)
    /// * `node_id` - Identifier of this host
    /// * `timeout` - Optional limit for each post
    pub fn new(
        url: impl Into<String>,
        node_id: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, MonitorError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Reporter {
            url: url.into(),
            node_id: node_id.into(),
            client: builder.build()?,
        })
    }

    /// Posts one report to the collector
    ///
    /// The collector's status code and body are not inspected; only
    /// transport-level failures are reported.
    ///
    /// # Errors
    /// Returns `MonitorError` if:
    /// - The configured URL does not parse
    /// - The request could not be delivered
    pub async fn post(&self, payload: &str) -> Result<(), MonitorError> {
        let url = Url::parse(&self.url)?;
        let envelope = Envelope {
            id: &self.node_id,
            data: payload,
        };

        let response = self
            .client
            .post(url)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| MonitorError::TransportError(e.to_string()))?;

        log::debug!("Collector answered {}", response.status());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve_http_once;

    #[test]
    fn envelope_field_names() {
        let envelope = Envelope {
            id: "1a2b3c4d",
            data: r#"{"result":[]}"#,
        };
        assert_eq!(
            serde_json::to_string(&envelope).unwrap(),
            r#"{"Id":"1a2b3c4d","Data":"{\"result\":[]}"}"#
        );
    }

    #[tokio::test]
    async fn posts_json_envelope() {
        let (addr, request) = serve_http_once("500 Internal Server Error", "nope").await;
        let reporter = Reporter::new(format!("http://{}/data", addr), "cafebabe", None).unwrap();

        // A non-2xx answer is still a delivered report
        reporter.post(r#"{"result":["x"]}"#).await.unwrap();

        let request = request.await.unwrap();
        assert!(request.head.starts_with("POST /data "));
        assert!(
            request
                .head
                .to_lowercase()
                .contains("content-type: application/json")
        );
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["Id"], "cafebabe");
        assert_eq!(body["Data"], r#"{"result":["x"]}"#);
    }

    #[tokio::test]
    async fn bad_url_is_reported() {
        let reporter = Reporter::new("", "cafebabe", None).unwrap();
        assert!(matches!(
            reporter.post("{}").await,
            Err(MonitorError::UrlError(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_collector_is_transport_error() {
        let addr = crate::testing::closed_port().await;
        let reporter = Reporter::new(format!("http://{}/", addr), "cafebabe", None).unwrap();
        assert!(matches!(
            reporter.post("{}").await,
            Err(MonitorError::TransportError(_))
        ));
    }
}
