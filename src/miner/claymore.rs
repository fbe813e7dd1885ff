// src/miner/claymore.rs
//! Claymore `miner_getstat1` over raw TCP, passed through unchanged.

use crate::miner::connection::exchange_line;
use crate::report::canonical::{CanonicalReport, SLOT_COUNT, lenient_slots};
use crate::utils::error::MonitorError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// `miner_getstat1` request
#[derive(Debug, Serialize)]
struct StatRequest<'a> {
    id: u32,
    psw: &'a str,
    jsonrpc: &'static str,
    method: &'static str,
}

/// `miner_getstat1` reply; every field is optional on the wire
#[derive(Debug, Default, Deserialize)]
struct StatResponse {
    #[serde(default)]
    id: Value,
    #[serde(default, deserialize_with = "lenient_slots")]
    result: [String; SLOT_COUNT],
}

/// Client for Claymore's JSON-RPC API over raw TCP
///
/// Claymore already answers with the nine-slot summary, so the reply is
/// forwarded without normalization.
pub struct ClaymoreClient {
    /// Miner API address (`host:port`)
    addr: String,
    /// Remote management password, sent as `psw`
    password: String,
    /// Optional limit for each network call
    timeout: Option<Duration>,
}

impl ClaymoreClient {
    /// Creates a new ClaymoreClient
    pub fn new(
        addr: impl Into<String>,
        password: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Self {
        ClaymoreClient {
            addr: addr.into(),
            password: password.into(),
            timeout,
        }
    }

    /// Queries the miner once and returns its report, re-serialized
    ///
    /// A reply that does not parse is tolerated: missing or mistyped slots
    /// come back as empty strings.
    ///
    /// # Errors
    /// Returns `MonitorError` if the miner could not be reached or read.
    pub async fn poll(&self) -> Result<String, MonitorError> {
        let request = serde_json::to_string(&StatRequest {
            id: 1,
            psw: &self.password,
            jsonrpc: "2.0",
            method: "miner_getstat1",
        })?;

        let line = exchange_line(&self.addr, &request, self.timeout).await?;
        let report = decode_reply(&line);
        report.to_json()
    }
}

/// Decodes a `miner_getstat1` reply into a report.
fn decode_reply(line: &str) -> CanonicalReport {
    let response: StatResponse = serde_json::from_str(line).unwrap_or_else(|e| {
        log::warn!("Malformed miner_getstat1 reply: {}", e);
        StatResponse::default()
    });
    log::info!("id {} result {:?}", response.id, response.result);
    CanonicalReport::from_slots(response.result)
}
