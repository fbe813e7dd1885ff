// src/miner/ewbf.rs

//! EWBF per-GPU statistics and their normalization
//!
//! EWBF's `getstat` call returns one record per GPU. The monitor folds
//! those into the same nine-slot summary Claymore produces natively, so the
//! collector can treat both miners alike.
use crate::miner::connection::exchange_line;
use crate::report::canonical::{CanonicalReport, DIAGNOSTICS_PLACEHOLDER, UNKNOWN_POOL};
use crate::utils::error::MonitorError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};

/// Label placed in slot 0 of every EWBF report
pub const EWBF_LABEL: &str = "EWBF - ZEC";

/// Speed is reported in Sol/s; the collector expects thousandths
pub const SPEED_SCALE: u64 = 1000;

/// `getstat` request
#[derive(Debug, Serialize)]
struct StatRequest {
    id: u32,
    method: &'static str,
}

/// Statistics for a single GPU
///
/// Absent, null or mistyped fields read as zero / `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GpuStats {
    /// Device index as seen by the miner
    #[serde(deserialize_with = "lenient")]
    pub gpuid: u32,
    /// CUDA device index
    #[serde(deserialize_with = "lenient")]
    pub cudaid: u32,
    /// PCI bus id
    #[serde(deserialize_with = "lenient")]
    pub busid: Option<String>,
    /// Health status code
    #[serde(deserialize_with = "lenient")]
    pub gpu_status: u32,
    /// Solver variant in use
    #[serde(deserialize_with = "lenient")]
    pub solver: u32,
    /// Temperature in °C
    #[serde(deserialize_with = "lenient")]
    pub temperature: i64,
    /// Power draw in watts
    #[serde(deserialize_with = "lenient")]
    pub gpu_power_usage: u64,
    /// Hashrate in Sol/s
    #[serde(deserialize_with = "lenient")]
    pub speed_sps: u64,
    /// Accepted share count
    #[serde(deserialize_with = "lenient")]
    pub accepted_shares: u64,
    /// Rejected share count
    #[serde(deserialize_with = "lenient")]
    pub rejected_shares: u64,
}

/// `getstat` reply
///
/// Every field defaults when absent, null or mistyped. Miners older than
/// 0.3.4b do not send `current_server`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatResponse {
    /// Echoed request id
    #[serde(deserialize_with = "lenient")]
    pub id: u32,
    /// Echoed method name
    #[serde(deserialize_with = "lenient")]
    pub method: Option<String>,
    /// Error text, if the miner reported one
    #[serde(deserialize_with = "lenient")]
    pub error: Option<String>,
    /// Pool the miner is connected to
    #[serde(rename = "current_server", deserialize_with = "lenient")]
    pub server: Option<String>,
    /// One entry per GPU, in miner order
    #[serde(deserialize_with = "lenient_gpus")]
    pub result: Vec<GpuStats>,
}

/// Reads any JSON value, falling back to the default when it does not fit `T`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decodes the GPU list entry by entry; entries that are not objects are dropped.
fn lenient_gpus<'de, D>(deserializer: D) -> Result<Vec<GpuStats>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(gpu) => Some(gpu),
            Err(e) => {
                log::warn!("Skipping unreadable GPU entry: {}", e);
                None
            }
        })
        .collect())
}

/// Client for EWBF's JSON API over raw TCP
pub struct EwbfClient {
    /// Miner API address (`host:port`)
    addr: String,
    /// When the monitor started; slot 1 reports time since then
    started: Instant,
    /// Optional limit for each network call
    timeout: Option<Duration>,
}

impl EwbfClient {
    /// Creates a new EwbfClient
    ///
    /// # Arguments
    /// * `addr` - Miner API address (`host:port`)
    /// * `started` - Monitor start time, used for the uptime slot
    /// * `timeout` - Optional limit for each network call
    pub fn new(addr: impl Into<String>, started: Instant, timeout: Option<Duration>) -> Self {
        EwbfClient {
            addr: addr.into(),
            started,
            timeout,
        }
    }

    /// Queries the miner once and returns the synthesized report, serialized
    ///
    /// # Errors
    /// Returns `MonitorError` if the miner could not be reached or read.
    pub async fn poll(&self) -> Result<String, MonitorError> {
        let request = serde_json::to_string(&StatRequest {
            id: 1,
            method: "getstat",
        })?;

        let line = exchange_line(&self.addr, &request, self.timeout).await?;
        let response: StatResponse = serde_json::from_str(&line).unwrap_or_else(|e| {
            log::warn!("Malformed getstat reply: {}", e);
            StatResponse::default()
        });

        if let Some(error) = response.error.as_deref().filter(|e| !e.is_empty()) {
            log::warn!("Miner reported error: {}", error);
        }

        let report = normalize(&response, self.started.elapsed());
        let json = report.to_json()?;
        log::info!("{}", json);
        Ok(json)
    }
}

/// Folds per-GPU statistics into a nine-slot report
///
/// Slots 4 and 5 stay empty; EWBF has no secondary coin.
///
/// # Arguments
/// * `response` - Decoded `getstat` reply
/// * `uptime` - How long the monitor has been running
pub fn normalize(response: &StatResponse, uptime: Duration) -> CanonicalReport {
    log::debug!("len(ewbf)={}", response.result.len());

    let mut hashrate: u64 = 0;
    let mut accepted: u64 = 0;
    let mut rejected: u64 = 0;
    let mut hashrates = String::new();
    let mut temps = String::new();

    for gpu in &response.result {
        let speed = gpu.speed_sps.saturating_mul(SPEED_SCALE);
        hashrate = hashrate.saturating_add(speed);
        accepted = accepted.saturating_add(gpu.accepted_shares);
        rejected = rejected.saturating_add(gpu.rejected_shares);
        hashrates.push_str(&format!("{};", speed));
        temps.push_str(&format!("{};0;", gpu.temperature));
    }
    strip_separator(&mut hashrates);
    strip_separator(&mut temps);

    let pool = match response.server.as_deref() {
        Some(server) if !server.is_empty() => server.to_string(),
        _ => {
            log::warn!("Please update ewbf's miner for version 0.3.4b+");
            UNKNOWN_POOL.to_string()
        }
    };

    CanonicalReport {
        label: EWBF_LABEL.to_string(),
        uptime_minutes: uptime_minutes(uptime),
        totals: format!("{};{};{}", hashrate, accepted, rejected),
        hashrates,
        temperatures: temps,
        pool,
        diagnostics: DIAGNOSTICS_PLACEHOLDER.to_string(),
        ..Default::default()
    }
}

/// Whole minutes, rounded to nearest.
pub fn uptime_minutes(uptime: Duration) -> String {
    format!("{:.0}", uptime.as_secs_f64() / 60.0)
}

fn strip_separator(list: &mut String) {
    if list.ends_with(';') {
        list.pop();
    }
}
