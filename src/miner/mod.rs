// src/miner/mod.rs
//! Miner protocol adapters
//!
//! Each adapter queries one miner wire format and yields a serialized
//! nine-slot report:
//! - Claymore HTTP status page (report line forwarded verbatim)
//! - Claymore JSON-RPC over TCP (native nine-slot reply, passed through)
//! - EWBF JSON over TCP (per-GPU stats, normalized into nine slots)

/// Claymore JSON-RPC passthrough
pub mod claymore;

/// Newline-framed TCP exchange shared by the TCP adapters
pub mod connection;

/// EWBF per-GPU stats and the normalizer
pub mod ewbf;

/// Claymore HTTP status page
pub mod http;

pub use self::claymore::ClaymoreClient;
pub use self::ewbf::EwbfClient;
pub use self::http::ClaymoreHttpClient;

use crate::config::Config;
use crate::types::MinerMode;
use crate::utils::error::MonitorError;
use std::time::Instant;

/// Adapter selected by the configured [`MinerMode`]
pub enum MinerAdapter {
    /// Claymore HTTP status page
    ClaymoreHttp(ClaymoreHttpClient),
    /// Claymore JSON-RPC over TCP
    Claymore(ClaymoreClient),
    /// EWBF JSON over TCP
    Ewbf(EwbfClient),
}

impl MinerAdapter {
    /// Builds the adapter for the configured mode
    ///
    /// # Arguments
    /// * `config` - Monitor configuration
    /// * `started` - Monitor start time, for adapters that report uptime
    pub fn from_config(config: &Config, started: Instant) -> Result<Self, MonitorError> {
        let timeout = config.timeout();
        Ok(match config.mode {
            MinerMode::ClaymoreHttp => {
                MinerAdapter::ClaymoreHttp(ClaymoreHttpClient::new(&config.miner, timeout)?)
            }
            MinerMode::Claymore => MinerAdapter::Claymore(ClaymoreClient::new(
                &config.miner,
                &config.password,
                timeout,
            )),
            MinerMode::Ewbf => {
                MinerAdapter::Ewbf(EwbfClient::new(&config.miner, started, timeout))
            }
        })
    }

    /// Mode this adapter serves
    pub fn mode(&self) -> MinerMode {
        match self {
            MinerAdapter::ClaymoreHttp(_) => MinerMode::ClaymoreHttp,
            MinerAdapter::Claymore(_) => MinerMode::Claymore,
            MinerAdapter::Ewbf(_) => MinerMode::Ewbf,
        }
    }

    /// Queries the miner once
    ///
    /// # Returns
    /// * `Ok(String)` - Serialized report, ready for the collector
    /// * `Err(MonitorError)` - The poll failed; see [`MonitorError::sentinel`]
    pub async fn poll(&self) -> Result<String, MonitorError> {
        match self {
            MinerAdapter::ClaymoreHttp(client) => client.poll().await,
            MinerAdapter::Claymore(client) => client.poll().await,
            MinerAdapter::Ewbf(client) => client.poll().await,
        }
    }
}
