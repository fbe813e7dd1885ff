// src/monitor/scheduler.rs
//! Fixed-interval polling loop
//!
//! Each cycle polls the miner, forwards the report and then sleeps for the
//! configured interval. The wait is armed after the poll finishes, so a
//! cycle lasts poll time plus interval and the schedule drifts slowly.

use crate::config::Config;
use crate::miner::MinerAdapter;
use crate::report::Reporter;
use crate::utils::error::MonitorError;
use std::time::{Duration, Instant};

/// What happened in one polling cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The report reached the collector
    Reported,
    /// The miner poll failed; nothing was forwarded
    Skipped {
        /// Legacy sentinel for the failure
        sentinel: &'static str,
    },
    /// The poll succeeded but the post did not
    PostFailed,
}

/// Drives the poll → forward → wait cycle
pub struct Monitor {
    /// Adapter for the configured mode
    adapter: MinerAdapter,
    /// Transport to the collector
    reporter: Reporter,
    /// Wait between cycles
    interval: Duration,
}

impl Monitor {
    /// Creates a new Monitor
    ///
    /// # Arguments
    /// * `config` - Validated configuration with a node id assigned
    /// * `started` - Monitor start time
    pub fn new(config: &Config, started: Instant) -> Result<Self, MonitorError> {
        Ok(Monitor {
            adapter: MinerAdapter::from_config(config, started)?,
            reporter: Reporter::new(&config.report_url, &config.node_id, config.timeout())?,
            interval: config.poll_interval(),
        })
    }

    /// Runs one polling cycle
    ///
    /// Failures are logged and absorbed; nothing is retried.
    pub async fn poll_once(&self) -> CycleOutcome {
        log::debug!("polling {} miner", self.adapter.mode());

        let payload = match self.adapter.poll().await {
            Ok(payload) => payload,
            Err(e) => {
                match &e {
                    MonitorError::ConnectionError(_) => log::error!("miner not found: {}", e),
                    _ => log::error!("Poll failed: {}", e),
                }
                return CycleOutcome::Skipped {
                    sentinel: e.sentinel(),
                };
            }
        };

        match self.reporter.post(&payload).await {
            Ok(()) => {
                log::debug!("Report forwarded");
                CycleOutcome::Reported
            }
            Err(e) => {
                log::error!("Failed to post report: {}", e);
                CycleOutcome::PostFailed
            }
        }
    }

    /// Polls forever at the configured interval
    ///
    /// Never returns under normal operation; the process runs until it is
    /// terminated externally.
    pub async fn run(&self) -> Result<(), MonitorError> {
        loop {
            self.poll_once().await;
            tokio::time::sleep(self.interval).await;
        }
    }
}
