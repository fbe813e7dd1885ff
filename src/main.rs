// src/main.rs
use clap::Parser;
use std::time::Instant;
use minermon_rs::{self, *};
use tokio::runtime::Runtime;

/// Entry point for the miner monitor
///
/// # Flow
/// 1. Parses the config path from the command line
/// 2. Loads configuration and the persisted node id
/// 3. Assigns a node id on first run
/// 4. Polls the miner forever
///
/// Only configuration and identity file I/O errors end the process.
fn main() -> Result<(), MonitorError> {
    let started = Instant::now();
    let cli = cli::Commands::parse();
    utils::init_logging();

    log::info!("minermon {}", env!("CARGO_PKG_VERSION"));

    let mut config = config::load(&cli.config)?;
    if let Err(e) = config.validate() {
        log::error!("wrong config file! {}", e);
        return Ok(());
    }
    config.log_summary();
    if config.report_url.is_empty() {
        log::warn!("No collector configured (gae); reports will not be delivered");
    }

    let node_id = config.ensure_node_id()?;
    log::info!("id: {}", node_id);

    // Runtime setup
    let rt = Runtime::new()?;
    rt.block_on(async {
        let monitor = Monitor::new(&config, started)?;
        monitor.run().await
    })
}
