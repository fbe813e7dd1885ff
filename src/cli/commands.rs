// src/cli/commands.rs
use clap::Parser;
use std::path::PathBuf;

/// Miner monitor - polls a miner's statistics API and forwards them to a collector
#[derive(Parser, Debug)]
#[command(name = "minermon")]
#[command(version, about, long_about = None)]
pub struct Commands {
    /// Path to the key=value configuration file
    pub config: PathBuf,
}
