//! Miner monitor - polls a mining process's statistics API and forwards a
//! normalized summary to a remote collector
//!
//! This crate provides:
//! - Adapters for the Claymore (HTTP and JSON-RPC) and EWBF miner APIs
//! - Normalization of per-GPU statistics into the nine-slot report format
//! - A persistent, checksum-derived node identifier
//! - A sequential fixed-interval polling loop

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Miner protocol adapters and the EWBF normalizer
pub mod miner;

/// Canonical report format and collector transport
pub mod report;

/// Polling loop
pub mod monitor;

/// Utility functions and error handling
pub mod utils;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Node identifier generation
pub mod identity;

/// Shared type definitions
pub mod types;

#[cfg(test)]
mod testing;

// Core exports
pub use cli::Commands;
pub use config::Config;
pub use miner::{ClaymoreClient, ClaymoreHttpClient, EwbfClient, MinerAdapter};
pub use monitor::{CycleOutcome, Monitor};
pub use report::{CanonicalReport, Envelope, Reporter};
pub use types::MinerMode;
pub use utils::{MonitorError, init_logging};
