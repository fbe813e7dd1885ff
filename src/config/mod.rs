// src/config/mod.rs
//! Configuration management for the monitor
//!
//! This module handles:
//! - Loading the line-oriented `key=value` configuration file
//! - Overlaying and persisting the node id side-file
//!
//! Recognized keys are `mode`, `miner`, `psw`, `gae`, `timer`, `id`,
//! `idfile` and `timeout`. Lines starting with `#` are comments.

/// Core configuration implementation
///
/// Contains the [`Config`] struct and the identity side-file handling.
pub mod config;

// Re-export key items for easy access
pub use config::{Config, DEFAULT_ID_FILE, DEFAULT_POLL_INTERVAL_SECS};

use crate::utils::error::MonitorError;
use std::path::Path;

/// Loads monitor configuration from a file
///
/// # Arguments
/// * `path` - Path to the configuration file
///
/// # Returns
/// * `Ok(Config)` - Successfully loaded configuration
/// * `Err(MonitorError)` - If the file couldn't be read or parsed
pub fn load(path: impl AsRef<Path>) -> Result<Config, MonitorError> {
    Config::load(path)
}
