// src/utils/mod.rs
//! Utilities module for common functionality
//!
//! Error handling and logging infrastructure shared by every component.

/// Error types and handling utilities
///
/// Contains the [`MonitorError`] enum which defines all possible error conditions
/// for the monitor, along with the legacy sentinel mapping.
pub mod error;

/// Logging configuration
pub mod logging;

// Re-export for easier access
pub use error::MonitorError;
pub use logging::init_logging;
