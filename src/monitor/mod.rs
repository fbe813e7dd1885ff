// src/monitor/mod.rs
//! Monitor process loop
//!
//! Strictly sequential: one poll at a time, one cycle at a time.

/// The polling scheduler
pub mod scheduler;

pub use scheduler::{CycleOutcome, Monitor};
