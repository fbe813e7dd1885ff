// src/cli/mod.rs
//! Command-line interface: a single positional configuration path.

/// Argument definitions
pub mod commands;

pub use commands::Commands;
