// src/report/mod.rs
//! Reporting format and transport
//!
//! [`CanonicalReport`] is the nine-slot record every adapter produces and
//! [`Reporter`] posts it to the collector wrapped in an [`Envelope`].

/// The nine-slot canonical report
pub mod canonical;

/// HTTP transport to the remote collector
pub mod transport;

pub use canonical::CanonicalReport;
pub use transport::{Envelope, Reporter};
