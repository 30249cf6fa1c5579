//! Analysis modules.
//!
//! Per-trial metrics come from [`crate::metrics`]; this module groups
//! them into SNR conditions for the report.

pub mod aggregator;

pub use aggregator::*;
