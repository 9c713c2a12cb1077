//! Domain types and business logic for Metric Lens
//!
//! The domain layer is free of I/O: it validates observations at construction
//! and computes every dashboard statistic from plain values.

pub mod metrics;

pub use metrics::*;
