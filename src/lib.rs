//! Metric Lens - aggregation and comparison engine for metrics dashboards
//!
//! Turns per-module observation sets into summaries, period comparisons,
//! time pivots, deviation insights and placeholder forecast points, fed by a
//! pluggable data source.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::{Application, DashboardService};
pub use error::{Error, Result};
