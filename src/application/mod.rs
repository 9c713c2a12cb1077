//! Application services and business logic orchestration
//!
//! This module contains application services that coordinate
//! the metrics engine with the configured data source.

pub mod app;
pub mod service;

pub use app::{Application, DashboardReport};
pub use service::{DashboardService, ModuleSnapshot};
