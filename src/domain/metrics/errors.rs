//! Error types for metric ingestion and validation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors raised while normalizing raw input into engine types
///
/// The statistical components never produce these: they degrade to sentinel
/// values instead. Only boundary constructors return them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetricsError {
    /// Module identifier failed validation
    InvalidModuleId(String),
    /// Metric name failed validation
    InvalidMetricName(String),
    /// Unit tag failed validation
    InvalidUnit(String),
    /// Observation value is not a finite number
    InvalidValue(f64),
    /// Date range whose start lies after its end
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    /// Date string that is not a calendar day
    InvalidDate(String),
    /// Forecast horizon outside the supported range
    InvalidHorizon(usize),
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsError::InvalidModuleId(msg) => write!(f, "Invalid module id: {msg}"),
            MetricsError::InvalidMetricName(msg) => write!(f, "Invalid metric name: {msg}"),
            MetricsError::InvalidUnit(msg) => write!(f, "Invalid unit: {msg}"),
            MetricsError::InvalidValue(value) => {
                write!(f, "Invalid metric value: {value} (must be finite)")
            }
            MetricsError::InvalidDateRange { start, end } => {
                write!(f, "Invalid date range: {start} is after {end}")
            }
            MetricsError::InvalidDate(raw) => {
                write!(f, "Invalid date: {raw} (expected YYYY-MM-DD)")
            }
            MetricsError::InvalidHorizon(horizon) => {
                write!(f, "Invalid forecast horizon: {horizon}")
            }
        }
    }
}

impl std::error::Error for MetricsError {}
