//! Trend classification for metric series

use crate::domain::metrics::{
    constants,
    summary::mean,
    values::StabilityThreshold,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a metric row over its date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Recent values sit above the band around earlier values
    Up,
    /// Recent values sit below the band around earlier values
    Down,
    /// Recent values are within the band
    Stable,
}

impl TrendDirection {
    /// Compare a recent average against an earlier one
    ///
    /// `recent > earlier * (1 + t)` is up, `recent < earlier * (1 - t)` is
    /// down, anything else is stable.
    pub fn from_averages(recent: f64, earlier: f64, threshold: StabilityThreshold) -> Self {
        if recent > earlier * threshold.upper_factor() {
            Self::Up
        } else if recent < earlier * threshold.lower_factor() {
            Self::Down
        } else {
            Self::Stable
        }
    }

    /// Classify a date-ascending series by its leading and trailing windows
    ///
    /// Both windows hold `min(3, n)` values. For `n <= 3` they are the same
    /// values, so short series come out stable.
    pub fn classify(values: &[f64], threshold: StabilityThreshold) -> Self {
        if values.is_empty() {
            return Self::Stable;
        }
        let window = constants::trend::WINDOW.min(values.len());
        let earlier = mean(&values[..window]);
        let recent = mean(&values[values.len() - window..]);
        Self::from_averages(recent, earlier, threshold)
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Stable => write!(f, "stable"),
        }
    }
}

/// Sign of a change between two period values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Up,
    Down,
    Neutral,
}

impl ChangeDirection {
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            Self::Up
        } else if change < 0.0 {
            Self::Down
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for ChangeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}
