//! Summary statistics over a metric's observations
//!
//! [`DescriptiveStats`] is the one place where mean, extremes and spread are
//! computed; the comparison, pivot and insight components all reduce through
//! it so that empty-input handling cannot drift between call sites.

use crate::domain::metrics::{constants, MetricName, Observation, ObservationSet, Unit};
use serde::{Deserialize, Serialize};

/// Count, mean and extremes of a list of values
///
/// Empty input yields zeros across the board, never `NaN` or infinities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

impl DescriptiveStats {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::empty();
        }

        let sum: f64 = values.iter().sum();
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);

        Self {
            count: values.len(),
            mean: sum / values.len() as f64,
            max,
            min,
        }
    }

    pub fn empty() -> Self {
        Self {
            count: 0,
            mean: constants::fallback::EMPTY_STATISTIC,
            max: constants::fallback::EMPTY_STATISTIC,
            min: constants::fallback::EMPTY_STATISTIC,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Arithmetic mean, `0` for empty input
pub fn mean(values: &[f64]) -> f64 {
    DescriptiveStats::from_values(values).mean
}

/// Population standard deviation (divides by `n`), `0` for empty input
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return constants::fallback::EMPTY_STATISTIC;
    }
    let avg = mean(values);
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Per-metric summary: latest observation plus average, max and min
///
/// Values are stored at full precision; [`Unit::format_value`] rounds them
/// when displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    pub metric_name: MetricName,
    pub unit: Option<Unit>,
    pub latest: Option<Observation>,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub count: usize,
}

impl SummaryRecord {
    /// Summarize one metric of a set, ignoring forecast points
    pub fn for_metric(set: &ObservationSet, metric_name: &MetricName) -> Self {
        let series = set.real_series(metric_name);
        Self::from_series(metric_name.clone(), &series)
    }

    /// Summarize an already filtered, date-sorted series
    pub(crate) fn from_series(metric_name: MetricName, series: &[&Observation]) -> Self {
        let values: Vec<f64> = series.iter().map(|o| o.value()).collect();
        let stats = DescriptiveStats::from_values(&values);
        // Last in date order; among equal dates the last encountered wins
        let latest = series.iter().max_by_key(|o| o.date()).map(|o| (*o).clone());

        Self {
            metric_name,
            unit: series.first().map(|o| o.unit().clone()),
            latest,
            average: stats.mean,
            max: stats.max,
            min: stats.min,
            count: stats.count,
        }
    }

    /// Value of the latest observation, `0` when there is none
    pub fn latest_value(&self) -> f64 {
        self.latest
            .as_ref()
            .map(Observation::value)
            .unwrap_or(constants::fallback::EMPTY_STATISTIC)
    }

    /// Format a statistic with this metric's unit precision
    pub fn display(&self, value: f64) -> String {
        match &self.unit {
            Some(unit) => unit.format_value(value),
            None => format!("{value:.0}"),
        }
    }
}

/// Summaries for every metric with real observations, in encounter order
pub fn summarize(set: &ObservationSet) -> Vec<SummaryRecord> {
    set.real_series_by_metric()
        .into_iter()
        .map(|(name, series)| SummaryRecord::from_series(name, &series))
        .collect()
}
