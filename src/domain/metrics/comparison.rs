//! Period-over-period comparison
//!
//! A [`ComparisonRecord`] contrasts a metric's current period with the
//! equal-length period immediately before it. Every division has an explicit
//! fallback, so records are always structurally valid.

use crate::domain::metrics::{
    constants,
    summary::{population_std_dev, DescriptiveStats},
    trend::ChangeDirection,
    values::{round_ratio, PercentageChange},
    MetricName, ObservationSet,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Current vs previous period statistics for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRecord {
    pub metric_name: MetricName,
    pub current_avg: f64,
    pub previous_avg: f64,
    pub current_max: f64,
    pub previous_max: f64,
    pub delta: f64,
    pub delta_pct: f64,
    pub stability_pct: f64,
}

impl ComparisonRecord {
    /// Compare raw value lists of the two periods
    pub fn from_values(metric_name: MetricName, current: &[f64], previous: &[f64]) -> Self {
        let current_stats = DescriptiveStats::from_values(current);
        let previous_stats = DescriptiveStats::from_values(previous);
        let delta = current_stats.mean - previous_stats.mean;

        Self {
            metric_name,
            current_avg: current_stats.mean,
            previous_avg: previous_stats.mean,
            current_max: current_stats.max,
            previous_max: previous_stats.max,
            delta,
            delta_pct: PercentageChange::between(current_stats.mean, previous_stats.mean)
                .into_inner(),
            stability_pct: stability_index(current),
        }
    }

    /// Compare one metric across two sets, ignoring forecast points
    pub fn from_sets(
        metric_name: &MetricName,
        current: &ObservationSet,
        previous: &ObservationSet,
    ) -> Self {
        let values = |set: &ObservationSet| -> Vec<f64> {
            set.real_series(metric_name)
                .iter()
                .map(|o| o.value())
                .collect()
        };
        Self::from_values(metric_name.clone(), &values(current), &values(previous))
    }

    /// Record for a metric with no data in either period
    pub fn zero_fallback(metric_name: MetricName) -> Self {
        Self::from_values(metric_name, &[], &[])
    }

    /// Rounded two-period summary for single-metric comparisons
    pub fn to_period_comparison(&self) -> PeriodComparison {
        PeriodComparison {
            period1_value: round_ratio(self.current_avg),
            period2_value: round_ratio(self.previous_avg),
            change: round_ratio(self.delta),
            change_rate: round_ratio(self.delta_pct),
            trend: ChangeDirection::from_change(self.delta),
        }
    }
}

/// Stability index: `(1 - stddev / mean) * 100` over the current period
///
/// One observation or fewer cannot show volatility and scores `100`; so does
/// a zero mean, where the coefficient of variation is undefined.
pub fn stability_index(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return constants::fallback::MAX_STABILITY_PCT;
    }
    let avg = DescriptiveStats::from_values(values).mean;
    if avg == 0.0 {
        return constants::fallback::MAX_STABILITY_PCT;
    }
    (1.0 - population_std_dev(values) / avg) * 100.0
}

/// Single-metric comparison between two explicit periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub period1_value: f64,
    pub period2_value: f64,
    pub change: f64,
    pub change_rate: f64,
    pub trend: ChangeDirection,
}

/// Rankings over a batch of comparison records
///
/// All orderings are stable: ties keep the batch's original order.
pub struct Leaderboard<'a> {
    records: &'a [ComparisonRecord],
}

impl<'a> Leaderboard<'a> {
    pub fn new(records: &'a [ComparisonRecord]) -> Self {
        Self { records }
    }

    /// Highest percentage change first
    pub fn fastest_growth(&self) -> Vec<&'a ComparisonRecord> {
        self.ranked(|a, b| b.delta_pct.total_cmp(&a.delta_pct))
    }

    /// Largest absolute percentage change first
    pub fn largest_swing(&self) -> Vec<&'a ComparisonRecord> {
        self.ranked(|a, b| b.delta_pct.abs().total_cmp(&a.delta_pct.abs()))
    }

    /// Highest stability index first
    pub fn most_stable(&self) -> Vec<&'a ComparisonRecord> {
        self.ranked(|a, b| b.stability_pct.total_cmp(&a.stability_pct))
    }

    fn ranked<F>(&self, compare: F) -> Vec<&'a ComparisonRecord>
    where
        F: Fn(&ComparisonRecord, &ComparisonRecord) -> Ordering,
    {
        let mut ranked: Vec<&'a ComparisonRecord> = self.records.iter().collect();
        ranked.sort_by(|a, b| compare(a, b));
        ranked
    }
}
