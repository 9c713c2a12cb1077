//! Trailing window averages (7-day / 15-day cards)

use crate::domain::metrics::{
    summary::DescriptiveStats, values::round_ratio, MetricName, ObservationSet, Unit,
};
use serde::{Deserialize, Serialize};

/// Mean of one metric over a trailing window, rounded to two decimals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailingAverage {
    pub metric_name: MetricName,
    pub value: f64,
    pub unit: Unit,
}

/// Per-metric averages over a window's observations, in encounter order
pub fn trailing_averages(set: &ObservationSet) -> Vec<TrailingAverage> {
    set.real_series_by_metric()
        .into_iter()
        .filter_map(|(metric_name, series)| {
            let unit = series.first()?.unit().clone();
            let values: Vec<f64> = series.iter().map(|o| o.value()).collect();
            Some(TrailingAverage {
                metric_name,
                value: round_ratio(DescriptiveStats::from_values(&values).mean),
                unit,
            })
        })
        .collect()
}

/// Short and long trailing averages for one module
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleAverages {
    pub avg_7d: Vec<TrailingAverage>,
    pub avg_15d: Vec<TrailingAverage>,
}

impl ModuleAverages {
    pub fn from_windows(short_window: &ObservationSet, long_window: &ObservationSet) -> Self {
        Self {
            avg_7d: trailing_averages(short_window),
            avg_15d: trailing_averages(long_window),
        }
    }
}
