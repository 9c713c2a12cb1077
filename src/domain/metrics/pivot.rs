//! Time pivot: one row per metric, one column per date

use crate::domain::metrics::{
    constants,
    summary::DescriptiveStats,
    trend::TrendDirection,
    values::{PercentageChange, StabilityThreshold},
    MetricName, Observation, ObservationSet, Unit,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One cell of a pivot row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PivotCell {
    /// The metric has no observation on this date
    NoData,
    #[serde(rename_all = "camelCase")]
    Value { value: f64, day_over_day_pct: f64 },
}

impl PivotCell {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::NoData => None,
            Self::Value { value, .. } => Some(*value),
        }
    }

    pub fn day_over_day_pct(&self) -> Option<f64> {
        match self {
            Self::NoData => None,
            Self::Value {
                day_over_day_pct, ..
            } => Some(*day_over_day_pct),
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

/// Per-metric row of the pivot table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotRow {
    pub metric_name: MetricName,
    pub unit: Unit,
    pub cells: BTreeMap<NaiveDate, PivotCell>,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub trend: TrendDirection,
}

impl PivotRow {
    /// Build a row from a non-empty, date-sorted series
    ///
    /// `columns` must contain every date of the series; columns the metric
    /// has no data for become [`PivotCell::NoData`].
    fn from_series(
        metric_name: MetricName,
        series: &[&Observation],
        columns: &[NaiveDate],
        threshold: StabilityThreshold,
    ) -> Option<Self> {
        let first = series.first()?;
        let values: Vec<f64> = series.iter().map(|o| o.value()).collect();
        let stats = DescriptiveStats::from_values(&values);

        let mut cells: BTreeMap<NaiveDate, PivotCell> = columns
            .iter()
            .map(|date| (*date, PivotCell::NoData))
            .collect();

        // Changes are measured against the previous date's cell; a repeated
        // date overwrites its cell in encounter order
        let mut baseline: Option<f64> = None;
        let mut last: Option<(NaiveDate, f64)> = None;
        for observation in series {
            let value = observation.value();
            if let Some((date, previous)) = last {
                if date != observation.date() {
                    baseline = Some(previous);
                }
            }
            let day_over_day_pct = baseline
                .map(|prev| PercentageChange::between(value, prev).into_inner())
                .unwrap_or(constants::fallback::ZERO_BASELINE_CHANGE_PCT);
            cells.insert(
                observation.date(),
                PivotCell::Value {
                    value,
                    day_over_day_pct,
                },
            );
            last = Some((observation.date(), value));
        }

        Some(Self {
            metric_name,
            unit: first.unit().clone(),
            cells,
            average: stats.mean,
            max: stats.max,
            min: stats.min,
            trend: TrendDirection::classify(&values, threshold),
        })
    }

    pub fn cell(&self, date: NaiveDate) -> PivotCell {
        self.cells.get(&date).copied().unwrap_or(PivotCell::NoData)
    }
}

/// Metrics by dates, over real observations only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotTable {
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    /// Pivot with the standard 2% trend band
    pub fn build(set: &ObservationSet) -> Self {
        Self::build_with_threshold(set, StabilityThreshold::standard())
    }

    pub fn build_with_threshold(set: &ObservationSet, threshold: StabilityThreshold) -> Self {
        let dates = set.dates();
        let rows = set
            .real_series_by_metric()
            .into_iter()
            .filter_map(|(name, series)| PivotRow::from_series(name, &series, &dates, threshold))
            .collect();

        Self { dates, rows }
    }

    pub fn row(&self, metric_name: &MetricName) -> Option<&PivotRow> {
        self.rows.iter().find(|r| &r.metric_name == metric_name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
