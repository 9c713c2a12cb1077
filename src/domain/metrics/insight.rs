//! Insight triggers: deviation of the latest value from the period average

use crate::domain::metrics::{
    constants::insight, summary::SummaryRecord, MetricName, ObservationSet,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the average the latest value falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviationDirection {
    Above,
    Below,
}

impl fmt::Display for DeviationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Above => write!(f, "above"),
            Self::Below => write!(f, "below"),
        }
    }
}

/// A metric whose latest value deviates from its average beyond the threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviationSignal {
    pub metric_name: MetricName,
    pub direction: DeviationDirection,
    /// Absolute deviation in percent
    pub magnitude: f64,
    pub latest_value: f64,
    pub average: f64,
}

/// Thresholds for deviation detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    pub min_observations: usize,
    pub threshold_pct: f64,
    pub max_signals: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            min_observations: insight::MIN_OBSERVATIONS,
            threshold_pct: insight::DEVIATION_THRESHOLD_PCT,
            max_signals: insight::MAX_SIGNALS,
        }
    }
}

/// Scan every metric of a set for latest-vs-average deviations
///
/// Metrics with fewer than `min_observations` real observations are skipped.
/// A zero average is replaced by `1` as the divisor. At most `max_signals`
/// signals are returned, in metric-encounter order.
pub fn detect_deviations(set: &ObservationSet, config: &InsightConfig) -> Vec<DeviationSignal> {
    set.real_series_by_metric()
        .into_iter()
        .filter(|(_, series)| series.len() >= config.min_observations)
        .filter_map(|(name, series)| {
            let summary = SummaryRecord::from_series(name, &series);
            let latest_value = summary.latest.as_ref()?.value();
            let divisor = if summary.average != 0.0 {
                summary.average
            } else {
                1.0
            };
            let deviation_pct = (latest_value - summary.average) / divisor * 100.0;

            (deviation_pct.abs() > config.threshold_pct).then(|| DeviationSignal {
                direction: if latest_value > summary.average {
                    DeviationDirection::Above
                } else {
                    DeviationDirection::Below
                },
                magnitude: deviation_pct.abs(),
                latest_value,
                average: summary.average,
                metric_name: summary.metric_name,
            })
        })
        .take(config.max_signals)
        .collect()
}

/// Whether the caller must add the generic stable messages
pub fn needs_stable_fallback(signals: &[DeviationSignal]) -> bool {
    signals.len() < insight::FALLBACK_SIGNAL_MINIMUM
}

/// Generic messages used when too few deviations were found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StableNote {
    /// Overall volatility sits inside the normal band
    VolatilityWithinBand,
    /// Long-range movement is flat
    LongTermFlat,
}

/// Presentation-ready insight for a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum Insight {
    Deviation(DeviationSignal),
    Stable(StableNote),
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deviation(signal) => write!(
                f,
                "Metric [{}] is significantly {} its period level ({:.1}%), possible business anomaly.",
                signal.metric_name, signal.direction, signal.magnitude
            ),
            Self::Stable(StableNote::VolatilityWithinBand) => write!(
                f,
                "Module volatility is within the normal ±15% band; operations are steady."
            ),
            Self::Stable(StableNote::LongTermFlat) => write!(
                f,
                "Keep watching core conversion rates; the long-range trend is flat."
            ),
        }
    }
}

/// Turn signals into insights, padding with stable notes when fewer than two
pub fn compose_insights(signals: Vec<DeviationSignal>, max_insights: usize) -> Vec<Insight> {
    let fallback = needs_stable_fallback(&signals);
    let mut insights: Vec<Insight> = signals.into_iter().map(Insight::Deviation).collect();
    if fallback {
        insights.push(Insight::Stable(StableNote::VolatilityWithinBand));
        insights.push(Insight::Stable(StableNote::LongTermFlat));
    }
    insights.truncate(max_insights);
    insights
}

/// Detect and compose in one step
pub fn insights_for(set: &ObservationSet, config: &InsightConfig) -> Vec<Insight> {
    compose_insights(detect_deviations(set, config), config.max_signals)
}
