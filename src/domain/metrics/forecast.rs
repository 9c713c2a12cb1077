//! Naive forecast extension for chart continuity
//!
//! Forecast points are independent draws around a fixed seed value, clamped
//! at zero. This is a display placeholder rather than a statistical model:
//! the next point never builds on the previous one.

use crate::domain::metrics::{constants, MetricValue, Observation};
use chrono::Days;
use nutype::nutype;
use rand::Rng;
use tracing::warn;

/// Number of forecast points to generate (at least one)
#[nutype(
    validate(greater = 0, less_or_equal = 365),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Serialize,
        Deserialize,
        Hash
    )
)]
pub struct ForecastHorizon(usize);

impl ForecastHorizon {
    /// Single point, appended by data sources
    pub fn one() -> Self {
        Self::try_new(1).unwrap()
    }

    /// Default chart extension
    pub fn chart_default() -> Self {
        Self::try_new(constants::forecast::DEFAULT_CHART_HORIZON).unwrap()
    }
}

/// Extend a seed observation `horizon` calendar days into the future
///
/// Point `i` (1-based) is dated `seed.date + i` and valued
/// `max(0, seed.value + noise)` with `noise` uniform in
/// `[-0.3, 0.7) * seed.value * 0.05`. No seed, or a seed that is itself a
/// forecast, yields no points.
pub fn extend<R: Rng + ?Sized>(
    seed: Option<&Observation>,
    horizon: ForecastHorizon,
    rng: &mut R,
) -> Vec<Observation> {
    let Some(seed) = seed else {
        return Vec::new();
    };
    if seed.is_forecast() {
        warn!(
            metric = %seed.metric_name(),
            "Refusing to extend a forecast from a forecast point"
        );
        return Vec::new();
    }

    let base = seed.value();
    let amplitude = base * constants::forecast::AMPLITUDE_RATIO;

    (1..=horizon.into_inner() as u64)
        .map_while(|step| seed.date().checked_add_days(Days::new(step)))
        .filter_map(|date| {
            let noise = (rng.gen::<f64>() - constants::forecast::NOISE_OFFSET) * amplitude;
            let value = (base + noise).max(constants::forecast::VALUE_FLOOR);
            MetricValue::try_new(value)
                .ok()
                .map(|value| seed.forecast_at(date, value))
        })
        .collect()
}
