//! Domain value types for metrics calculations
//!
//! Provides validated types for observed values, relative changes and the
//! thresholds used when classifying them, plus the rounding rules applied at
//! the presentation boundary.

use crate::domain::metrics::constants;
use nutype::nutype;

/// A single observed metric value
///
/// Any finite real number is accepted. Metrics are usually non-negative but
/// nothing in the engine relies on it.
#[nutype(
    validate(finite),
    derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Display)
)]
pub struct MetricValue(f64);

/// Relative change between two values, in percentage points
///
/// `12.5` means +12.5%. A zero baseline yields `0` by policy rather than
/// an infinite change.
#[nutype(
    validate(finite),
    derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Display)
)]
pub struct PercentageChange(f64);

impl PercentageChange {
    /// No change (0%)
    pub fn none() -> Self {
        Self::try_new(constants::fallback::ZERO_BASELINE_CHANGE_PCT).unwrap()
    }

    /// `(current - previous) / previous * 100`, or `0` when `previous` is zero
    pub fn between(current: f64, previous: f64) -> Self {
        if previous == 0.0 {
            return Self::none();
        }
        Self::try_new((current - previous) / previous * 100.0).unwrap_or_else(|_| Self::none())
    }
}

/// Threshold for determining if a trend is stable vs changing
///
/// Expressed as a fraction: `0.02` means values within ±2% of the baseline
/// count as stable.
#[nutype(
    validate(finite, greater = 0.0, less_or_equal = 0.5), // Max 50% threshold
    derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)
)]
pub struct StabilityThreshold(f64);

impl StabilityThreshold {
    /// Standard threshold (2%), used by pivot trend classification
    pub fn standard() -> Self {
        Self::try_new(constants::trend::STABILITY_BAND).unwrap()
    }

    /// Upper multiplier of the stable band (`1 + threshold`)
    pub fn upper_factor(&self) -> f64 {
        1.0 + self.into_inner()
    }

    /// Lower multiplier of the stable band (`1 - threshold`)
    pub fn lower_factor(&self) -> f64 {
        1.0 - self.into_inner()
    }
}

impl Default for StabilityThreshold {
    fn default() -> Self {
        Self::standard()
    }
}

/// Round `value` to `decimals` places, half away from zero
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Round a derived ratio (averages, change rates) for display
pub fn round_ratio(value: f64) -> f64 {
    round_to(value, constants::rounding::RATIO_DECIMALS)
}
