//! Constants for metric aggregation, comparison and demo data generation

/// Fallback values used when a computation has nothing to work with
pub mod fallback {
    /// Average, max and min reported for an empty observation set
    pub const EMPTY_STATISTIC: f64 = 0.0;

    /// Stability reported when volatility cannot be measured
    pub const MAX_STABILITY_PCT: f64 = 100.0;

    /// Percentage change reported when the baseline is zero
    pub const ZERO_BASELINE_CHANGE_PCT: f64 = 0.0;
}

/// Display rounding rules
pub mod rounding {
    /// Unit tag that marks a percentage metric
    pub const PERCENT_UNIT: &str = "%";

    /// Decimal places for percentage metrics
    pub const PERCENT_DECIMALS: u32 = 1;

    /// Decimal places for every other unit
    pub const DEFAULT_DECIMALS: u32 = 0;

    /// Decimal places for derived ratios regardless of unit
    pub const RATIO_DECIMALS: u32 = 2;
}

/// Naive forecast extension parameters
pub mod forecast {
    /// Share of the seed value used as noise amplitude
    pub const AMPLITUDE_RATIO: f64 = 0.05;

    /// Offset subtracted from a unit draw, giving noise in [-0.3, 0.7) x amplitude
    pub const NOISE_OFFSET: f64 = 0.3;

    /// Forecast values never drop below this floor
    pub const VALUE_FLOOR: f64 = 0.0;

    /// Default number of points appended to chart series
    pub const DEFAULT_CHART_HORIZON: usize = 5;
}

/// Pivot row trend classification
pub mod trend {
    /// Observations averaged at each end of a row
    pub const WINDOW: usize = 3;

    /// Relative band inside which a row counts as stable
    pub const STABILITY_BAND: f64 = 0.02;
}

/// Deviation detection thresholds
pub mod insight {
    /// Metrics need at least this many observations to be checked
    pub const MIN_OBSERVATIONS: usize = 5;

    /// Absolute deviation from the period average that triggers a signal
    pub const DEVIATION_THRESHOLD_PCT: f64 = 20.0;

    /// Signals reported per module
    pub const MAX_SIGNALS: usize = 3;

    /// Fewer signals than this require the generic stable fallback
    pub const FALLBACK_SIGNAL_MINIMUM: usize = 2;
}

/// Period comparison batch limits
pub mod comparison {
    /// Metric names compared per batch
    pub const METRIC_CAP: usize = 8;

    /// Concurrent upstream fetches per batch
    pub const CONCURRENCY: usize = 4;
}

/// Calendar stepping and window sizes
pub mod time_intervals {
    /// Days advanced per sample at day granularity
    pub const DAY_STEP: u64 = 1;

    /// Days advanced per sample at week granularity
    pub const WEEK_STEP: u64 = 7;

    /// Days advanced per sample at month granularity
    pub const MONTH_STEP: u64 = 30;

    /// Ranges longer than this switch day views to weeks
    pub const WEEKLY_THRESHOLD_DAYS: i64 = 31;

    /// Ranges longer than this switch to months
    pub const MONTHLY_THRESHOLD_DAYS: i64 = 90;

    /// Short trailing average window
    pub const SHORT_WINDOW_DAYS: i64 = 7;

    /// Long trailing average window
    pub const LONG_WINDOW_DAYS: i64 = 15;
}

/// Constants for demo data generation
pub mod demo_generation {
    /// Reference day for the deterministic wave (2024-01-01)
    pub const STATIC_EPOCH: (i32, u32, u32) = (2024, 1, 1);

    /// Angular step of the deterministic wave per day
    pub const WAVE_FREQUENCY: f64 = 0.5;

    /// Wave amplitude as a share of the base value
    pub const WAVE_AMPLITUDE: f64 = 0.2;

    /// Upper bound of generated random percentages
    pub const MAX_PERCENTAGE: f64 = 100.0;
}
