//! Time period types for metrics analysis

use crate::domain::metrics::{constants::time_intervals, MetricsError};
use chrono::{Days, NaiveDate};
use nutype::nutype;
use serde::{Deserialize, Serialize};

/// Number of days to look back for trailing windows
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
pub struct DaysBack(i64);

impl DaysBack {
    /// Last week (7 days)
    pub fn week() -> Self {
        Self::try_new(time_intervals::SHORT_WINDOW_DAYS).unwrap()
    }

    /// Last fifteen days
    pub fn fortnight() -> Self {
        Self::try_new(time_intervals::LONG_WINDOW_DAYS).unwrap()
    }
}

/// Sampling interval requested from the data source
///
/// Affects how densely upstream samples a range, never the engine's math.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    #[display("day")]
    Day,
    #[display("week")]
    Week,
    #[display("month")]
    Month,
}

impl Granularity {
    /// Calendar days between consecutive samples
    pub fn step_days(&self) -> u64 {
        match self {
            Self::Day => time_intervals::DAY_STEP,
            Self::Week => time_intervals::WEEK_STEP,
            Self::Month => time_intervals::MONTH_STEP,
        }
    }

    /// Coarser granularity for long ranges
    ///
    /// Ranges over 90 days always use months; ranges over 31 days promote a
    /// day view to weeks. Anything else keeps the current choice.
    pub fn adapted_to(self, range: &DateRange) -> Self {
        let days = range.days_inclusive();
        if days > time_intervals::MONTHLY_THRESHOLD_DAYS {
            Self::Month
        } else if days > time_intervals::WEEKLY_THRESHOLD_DAYS && self == Self::Day {
            Self::Week
        } else {
            self
        }
    }
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RangeBounds")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

/// Unchecked wire form of [`DateRange`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RangeBounds {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RangeBounds> for DateRange {
    type Error = MetricsError;

    fn try_from(bounds: RangeBounds) -> Result<Self, Self::Error> {
        Self::try_new(bounds.start, bounds.end)
    }
}

impl DateRange {
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Result<Self, MetricsError> {
        if start > end {
            return Err(MetricsError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// `[end - days_back, end]`, the window the trailing averages use
    pub fn trailing(end: NaiveDate, days_back: DaysBack) -> Self {
        let start = end
            .checked_sub_days(Days::new(days_back.into_inner() as u64))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, counting both ends
    pub fn days_inclusive(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days() + 1
    }

    /// The equal-length period ending the day before this one starts
    ///
    /// For `[start, end]` this is `[start - (end - start) - 1, start - 1]`.
    pub fn previous_period(&self) -> Self {
        let span = self.end.signed_duration_since(self.start).num_days() as u64;
        let end = self
            .start
            .checked_sub_days(Days::new(1))
            .unwrap_or(NaiveDate::MIN);
        let start = end.checked_sub_days(Days::new(span)).unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    /// Sample dates from `start`, stepping by granularity, never past `end`
    pub fn sample_dates(&self, granularity: Granularity) -> Vec<NaiveDate> {
        let step = Days::new(granularity.step_days());
        std::iter::successors(Some(self.start), |d| d.checked_add_days(step))
            .take_while(|d| *d <= self.end)
            .collect()
    }
}
