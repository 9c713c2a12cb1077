//! Metrics aggregation and comparison engine
//!
//! Pure, synchronous functions over in-memory observation sets: summary
//! statistics, naive forecast extension, period comparison, time pivots and
//! deviation insights. Nothing in this module performs I/O; data arrives as
//! an [`ObservationSet`] validated at the ingestion boundary.

pub mod averages;
pub mod comparison;
pub mod constants;
pub mod demo_data;
pub mod errors;
pub mod forecast;
pub mod insight;
pub mod observation;
pub mod pivot;
pub mod summary;
pub mod time_period;
pub mod trend;
pub mod values;

// Re-export commonly used types
pub use averages::{trailing_averages, ModuleAverages, TrailingAverage};
pub use comparison::{stability_index, ComparisonRecord, Leaderboard, PeriodComparison};
pub use errors::MetricsError;
pub use forecast::ForecastHorizon;
pub use insight::{DeviationDirection, DeviationSignal, Insight, InsightConfig, StableNote};
pub use observation::{CsvRecord, MetricName, ModuleId, Observation, ObservationSet, Unit};
pub use pivot::{PivotCell, PivotRow, PivotTable};
pub use summary::{summarize, DescriptiveStats, SummaryRecord};
pub use time_period::{DateRange, DaysBack, Granularity};
pub use trend::{ChangeDirection, TrendDirection};
pub use values::{MetricValue, PercentageChange, StabilityThreshold};
