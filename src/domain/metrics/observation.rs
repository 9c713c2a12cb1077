//! Observations: the raw input of the aggregation engine
//!
//! An [`Observation`] is one dated, unit-tagged numeric fact for a metric of
//! a product module. An [`ObservationSet`] is the immutable collection a data
//! source returns for one query; every engine component is a pure function
//! over it.

use crate::domain::metrics::{constants, values::round_to, MetricValue, MetricsError};
use chrono::NaiveDate;
use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Product module identifier (e.g. `ai_diagnosis`)
#[nutype(
    sanitize(trim, lowercase),
    validate(not_empty, len_char_max = 64, regex = r"^[a-z][a-z0-9_]*$"),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        PartialOrd,
        Ord,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct ModuleId(String);

/// Human-facing metric name, unique within a module
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 128),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        PartialOrd,
        Ord,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct MetricName(String);

/// Short display tag for a metric's unit (`%`, `个`, `次`, ...)
///
/// The unit decides how many decimals a value keeps when shown.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 16),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct Unit(String);

impl Unit {
    /// Percentage unit
    pub fn percent() -> Self {
        Self::try_new(constants::rounding::PERCENT_UNIT.to_string()).unwrap()
    }

    /// Whether values in this unit are percentages
    pub fn is_percentage(&self) -> bool {
        self.as_ref() == constants::rounding::PERCENT_UNIT
    }

    /// Decimal places kept when displaying a value of this unit
    pub fn decimal_places(&self) -> u32 {
        if self.is_percentage() {
            constants::rounding::PERCENT_DECIMALS
        } else {
            constants::rounding::DEFAULT_DECIMALS
        }
    }

    /// Round a value for display according to this unit
    pub fn round(&self, value: f64) -> f64 {
        round_to(value, self.decimal_places())
    }

    /// Render a value with this unit's precision, without the unit suffix
    pub fn format_value(&self, value: f64) -> String {
        format!("{:.*}", self.decimal_places() as usize, self.round(value))
    }
}

/// One dated numeric fact for a metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    module_id: ModuleId,
    metric_name: MetricName,
    date: NaiveDate,
    value: MetricValue,
    unit: Unit,
    #[serde(default)]
    is_forecast: bool,
}

impl Observation {
    /// Create a real (non-forecast) observation
    pub fn new(
        module_id: ModuleId,
        metric_name: MetricName,
        date: NaiveDate,
        value: MetricValue,
        unit: Unit,
    ) -> Self {
        Self {
            module_id,
            metric_name,
            date,
            value,
            unit,
            is_forecast: false,
        }
    }

    /// Validate loosely-typed upstream fields into an observation
    pub fn try_from_raw(
        module_id: &str,
        metric_name: &str,
        date: &str,
        value: f64,
        unit: &str,
    ) -> Result<Self, MetricsError> {
        let module_id = ModuleId::try_new(module_id.to_string())
            .map_err(|e| MetricsError::InvalidModuleId(format!("{module_id:?}: {e}")))?;
        let metric_name = MetricName::try_new(metric_name.to_string())
            .map_err(|e| MetricsError::InvalidMetricName(format!("{metric_name:?}: {e}")))?;
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| MetricsError::InvalidDate(date.to_string()))?;
        let value = MetricValue::try_new(value).map_err(|_| MetricsError::InvalidValue(value))?;
        let unit = Unit::try_new(unit.to_string())
            .map_err(|e| MetricsError::InvalidUnit(format!("{unit:?}: {e}")))?;

        Ok(Self::new(module_id, metric_name, date, value, unit))
    }

    /// Derive a forecast point from this observation
    ///
    /// Every field except date and value is copied.
    pub fn forecast_at(&self, date: NaiveDate, value: MetricValue) -> Self {
        Self {
            date,
            value,
            is_forecast: true,
            ..self.clone()
        }
    }

    pub fn module_id(&self) -> &ModuleId {
        &self.module_id
    }

    pub fn metric_name(&self) -> &MetricName {
        &self.metric_name
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Raw value at full precision
    pub fn value(&self) -> f64 {
        self.value.into_inner()
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn is_forecast(&self) -> bool {
        self.is_forecast
    }

    /// Flat export view of this observation
    pub fn to_csv_record(&self) -> CsvRecord {
        CsvRecord {
            metric_name: self.metric_name.to_string(),
            date: self.date,
            value: self.value(),
            unit: self.unit.to_string(),
        }
    }
}

/// Flat `metricName,date,value,unit` row used by exporters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvRecord {
    pub metric_name: String,
    pub date: NaiveDate,
    pub value: f64,
    pub unit: String,
}

impl CsvRecord {
    /// Column names, matching the serialized field names
    pub const HEADER: [&'static str; 4] = ["metricName", "date", "value", "unit"];
}

/// Immutable collection of observations returned for one query
///
/// Order is not meaningful for the statistics, but metric names are reported
/// in first-encounter order so that capped outputs are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationSet {
    observations: Vec<Observation>,
}

impl ObservationSet {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.observations
    }

    /// Distinct metric names in first-encounter order
    pub fn metric_names(&self) -> Vec<MetricName> {
        let mut seen = HashSet::new();
        self.observations
            .iter()
            .filter(|o| seen.insert(o.metric_name()))
            .map(|o| o.metric_name().clone())
            .collect()
    }

    /// Observations of one metric, forecasts included
    pub fn for_metric(&self, metric_name: &MetricName) -> ObservationSet {
        self.observations
            .iter()
            .filter(|o| o.metric_name() == metric_name)
            .cloned()
            .collect()
    }

    /// Observations excluding synthetic forecast points
    pub fn real(&self) -> ObservationSet {
        self.observations
            .iter()
            .filter(|o| !o.is_forecast())
            .cloned()
            .collect()
    }

    /// Real observations of one metric sorted by calendar date
    ///
    /// The sort is stable, so duplicates keep their encounter order.
    pub fn real_series(&self, metric_name: &MetricName) -> Vec<&Observation> {
        let mut series: Vec<&Observation> = self
            .observations
            .iter()
            .filter(|o| !o.is_forecast() && o.metric_name() == metric_name)
            .collect();
        series.sort_by_key(|o| o.date());
        warn_on_duplicate_dates(metric_name, &series);
        series
    }

    /// Real observations grouped by metric, groups in encounter order
    pub fn real_series_by_metric(&self) -> Vec<(MetricName, Vec<&Observation>)> {
        self.metric_names()
            .into_iter()
            .map(|name| {
                let series = self.real_series(&name);
                (name, series)
            })
            .filter(|(_, series)| !series.is_empty())
            .collect()
    }

    /// Distinct dates of real observations, ascending
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .observations
            .iter()
            .filter(|o| !o.is_forecast())
            .map(Observation::date)
            .collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }

    /// Flat export rows in stored order
    pub fn to_csv_records(&self) -> Vec<CsvRecord> {
        self.observations
            .iter()
            .map(Observation::to_csv_record)
            .collect()
    }

    /// New set with `other` appended
    pub fn merged_with(&self, other: impl IntoIterator<Item = Observation>) -> ObservationSet {
        self.observations
            .iter()
            .cloned()
            .chain(other)
            .collect()
    }
}

impl FromIterator<Observation> for ObservationSet {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for ObservationSet {
    type Item = Observation;
    type IntoIter = std::vec::IntoIter<Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ObservationSet {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

/// Report repeated dates within one metric's date-sorted series
///
/// Duplicates are a caller error with no defined precedence; the engine keeps
/// going and the last encountered value wins wherever one is picked.
fn warn_on_duplicate_dates(metric_name: &MetricName, sorted: &[&Observation]) {
    if let Some(pair) = sorted.windows(2).find(|w| w[0].date() == w[1].date()) {
        warn!(
            metric = %metric_name,
            date = %pair[0].date(),
            "Duplicate observation date for metric; last value wins"
        );
    }
}
