//! Dashboard service: data source fetches feeding the metrics engine

use crate::config::EngineSettings;
use crate::domain::metrics::{
    forecast::{self, ForecastHorizon},
    insight::{self, InsightConfig},
    summarize, ComparisonRecord, DateRange, DaysBack, Granularity, Insight, MetricName,
    ModuleAverages, ModuleId, Observation, ObservationSet, PeriodComparison, PivotTable,
    SummaryRecord,
};
use crate::infrastructure::{log_messages, DataSource, DataSourceError};
use crate::Result;
use chrono::NaiveDate;
use futures_util::stream::{self, StreamExt};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Everything the overview screen shows for one module and range
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSnapshot {
    pub module_id: ModuleId,
    pub range: DateRange,
    /// Granularity actually requested after adapting to the range
    pub granularity: Granularity,
    pub observations: ObservationSet,
    pub summaries: Vec<SummaryRecord>,
    pub pivot: PivotTable,
    pub insights: Vec<Insight>,
}

impl ModuleSnapshot {
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Orchestrates one data source and the engine components
pub struct DashboardService {
    source: Arc<dyn DataSource>,
    engine: EngineSettings,
    rng: Mutex<StdRng>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn DataSource>, engine: EngineSettings) -> Self {
        Self {
            source,
            engine,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Service whose chart forecasts are reproducible
    pub fn with_seed(source: Arc<dyn DataSource>, engine: EngineSettings, seed: u64) -> Self {
        Self {
            source,
            engine,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn engine(&self) -> &EngineSettings {
        &self.engine
    }

    pub fn insight_config(&self) -> InsightConfig {
        self.engine.insight_config()
    }

    /// Fetch a module's observations and compute the overview
    #[instrument(skip(self), fields(source = %self.source.id()))]
    pub async fn load_module(
        &self,
        module_id: &ModuleId,
        range: &DateRange,
        granularity: Granularity,
    ) -> Result<ModuleSnapshot> {
        let adapted = granularity.adapted_to(range);
        if adapted != granularity {
            debug!(
                requested = %granularity,
                adapted = %adapted,
                days = range.days_inclusive(),
                "{}",
                log_messages::dashboard::GRANULARITY_ADAPTED
            );
        }

        let observations = self.source.fetch_metrics(module_id, range, adapted).await?;
        if observations.is_empty() {
            info!("{}", log_messages::dashboard::EMPTY_MODULE);
        }

        let snapshot = ModuleSnapshot {
            module_id: module_id.clone(),
            range: *range,
            granularity: adapted,
            summaries: summarize(&observations),
            pivot: PivotTable::build(&observations),
            insights: self.insights(&observations),
            observations,
        };
        info!(
            metrics = snapshot.summaries.len(),
            observations = snapshot.observations.len(),
            "{}",
            log_messages::dashboard::MODULE_LOADED
        );
        Ok(snapshot)
    }

    /// Insights with the stable fallback applied
    pub fn insights(&self, observations: &ObservationSet) -> Vec<Insight> {
        insight::insights_for(observations, &self.insight_config())
    }

    /// Compare each metric of the current period with the previous period
    ///
    /// Only the first `comparison_metric_cap` metrics (encounter order) are
    /// compared. Previous-period fetches run concurrently, at most
    /// `comparison_concurrency` at a time, and results keep metric order. A
    /// failed fetch degrades its metric to an empty previous period; a
    /// systemic failure aborts the batch.
    #[instrument(skip(self, current), fields(source = %self.source.id()))]
    pub async fn compare_periods(
        &self,
        module_id: &ModuleId,
        range: &DateRange,
        granularity: Granularity,
        current: &ObservationSet,
    ) -> Result<Vec<ComparisonRecord>> {
        let previous_range = range.previous_period();
        let metric_names: Vec<MetricName> = current
            .metric_names()
            .into_iter()
            .take(self.engine.comparison_metric_cap)
            .collect();
        info!(
            metrics = metric_names.len(),
            previous_start = %previous_range.start(),
            previous_end = %previous_range.end(),
            "{}",
            log_messages::dashboard::COMPARISON_STARTED
        );

        let source = &self.source;
        let fetched: Vec<(MetricName, std::result::Result<ObservationSet, DataSourceError>)> =
            stream::iter(metric_names)
                .map(|name| async move {
                    let result = source
                        .fetch_metric(module_id, &name, &previous_range, granularity)
                        .await;
                    (name, result)
                })
                .buffered(self.engine.comparison_concurrency.max(1))
                .collect()
                .await;

        let mut records = Vec::with_capacity(fetched.len());
        for (name, result) in fetched {
            let previous = match result {
                Ok(previous) => previous,
                Err(error) if error.is_systemic() => {
                    warn!(error = %error, "{}", log_messages::dashboard::COMPARISON_ABORTED);
                    return Err(error.into());
                }
                Err(error) => {
                    warn!(
                        metric = %name,
                        error = %error,
                        "{}",
                        log_messages::dashboard::METRIC_DEGRADED
                    );
                    ObservationSet::empty()
                }
            };
            records.push(ComparisonRecord::from_sets(&name, current, &previous));
        }

        info!(
            records = records.len(),
            "{}",
            log_messages::dashboard::COMPARISON_COMPLETED
        );
        Ok(records)
    }

    /// Rounded comparison of one metric between two explicit periods
    #[instrument(skip(self), fields(source = %self.source.id()))]
    pub async fn period_comparison(
        &self,
        module_id: &ModuleId,
        metric_name: &MetricName,
        period1: &DateRange,
        period2: &DateRange,
    ) -> Result<PeriodComparison> {
        let (first, second) = futures_util::future::try_join(
            self.source
                .fetch_metric(module_id, metric_name, period1, Granularity::Day),
            self.source
                .fetch_metric(module_id, metric_name, period2, Granularity::Day),
        )
        .await?;

        Ok(ComparisonRecord::from_sets(metric_name, &first, &second).to_period_comparison())
    }

    /// 7-day and 15-day trailing averages ending at `today`
    #[instrument(skip(self), fields(source = %self.source.id()))]
    pub async fn module_averages(
        &self,
        module_id: &ModuleId,
        today: NaiveDate,
    ) -> Result<ModuleAverages> {
        let short_range = DateRange::trailing(today, DaysBack::week());
        let long_range = DateRange::trailing(today, DaysBack::fortnight());

        let (short_window, long_window) = futures_util::future::try_join(
            self.source
                .fetch_stable_metrics(module_id, &short_range, Granularity::Day),
            self.source
                .fetch_stable_metrics(module_id, &long_range, Granularity::Day),
        )
        .await?;

        Ok(ModuleAverages::from_windows(&short_window, &long_window))
    }

    /// Real observations of one metric followed by chart forecast points
    pub fn chart_series(
        &self,
        observations: &ObservationSet,
        metric_name: &MetricName,
    ) -> Result<Vec<Observation>> {
        let horizon = self.engine.chart_horizon()?;
        Ok(self.chart_series_with_horizon(observations, metric_name, horizon))
    }

    pub fn chart_series_with_horizon(
        &self,
        observations: &ObservationSet,
        metric_name: &MetricName,
        horizon: ForecastHorizon,
    ) -> Vec<Observation> {
        let real: Vec<Observation> = observations
            .real_series(metric_name)
            .into_iter()
            .cloned()
            .collect();
        let points = {
            let mut rng = self.rng.lock();
            forecast::extend(real.last(), horizon, &mut *rng)
        };
        real.into_iter().chain(points).collect()
    }
}
