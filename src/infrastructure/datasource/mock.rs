//! In-process mock data source backed by the demo catalog

use super::{DataSource, DataSourceError, DataSourceId};
use crate::domain::metrics::{
    demo_data::{DemoDataGenerator, GenerationMode},
    forecast::{self, ForecastHorizon},
    DateRange, Granularity, ModuleId, ObservationSet,
};
use crate::infrastructure::log_messages;
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, instrument};

/// Mock source generating catalog metrics on the fly
///
/// Static mode produces the same value for the same date on every call.
/// When `append_forecast` is on, each non-empty result ends with one forecast
/// point seeded from the last generated observation.
pub struct MockDataSource {
    mode: GenerationMode,
    append_forecast: bool,
    rng: Mutex<StdRng>,
}

impl MockDataSource {
    pub fn new(mode: GenerationMode, append_forecast: bool, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            mode,
            append_forecast,
            rng: Mutex::new(rng),
        }
    }

    /// Deterministic source without forecast points
    pub fn deterministic() -> Self {
        Self::new(GenerationMode::Static, false, Some(0))
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    fn generate(
        &self,
        module_id: &ModuleId,
        range: &DateRange,
        granularity: Granularity,
        mode: GenerationMode,
        append_forecast: bool,
    ) -> Result<ObservationSet, DataSourceError> {
        let generator = DemoDataGenerator::for_module(module_id)
            .ok_or_else(|| DataSourceError::UnknownModule(module_id.to_string()))?;

        let mut rng = self.rng.lock();
        let set = generator.generate(range, granularity, mode, &mut *rng);
        if !append_forecast {
            return Ok(set);
        }

        let points = forecast::extend(set.as_slice().last(), ForecastHorizon::one(), &mut *rng);
        Ok(set.merged_with(points))
    }
}

impl Default for MockDataSource {
    fn default() -> Self {
        Self::new(GenerationMode::Static, true, None)
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    fn id(&self) -> DataSourceId {
        DataSourceId::mock()
    }

    #[instrument(skip(self), fields(source = DataSourceId::MOCK))]
    async fn fetch_metrics(
        &self,
        module_id: &ModuleId,
        range: &DateRange,
        granularity: Granularity,
    ) -> Result<ObservationSet, DataSourceError> {
        let set = self.generate(
            module_id,
            range,
            granularity,
            self.mode,
            self.append_forecast,
        )?;
        debug!(
            observations = set.len(),
            "{}",
            log_messages::data_source::MOCK_GENERATED
        );
        Ok(set)
    }

    /// Static-mode observations without forecast points, whatever the
    /// configured mode
    #[instrument(skip(self), fields(source = DataSourceId::MOCK))]
    async fn fetch_stable_metrics(
        &self,
        module_id: &ModuleId,
        range: &DateRange,
        granularity: Granularity,
    ) -> Result<ObservationSet, DataSourceError> {
        self.generate(module_id, range, granularity, GenerationMode::Static, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn module(id: &str) -> ModuleId {
        ModuleId::try_new(id.to_string()).unwrap()
    }

    fn range(start: &str, end: &str) -> DateRange {
        let parse = |raw: &str| NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap();
        DateRange::try_new(parse(start), parse(end)).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_module_is_rejected() {
        let source = MockDataSource::deterministic();
        let result = source
            .fetch_metrics(&module("photo_archive"), &range("2024-01-01", "2024-01-02"), Granularity::Day)
            .await;
        assert!(matches!(result, Err(DataSourceError::UnknownModule(_))));
    }

    #[tokio::test]
    async fn test_photo_inventory_is_served_in_both_modes() {
        let query = range("2024-01-01", "2024-01-01");
        for mode in [GenerationMode::Static, GenerationMode::Random] {
            let set = MockDataSource::new(mode, false, Some(5))
                .fetch_metrics(&module("photo_inventory"), &query, Granularity::Day)
                .await
                .unwrap();
            assert_eq!(set.len(), 27);
            assert_eq!(set.metric_names().len(), 27);
        }
    }

    #[tokio::test]
    async fn test_appends_single_forecast_point() {
        let source = MockDataSource::new(GenerationMode::Static, true, Some(42));
        let set = source
            .fetch_metrics(&module("ai_tongue"), &range("2024-01-01", "2024-01-03"), Granularity::Day)
            .await
            .unwrap();

        assert_eq!(set.len(), 3 * 4 + 1);
        let last = set.as_slice().last().unwrap();
        assert!(last.is_forecast());
        assert_eq!(last.date(), NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(set.real().len(), 12);
    }

    #[tokio::test]
    async fn test_static_mode_is_repeatable() {
        let source = MockDataSource::deterministic();
        let query = range("2024-02-01", "2024-02-10");
        let first = source.fetch_metrics(&module("voice_records"), &query, Granularity::Day).await.unwrap();
        let second = source.fetch_metrics(&module("voice_records"), &query, Granularity::Day).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_stable_fetch_ignores_random_mode() {
        let query = range("2024-02-01", "2024-02-05");
        let random = MockDataSource::new(GenerationMode::Random, true, Some(3));
        let stable = random
            .fetch_stable_metrics(&module("voice_records"), &query, Granularity::Day)
            .await
            .unwrap();
        let reference = MockDataSource::deterministic()
            .fetch_metrics(&module("voice_records"), &query, Granularity::Day)
            .await
            .unwrap();

        assert_eq!(stable, reference);
        assert!(!stable.iter().any(|o| o.is_forecast()));
    }

    #[tokio::test]
    async fn test_seeded_random_mode_is_reproducible() {
        let query = range("2024-02-01", "2024-02-05");
        let first = MockDataSource::new(GenerationMode::Random, false, Some(7))
            .fetch_metrics(&module("ai_diagnosis"), &query, Granularity::Day)
            .await
            .unwrap();
        let second = MockDataSource::new(GenerationMode::Random, false, Some(7))
            .fetch_metrics(&module("ai_diagnosis"), &query, Granularity::Day)
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fetch_metric_filters_one_metric() {
        let source = MockDataSource::deterministic();
        let name = crate::domain::metrics::MetricName::try_new("采纳率".to_string()).unwrap();
        let set = source
            .fetch_metric(&module("ai_tongue"), &name, &range("2024-01-01", "2024-01-05"), Granularity::Day)
            .await
            .unwrap();
        assert_eq!(set.len(), 5);
        assert_eq!(set.metric_names(), vec![name]);
    }

    #[test]
    fn test_mock_reports_its_id_and_mode() {
        let source = MockDataSource::default();
        assert_eq!(source.id(), DataSourceId::mock());
        assert_eq!(source.mode(), GenerationMode::Static);

        let set = tokio_test::block_on(source.fetch_metrics(
            &module("ai_diagnosis"),
            &range("2024-03-01", "2024-03-01"),
            Granularity::Day,
        ))
        .unwrap();
        assert!(set.as_slice().last().unwrap().is_forecast());
    }
}
