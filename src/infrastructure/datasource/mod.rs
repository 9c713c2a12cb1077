//! Data source abstraction for dashboard observations
//!
//! A data source answers `(module, range, granularity)` queries with an
//! [`ObservationSet`]. Sources are registered by name and the active one is
//! resolved explicitly and handed to the service that needs it.

pub mod mock;

pub use mock::MockDataSource;

use crate::domain::metrics::{DateRange, Granularity, MetricName, ModuleId, ObservationSet};
use crate::infrastructure::log_messages;
use async_trait::async_trait;
use nutype::nutype;
use std::sync::Arc;
use tracing::warn;

/// Registered data source name
#[nutype(
    sanitize(trim, lowercase),
    validate(not_empty, regex = r"^[a-z][a-z0-9_-]*$"),
    derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)
)]
pub struct DataSourceId(String);

impl DataSourceId {
    pub const MOCK: &'static str = "mock";

    pub fn mock() -> Self {
        Self::try_new(Self::MOCK.to_string()).unwrap()
    }
}

/// Failures reported by a data source
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataSourceError {
    #[error("Unknown data source: {0}")]
    UnknownSource(String),

    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Upstream request failed: {0}")]
    Upstream(String),
}

impl DataSourceError {
    /// Whether the failure affects every query rather than a single fetch
    ///
    /// Systemic failures abort a comparison batch; the rest only degrade the
    /// metric being fetched.
    pub fn is_systemic(&self) -> bool {
        matches!(self, Self::UnknownSource(_) | Self::UnknownModule(_))
    }
}

/// Upstream collaborator supplying observations
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Registry name of this source
    fn id(&self) -> DataSourceId;

    /// All metrics of a module over a range, sampled by granularity
    async fn fetch_metrics(
        &self,
        module_id: &ModuleId,
        range: &DateRange,
        granularity: Granularity,
    ) -> Result<ObservationSet, DataSourceError>;

    /// One metric of a module over a range
    ///
    /// The default filters [`DataSource::fetch_metrics`]; sources that can
    /// query a single metric cheaply should override it.
    async fn fetch_metric(
        &self,
        module_id: &ModuleId,
        metric_name: &MetricName,
        range: &DateRange,
        granularity: Granularity,
    ) -> Result<ObservationSet, DataSourceError> {
        let set = self.fetch_metrics(module_id, range, granularity).await?;
        Ok(set.for_metric(metric_name))
    }

    /// Observations that must not change between refreshes, such as the
    /// trailing-average cards
    ///
    /// Sources serving recorded data return [`DataSource::fetch_metrics`];
    /// generating sources answer with their deterministic data.
    async fn fetch_stable_metrics(
        &self,
        module_id: &ModuleId,
        range: &DateRange,
        granularity: Granularity,
    ) -> Result<ObservationSet, DataSourceError> {
        self.fetch_metrics(module_id, range, granularity).await
    }
}

/// Named data sources available to the application
#[derive(Default)]
pub struct DataSourceRegistry {
    sources: Vec<Arc<dyn DataSource>>,
}

impl DataSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source, replacing any previous one with the same id
    pub fn register(&mut self, source: Arc<dyn DataSource>) {
        let id = source.id();
        self.sources.retain(|s| s.id() != id);
        self.sources.push(source);
    }

    pub fn get(&self, id: &DataSourceId) -> Option<Arc<dyn DataSource>> {
        self.sources.iter().find(|s| &s.id() == id).cloned()
    }

    pub fn resolve(&self, id: &DataSourceId) -> Result<Arc<dyn DataSource>, DataSourceError> {
        self.get(id)
            .ok_or_else(|| DataSourceError::UnknownSource(id.to_string()))
    }

    /// Resolve a source by name, falling back to the mock source
    ///
    /// Fails only when neither the requested source nor the mock is
    /// registered.
    pub fn resolve_or_mock(&self, name: &str) -> Result<Arc<dyn DataSource>, DataSourceError> {
        if let Some(source) = DataSourceId::try_new(name.to_string())
            .ok()
            .and_then(|id| self.get(&id))
        {
            return Ok(source);
        }

        warn!(
            requested = %name,
            "{}",
            log_messages::data_source::FALLING_BACK_TO_MOCK
        );
        self.resolve(&DataSourceId::mock())
    }

    pub fn ids(&self) -> Vec<DataSourceId> {
        self.sources.iter().map(|s| s.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NamedSource(&'static str);

    #[async_trait]
    impl DataSource for NamedSource {
        fn id(&self) -> DataSourceId {
            DataSourceId::try_new(self.0.to_string()).unwrap()
        }

        async fn fetch_metrics(
            &self,
            _module_id: &ModuleId,
            _range: &DateRange,
            _granularity: Granularity,
        ) -> Result<ObservationSet, DataSourceError> {
            Ok(ObservationSet::empty())
        }
    }

    #[test]
    fn test_resolve_registered_source() {
        let mut registry = DataSourceRegistry::new();
        registry.register(Arc::new(NamedSource("mock")));
        registry.register(Arc::new(NamedSource("warehouse")));

        let source = registry.resolve_or_mock("Warehouse").unwrap();
        assert_eq!(source.id().to_string(), "warehouse");
    }

    #[test]
    fn test_unknown_source_falls_back_to_mock() {
        let mut registry = DataSourceRegistry::new();
        registry.register(Arc::new(NamedSource("mock")));

        let source = registry.resolve_or_mock("supabase").unwrap();
        assert_eq!(source.id(), DataSourceId::mock());
        assert!(registry.resolve_or_mock("not a valid name!").is_ok());
    }

    #[test]
    fn test_missing_mock_is_an_error() {
        let registry = DataSourceRegistry::new();
        assert!(matches!(
            registry.resolve_or_mock("anything"),
            Err(DataSourceError::UnknownSource(_))
        ));
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = DataSourceRegistry::new();
        registry.register(Arc::new(NamedSource("mock")));
        registry.register(Arc::new(NamedSource("mock")));
        assert_eq!(registry.ids().len(), 1);
    }

    #[test]
    fn test_systemic_classification() {
        assert!(DataSourceError::UnknownModule("x".into()).is_systemic());
        assert!(DataSourceError::UnknownSource("x".into()).is_systemic());
        assert!(!DataSourceError::Upstream("timeout".into()).is_systemic());
    }
}
