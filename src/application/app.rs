use crate::application::service::{DashboardService, ModuleSnapshot};
use crate::config::Settings;
use crate::domain::metrics::{
    ComparisonRecord, DateRange, DaysBack, Granularity, Leaderboard, ModuleAverages, ModuleId,
};
use crate::infrastructure::{export, log_messages, DataSourceRegistry, MockDataSource};
use crate::{Error, Result};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// One dashboard run rendered as JSON by the binary
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub snapshot: ModuleSnapshot,
    pub comparisons: Vec<ComparisonRecord>,
    pub fastest_growth: Vec<String>,
    pub largest_swing: Vec<String>,
    pub most_stable: Vec<String>,
    pub averages: ModuleAverages,
}

/// Main application struct that coordinates all components
pub struct Application {
    settings: Settings,
    service: DashboardService,
}

impl Application {
    #[instrument]
    pub async fn new() -> Result<Self> {
        let settings = Settings::new()?;
        Self::from_settings(settings)
    }

    pub fn from_settings(settings: Settings) -> Result<Self> {
        let mut registry = DataSourceRegistry::new();
        registry.register(Arc::new(MockDataSource::new(
            settings.data_source.generation_mode(),
            settings.data_source.append_forecast,
            settings.data_source.seed,
        )));

        let source = registry.resolve_or_mock(&settings.data_source.default)?;
        info!(source = %source.id(), "{}", log_messages::data_source::RESOLVED);

        let service = match settings.data_source.seed {
            Some(seed) => DashboardService::with_seed(source, settings.engine.clone(), seed),
            None => DashboardService::new(source, settings.engine.clone()),
        };

        Ok(Self { settings, service })
    }

    /// Query the configured module over the trailing window ending `today`
    #[instrument(skip(self))]
    pub async fn report(&self, today: NaiveDate) -> Result<DashboardReport> {
        let module_id = ModuleId::try_new(self.settings.application.module.clone())
            .map_err(|e| Error::internal(format!("invalid application.module: {e}")))?;
        let days_back = DaysBack::try_new(self.settings.application.days)
            .map_err(|e| Error::internal(format!("invalid application.days: {e}")))?;
        let range = DateRange::trailing(today, days_back);

        let snapshot = self
            .service
            .load_module(&module_id, &range, Granularity::Day)
            .await?;
        let comparisons = self
            .service
            .compare_periods(&module_id, &range, snapshot.granularity, &snapshot.observations)
            .await?;
        let averages = self.service.module_averages(&module_id, today).await?;

        let board = Leaderboard::new(&comparisons);
        let names = |ranked: Vec<&ComparisonRecord>| -> Vec<String> {
            ranked.iter().map(|r| r.metric_name.to_string()).collect()
        };
        let fastest_growth = names(board.fastest_growth());
        let largest_swing = names(board.largest_swing());
        let most_stable = names(board.most_stable());

        Ok(DashboardReport {
            snapshot,
            comparisons,
            fastest_growth,
            largest_swing,
            most_stable,
            averages,
        })
    }

    #[instrument(skip(self))]
    pub async fn run(self) -> Result<()> {
        info!(
            module = %self.settings.application.module,
            environment = %self.settings.application.environment,
            "{}",
            log_messages::application::STARTED_SUCCESSFULLY
        );

        let report = self.report(Utc::now().date_naive()).await?;
        if let Some(path) = &self.settings.application.csv_path {
            export::write_csv_file(Path::new(path), &report.snapshot.observations.real())?;
        }
        println!("{}", serde_json::to_string_pretty(&report)?);

        info!("{}", log_messages::application::RUN_COMPLETED);
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn service(&self) -> &DashboardService {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::with_config_dir(dir.path()).unwrap();
        settings.data_source.seed = Some(3);
        settings
    }

    #[tokio::test]
    async fn test_report_for_default_module() {
        let app = Application::from_settings(settings()).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let report = app.report(today).await.unwrap();

        assert_eq!(report.snapshot.range.end(), today);
        assert_eq!(report.comparisons.len(), 8);
        assert_eq!(report.fastest_growth.len(), 8);
        assert_eq!(report.largest_swing.len(), 8);
        assert_eq!(report.most_stable.len(), 8);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("largestSwing").is_some());
        assert!(!report.averages.avg_7d.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_default_source_uses_mock() {
        let mut settings = settings();
        settings.data_source.default = "supabase".to_string();
        let app = Application::from_settings(settings).unwrap();
        assert_eq!(app.service().engine().comparison_metric_cap, 8);
    }

    #[tokio::test]
    async fn test_unknown_module_fails_report() {
        let mut settings = settings();
        settings.application.module = "photo_archive".to_string();
        let app = Application::from_settings(settings).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        assert!(matches!(
            app.report(today).await,
            Err(Error::DataSource(_))
        ));
    }
}
