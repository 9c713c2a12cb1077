pub use config::ConfigError;

use crate::domain::metrics::{
    constants, demo_data::GenerationMode, insight::InsightConfig, ForecastHorizon, MetricsError,
};
use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub engine: EngineSettings,
    pub data_source: DataSourceSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub environment: String,
    /// Module queried by the demo binary
    pub module: String,
    /// Length of the demo query window, ending today
    pub days: i64,
    /// Optional CSV export of the queried observations
    pub csv_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineSettings {
    pub chart_forecast_horizon: usize,
    pub comparison_metric_cap: usize,
    pub comparison_concurrency: usize,
    pub insight_min_observations: usize,
    pub insight_deviation_threshold_pct: f64,
    pub insight_max_signals: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSourceSettings {
    pub default: String,
    pub static_mode: bool,
    pub append_forecast: bool,
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_config_dir(Path::new("config"))
    }

    /// Load settings, reading optional config files from `dir`
    pub fn with_config_dir(dir: &Path) -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let config = Self::defaults(&environment)?
            // Add configuration files if they exist
            .add_source(File::from(dir.join("default")).required(false))
            .add_source(File::from(dir.join(&environment)).required(false))
            .add_source(File::from(dir.join("local")).required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("METRIC_LENS").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("application.environment", environment)?
            .set_default("application.module", "ai_diagnosis")?
            .set_default("application.days", 14)?
            .set_default(
                "engine.chart_forecast_horizon",
                constants::forecast::DEFAULT_CHART_HORIZON as u64,
            )?
            .set_default(
                "engine.comparison_metric_cap",
                constants::comparison::METRIC_CAP as u64,
            )?
            .set_default(
                "engine.comparison_concurrency",
                constants::comparison::CONCURRENCY as u64,
            )?
            .set_default(
                "engine.insight_min_observations",
                constants::insight::MIN_OBSERVATIONS as u64,
            )?
            .set_default(
                "engine.insight_deviation_threshold_pct",
                constants::insight::DEVIATION_THRESHOLD_PCT,
            )?
            .set_default(
                "engine.insight_max_signals",
                constants::insight::MAX_SIGNALS as u64,
            )?
            .set_default("data_source.default", "mock")?
            .set_default("data_source.static_mode", true)?
            .set_default("data_source.append_forecast", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")
    }
}

impl EngineSettings {
    pub fn insight_config(&self) -> InsightConfig {
        InsightConfig {
            min_observations: self.insight_min_observations,
            threshold_pct: self.insight_deviation_threshold_pct,
            max_signals: self.insight_max_signals,
        }
    }

    pub fn chart_horizon(&self) -> Result<ForecastHorizon, MetricsError> {
        ForecastHorizon::try_new(self.chart_forecast_horizon)
            .map_err(|_| MetricsError::InvalidHorizon(self.chart_forecast_horizon))
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            chart_forecast_horizon: constants::forecast::DEFAULT_CHART_HORIZON,
            comparison_metric_cap: constants::comparison::METRIC_CAP,
            comparison_concurrency: constants::comparison::CONCURRENCY,
            insight_min_observations: constants::insight::MIN_OBSERVATIONS,
            insight_deviation_threshold_pct: constants::insight::DEVIATION_THRESHOLD_PCT,
            insight_max_signals: constants::insight::MAX_SIGNALS,
        }
    }
}

impl DataSourceSettings {
    pub fn generation_mode(&self) -> GenerationMode {
        if self.static_mode {
            GenerationMode::Static
        } else {
            GenerationMode::Random
        }
    }
}
