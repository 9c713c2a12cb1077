//! Log message constants for infrastructure and application components
//!
//! This module centralizes recurring log messages so wording stays consistent
//! across call sites.

/// Application startup and lifecycle messages
pub mod application {
    pub const STARTING: &str = "Starting Metric Lens";
    pub const STARTED_SUCCESSFULLY: &str = "Metric Lens started successfully";
    pub const RUN_COMPLETED: &str = "Dashboard run completed";
}

/// Data source resolution and fetching
pub mod data_source {
    pub const FALLING_BACK_TO_MOCK: &str =
        "Requested data source is not registered; falling back to mock";
    pub const RESOLVED: &str = "Data source resolved";
    pub const MOCK_GENERATED: &str = "Mock observations generated";
}

/// Dashboard service operations
pub mod dashboard {
    pub const MODULE_LOADED: &str = "Module snapshot computed";
    pub const EMPTY_MODULE: &str = "No observations for module in range";
    pub const COMPARISON_STARTED: &str = "Starting period comparison batch";
    pub const COMPARISON_COMPLETED: &str = "Period comparison batch completed";
    pub const METRIC_DEGRADED: &str =
        "Previous-period fetch failed; metric degraded to zero fallback";
    pub const COMPARISON_ABORTED: &str = "Systemic data source error; comparison batch aborted";
    pub const GRANULARITY_ADAPTED: &str = "Granularity adapted to range length";
}

/// Export messages
pub mod export {
    pub const CSV_WRITTEN: &str = "Observations exported to CSV";
}

/// Configuration messages
pub mod configuration {
    pub const CONFIG_LOADED: &str = "Configuration loaded successfully";
}
