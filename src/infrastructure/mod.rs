//! Infrastructure layer for Metric Lens
//!
//! Implementations of external concerns: data sources feeding the engine and
//! CSV export of its inputs.

pub mod datasource;
pub mod export;
pub mod log_messages;

pub use datasource::{DataSource, DataSourceError, DataSourceId, DataSourceRegistry, MockDataSource};
