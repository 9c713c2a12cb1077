use anyhow::Result;
use metric_lens::config::{LoggingSettings, Settings};
use metric_lens::infrastructure::log_messages;
use metric_lens::Application;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new()?;
    init_tracing(&settings.logging);

    info!("{}", log_messages::application::STARTING);
    info!(
        environment = %settings.application.environment,
        module = %settings.application.module,
        "{}",
        log_messages::configuration::CONFIG_LOADED
    );

    let app = Application::from_settings(settings)?;
    app.run().await?;

    Ok(())
}
