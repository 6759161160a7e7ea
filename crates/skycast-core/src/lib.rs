pub mod app;
pub mod config;
pub mod error;

pub use app::App;
pub use config::{ClockFormat, Config, LocationConfig, UiConfig, ValidationResult, WeatherConfig};
pub use error::{AppError, ConfigError};

/// Initialize logging. Honors `RUST_LOG`, defaulting to `info`; logs go to
/// stderr so stdout stays free for the terminal dashboard.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Skycast core initialized");
}
