use std::sync::Arc;

use crate::config::{Config, ValidationResult};
use crate::error::AppError;

/// Application lifecycle: owns the validated configuration from startup
/// until shutdown.
pub struct App {
    config: Arc<Config>,
    validation: ValidationResult,
}

impl App {
    /// Load and validate the configuration from the platform config directory
    pub fn new() -> Result<Self, AppError> {
        let (config, validation) = Config::load_validated()?;
        Ok(Self::from_config(config, validation))
    }

    pub fn from_config(config: Config, validation: ValidationResult) -> Self {
        tracing::info!("Config directory: {}", config.config_dir.display());
        Self {
            config: Arc::new(config),
            validation,
        }
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the config for long-lived components
    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }

    /// Warnings produced while validating the config
    pub fn warnings(&self) -> &[crate::config::ConfigValidationError] {
        &self.validation.warnings
    }

    /// Shutdown the application
    pub fn shutdown(self) {
        tracing::info!("Shutting down application");
    }
}
