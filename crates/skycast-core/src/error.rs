//! Centralized error types for the Skycast application.
//!
//! Weather search failures never reach this level: the controller turns them
//! into an Error view state. What remains are startup and environment
//! failures, each with a message suitable for the terminal.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine the platform config directory")]
    NoConfigDir,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NoConfigDir => "No config directory available. Set HOME or XDG_CONFIG_HOME.",
            ConfigError::Read { .. } => "Unable to read the configuration file.",
            ConfigError::Write { .. } => "Unable to save the configuration file.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_delegates_to_config_message() {
        let err = AppError::from(ConfigError::Invalid("weather.forecast_url: bad".into()));
        assert_eq!(err.user_message(), "Invalid configuration. Check your settings.");
        assert!(err.to_string().contains("weather.forecast_url"));
    }

    #[test]
    fn test_read_error_mentions_path() {
        let err = ConfigError::Read {
            path: PathBuf::from("/tmp/skycast/config.toml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/skycast/config.toml"));
        assert_eq!(err.user_message(), "Unable to read the configuration file.");
    }

    #[test]
    fn test_other_error_message() {
        let err = AppError::from(anyhow::anyhow!("boom"));
        assert!(err.user_message().contains("unexpected"));
    }
}
