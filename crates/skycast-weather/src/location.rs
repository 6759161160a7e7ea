//! Device location providers: one-shot position requests.

use async_trait::async_trait;

use crate::types::{coordinates_in_range, LocationError};

/// One-shot device position request
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Current (latitude, longitude) of the device
    async fn current_position(&self) -> Result<(f64, f64), LocationError>;
}

/// Position taken from configuration or command-line flags.
/// Without coordinates the service is reported as unavailable.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    coordinates: Option<(f64, f64)>,
}

impl ConfiguredLocation {
    pub fn new(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        let coordinates = match (latitude, longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        };
        Self { coordinates }
    }
}

#[async_trait]
impl LocationProvider for ConfiguredLocation {
    async fn current_position(&self) -> Result<(f64, f64), LocationError> {
        match self.coordinates {
            Some((lat, lon)) if coordinates_in_range(lat, lon) => {
                tracing::info!("Got location: {}, {}", lat, lon);
                Ok((lat, lon))
            }
            Some((lat, lon)) => {
                tracing::warn!("Configured location out of range: {}, {}", lat, lon);
                Err(LocationError::ServiceUnavailable)
            }
            None => Err(LocationError::ServiceUnavailable),
        }
    }
}

/// Provider that always answers with the same outcome
#[derive(Debug, Clone)]
pub struct FixedLocation(pub Result<(f64, f64), LocationError>);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<(f64, f64), LocationError> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_configured_location_returns_coordinates() {
        let provider = ConfiguredLocation::new(Some(35.68), Some(139.69));
        assert_eq!(provider.current_position().await, Ok((35.68, 139.69)));
    }

    #[tokio::test]
    async fn test_configured_location_missing_is_unavailable() {
        let provider = ConfiguredLocation::new(Some(35.68), None);
        assert_eq!(
            provider.current_position().await,
            Err(LocationError::ServiceUnavailable)
        );
        assert!(ConfiguredLocation::default().current_position().await.is_err());
    }

    #[tokio::test]
    async fn test_configured_location_out_of_range_is_unavailable() {
        let provider = ConfiguredLocation::new(Some(120.0), Some(0.0));
        assert_eq!(
            provider.current_position().await,
            Err(LocationError::ServiceUnavailable)
        );
    }

    #[tokio::test]
    async fn test_fixed_location_denied() {
        let provider = FixedLocation(Err(LocationError::PermissionDenied));
        assert_eq!(
            provider.current_position().await,
            Err(LocationError::PermissionDenied)
        );
    }
}
