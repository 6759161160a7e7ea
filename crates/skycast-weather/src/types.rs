use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Display name used when reverse geocoding finds nothing for a position
pub const FALLBACK_LOCATION_NAME: &str = "Your Location";

/// Geographic location resolved for one search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

impl Location {
    /// Build a location, rejecting coordinates outside the valid ranges
    pub fn new(
        latitude: f64,
        longitude: f64,
        display_name: impl Into<String>,
    ) -> Result<Self, WeatherError> {
        if !coordinates_in_range(latitude, longitude) {
            return Err(WeatherError::Parse(format!(
                "coordinates out of range: {latitude}, {longitude}"
            )));
        }

        Ok(Self {
            latitude,
            longitude,
            display_name: display_name.into(),
        })
    }
}

/// Latitude in [-90, 90] and longitude in [-180, 180]; NaN is rejected.
pub fn coordinates_in_range(latitude: f64, longitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}

/// Current weather conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Air temperature in °C
    pub temperature: f64,
    pub apparent_temperature: f64,
    /// Relative humidity in %
    pub humidity: i64,
    /// Cloud cover in %
    pub cloud_cover: i64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    pub weather_code: i32,
}

/// One entry of the hourly series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    /// Location-local time
    pub time: NaiveDateTime,
    pub weather_code: i32,
    pub temperature: f64,
}

/// One entry of the daily series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub weather_code: i32,
    pub temperature_max: f64,
    pub temperature_min: f64,
}

/// Complete forecast payload for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DailyPoint>,
    /// Offset of the location's timezone from UTC, as resolved by the service
    pub utc_offset_seconds: i32,
}

/// Device location errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location error: {0}")]
    Other(String),
}

/// Failure category of a search, independent of the underlying cause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Network,
    Service,
    Geolocation,
}

/// Weather pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    NotFound(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Weather API error: status {status}")]
    Service { status: u16 },
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Network(_) | Self::Parse(_) => ErrorKind::Network,
            Self::Service { .. } => ErrorKind::Service,
            Self::Location(_) => ErrorKind::Geolocation,
        }
    }

    /// Message shown in the error panel
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => "City not found. Please try another search.",
            ErrorKind::Network => "Failed to fetch weather data. Please try again.",
            ErrorKind::Service => "Weather API error",
            ErrorKind::Geolocation => {
                "Unable to get your location. Please search for a city instead."
            }
        }
    }
}
