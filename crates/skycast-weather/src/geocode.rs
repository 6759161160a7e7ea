//! Geocoding: city names to coordinates and back.
//! Forward lookups use the Open-Meteo geocoding API, reverse lookups use
//! Nominatim (OpenStreetMap). Neither requires an API key.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{Location, WeatherError, FALLBACK_LOCATION_NAME};

pub const OPEN_METEO_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const NOMINATIM_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";
pub(crate) const USER_AGENT: &str = concat!(
    "skycast/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/skycast/skycast)"
);

/// Turns user input or device coordinates into a [`Location`]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve free-text city input. Zero matches is [`WeatherError::NotFound`].
    async fn resolve_by_name(&self, city: &str) -> Result<Location, WeatherError>;

    /// Resolve a coordinate pair. Zero matches falls back to
    /// [`FALLBACK_LOCATION_NAME`] instead of failing.
    async fn resolve_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Location, WeatherError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    latitude: f64,
    longitude: f64,
    name: String,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl NominatimAddress {
    /// "Place, Country", or just the place when the country is missing or identical.
    fn display_name(self) -> Option<String> {
        let country = self.country.clone();

        let place = self
            .city
            .or(self.town)
            .or(self.village)
            .or(self.municipality)
            .or(self.county)
            .or(self.state)
            .or(self.country)
            .filter(|p| !p.trim().is_empty())?;

        match country {
            Some(c) if !c.is_empty() && c != place => Some(format!("{}, {}", place, c)),
            _ => Some(place),
        }
    }
}

/// HTTP geocoder backed by Open-Meteo (forward) and Nominatim (reverse)
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    search_url: String,
    reverse_url: String,
}

impl GeocodingClient {
    pub fn new(
        search_url: impl Into<String>,
        reverse_url: impl Into<String>,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            search_url: search_url.into(),
            reverse_url: reverse_url.into(),
        })
    }

    /// Client for the public Open-Meteo and Nominatim endpoints
    pub fn public() -> Result<Self, WeatherError> {
        Self::new(OPEN_METEO_GEOCODING_URL, NOMINATIM_REVERSE_URL)
    }
}

#[async_trait]
impl Geocoder for GeocodingClient {
    #[instrument(skip(self), level = "info")]
    async fn resolve_by_name(&self, city: &str) -> Result<Location, WeatherError> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[
                ("name", city),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: SearchResponse = response.json().await?;

        let Some(first) = body.results.into_iter().next() else {
            tracing::info!("No geocoding match for {:?}", city);
            return Err(WeatherError::NotFound(city.to_string()));
        };

        let display_name = match first.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{}, {}", first.name, country),
            _ => first.name,
        };

        tracing::info!("Geocoded {:?} to {}", city, display_name);
        Location::new(first.latitude, first.longitude, display_name)
    }

    #[instrument(skip(self), level = "info")]
    async fn resolve_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Location, WeatherError> {
        let response = self
            .client
            .get(&self.reverse_url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("format", "json".to_string()),
                ("addressdetails", "1".to_string()),
                ("zoom", "10".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        // Nominatim answers a miss with {"error": "..."} and no address.
        let body: NominatimResponse = response.json().await?;

        let display_name = match body.address.and_then(NominatimAddress::display_name) {
            Some(name) => name,
            None => {
                tracing::debug!("Reverse geocode found nothing; using fallback name");
                FALLBACK_LOCATION_NAME.to_string()
            }
        };

        tracing::info!("Reverse geocoded to: {}", display_name);
        Location::new(latitude, longitude, display_name)
    }
}
