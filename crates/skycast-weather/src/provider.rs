//! Forecast fetching from the Open-Meteo forecast API.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::geocode::USER_AGENT;
use crate::types::{CurrentConditions, DailyPoint, ForecastBundle, HourlyPoint, WeatherError};

pub const OPEN_METEO_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,cloud_cover,wind_speed_10m";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min";

const HOURLY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DAILY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of forecast bundles for a coordinate pair
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastBundle, WeatherError>;
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    utc_offset_seconds: i32,
    current: CurrentBlock,
    hourly: HourlyBlock,
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    weather_code: i32,
    cloud_cover: f64,
    wind_speed_10m: f64,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    weather_code: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    weather_code: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
}

impl ForecastResponse {
    fn into_bundle(self) -> Result<ForecastBundle, WeatherError> {
        let current = CurrentConditions {
            temperature: self.current.temperature_2m,
            apparent_temperature: self.current.apparent_temperature,
            humidity: self.current.relative_humidity_2m.round() as i64,
            cloud_cover: self.current.cloud_cover.round() as i64,
            wind_speed: self.current.wind_speed_10m,
            weather_code: self.current.weather_code,
        };

        Ok(ForecastBundle {
            current,
            hourly: self.hourly.into_points()?,
            daily: self.daily.into_points()?,
            utc_offset_seconds: self.utc_offset_seconds,
        })
    }
}

impl HourlyBlock {
    fn into_points(self) -> Result<Vec<HourlyPoint>, WeatherError> {
        ensure_aligned(
            "hourly",
            self.time.len(),
            &[self.temperature_2m.len(), self.weather_code.len()],
        )?;

        self.time
            .iter()
            .zip(self.weather_code)
            .zip(self.temperature_2m)
            .map(|((time, weather_code), temperature)| -> Result<HourlyPoint, WeatherError> {
                Ok(HourlyPoint {
                    time: NaiveDateTime::parse_from_str(time, HOURLY_TIME_FORMAT)
                        .map_err(|e| WeatherError::Parse(format!("hourly time {time:?}: {e}")))?,
                    weather_code,
                    temperature,
                })
            })
            .collect()
    }
}

impl DailyBlock {
    fn into_points(self) -> Result<Vec<DailyPoint>, WeatherError> {
        ensure_aligned(
            "daily",
            self.time.len(),
            &[
                self.weather_code.len(),
                self.temperature_2m_max.len(),
                self.temperature_2m_min.len(),
            ],
        )?;

        self.time
            .iter()
            .zip(self.weather_code)
            .zip(self.temperature_2m_max.into_iter().zip(self.temperature_2m_min))
            .map(
                |((date, weather_code), (temperature_max, temperature_min))| -> Result<DailyPoint, WeatherError> {
                    Ok(DailyPoint {
                        date: NaiveDate::parse_from_str(date, DAILY_DATE_FORMAT).map_err(|e| {
                            WeatherError::Parse(format!("daily date {date:?}: {e}"))
                        })?,
                        weather_code,
                        temperature_max,
                        temperature_min,
                    })
                },
            )
            .collect()
    }
}

/// Every series must share the length of its time axis
fn ensure_aligned(series: &str, expected: usize, lengths: &[usize]) -> Result<(), WeatherError> {
    if lengths.iter().all(|len| *len == expected) {
        Ok(())
    } else {
        Err(WeatherError::Parse(format!(
            "{series} arrays are misaligned: time has {expected} entries, fields have {lengths:?}"
        )))
    }
}

/// Open-Meteo forecast client. One attempt per call, no retry.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    forecast_url: String,
}

impl WeatherProvider {
    pub fn new(forecast_url: impl Into<String>) -> Result<Self, WeatherError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            forecast_url: forecast_url.into(),
        })
    }

    /// Provider for the public Open-Meteo endpoint
    pub fn public() -> Result<Self, WeatherError> {
        Self::new(OPEN_METEO_FORECAST_URL)
    }
}

#[async_trait]
impl ForecastSource for WeatherProvider {
    #[instrument(skip(self), level = "info")]
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastBundle, WeatherError> {
        let response = self
            .client
            .get(&self.forecast_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Forecast request returned status {}", status);
            return Err(WeatherError::Service {
                status: status.as_u16(),
            });
        }

        let body: ForecastResponse = response.json().await?;
        let bundle = body.into_bundle()?;

        tracing::debug!(
            hourly = bundle.hourly.len(),
            daily = bundle.daily.len(),
            "Forecast fetched"
        );
        Ok(bundle)
    }
}
