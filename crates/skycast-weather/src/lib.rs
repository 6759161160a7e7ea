//! Weather pipeline for Skycast
//!
//! Resolves a city name or device position to coordinates, fetches the
//! Open-Meteo forecast, and renders the dashboard panels. The controller
//! depends only on the [`PanelView`] trait, so no UI framework is needed.

pub mod codes;
pub mod controller;
pub mod geocode;
pub mod location;
pub mod provider;
pub mod render;
pub mod storage;
pub mod types;

pub use codes::{translate, WeatherCodeEntry};
pub use controller::{
    Clock, FixedClock, Panel, PanelView, SearchOutcome, SearchRequest, SearchTicket,
    SystemClock, ViewState, WeatherController,
};
pub use geocode::{Geocoder, GeocodingClient};
pub use location::{ConfiguredLocation, FixedLocation, LocationProvider};
pub use provider::{ForecastSource, WeatherProvider};
pub use render::{escape_html, render, ClockStyle, RenderedPanels};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, LAST_CITY_KEY};
pub use types::*;
