//! End-to-end tests for the weather pipeline using wiremock.
//!
//! The real HTTP geocoder and forecast provider run against a mock server;
//! the controller drives them exactly as the CLI does.

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use skycast_weather::{
    FixedClock, FixedLocation, GeocodingClient, LocationError, MemoryStore, PanelView,
    RenderedPanels, ViewState, WeatherController, WeatherProvider, LAST_CITY_KEY,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct RecordingView {
    states: Arc<Mutex<Vec<ViewState>>>,
    last_html: Arc<Mutex<Option<String>>>,
}

impl PanelView for RecordingView {
    fn show(&mut self, state: &ViewState, panels: Option<&RenderedPanels>) {
        self.states.lock().unwrap().push(state.clone());
        *self.last_html.lock().unwrap() = panels.map(|p| p.current_html());
    }
}

fn forecast_body(temperature: f64, weather_code: i32) -> serde_json::Value {
    let hours: Vec<String> = (0..48)
        .map(|h| format!("2026-03-{:02}T{:02}:00", 2 + h / 24, h % 24))
        .collect();
    let days: Vec<String> = (2..9).map(|d| format!("2026-03-{:02}", d)).collect();

    serde_json::json!({
        "utc_offset_seconds": 3600,
        "current": {
            "temperature_2m": temperature,
            "relative_humidity_2m": 70,
            "apparent_temperature": temperature - 1.0,
            "weather_code": weather_code,
            "cloud_cover": 35,
            "wind_speed_10m": 9.4
        },
        "hourly": {
            "time": hours,
            "temperature_2m": vec![12.0; 48],
            "weather_code": vec![weather_code; 48]
        },
        "daily": {
            "time": days,
            "weather_code": vec![weather_code; 7],
            "temperature_2m_max": vec![20.2; 7],
            "temperature_2m_min": vec![9.8; 7]
        }
    })
}

async fn mount_city(server: &MockServer, city: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", city))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, temperature: f64, weather_code: i32) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(forecast_body(temperature, weather_code)),
        )
        .mount(server)
        .await;
}

fn controller(server: &MockServer, store: MemoryStore) -> (WeatherController, RecordingView) {
    let view = RecordingView::default();
    let geocoder = GeocodingClient::new(
        format!("{}/v1/search", server.uri()),
        format!("{}/reverse", server.uri()),
    )
    .unwrap();
    let provider = WeatherProvider::new(format!("{}/v1/forecast", server.uri())).unwrap();
    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 3, 2, 9, 15, 0).unwrap());

    let controller = WeatherController::new(
        Arc::new(geocoder),
        Arc::new(provider),
        Box::new(store),
        Box::new(view.clone()),
    )
    .with_clock(Arc::new(clock));

    (controller, view)
}

#[tokio::test]
async fn test_paris_search_renders_content() {
    let server = MockServer::start().await;
    mount_city(
        &server,
        "Paris",
        serde_json::json!({
            "results": [{ "latitude": 48.85, "longitude": 2.35, "name": "Paris", "country": "France" }]
        }),
    )
    .await;
    mount_forecast(&server, 18.4, 2).await;

    let (mut c, view) = controller(&server, MemoryStore::new());
    c.submit_city("Paris").await;

    assert_eq!(c.state(), &ViewState::Content);
    let panels = c.panels().unwrap();
    assert_eq!(panels.current.city, "Paris, France");
    assert_eq!(panels.current.temperature.to_string(), "18");
    assert_eq!(panels.current.icon, "⛅");
    // 09:15 UTC is 10:15 at the location
    assert_eq!(panels.hourly.len(), 24);
    assert_eq!(panels.hourly[0].label, "Now");
    assert_eq!(panels.hourly[1].label, "11 AM");
    assert_eq!(panels.daily.len(), 7);
    assert_eq!(panels.daily[0].label, "Today");
    assert_eq!(c.last_city().as_deref(), Some("Paris"));
    assert_eq!(
        *view.states.lock().unwrap(),
        vec![ViewState::Loading, ViewState::Content]
    );
}

#[tokio::test]
async fn test_unknown_city_shows_not_found() {
    let server = MockServer::start().await;
    mount_city(&server, "Atlantis", serde_json::json!({ "generationtime_ms": 0.3 })).await;

    let (mut c, _view) = controller(&server, MemoryStore::new());
    c.submit_city("Atlantis").await;

    assert_eq!(
        c.state(),
        &ViewState::Error("City not found. Please try another search.".to_string())
    );
    assert_eq!(c.last_city(), None);
}

#[tokio::test]
async fn test_forecast_failure_shows_service_error() {
    let server = MockServer::start().await;
    mount_city(
        &server,
        "Paris",
        serde_json::json!({
            "results": [{ "latitude": 48.85, "longitude": 2.35, "name": "Paris", "country": "France" }]
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let (mut c, _view) = controller(&server, MemoryStore::new());
    c.submit_city("Paris").await;

    assert_eq!(c.state(), &ViewState::Error("Weather API error".to_string()));
    assert_eq!(c.last_city(), None);
}

#[tokio::test]
async fn test_persisted_city_auto_loads_on_start() {
    let server = MockServer::start().await;
    mount_city(
        &server,
        "Tokyo",
        serde_json::json!({
            "results": [{ "latitude": 35.68, "longitude": 139.69, "name": "Tokyo", "country": "Japan" }]
        }),
    )
    .await;
    mount_forecast(&server, 11.6, 0).await;

    let (mut c, view) = controller(&server, MemoryStore::with_entry(LAST_CITY_KEY, "Tokyo"));
    c.start().await;

    assert_eq!(
        *view.states.lock().unwrap(),
        vec![ViewState::Idle, ViewState::Loading, ViewState::Content]
    );
    assert_eq!(c.panels().unwrap().current.city, "Tokyo, Japan");
    assert_eq!(c.panels().unwrap().current.temperature, 12);
}

#[tokio::test]
async fn test_geolocation_with_empty_reverse_geocode_uses_fallback_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "error": "Unable to geocode" })),
        )
        .mount(&server)
        .await;
    mount_forecast(&server, 25.0, 1).await;

    let (mut c, _view) = controller(&server, MemoryStore::new());
    c.request_geolocation(&FixedLocation(Ok((-10.5, -150.25)))).await;

    assert_eq!(c.state(), &ViewState::Content);
    assert_eq!(c.panels().unwrap().current.city, "Your Location");
}

#[tokio::test]
async fn test_geolocation_denied_shows_search_hint() {
    let server = MockServer::start().await;

    let (mut c, view) = controller(&server, MemoryStore::new());
    c.request_geolocation(&FixedLocation(Err(LocationError::PermissionDenied)))
        .await;

    assert_eq!(
        c.state(),
        &ViewState::Error(
            "Unable to get your location. Please search for a city instead.".to_string()
        )
    );
    assert_eq!(view.states.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_script_in_city_name_is_escaped() {
    let server = MockServer::start().await;
    mount_city(
        &server,
        "Evil",
        serde_json::json!({
            "results": [{
                "latitude": 1.0,
                "longitude": 1.0,
                "name": "<script>alert('x')</script>",
                "country": "Nowhere"
            }]
        }),
    )
    .await;
    mount_forecast(&server, 30.0, 0).await;

    let (mut c, view) = controller(&server, MemoryStore::new());
    c.submit_city("Evil").await;

    let html = view.last_html.lock().unwrap().clone().unwrap();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;, Nowhere"));
}
